use std::io::{self, BufRead, IsTerminal, Read, Stdin, Stdout, Write};
use crate::history::HistoryLog;
use crate::session::Session;
use super::completion::{common_prefix, CommandCompleter, Completer};
use super::terminal::RawMode;

const BELL: &[u8] = b"\x07";
const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const BACKSPACE: u8 = 0x7f;
const CTRL_H: u8 = 0x08;

enum Recall {
    Older,
    Newer,
}

/// Byte-at-a-time line editor for a terminal in raw mode.
///
/// Handles echo, backspace, Tab completion of the command name and Up/Down
/// history recall. It is generic over its streams so it can be driven from
/// memory.
pub struct LineEditor<R: Read, W: Write> {
    input: R,
    output: W,
    prompt: String,
    buffer: String,
    /// Buffer contents when Tab last rang the bell on an ambiguous prefix.
    pending_list: Option<String>,
    /// Index into history while recalling; `None` is the unsent line.
    history_cursor: Option<usize>,
}

impl<R: Read, W: Write> LineEditor<R, W> {
    pub fn new(input: R, output: W, prompt: &str) -> Self {
        LineEditor {
            input,
            output,
            prompt: prompt.to_string(),
            buffer: String::new(),
            pending_list: None,
            history_cursor: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn pending_list(&self) -> bool {
        self.pending_list.is_some()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Read one line. `Ok(None)` means end of input.
    pub fn read_line(&mut self, history: &HistoryLog, completer: &dyn Completer) -> io::Result<Option<String>> {
        self.reset();
        self.write(self.prompt.clone().as_bytes())?;

        loop {
            let Some(byte) = self.next_byte()? else {
                return Ok(None);
            };

            match byte {
                b'\r' | b'\n' => {
                    self.write(b"\n")?;
                    return Ok(Some(self.take_line()));
                }
                b'\t' => self.complete(completer)?,
                BACKSPACE | CTRL_H => {
                    if self.buffer.pop().is_some() {
                        self.pending_list = None;
                        self.write(b"\x08 \x08")?;
                    }
                }
                CTRL_C => {
                    self.reset();
                    self.write(b"^C\n")?;
                    self.write(self.prompt.clone().as_bytes())?;
                }
                CTRL_D if self.buffer.is_empty() => {
                    self.write(b"\n")?;
                    return Ok(None);
                }
                ESC => self.escape(history)?,
                0x20..=0x7e => {
                    self.buffer.push(byte as char);
                    self.pending_list = None;
                    self.write(&[byte])?;
                }
                _ => {}
            }
        }
    }

    fn complete(&mut self, completer: &dyn Completer) -> io::Result<()> {
        if self.buffer.is_empty() || self.buffer.contains(char::is_whitespace) {
            return Ok(());
        }

        let candidates = completer.candidates(&self.buffer);
        match candidates.len() {
            0 => self.write(BELL),
            1 => {
                let suffix = format!("{} ", &candidates[0][self.buffer.len()..]);
                self.pending_list = None;
                self.insert(&suffix)
            }
            _ => {
                let prefix = common_prefix(&candidates);
                if prefix.len() > self.buffer.len() {
                    let suffix = prefix[self.buffer.len()..].to_string();
                    self.pending_list = None;
                    return self.insert(&suffix);
                }
                if self.pending_list.as_deref() == Some(self.buffer.as_str()) {
                    self.pending_list = None;
                    let listing = format!("\n{}\n{}{}", candidates.join("  "), self.prompt, self.buffer);
                    self.write(listing.as_bytes())
                } else {
                    log::debug!("{} completions for {:?}", candidates.len(), self.buffer);
                    self.pending_list = Some(self.buffer.clone());
                    self.write(BELL)
                }
            }
        }
    }

    /// Decode what follows ESC. Only `ESC [ A` and `ESC [ B` do anything.
    fn escape(&mut self, history: &HistoryLog) -> io::Result<()> {
        match self.next_byte()? {
            Some(b'[') => {}
            _ => return Ok(()),
        }
        loop {
            match self.next_byte()? {
                Some(b'A') => return self.recall(history, Recall::Older),
                Some(b'B') => return self.recall(history, Recall::Newer),
                Some(0x40..=0x7e) | None => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn recall(&mut self, history: &HistoryLog, direction: Recall) -> io::Result<()> {
        let len = history.len();
        let cursor = match (direction, self.history_cursor) {
            (Recall::Older, None) if len > 0 => Some(len - 1),
            (Recall::Older, Some(i)) if i > 0 => Some(i - 1),
            (Recall::Newer, Some(i)) if i + 1 < len => Some(i + 1),
            (Recall::Newer, Some(_)) => None,
            _ => return Ok(()),
        };

        self.history_cursor = cursor;
        self.buffer = cursor
            .and_then(|i| history.get(i))
            .unwrap_or_default()
            .to_string();
        self.pending_list = None;
        let line = format!("\r\x1b[K{}{}", self.prompt, self.buffer);
        self.write(line.as_bytes())
    }

    fn insert(&mut self, text: &str) -> io::Result<()> {
        self.buffer.push_str(text);
        self.write(text.as_bytes())
    }

    fn take_line(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.reset();
        line
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.pending_list = None;
        self.history_cursor = None;
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)?;
        self.output.flush()
    }
}

/// Where the shell reads its lines from.
pub enum InputHandler {
    /// Interactive terminal: raw-mode editing.
    Terminal(LineEditor<Stdin, Stdout>),
    /// Anything else (pipes, files): plain buffered lines.
    Plain { prompt: String },
}

impl InputHandler {
    pub fn new(prompt: &str) -> Self {
        if io::stdin().is_terminal() {
            log::info!("interactive terminal detected");
            InputHandler::Terminal(LineEditor::new(io::stdin(), io::stdout(), prompt))
        } else {
            InputHandler::Plain {
                prompt: prompt.to_string(),
            }
        }
    }

    pub fn read_line(&mut self, session: &Session) -> io::Result<Option<String>> {
        match self {
            InputHandler::Terminal(editor) => {
                let _raw = RawMode::enable()?;
                let completer = CommandCompleter::new(session.env.path_resolver());
                editor.read_line(&session.history, &completer)
            }
            InputHandler::Plain { prompt } => read_plain_line(&mut io::stdin().lock(), &mut io::stdout(), prompt),
        }
    }
}

/// Prompt, then read one line without its terminator. `Ok(None)` at end of input.
pub fn read_plain_line<R: BufRead, W: Write>(reader: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedCompleter(Vec<&'static str>);

    impl Completer for FixedCompleter {
        fn candidates(&self, prefix: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|c| c.starts_with(prefix))
                .map(|c| c.to_string())
                .collect()
        }
    }

    fn editor(input: &[u8]) -> LineEditor<Cursor<Vec<u8>>, Vec<u8>> {
        LineEditor::new(Cursor::new(input.to_vec()), Vec::new(), "$ ")
    }

    fn shown<R: Read>(editor: &LineEditor<R, Vec<u8>>) -> String {
        String::from_utf8_lossy(editor.output()).into_owned()
    }

    #[test]
    fn test_plain_line_is_echoed() {
        let mut ed = editor(b"ls -l\r");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("ls -l"));
        assert_eq!(shown(&ed), "$ ls -l\n");
    }

    #[test]
    fn test_end_of_input() {
        let mut ed = editor(b"");
        assert_eq!(ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap(), None);

        let mut ed = editor(b"\x04");
        assert_eq!(ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap(), None);
    }

    #[test]
    fn test_ctrl_d_with_text_is_ignored() {
        let mut ed = editor(b"ab\x04c\n");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("abc"));
    }

    #[test]
    fn test_backspace_and_ctrl_c() {
        let mut ed = editor(b"abx\x7fc\n");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("abc"));

        let mut ed = editor(b"junk\x03ok\n");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("ok"));
        assert_eq!(shown(&ed), "$ junk^C\n$ ok\n");
    }

    #[test]
    fn test_single_candidate_completes_with_space() {
        let mut ed = editor(b"ech\t");
        let completer = FixedCompleter(vec!["echo", "exit"]);
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(ed.buffer(), "echo ");
        assert!(!ed.pending_list());
    }

    #[test]
    fn test_ambiguous_prefix_rings_then_lists() {
        let completer = FixedCompleter(vec!["foo1", "foo2"]);

        let mut ed = editor(b"foo\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert!(ed.pending_list());
        assert_eq!(shown(&ed), "$ foo\x07");

        let mut ed = editor(b"foo\t\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(ed.buffer(), "foo");
        assert!(!ed.pending_list());
        assert_eq!(shown(&ed), "$ foo\x07\nfoo1  foo2\n$ foo");
    }

    #[test]
    fn test_edit_between_tabs_rearms_bell() {
        let completer = FixedCompleter(vec!["foo1", "foo2", "fox"]);
        let mut ed = editor(b"fo\to\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        // "fo" is ambiguous, then "foo" is a fresh buffer: two bells, no listing
        assert_eq!(shown(&ed), "$ fo\x07o\x07");
        assert!(ed.pending_list());
    }

    #[test]
    fn test_common_prefix_extends_buffer() {
        let completer = FixedCompleter(vec!["xyz_bar", "xyz_baz"]);
        let mut ed = editor(b"xy\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(ed.buffer(), "xyz_ba");
        assert!(!ed.pending_list());
    }

    #[test]
    fn test_no_candidates_and_no_completion_after_space() {
        let completer = FixedCompleter(vec!["echo"]);
        let mut ed = editor(b"zz\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(shown(&ed), "$ zz\x07");

        let mut ed = editor(b"echo e\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(ed.buffer(), "echo e");
    }

    #[test]
    fn test_tab_on_empty_buffer_does_nothing() {
        let mut ed = editor(b"\t\tls\n");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec!["ls", "less"])).unwrap();
        assert_eq!(line.as_deref(), Some("ls"));
        assert_eq!(shown(&ed), "$ ls\n");
    }

    #[test]
    fn test_non_ascii_bytes_are_ignored() {
        let mut ed = editor("ab\u{e9}c\u{2603}\n".as_bytes());
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("abc"));
        assert_eq!(shown(&ed), "$ abc\n");
    }

    #[test]
    fn test_backspace_clears_pending_list() {
        let completer = FixedCompleter(vec!["foo1", "foo2"]);
        let mut ed = editor(b"foo\t\x7f");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(ed.buffer(), "fo");
        assert!(!ed.pending_list());

        // Tab after the edit extends again instead of listing
        let mut ed = editor(b"foo\t\x7f\t");
        ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert!(!ed.pending_list());
        assert_eq!(ed.buffer(), "foo");
        assert_eq!(shown(&ed), "$ foo\x07\x08 \x08o");

        let mut ed = editor(b"foox\t\x7f\t\t\xc3\xa9\n");
        let line = ed.read_line(&HistoryLog::new(), &completer).unwrap();
        assert_eq!(line.as_deref(), Some("foo"));
        assert_eq!(shown(&ed), "$ foox\x07\x08 \x08\x07\nfoo1  foo2\n$ foo\n");
    }

    #[test]
    fn test_plain_line_reading() {
        let mut reader = Cursor::new(b"echo hi\r\npwd\nlast".to_vec());
        let mut out = Vec::new();
        assert_eq!(read_plain_line(&mut reader, &mut out, "$ ").unwrap().as_deref(), Some("echo hi"));
        assert_eq!(read_plain_line(&mut reader, &mut out, "$ ").unwrap().as_deref(), Some("pwd"));
        assert_eq!(read_plain_line(&mut reader, &mut out, "$ ").unwrap().as_deref(), Some("last"));
        assert_eq!(read_plain_line(&mut reader, &mut out, "$ ").unwrap(), None);
        assert_eq!(out, b"$ $ $ $ ");
    }

    #[test]
    fn test_history_recall() {
        let mut history = HistoryLog::new();
        history.append("first");
        history.append("second");

        let mut ed = editor(b"\x1b[A\x1b[A\x1b[A\n");
        let line = ed.read_line(&history, &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("first"));
        assert_eq!(shown(&ed), "$ \r\x1b[K$ second\r\x1b[K$ first\n");

        let mut ed = editor(b"\x1b[A\x1b[A\x1b[B\n");
        let line = ed.read_line(&history, &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("second"));

        let mut ed = editor(b"\x1b[A\x1b[B\n");
        let line = ed.read_line(&history, &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some(""));
    }

    #[test]
    fn test_other_escape_sequences_are_discarded() {
        let mut ed = editor(b"a\x1b[C\x1b[1;5Db\x1bxc\n");
        let line = ed.read_line(&HistoryLog::new(), &FixedCompleter(vec![])).unwrap();
        assert_eq!(line.as_deref(), Some("abc"));
    }
}
