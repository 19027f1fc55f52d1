use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LexError {
    UnterminatedQuote(char, usize),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedQuote(c, q) => write!(f, "Unterminated quote '{}' starting at position {}", c, q),
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

/// Characters a backslash may escape inside double quotes.
const DQUOTE_ESCAPABLE: [char; 4] = ['"', '\\', '$', '`'];

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::iter::Enumerate<std::str::Chars<'a>>>,
    state: QuoteState,
    quote_start: usize,
    buf: String,
    // Set once anything (even an empty quoted literal) belongs to the current word.
    in_word: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().enumerate().peekable(),
            state: QuoteState::Unquoted,
            quote_start: 0,
            buf: String::new(),
            in_word: false,
        }
    }

    /// Split a whole line into words, honoring quotes and backslash escapes.
    pub fn tokenize(line: &str) -> Result<Vec<String>, LexError> {
        Lexer::new(line).tokenize_all()
    }

    pub fn tokenize_all(&mut self) -> Result<Vec<String>, LexError> {
        let mut tokens = Vec::new();

        while let Some((pos, ch)) = self.chars.next() {
            match self.state {
                QuoteState::Unquoted => self.unquoted(pos, ch, &mut tokens),
                QuoteState::SingleQuoted => self.single_quoted(ch),
                QuoteState::DoubleQuoted => self.double_quoted(ch),
            }
        }

        match self.state {
            QuoteState::SingleQuoted => return Err(LexError::UnterminatedQuote('\'', self.quote_start)),
            QuoteState::DoubleQuoted => return Err(LexError::UnterminatedQuote('"', self.quote_start)),
            QuoteState::Unquoted => {}
        }

        self.finish_word(&mut tokens);
        Ok(tokens)
    }

    fn unquoted(&mut self, pos: usize, ch: char, tokens: &mut Vec<String>) {
        match ch {
            c if c.is_whitespace() => self.finish_word(tokens),
            '\'' => {
                self.state = QuoteState::SingleQuoted;
                self.quote_start = pos;
                self.in_word = true;
            }
            '"' => {
                self.state = QuoteState::DoubleQuoted;
                self.quote_start = pos;
                self.in_word = true;
            }
            '\\' => {
                // A trailing backslash has nothing to escape and stays literal
                let escaped = self.chars.next().map(|(_, c)| c).unwrap_or('\\');
                self.push(escaped);
            }
            c => self.push(c),
        }
    }

    fn single_quoted(&mut self, ch: char) {
        match ch {
            '\'' => self.state = QuoteState::Unquoted,
            c => self.buf.push(c),
        }
    }

    fn double_quoted(&mut self, ch: char) {
        match ch {
            '"' => self.state = QuoteState::Unquoted,
            '\\' => match self.chars.peek() {
                Some(&(_, next)) if DQUOTE_ESCAPABLE.contains(&next) => {
                    self.buf.push(next);
                    self.chars.next();
                }
                _ => self.buf.push('\\'),
            },
            c => self.buf.push(c),
        }
    }

    fn push(&mut self, c: char) {
        self.buf.push(c);
        self.in_word = true;
    }

    fn finish_word(&mut self, tokens: &mut Vec<String>) {
        if self.in_word {
            tokens.push(std::mem::take(&mut self.buf));
            self.in_word = false;
        }
    }
}
