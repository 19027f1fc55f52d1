use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// In-memory command history.
///
/// `persisted` counts the leading entries already written to the history
/// file, so `append_to_file` only writes what is new. Only the file
/// operations move it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<String>,
    persisted: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    // Add a command to history; blank lines are ignored
    pub fn append(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.entries.push(line.to_string());
    }

    /// Render the last `n` entries as `{index:>4}  {line}`; `n <= 0` or
    /// `n >= len` renders everything.
    pub fn list(&self, n: i64) -> Vec<String> {
        let total = self.entries.len();
        let start = match usize::try_from(n) {
            Ok(limit) if limit > 0 && limit < total => total - limit,
            _ => 0,
        };
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, cmd)| format!("{:>4}  {}", i + 1, cmd))
            .collect()
    }

    /// Read `path` and add its non-blank lines to the log.
    pub fn load(&mut self, path: &Path) -> std::io::Result<()> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end();
            if !line.is_empty() {
                self.entries.push(line.to_string());
            }
        }
        self.persisted = self.entries.len();
        log::debug!("loaded history from {} ({} entries)", path.display(), self.entries.len());
        Ok(())
    }

    /// Overwrite `path` with every entry.
    pub fn save(&mut self, path: &Path) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
        Self::write_entries(file, &self.entries)?;
        self.persisted = self.entries.len();
        Ok(())
    }

    /// Append the entries added since the last load/save/append.
    pub fn append_to_file(&mut self, path: &Path) -> std::io::Result<()> {
        let fresh = &self.entries[self.persisted..];
        if fresh.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::write_entries(file, fresh)?;
        log::debug!("appended {} history entries to {}", fresh.len(), path.display());
        self.persisted = self.entries.len();
        Ok(())
    }

    fn write_entries(file: File, entries: &[String]) -> std::io::Result<()> {
        let mut writer = BufWriter::new(file);
        for line in entries {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }

    // Get the nth history entry (0-based)
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn persisted(&self) -> usize {
        self.persisted
    }
}
