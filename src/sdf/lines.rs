/// Line cursor over one SDF text.
///
/// The cursor is created per import call; the line counter it holds is what
/// diagnostics report.
#[derive(Debug, Clone)]
pub struct LineReader<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// 1-based number of the line most recently read; 0 before any read.
    pub fn line_number(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub fn read_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Only whitespace is left.
    pub fn remaining_is_blank(&self) -> bool {
        self.lines[self.pos.min(self.lines.len())..]
            .iter()
            .all(|l| l.trim().is_empty())
    }

    /// Consume lines up to and including the next `$$$$`.
    pub fn skip_record(&mut self) {
        while let Some(line) = self.read_line() {
            if is_record_end(line) {
                break;
            }
        }
    }

    pub fn read_to_end(&mut self) {
        self.pos = self.lines.len();
    }
}

pub(crate) fn is_record_end(line: &str) -> bool {
    line.trim() == "$$$$"
}

/// Trimmed fixed-width column, if the line reaches it and the range falls
/// on character boundaries.
pub(crate) fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    if start >= line.len() {
        return None;
    }
    line.get(start..end.min(line.len())).map(str::trim)
}
