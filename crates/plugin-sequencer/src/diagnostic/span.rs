//! Source location tracking.

/// Start of a node in a parsed source file. Rows and columns are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
}

impl Span {
    pub fn new(start_line: usize, start_col: usize) -> Self {
        Self { start_line, start_col }
    }

    /// One-based `(line, column)` of the start, as editors display it.
    pub fn start(&self) -> (usize, usize) {
        (self.start_line + 1, self.start_col + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_one_based() {
        assert_eq!(Span::new(0, 0).start(), (1, 1));
        assert_eq!(Span::new(4, 12).start(), (5, 13));
    }
}
