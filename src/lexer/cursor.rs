#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: usize,
}

impl SourceChar {
    pub fn next_offset(&self) -> usize {
        self.offset + self.value.len_utf8()
    }
}

/// A forward-only cursor over the source text that keeps track of the current line.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    offset: usize,
    line: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.offset..].chars();
        chars.next()?;
        chars.next()
    }

    pub fn advance(&mut self) -> Option<SourceChar> {
        let value = self.peek()?;
        let current = SourceChar {
            value,
            offset: self.offset,
        };
        self.offset = current.next_offset();
        if value == '\n' {
            self.line += 1;
        }
        Some(current)
    }

    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            let _ = self.advance();
        }
    }

    /// The source text from `start` up to the cursor.
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.offset]
    }
}
