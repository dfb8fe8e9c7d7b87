/// Deterministic character-boundary truncation applied before every provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncator {
    max_chars: usize,
}

impl Truncator {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// The first `max_chars` characters of `text`.
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_chars) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }
}
