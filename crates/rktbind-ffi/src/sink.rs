//! Append-only output buffer.

/// The generated module text, written strictly in call order.
#[derive(Debug, Default)]
pub struct Sink {
    out: String,
    blocks: usize,
}

impl Sink {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            blocks: 0,
        }
    }

    /// Append text verbatim.
    pub fn write_raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Append one block followed by a blank line.
    pub fn write_block(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push_str("\n\n");
        self.blocks += 1;
    }

    /// Number of blocks written so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
