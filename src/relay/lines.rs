//! Splits a chunked byte stream into text lines.

/// Incremental line splitter.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`, the same terminators an SSE
/// parser recognizes. Bytes are decoded as UTF-8 with invalid sequences
/// replaced. A line split across chunks is held until its terminator arrives.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
    /// The last byte seen was `\r`; a `\n` right after it ends nothing.
    after_cr: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if std::mem::take(&mut self.after_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => lines.push(self.take_line()),
                b'\r' => {
                    lines.push(self.take_line());
                    self.after_cr = true;
                }
                _ => self.pending.push(byte),
            }
        }

        lines
    }

    /// Flush the unterminated remainder once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        self.after_cr = false;
        if self.pending.is_empty() {
            None
        } else {
            Some(self.take_line())
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        line
    }
}
