pub mod console;

pub use console::{PipeConsole, StdConsole};

use std::io::BufRead;

use log::error;

// Where OUT writes to and IN reads from.
pub trait Console: Send + Sync {
    fn write_char(&self, val: u8);

    // None once input has ended for good.
    fn read_char(&self) -> Option<u8>;
}

////////////////////////////////////////////////////////////////////////////////

// Hands out one byte at a time from a line-oriented reader, including the line
// terminator. A new line is only requested once the previous one is used up.
pub struct LineInput<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        LineInput{ reader, line: Vec::new(), pos: 0 }
    }

    pub fn next_char(&mut self) -> Option<u8> {
        if self.pos >= self.line.len() && !self.fill_line() {
            return None;
        }
        let ch = self.line[self.pos];
        self.pos += 1;
        Some(ch)
    }

    // Bytes of the current line not yet handed out.
    pub fn pending(&self) -> &[u8] {
        &self.line[self.pos..]
    }

    fn fill_line(&mut self) -> bool {
        self.line.clear();
        self.pos = 0;
        match self.reader.read_until(b'\n', &mut self.line) {
            Ok(0) => false,
            Ok(_) => true,
            Err(e) => {
                error!("Input: read failed: {e}");
                self.line.clear();
                false
            }
        }
    }
}
