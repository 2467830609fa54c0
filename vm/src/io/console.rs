use std::collections::VecDeque;
use std::io::{stdin, stdout, BufRead, BufReader, Read, Write};
use std::sync::Mutex;

use crate::io::{Console, LineInput};

use log::error;


pub struct StdConsole {
    input: Mutex<LineInput<Box<dyn BufRead + Send>>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::with_input(stdin())
    }

    // Output still goes to stdout.
    pub fn with_input(input: impl Read + Send + 'static) -> Self {
        let reader: Box<dyn BufRead + Send> = Box::new(BufReader::new(input));
        StdConsole{ input: Mutex::new(LineInput::new(reader)) }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn write_char(&self, val: u8) {
        let mut out = stdout().lock();
        if let Err(e) = out.write_all(&[val]).and_then(|_| out.flush()) {
            error!("Console: write failed: {e}");
        }
    }

    fn read_char(&self) -> Option<u8> {
        self.input.lock().unwrap().next_char()
    }
}

////////////////////////////////////////////////////////////////////////////////

// In-memory console, so a caller can script input and inspect output.
#[derive(Default)]
pub struct PipeConsole {
    out_buf: Mutex<VecDeque<u8>>,
    in_buf: Mutex<VecDeque<u8>>,
}

impl PipeConsole {
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.out_buf.lock().unwrap()).into()
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.take_output()).into_owned()
    }

    pub fn is_out_empty(&self) -> bool {
        self.out_buf.lock().unwrap().is_empty()
    }

    pub fn push_input(&self, val: u8) {
        self.in_buf.lock().unwrap().push_back(val);
    }

    pub fn write_input(&self, vals: &[u8]) {
        self.in_buf.lock().unwrap().extend(vals.iter().copied());
    }

    pub fn input_remaining(&self) -> usize {
        self.in_buf.lock().unwrap().len()
    }
}

impl Console for PipeConsole {
    fn write_char(&self, val: u8) {
        self.out_buf.lock().unwrap().push_back(val);
    }

    fn read_char(&self) -> Option<u8> {
        self.in_buf.lock().unwrap().pop_front()
    }
}
