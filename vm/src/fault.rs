use common::decoder::DecodeError;

use std::path::PathBuf;

use thiserror::Error;

// Everything that can end a run early. None of these are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Memory access at {0} outside of memory")]
    OutOfBounds(u16),

    #[error("Push onto a full stack")]
    StackOverflow,

    #[error("Pop from an empty stack")]
    StackUnderflow,

    #[error("Mod by zero at {ip}")]
    DivideByZero { ip: u16 },

    #[error("Input ended")]
    InputExhausted,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unable to read program image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
