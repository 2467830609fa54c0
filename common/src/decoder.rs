use crate::asm::*;
use crate::constants::{MAX_ARGS, MEM_SIZE};

use thiserror::Error;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Instruction pointer {0} outside of memory")]
    OutOfBounds(u16),

    #[error("Invalid opcode {op} at {ip}")]
    InvalidOpcode { ip: u16, op: u16 },

    #[error("Instruction {op} at {ip} runs past the end of memory")]
    Truncated { ip: u16, op: Opcode },
}


// Decodes the instruction at ip. Never reads past mem.len() or MEM_SIZE,
// whichever is smaller.
pub fn decode(mem: &[u16], ip: u16) -> Result<Ins, DecodeError> {
    let end = usize::min(mem.len(), MEM_SIZE);
    let start = ip as usize;
    if start >= end {
        return Err(DecodeError::OutOfBounds(ip));
    }

    let raw_op = mem[start];
    let op = Opcode::decode(raw_op).ok_or(DecodeError::InvalidOpcode{ip, op: raw_op})?;

    let num_args = op.num_args() as usize;
    if start + 1 + num_args > end {
        return Err(DecodeError::Truncated{ip, op});
    }

    let mut args = [Operand::Lit(0); MAX_ARGS];
    for (arg, raw) in args.iter_mut().zip(&mem[start + 1..start + 1 + num_args]) {
        *arg = Operand::from_raw(*raw);
    }

    Ok(Ins::new(ip, op, &args[..num_args]))
}
