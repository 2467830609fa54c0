use crate::constants::{MAX_ARGS, REG_FLAG};

use std::fmt;

use derive_more::{IsVariant, Unwrap};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Opcode {
    Halt = 0,
    Set,
    Push,
    Pop,
    Eq,
    Gt,
    Jmp,
    Jt,
    Jf,
    Add,
    Mult,
    Mod,
    And,
    Or,
    Not,
    Rmem,
    Wmem,
    Call,
    Ret,
    Out,
    In,
    Noop,
}

impl Opcode {
    pub const MAX: u16 = Opcode::Noop as u16;

    pub fn decode(raw: u16) -> Option<Opcode> {
        Opcode::from_u16(raw)
    }

    // Number of parameter words following the opcode.
    pub fn num_args(self) -> u16 {
        use Opcode::*;
        match self {
            Halt | Ret | Noop => 0,
            Push | Pop | Jmp | Call | Out | In => 1,
            Set | Jt | Jf | Not | Rmem | Wmem => 2,
            Eq | Gt | Add | Mult | Mod | And | Or => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Halt => "halt",
            Set => "set",
            Push => "push",
            Pop => "pop",
            Eq => "eq",
            Gt => "gt",
            Jmp => "jmp",
            Jt => "jt",
            Jf => "jf",
            Add => "add",
            Mult => "mult",
            Mod => "mod",
            And => "and",
            Or => "or",
            Not => "not",
            Rmem => "rmem",
            Wmem => "wmem",
            Call => "call",
            Ret => "ret",
            Out => "out",
            In => "in",
            Noop => "noop",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    pub const NUM_BITS: usize = 3;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    pub const ALL: [Reg; 8] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3,
        Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    // The raw parameter word that names this register.
    pub const fn to_raw(self) -> u16 {
        REG_FLAG | self as u16
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Unwrap)]
pub enum Operand {
    Reg(Reg),
    Lit(u16),
}

impl Operand {
    // Bits 3 through 14 of a register reference are ignored.
    pub fn from_raw(raw: u16) -> Operand {
        if raw & REG_FLAG != 0 {
            let reg = Reg::ALL[(raw & Reg::MASK) as usize];
            Operand::Reg(reg)
        } else {
            Operand::Lit(raw)
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Operand::Reg(r) => r.to_raw(),
            Operand::Lit(val) => val,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{r}"),
            Operand::Lit(val) => write!(f, "{val}"),
        }
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ins {
    pub addr: u16,
    pub op: Opcode,
    args: [Operand; MAX_ARGS],
}

impl Ins {
    pub fn new(addr: u16, op: Opcode, args: &[Operand]) -> Ins {
        assert_eq!(args.len(), op.num_args() as usize, "wrong arg count for {op}");
        let mut all = [Operand::Lit(0); MAX_ARGS];
        all[..args.len()].copy_from_slice(args);
        Ins{addr, op, args: all}
    }

    pub fn args(&self) -> &[Operand] {
        &self.args[..self.op.num_args() as usize]
    }

    // Memory address of the idx'th parameter word.
    pub fn arg_addr(&self, idx: usize) -> u16 {
        debug_assert!(idx < self.op.num_args() as usize);
        self.addr + 1 + idx as u16
    }

    // Size in words, including the opcode.
    pub fn size(&self) -> u16 {
        1 + self.op.num_args()
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for (i, arg) in self.args().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{arg}")?;
        }
        Ok(())
    }
}
