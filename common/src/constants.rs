
pub const MEM_SIZE: usize = 1 << 15; // Words
pub const STACK_SIZE: usize = 1024; // Words
pub const NUM_REGS: usize = 8;
pub const MAX_ARGS: usize = 3;

// Set on an instruction parameter that names a register rather than a literal.
pub const REG_FLAG: u16 = 1 << 15;
pub const NUM_MASK: u16 = REG_FLAG - 1;
pub const NUM_MODULUS: u32 = REG_FLAG as u32;
