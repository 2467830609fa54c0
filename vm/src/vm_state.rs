use common::asm::Reg;
use common::constants::{MEM_SIZE, NUM_REGS, STACK_SIZE};

use crate::Fault;

use log::trace;


pub struct Memory {
    words: Box<[u16]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory{ words: vec![0; MEM_SIZE].into_boxed_slice() }
    }

    pub fn read(&self, addr: u16) -> Result<u16, Fault> {
        self.words.get(addr as usize).copied().ok_or(Fault::OutOfBounds(addr))
    }

    pub fn write(&mut self, addr: u16, val: u16) -> Result<(), Fault> {
        trace!("Mem: writing {val} to {addr}");
        let cell = self.words.get_mut(addr as usize).ok_or(Fault::OutOfBounds(addr))?;
        *cell = val;
        Ok(())
    }

    // Copies words in from address 0, stopping at the end of memory. Returns
    // the number of words loaded.
    pub fn load(&mut self, words: impl IntoIterator<Item = u16>) -> usize {
        let mut count = 0;
        for (cell, word) in self.words.iter_mut().zip(words) {
            *cell = word;
            count += 1;
        }
        count
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct Stack {
    words: Vec<u16>,
}

impl Stack {
    pub fn new() -> Self {
        Stack{ words: Vec::with_capacity(STACK_SIZE) }
    }

    // Returns false, leaving the stack untouched, if it's already full.
    pub fn push(&mut self, val: u16) -> bool {
        if self.words.len() == STACK_SIZE {
            return false;
        }
        self.words.push(val);
        true
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.words.pop()
    }

    pub fn depth(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.words.len() == STACK_SIZE
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////

// Everything the dispatch loop mutates, apart from the console.
pub struct VmState {
    num_ins: usize,
    ip: u16,
    mem: Memory,
    regs: [u16; NUM_REGS],
    stack: Stack,
}

impl VmState {
    pub fn new() -> Self {
        VmState {
            num_ins: 0usize,
            ip: 0,
            mem: Memory::new(),
            regs: [0; NUM_REGS],
            stack: Stack::new(),
        }
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    pub fn ip(&self) -> u16 {
        self.ip
    }

    pub fn set_ip(&mut self, ip: u16) {
        self.ip = ip;
    }

    pub fn reg_read(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn reg_write(&mut self, reg: Reg, val: u16) {
        trace!("Reg: writing {val} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }
}

impl Default for VmState {
    fn default() -> Self {
        Self::new()
    }
}
