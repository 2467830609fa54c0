use common::asm::*;
use common::constants::{MAX_ARGS, NUM_MASK, NUM_MODULUS};
use common::decoder::decode;
use common::mem::words_from_image;

use crate::io::{Console, StdConsole};
use crate::{Fault, LoadError, VmState};

use std::ops::{BitAnd, BitOr};
use std::path::Path;
use std::sync::Arc;

use delegate::delegate;
use derive_more::{IsVariant, Unwrap};
use log::{debug, info, trace, warn};


// Where an instruction parameter reads from and writes to. A literal parameter
// resolves to its own word in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageCell {
    Reg(Reg),
    Mem(u16),
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Unwrap)]
pub enum StopReason {
    Halt,
    Fault(Fault),
}


pub struct Vm {
    state: VmState,
    console: Arc<dyn Console>,
    halted: bool,
}

impl Vm {
    pub fn new(console: Arc<dyn Console>) -> Vm {
        Vm {
            state: VmState::new(),
            console,
            halted: false,
        }
    }

    // Copies the image into the bottom of memory, returning the number of
    // words loaded.
    pub fn load_image(&mut self, data: &[u8]) -> usize {
        let loaded = self.state.mem_mut().load(words_from_image(data));
        debug!("Loaded {loaded} words");
        loaded
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.load_image(&data))
    }

    // Run until a halt or a fault.
    pub fn run(&mut self) -> StopReason {
        loop {
            match self.run_ins() {
                Ok(ExecRet::Ok) => (),
                Ok(ExecRet::Halt) => {
                    info!("Halted at {} after {} instructions", self.state.ip(), self.state.num_ins());
                    return StopReason::Halt;
                },
                Err(fault) => {
                    info!("Stopped after {} instructions: {fault}", self.state.num_ins());
                    return StopReason::Fault(fault);
                },
            }
        }
    }

    // Runs a single instruction. Once halted (by HALT or a fault), this does
    // nothing and returns ExecRet::Halt.
    pub fn run_ins(&mut self) -> Result<ExecRet, Fault> {
        if self.halted {
            return Ok(ExecRet::Halt);
        }

        let ret = self.step();
        if !matches!(ret, Ok(ExecRet::Ok)) {
            self.halted = true;
        }
        ret
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn get_state(&self) -> &VmState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut VmState {
        &mut self.state
    }

    delegate! {
        to self.state {
            pub fn ip(&self) -> u16;
            pub fn set_ip(&mut self, ip: u16);
            pub fn reg_read(&self, reg: Reg) -> u16;
            pub fn reg_write(&mut self, reg: Reg, val: u16);
            pub fn stack_depth(&self) -> usize;
            pub fn num_ins(&self) -> usize;
        }
    }

    pub fn mem_read(&self, addr: u16) -> Result<u16, Fault> {
        self.state.mem().read(addr)
    }

    fn step(&mut self) -> Result<ExecRet, Fault> {
        let ins = decode(self.state.mem().as_slice(), self.state.ip())?;
        trace!("{:5}: {ins}", ins.addr);
        self.state.inc_ins();

        let mut cells = [StorageCell::Mem(0); MAX_ARGS];
        for (i, arg) in ins.args().iter().enumerate() {
            cells[i] = Self::resolve(&ins, i, *arg);
        }
        self.state.set_ip(ins.addr + ins.size());

        self.exec(&ins, &cells[..ins.args().len()])
    }

    fn resolve(ins: &Ins, idx: usize, arg: Operand) -> StorageCell {
        match arg {
            Operand::Reg(r) => StorageCell::Reg(r),
            Operand::Lit(_) => StorageCell::Mem(ins.arg_addr(idx)),
        }
    }

    fn read_cell(&self, cell: StorageCell) -> Result<u16, Fault> {
        match cell {
            StorageCell::Reg(r) => Ok(self.state.reg_read(r)),
            StorageCell::Mem(addr) => self.state.mem().read(addr),
        }
    }

    fn write_cell(&mut self, cell: StorageCell, val: u16) -> Result<(), Fault> {
        match cell {
            StorageCell::Reg(r) => {
                self.state.reg_write(r, val);
                Ok(())
            },
            StorageCell::Mem(addr) => self.state.mem_mut().write(addr, val),
        }
    }

    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn exec(&mut self, ins: &Ins, cells: &[StorageCell]) -> Result<ExecRet, Fault> {
        use Opcode::*;
        match ins.op {
            Halt => return Ok(ExecRet::Halt),
            Set => {
                let val = self.read_cell(cells[1])?;
                self.write_cell(cells[0], val)?;
            },
            Push => {
                let val = self.read_cell(cells[0])?;
                self.push(val)?;
            },
            Pop => {
                let val = self.pop()?;
                self.write_cell(cells[0], val)?;
            },
            Eq => self.do_binary(cells, |b, c| (b == c) as u16)?,
            Gt => self.do_binary(cells, |b, c| (b > c) as u16)?,
            Jmp => {
                let target = self.read_cell(cells[0])?;
                self.jump(ins, target);
            },
            Jt | Jf => {
                let cond = self.read_cell(cells[0])?;
                let target = self.read_cell(cells[1])?;
                if (cond != 0) == (ins.op == Jt) {
                    self.jump(ins, target);
                }
            },
            Add => self.do_binary(cells, |b, c| ((b as u32 + c as u32) % NUM_MODULUS) as u16)?,
            Mult => self.do_binary(cells, |b, c| ((b as u32 * c as u32) % NUM_MODULUS) as u16)?,
            Mod => {
                let b = self.read_cell(cells[1])?;
                let c = self.read_cell(cells[2])?;
                if c == 0 {
                    return Err(Fault::DivideByZero{ ip: ins.addr });
                }
                self.write_cell(cells[0], b % c)?;
            },
            And => self.do_binary(cells, u16::bitand)?,
            Or => self.do_binary(cells, u16::bitor)?,
            Not => {
                let val = self.read_cell(cells[1])?;
                self.write_cell(cells[0], !val & NUM_MASK)?;
            },
            Rmem => {
                let addr = self.read_cell(cells[1])?;
                let val = self.state.mem().read(addr)?;
                self.write_cell(cells[0], val)?;
            },
            Wmem => {
                let addr = self.read_cell(cells[0])?;
                let val = self.read_cell(cells[1])?;
                self.state.mem_mut().write(addr, val)?;
            },
            Call => {
                let target = self.read_cell(cells[0])?;
                let ret_addr = self.state.ip();
                self.push(ret_addr)?;
                self.jump(ins, target);
            },
            Ret => {
                // Whatever is on top of the stack, return address or not.
                let target = self.pop()?;
                self.jump(ins, target);
            },
            Out => {
                let val = self.read_cell(cells[0])?;
                if val > u8::MAX as u16 {
                    warn!("{}: out of {val} truncated to a byte", ins.addr);
                }
                self.console.write_char(val as u8);
            },
            In => {
                let ch = self.console.read_char().ok_or(Fault::InputExhausted)?;
                self.write_cell(cells[0], ch as u16)?;
            },
            Noop => (),
        }
        Ok(ExecRet::Ok)
    }

    // a = op(b, c), with b and c read before a is written.
    fn do_binary(&mut self, cells: &[StorageCell], op: fn(u16, u16) -> u16) -> Result<(), Fault> {
        let b = self.read_cell(cells[1])?;
        let c = self.read_cell(cells[2])?;
        self.write_cell(cells[0], op(b, c))
    }

    fn jump(&mut self, ins: &Ins, target: u16) {
        debug!("{}: {} to {target}", ins.addr, ins.op);
        self.state.set_ip(target);
    }

    fn push(&mut self, val: u16) -> Result<(), Fault> {
        if !self.state.stack_mut().push(val) {
            return Err(Fault::StackOverflow);
        }
        trace!("Stack: pushed {val}, depth {}", self.state.stack_depth());
        Ok(())
    }

    fn pop(&mut self) -> Result<u16, Fault> {
        let val = self.state.stack_mut().pop().ok_or(Fault::StackUnderflow)?;
        trace!("Stack: popped {val}, depth {}", self.state.stack_depth());
        Ok(val)
    }
}

impl Default for Vm {
    fn default() -> Self {
        Vm::new(Arc::new(StdConsole::new()))
    }
}
