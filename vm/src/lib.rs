pub mod fault;
pub mod io;
pub mod vm;
pub mod vm_state;

pub use fault::{Fault, LoadError};
pub use io::Console;
pub use vm::{ExecRet, StopReason, Vm};
pub use vm_state::{Memory, Stack, VmState};
