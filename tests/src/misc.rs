use crate::util::*;

use common::asm::{Opcode::*, Reg};
use common::constants::MEM_SIZE;
use common::decoder::DecodeError;
use common::mem::image_from_words;
use vm_lib::{ExecRet, Fault, StopReason};

#[test]
fn out_literal() {
    let (_, console, reason) = run(&[op(Out), 65, op(Halt)]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(console.output_string(), "A");
}

#[test]
fn set_add_out() {
    let (vm, console, reason) = run(&[
        op(Set), R0, 4,
        op(Set), R1, 1,
        op(Add), R1, R1, R0,
        op(Out), R1,
        op(Halt),
    ]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(console.take_output(), vec![5]);
    assert_eq!(vm.reg_read(Reg::R0), 4);
    assert_eq!(vm.reg_read(Reg::R1), 5);
    assert_eq!(vm.num_ins(), 5);
}

#[test]
fn invalid_opcode() {
    let (vm, console, reason) = run(&[22, op(Out), 65, op(Halt)]);
    assert_eq!(reason, StopReason::Fault(Fault::Decode(DecodeError::InvalidOpcode{ip: 0, op: 22})));
    assert!(console.is_out_empty());
    assert_eq!(vm.num_ins(), 0);
}

#[test]
fn noop_is_highest_opcode() {
    let (_, console, reason) = run(&[21, op(Out), 65, op(Halt)]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(console.output_string(), "A");
}

#[test]
fn empty_image_halts() {
    // Zeroed memory decodes as HALT.
    let (vm, _, reason) = run(&[]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(vm.ip(), 1);
}

#[test]
fn set_literal_dest_writes_program() {
    // A literal destination is the parameter's own word.
    let (vm, _, reason) = run(&[op(Set), 7, 9, op(Halt)]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(vm.mem_read(1), Ok(9));
    assert_eq!(vm.mem_read(2), Ok(9));
}

#[test]
fn rmem_wmem() {
    let (vm, _, reason) = run(&[
        op(Wmem), 100, 42,
        op(Rmem), R0, 100,
        op(Set), R1, 101,
        op(Wmem), R1, R0,
        op(Halt),
    ]);
    assert_eq!(reason, StopReason::Halt);
    assert_eq!(vm.reg_read(Reg::R0), 42);
    assert_eq!(vm.mem_read(100), Ok(42));
    assert_eq!(vm.mem_read(101), Ok(42));
}

#[test]
fn rmem_out_of_bounds() {
    // Addresses past the end of memory can only come out of memory itself.
    let (vm, _, reason) = run(&[
        op(Rmem), R0, 7,
        op(Rmem), R1, R0,
        op(Halt),
        0x8000,
    ]);
    assert_eq!(reason, StopReason::Fault(Fault::OutOfBounds(0x8000)));
    assert_eq!(vm.reg_read(Reg::R0), 0x8000);
    assert_eq!(vm.reg_read(Reg::R1), 0);
}

#[test]
fn wmem_out_of_bounds() {
    let (_, _, reason) = run(&[
        op(Rmem), R0, 7,
        op(Wmem), R0, 1,
        op(Halt),
        0xffff,
    ]);
    assert_eq!(reason, StopReason::Fault(Fault::OutOfBounds(0xffff)));
}

#[test]
fn truncated_instruction() {
    let mut words = vec![op(Noop); MEM_SIZE];
    words[MEM_SIZE - 2] = op(Add);
    let (vm, _, reason) = run(&words);
    let ip = (MEM_SIZE - 2) as u16;
    assert_eq!(reason, StopReason::Fault(Fault::Decode(DecodeError::Truncated{ip, op: Add})));
    assert_eq!(vm.ip(), ip);
}

#[test]
fn run_off_end_of_memory() {
    let (vm, _, reason) = run(&vec![op(Noop); MEM_SIZE]);
    assert_eq!(reason, StopReason::Fault(Fault::Decode(DecodeError::OutOfBounds(MEM_SIZE as u16))));
    assert_eq!(vm.num_ins(), MEM_SIZE);
}

#[test]
fn image_truncated() {
    let mut words = vec![op(Noop); MEM_SIZE];
    words.push(op(Halt));
    words.push(op(Halt));
    let (mut vm, _) = load(&[]);
    assert_eq!(vm.load_image(&image_from_words(&words)), MEM_SIZE);
}

#[test]
fn image_odd_byte_ignored() {
    let mut image = image_from_words(&[op(Out), 66, op(Halt)]);
    image.push(0xff);
    let (mut vm, console) = load(&[]);
    assert_eq!(vm.load_image(&image), 3);
    assert_eq!(vm.mem_read(3), Ok(0));
    assert_eq!(vm.run(), StopReason::Halt);
    assert_eq!(console.output_string(), "B");
}

#[test]
fn step_after_halt() {
    let (mut vm, _) = load(&[op(Halt), op(Out), 65]);
    assert_eq!(vm.run_ins(), Ok(ExecRet::Halt));
    assert!(vm.is_halted());
    assert_eq!(vm.ip(), 1);
    assert_eq!(vm.run_ins(), Ok(ExecRet::Halt));
    assert_eq!(vm.ip(), 1);
    assert_eq!(vm.num_ins(), 1);
}

#[test]
fn step_after_fault() {
    let (mut vm, _) = load(&[op(Pop), R0, op(Halt)]);
    assert_eq!(vm.run_ins(), Err(Fault::StackUnderflow));
    assert!(vm.is_halted());
    assert_eq!(vm.run_ins(), Ok(ExecRet::Halt));
    assert_eq!(vm.run(), StopReason::Halt);
}

#[test]
fn missing_image() {
    let (mut vm, _) = load(&[]);
    assert!(vm.load_file("/nonexistent/challenge.bin").is_err());
}
