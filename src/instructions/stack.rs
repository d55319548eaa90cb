//! Stack push/pull instructions.

use crate::clock::Clock;
use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::opcodes::Opcode;
use crate::registers::Status;

/// PHA: push the accumulator.
pub(crate) fn pha<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.push(cpu.registers.a);
    op.cycles
}

/// PHP: push the status byte with the break bit forced set in the pushed
/// copy (the register itself is untouched).
pub(crate) fn php<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.push((cpu.registers.p | Status::B).bits());
    op.cycles
}

/// PLA: pull into the accumulator, setting Z and N.
pub(crate) fn pla<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    let value = cpu.pull();
    cpu.registers.a = cpu.registers.p.set_zn(value);
    op.cycles
}

/// PLP: pull the status byte; every bit, including bit 5, comes from the
/// stack.
pub(crate) fn plp<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p = Status::from_bits_retain(cpu.pull());
    op.cycles
}
