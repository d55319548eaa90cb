//! Flag set and clear instructions.

use crate::clock::Clock;
use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::opcodes::Opcode;
use crate::registers::Status;

/// CLC: clear carry.
pub(crate) fn clc<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.remove(Status::C);
    op.cycles
}

/// CLD: clear decimal mode.
pub(crate) fn cld<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.remove(Status::D);
    op.cycles
}

/// CLI: clear interrupt disable.
pub(crate) fn cli<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.remove(Status::I);
    op.cycles
}

/// CLV: clear overflow.
pub(crate) fn clv<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.remove(Status::V);
    op.cycles
}

/// SEC: set carry.
pub(crate) fn sec<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.insert(Status::C);
    op.cycles
}

/// SED: set decimal mode.
pub(crate) fn sed<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.insert(Status::D);
    op.cycles
}

/// SEI: set interrupt disable.
pub(crate) fn sei<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.p.insert(Status::I);
    op.cycles
}
