//! Shifts and rotates, in accumulator and read-modify-write memory forms.
//!
//! C always receives the bit shifted out; ROL/ROR rotate through C. The
//! memory forms bake the indexed access into their base cycle counts, so no
//! page-cross penalty applies.

use crate::addressing::AddressingMode;
use crate::clock::Clock;
use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::opcodes::Opcode;
use crate::registers::Status;

/// ASL: shift left, bit 7 into C, bit 0 cleared.
pub(crate) fn asl<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    modify(cpu, op, |p, value| {
        p.set(Status::C, value & 0x80 != 0);
        p.set_zn(value << 1)
    })
}

/// LSR: shift right, bit 0 into C, bit 7 cleared.
pub(crate) fn lsr<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    modify(cpu, op, |p, value| {
        p.set(Status::C, value & 0x01 != 0);
        p.set_zn(value >> 1)
    })
}

/// ROL: rotate left through C.
pub(crate) fn rol<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    modify(cpu, op, |p, value| {
        let carry_in = p.contains(Status::C) as u8;
        p.set(Status::C, value & 0x80 != 0);
        p.set_zn(value << 1 | carry_in)
    })
}

/// ROR: rotate right through C.
pub(crate) fn ror<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    modify(cpu, op, |p, value| {
        let carry_in = (p.contains(Status::C) as u8) << 7;
        p.set(Status::C, value & 0x01 != 0);
        p.set_zn(value >> 1 | carry_in)
    })
}

fn modify<M: Memory, C: Clock>(
    cpu: &mut Cpu<M, C>,
    op: Opcode,
    f: fn(&mut Status, u8) -> u8,
) -> u16 {
    if op.mode == AddressingMode::Accumulator {
        cpu.registers.a = f(&mut cpu.registers.p, cpu.registers.a);
    } else {
        let (addr, _) = cpu.operand_address(op.mode);
        let value = cpu.memory.fetch(addr);
        let value = f(&mut cpu.registers.p, value);
        cpu.memory.store(addr, value);
    }
    op.cycles
}
