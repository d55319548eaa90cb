//! Increments and decrements, on memory and on the index registers.

use crate::clock::Clock;
use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::opcodes::Opcode;

// The memory forms are read-modify-write; their base cycle counts already
// include the indexed access, so the page-cross penalty is ignored.

/// INC: M = M + 1, setting Z and N.
pub(crate) fn inc<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    let (addr, _) = cpu.operand_address(op.mode);
    let value = cpu.memory.fetch(addr).wrapping_add(1);
    let value = cpu.registers.p.set_zn(value);
    cpu.memory.store(addr, value);
    op.cycles
}

/// DEC: M = M - 1, setting Z and N.
pub(crate) fn dec<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    let (addr, _) = cpu.operand_address(op.mode);
    let value = cpu.memory.fetch(addr).wrapping_sub(1);
    let value = cpu.registers.p.set_zn(value);
    cpu.memory.store(addr, value);
    op.cycles
}

/// INX: X = X + 1, setting Z and N.
pub(crate) fn inx<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.x = cpu.registers.p.set_zn(cpu.registers.x.wrapping_add(1));
    op.cycles
}

/// INY: Y = Y + 1, setting Z and N.
pub(crate) fn iny<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.y = cpu.registers.p.set_zn(cpu.registers.y.wrapping_add(1));
    op.cycles
}

/// DEX: X = X - 1, setting Z and N.
pub(crate) fn dex<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.x = cpu.registers.p.set_zn(cpu.registers.x.wrapping_sub(1));
    op.cycles
}

/// DEY: Y = Y - 1, setting Z and N.
pub(crate) fn dey<M: Memory, C: Clock>(cpu: &mut Cpu<M, C>, op: Opcode) -> u16 {
    cpu.registers.y = cpu.registers.p.set_zn(cpu.registers.y.wrapping_sub(1));
    op.cycles
}
