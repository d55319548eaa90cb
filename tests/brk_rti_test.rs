//! BRK and RTI: the software interrupt path through 0xFFFE/0xFFFF.

use m6502::{Cpu, FreeClock, Memory, Ram, Status};

fn setup_cpu() -> Cpu<Ram, FreeClock> {
    let mut cpu = Cpu::new(Ram::new(), FreeClock::new());
    cpu.registers.reset();
    cpu.registers.pc = 0x8000;
    cpu
}

#[test]
fn brk_vectors_through_fffe() {
    let mut cpu = setup_cpu();
    cpu.memory.store(0x8000, 0x00); // BRK
    cpu.memory.store(0xFFFE, 0x00);
    cpu.memory.store(0xFFFF, 0x90);

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x9000);
    assert_eq!(cycles, 7);
    assert!(cpu.registers.p.contains(Status::I));
}

#[test]
fn brk_pushes_pc_plus_one_and_status() {
    let mut cpu = setup_cpu();
    cpu.registers.p = Status::I | Status::C;
    cpu.memory.store(0x8000, 0x00);
    cpu.memory.store(0xFFFE, 0x00);
    cpu.memory.store(0xFFFF, 0x90);

    cpu.execute().unwrap();

    // The pushed return address skips the byte after BRK: 0x8002.
    assert_eq!(cpu.memory.fetch(0x01FD), 0x80);
    assert_eq!(cpu.memory.fetch(0x01FC), 0x02);
    // The pushed status has the break bit forced set.
    assert_eq!(
        cpu.memory.fetch(0x01FB),
        (Status::I | Status::C | Status::B).bits()
    );
    assert_eq!(cpu.registers.sp, 0xFA);
}

#[test]
fn rti_restores_status_and_pc() {
    let mut cpu = setup_cpu();
    cpu.registers.pc = 0x9000;
    // Hand-build an interrupt frame: PC 0x8002, status with C and Z.
    cpu.registers.sp = 0xFA;
    cpu.memory.store(0x01FD, 0x80);
    cpu.memory.store(0x01FC, 0x02);
    cpu.memory.store(0x01FB, (Status::C | Status::Z).bits());
    cpu.memory.store(0x9000, 0x40); // RTI

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x8002); // no +1, unlike RTS
    assert_eq!(cpu.registers.p, Status::C | Status::Z);
    assert_eq!(cpu.registers.sp, 0xFD);
    assert_eq!(cycles, 6);
}

#[test]
fn brk_rti_round_trip_resumes_after_padding_byte() {
    let mut cpu = setup_cpu();
    cpu.registers.p.remove(Status::I);
    cpu.memory.store(0x8000, 0x00); // BRK (0x8001 is the padding byte)
    cpu.memory.store(0xFFFE, 0x00);
    cpu.memory.store(0xFFFF, 0x90);
    cpu.memory.store(0x9000, 0x40); // RTI

    cpu.execute().unwrap();
    cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x8002);
    // RTI pulled the pre-BRK status (plus the break bit that was in the
    // pushed copy); I is no longer forced.
    assert!(cpu.registers.p.contains(Status::B));
    assert!(!cpu.registers.p.contains(Status::I));
}
