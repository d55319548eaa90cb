//! Branch conditions and cycle timing: base 2, +1 taken, +1 page cross.

use m6502::{Cpu, FreeClock, Memory, Ram, Status};

fn setup_cpu() -> Cpu<Ram, FreeClock> {
    let mut cpu = Cpu::new(Ram::new(), FreeClock::new());
    cpu.registers.reset();
    cpu.registers.pc = 0x8000;
    cpu
}

#[test]
fn branch_not_taken_is_two_cycles() {
    let mut cpu = setup_cpu();
    cpu.memory.store(0x8000, 0xF0); // BEQ, Z clear
    cpu.memory.store(0x8001, 0x10);

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x8002);
    assert_eq!(cycles, 2);
}

#[test]
fn branch_taken_same_page_is_three_cycles() {
    let mut cpu = setup_cpu();
    cpu.registers.p.insert(Status::Z);
    cpu.memory.store(0x8000, 0xF0);
    cpu.memory.store(0x8001, 0x10);

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x8012);
    assert_eq!(cycles, 3);
}

#[test]
fn branch_taken_across_page_is_four_cycles() {
    // BEQ +4 at 0x80FD: post-operand PC is 0x80FF, target 0x8103.
    let mut cpu = setup_cpu();
    cpu.registers.pc = 0x80FD;
    cpu.registers.p.insert(Status::Z);
    cpu.memory.store(0x80FD, 0xF0);
    cpu.memory.store(0x80FE, 0x04);

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x8103);
    assert_eq!(cycles, 4);
}

#[test]
fn branch_backwards() {
    let mut cpu = setup_cpu();
    cpu.registers.pc = 0x8010;
    cpu.memory.store(0x8010, 0xD0); // BNE, Z clear -> taken
    cpu.memory.store(0x8011, 0xFC); // -4

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x800E);
    assert_eq!(cycles, 3);
}

#[test]
fn branch_backwards_across_page() {
    let mut cpu = setup_cpu();
    cpu.registers.pc = 0x8001;
    cpu.memory.store(0x8001, 0xD0);
    cpu.memory.store(0x8002, 0xF0); // -16: 0x8003 -> 0x7FF3

    let cycles = cpu.execute().unwrap();

    assert_eq!(cpu.registers.pc, 0x7FF3);
    assert_eq!(cycles, 4);
}

#[test]
fn each_branch_tests_its_own_flag() {
    // (opcode, flag, branches-when-set)
    let cases: [(u8, Status, bool); 8] = [
        (0x90, Status::C, false), // BCC
        (0xB0, Status::C, true),  // BCS
        (0xF0, Status::Z, true),  // BEQ
        (0xD0, Status::Z, false), // BNE
        (0x30, Status::N, true),  // BMI
        (0x10, Status::N, false), // BPL
        (0x70, Status::V, true),  // BVS
        (0x50, Status::V, false), // BVC
    ];

    for (opcode, flag, branches_when_set) in cases {
        for set in [false, true] {
            let mut cpu = setup_cpu();
            cpu.registers.p.set(flag, set);
            cpu.memory.store(0x8000, opcode);
            cpu.memory.store(0x8001, 0x08);

            cpu.execute().unwrap();

            let expected = if set == branches_when_set {
                0x800A
            } else {
                0x8002
            };
            assert_eq!(
                cpu.registers.pc, expected,
                "opcode {:#04x} with flag set={}",
                opcode, set
            );
        }
    }
}
