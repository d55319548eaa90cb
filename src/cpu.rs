//! CPU state and the fetch-execute loop.

use log::{debug, trace};

use crate::addressing::{same_page, AddressingMode};
use crate::clock::Clock;
use crate::instructions::{
    alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer,
};
use crate::memory::Memory;
use crate::opcodes::{Mnemonic, Opcode, OPCODE_TABLE};
use crate::registers::Registers;
use crate::ExecutionError;

/// Reset vector: PC is loaded from this little-endian word on reset.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector: BRK loads PC from this little-endian word.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// The 6502 CPU.
///
/// Owns its register file and drives the fetch-execute loop against a
/// [`Memory`] bus and a shared [`Clock`]. After each instruction the CPU
/// awaits its cycle cost on the clock, so peripheral emulators sharing the
/// clock observe a consistent timeline. The CPU only ever suspends between
/// instructions; each instruction is atomic with respect to the bus.
///
/// # Examples
///
/// ```
/// use m6502::{Cpu, FreeClock, Memory, Ram};
///
/// let mut mem = Ram::new();
/// mem.store(0x8000, 0xEA); // NOP
///
/// let mut cpu = Cpu::new(mem, FreeClock::new());
/// cpu.registers.reset();
/// cpu.registers.pc = 0x8000;
/// assert_eq!(cpu.execute().unwrap(), 2);
/// assert_eq!(cpu.registers.pc, 0x8001);
/// ```
pub struct Cpu<M: Memory, C: Clock> {
    /// The register file. Public so hosts and tests can inspect and seed
    /// state; emulated software can only reach it through instructions.
    pub registers: Registers,
    /// The memory bus.
    pub memory: M,
    clock: C,
}

impl<M: Memory, C: Clock> Cpu<M, C> {
    /// A CPU with zeroed registers. Call [`Cpu::reset`] to establish the
    /// power-on state and load PC from the reset vector.
    pub fn new(memory: M, clock: C) -> Self {
        Cpu {
            registers: Registers::new(),
            memory,
            clock,
        }
    }

    /// Resets registers and memory, then loads PC from the reset vector at
    /// `0xFFFC`/`0xFFFD`.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.reset();
        self.registers.pc = self.fetch_word(RESET_VECTOR);
        debug!("reset: {}", self.registers);
    }

    /// Executes the instruction at PC and returns the cycles it consumed.
    ///
    /// Samples the clock, runs one fetch-decode-execute round, then awaits
    /// `start + cycles` on the clock so emulated time tracks the cycle cost.
    ///
    /// An unmapped opcode returns [`ExecutionError::BadOpcode`] with no
    /// cycles consumed; PC has already moved past the offending byte, leaving
    /// the registers inspectable.
    pub fn execute(&mut self) -> Result<u16, ExecutionError> {
        let start = self.clock.ticks();

        let at = self.registers.pc;
        let byte = self.memory.fetch(at);
        self.registers.pc = at.wrapping_add(1);

        let op = OPCODE_TABLE[byte as usize].ok_or(ExecutionError::BadOpcode(byte))?;
        trace!("{:04X}: {:?} ({:?})", at, op.mnemonic, op.mode);

        let cycles = self.dispatch(op);
        self.clock.wait(start + u64::from(cycles));

        Ok(cycles)
    }

    /// Executes instructions until [`Cpu::execute`] returns an error.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        loop {
            self.execute()?;
        }
    }

    fn dispatch(&mut self, op: Opcode) -> u16 {
        match op.mnemonic {
            Mnemonic::Lda => load_store::lda(self, op),
            Mnemonic::Ldx => load_store::ldx(self, op),
            Mnemonic::Ldy => load_store::ldy(self, op),
            Mnemonic::Sta => load_store::sta(self, op),
            Mnemonic::Stx => load_store::stx(self, op),
            Mnemonic::Sty => load_store::sty(self, op),
            Mnemonic::Tax => transfer::tax(self, op),
            Mnemonic::Tay => transfer::tay(self, op),
            Mnemonic::Txa => transfer::txa(self, op),
            Mnemonic::Tya => transfer::tya(self, op),
            Mnemonic::Tsx => transfer::tsx(self, op),
            Mnemonic::Txs => transfer::txs(self, op),
            Mnemonic::Pha => stack::pha(self, op),
            Mnemonic::Php => stack::php(self, op),
            Mnemonic::Pla => stack::pla(self, op),
            Mnemonic::Plp => stack::plp(self, op),
            Mnemonic::And => alu::and(self, op),
            Mnemonic::Eor => alu::eor(self, op),
            Mnemonic::Ora => alu::ora(self, op),
            Mnemonic::Bit => alu::bit(self, op),
            Mnemonic::Adc => alu::adc(self, op),
            Mnemonic::Sbc => alu::sbc(self, op),
            Mnemonic::Cmp => alu::cmp(self, op),
            Mnemonic::Cpx => alu::cpx(self, op),
            Mnemonic::Cpy => alu::cpy(self, op),
            Mnemonic::Inc => inc_dec::inc(self, op),
            Mnemonic::Inx => inc_dec::inx(self, op),
            Mnemonic::Iny => inc_dec::iny(self, op),
            Mnemonic::Dec => inc_dec::dec(self, op),
            Mnemonic::Dex => inc_dec::dex(self, op),
            Mnemonic::Dey => inc_dec::dey(self, op),
            Mnemonic::Asl => shifts::asl(self, op),
            Mnemonic::Lsr => shifts::lsr(self, op),
            Mnemonic::Rol => shifts::rol(self, op),
            Mnemonic::Ror => shifts::ror(self, op),
            Mnemonic::Jmp => control::jmp(self, op),
            Mnemonic::Jsr => control::jsr(self, op),
            Mnemonic::Rts => control::rts(self, op),
            Mnemonic::Rti => control::rti(self, op),
            Mnemonic::Brk => control::brk(self, op),
            Mnemonic::Nop => control::nop(self, op),
            Mnemonic::Bcc => branches::bcc(self, op),
            Mnemonic::Bcs => branches::bcs(self, op),
            Mnemonic::Beq => branches::beq(self, op),
            Mnemonic::Bmi => branches::bmi(self, op),
            Mnemonic::Bne => branches::bne(self, op),
            Mnemonic::Bpl => branches::bpl(self, op),
            Mnemonic::Bvc => branches::bvc(self, op),
            Mnemonic::Bvs => branches::bvs(self, op),
            Mnemonic::Clc => flags::clc(self, op),
            Mnemonic::Cld => flags::cld(self, op),
            Mnemonic::Cli => flags::cli(self, op),
            Mnemonic::Clv => flags::clv(self, op),
            Mnemonic::Sec => flags::sec(self, op),
            Mnemonic::Sed => flags::sed(self, op),
            Mnemonic::Sei => flags::sei(self, op),
        }
    }

    /// Reads a little-endian word; the high byte wraps with the address
    /// space, not within a page (vectors never straddle `0xFFFF` in
    /// practice).
    pub(crate) fn fetch_word(&mut self, addr: u16) -> u16 {
        let low = self.memory.fetch(addr);
        let high = self.memory.fetch(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Resolves `mode` to an effective address, consuming the operand bytes
    /// (PC ends up past them). The second value is the page-cross penalty in
    /// cycles; only read-class instructions add it, stores and
    /// read-modify-write instructions bake the indexing cost into their base
    /// cycles.
    pub(crate) fn operand_address(&mut self, mode: AddressingMode) -> (u16, u16) {
        match mode {
            AddressingMode::Immediate => {
                let addr = self.registers.pc;
                self.registers.pc = addr.wrapping_add(1);
                (addr, 0)
            }
            AddressingMode::ZeroPage => {
                let addr = self.fetch_operand() as u16;
                (addr, 0)
            }
            AddressingMode::ZeroPageX => {
                let x = self.registers.x;
                (self.fetch_operand().wrapping_add(x) as u16, 0)
            }
            AddressingMode::ZeroPageY => {
                let y = self.registers.y;
                (self.fetch_operand().wrapping_add(y) as u16, 0)
            }
            AddressingMode::Relative => {
                let offset = self.fetch_operand() as i8;
                (self.registers.pc.wrapping_add_signed(offset as i16), 0)
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word(self.registers.pc);
                self.registers.pc = self.registers.pc.wrapping_add(2);
                (addr, 0)
            }
            AddressingMode::AbsoluteX => self.absolute_indexed(self.registers.x),
            AddressingMode::AbsoluteY => self.absolute_indexed(self.registers.y),
            AddressingMode::Indirect => {
                let pointer = self.fetch_word(self.registers.pc);
                self.registers.pc = self.registers.pc.wrapping_add(2);

                // Hardware bug: a pointer ending in 0xFF wraps within its own
                // page when fetching the high byte of the destination.
                let [low, high] = pointer.to_le_bytes();
                let high_at = u16::from_le_bytes([low.wrapping_add(1), high]);
                let low = self.memory.fetch(pointer);
                let high = self.memory.fetch(high_at);
                (u16::from_le_bytes([low, high]), 0)
            }
            AddressingMode::IndirectX => {
                let x = self.registers.x;
                let pointer = self.fetch_operand().wrapping_add(x);
                let low = self.memory.fetch(pointer as u16);
                let high = self.memory.fetch(pointer.wrapping_add(1) as u16);
                (u16::from_le_bytes([low, high]), 0)
            }
            AddressingMode::IndirectY => {
                let pointer = self.fetch_operand();
                let low = self.memory.fetch(pointer as u16);
                let high = self.memory.fetch(pointer.wrapping_add(1) as u16);
                let base = u16::from_le_bytes([low, high]);
                let addr = base.wrapping_add(self.registers.y as u16);
                (addr, page_cross_penalty(base, addr))
            }
            AddressingMode::Implicit | AddressingMode::Accumulator => {
                unreachable!("{:?} has no operand address", mode)
            }
        }
    }

    fn absolute_indexed(&mut self, index: u8) -> (u16, u16) {
        let base = self.fetch_word(self.registers.pc);
        self.registers.pc = self.registers.pc.wrapping_add(2);
        let addr = base.wrapping_add(index as u16);
        (addr, page_cross_penalty(base, addr))
    }

    /// Fetches the byte at PC and steps past it.
    fn fetch_operand(&mut self) -> u8 {
        let value = self.memory.fetch(self.registers.pc);
        self.registers.pc = self.registers.pc.wrapping_add(1);
        value
    }

    // Stack protocol: the stack occupies 0x0100..=0x01FF, grows downward,
    // and SP wraps within the page.

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.store(0x0100 | self.registers.sp as u16, value);
        self.registers.sp = self.registers.sp.wrapping_sub(1);
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push(high);
        self.push(low);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        self.memory.fetch(0x0100 | self.registers.sp as u16)
    }

    pub(crate) fn pull_word(&mut self) -> u16 {
        let low = self.pull();
        let high = self.pull();
        u16::from_le_bytes([low, high])
    }
}

fn page_cross_penalty(base: u16, addr: u16) -> u16 {
    if same_page(base, addr) {
        0
    } else {
        1
    }
}
