//! Instruction executors, one module per family.
//!
//! Every executor takes the CPU and its decoded [`Opcode`](crate::Opcode) and
//! returns the cycles consumed: the table's base cost plus any data-dependent
//! penalty (page crossings, taken branches). The fetch-execute loop has
//! already stepped PC past the opcode byte, so executors see PC at the first
//! operand byte.

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;
