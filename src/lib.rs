//! `ember-vm`: an emulator for a 32-bit register-based processor.
//!
//! The core is the CPU execution engine — register file, instruction
//! dispatch, arithmetic/logic/memory/branch semantics, and the trap/
//! interrupt-masking state machine that lets an external producer thread
//! wake a fetch loop blocked in `wait`. Program loading, assembly, and
//! human-readable tracing are left to callers; see `cpu::dump_hex` for an
//! optional default dump.

pub mod arith;
pub mod consts;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod registers;

mod intr_event;

pub mod prelude {
    pub use crate::consts::TrapVector;
    pub use crate::cpu::{dump_hex, Cpu, HaltReport};
    pub use crate::error::CpuError;
    pub use crate::instruction::{ArgKind, Mnemonic, OPCODE_TABLE};
    pub use crate::memory::Memory;
    pub use crate::registers::RegisterFile;
}
