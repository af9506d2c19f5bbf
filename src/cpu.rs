//! The CPU: register file, trap/interrupt state, and the memory it shares
//! with peripheral producer threads, plus the fetch-decode-dispatch driver.
//!
//! Split into submodules, one file per concern, all operating on the same
//! central struct.

mod alu;
mod constructors;
mod dispatch;
mod fetch;
mod flow;
mod lifecycle;
mod memory_ops;
mod trap;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::intr_event::IntrEvent;
use crate::memory::Memory;
use crate::registers::RegisterFile;

pub use lifecycle::{dump_hex, HaltReport};

/// Locked CPU state: everything a fetch step, or an external trap/interrupt
/// delivery, needs exclusive access to. Memory is deliberately *not* part of
/// this struct — it is shared without a lock (see `memory.rs`).
pub(crate) struct CpuState {
    pub registers: RegisterFile,
    pub intr_mask: bool,
    pub intr_pending: bool,
}

impl CpuState {
    fn new() -> Self {
        CpuState {
            registers: RegisterFile::new(),
            intr_mask: false,
            intr_pending: false,
        }
    }
}

/// Outcome of a single fetch-decode-dispatch step, reported to the driver in
/// `cpu::fetch`.
pub(crate) enum StepOutcome {
    /// Ordinary completion; the driver should yield and step again.
    Proceed,
    /// A `wait` instruction ran; the driver must drop the state lock before
    /// blocking on the interrupt event.
    SuspendForInterrupt,
    /// A `halt` instruction ran; the driver should end the loop.
    Halted,
}

/// The emulated processor: register file + trap/interrupt controller behind
/// a lock, plus a handle to the shared memory and registered peripheral
/// threads.
pub struct Cpu {
    pub(crate) state: Mutex<CpuState>,
    pub(crate) memory: Arc<Memory>,
    pub(crate) intr_event: IntrEvent,
    pub(crate) exit: Arc<AtomicBool>,
    pub(crate) threads: Mutex<Vec<JoinHandle<()>>>,
}
