//! Construction: a couple of named entry points rather than a single
//! parameterized one.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use super::{Cpu, CpuState};
use crate::intr_event::IntrEvent;
use crate::memory::Memory;

impl Cpu {
    /// Builds a CPU over caller-supplied memory. Registers initialize to 0,
    /// PC to 0, matching the reference source's `__init__`.
    pub fn new(memory: Memory) -> Arc<Cpu> {
        Arc::new(Cpu {
            state: Mutex::new(CpuState::new()),
            memory: Arc::new(memory),
            intr_event: IntrEvent::new(),
            exit: Arc::new(AtomicBool::new(false)),
            threads: Mutex::new(Vec::new()),
        })
    }

    /// Convenience constructor over a freshly zeroed memory of the given
    /// length.
    pub fn with_memory_size(len: usize) -> Arc<Cpu> {
        Self::new(Memory::new(len))
    }
}
