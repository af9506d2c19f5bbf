//! Thread registration and orderly halt.
//!
//! Follows the reference source's `register_thread`/`end_threads`
//! (`thread.join(timeout=1)` per thread). The standard
//! library's `JoinHandle::join` has no timeout parameter; each join is
//! delegated to a short-lived helper thread and awaited through a channel
//! with a bounded `recv_timeout`, reproducing "don't block halt forever on a
//! wedged peripheral" using only `std`.

use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use super::Cpu;
use crate::memory::Memory;

const THREAD_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Final register file and memory contents, handed back from `halt`/`run`.
/// The human-readable dump is left to the caller; see `dump_hex`.
pub struct HaltReport {
    pub registers: Vec<i64>,
    pub memory: Vec<u8>,
}

impl Cpu {
    /// Shared memory handle, for callers loading a program before `run`.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Whether the shared exit signal has been set. Peripheral threads
    /// should poll this and return promptly so `halt` does not have to wait
    /// out its bounded join.
    pub fn should_exit(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    /// Registers an auxiliary thread (e.g. an interrupt source) with the
    /// CPU. `f` receives a handle back to the CPU so it can call
    /// `Cpu::interrupt` and poll `Cpu::should_exit`.
    pub fn spawn<F>(self: &Arc<Self>, name: impl Into<String>, f: F)
    where
        F: FnOnce(Arc<Cpu>) + Send + 'static,
    {
        let cpu = Arc::clone(self);
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || f(cpu))
            .expect("failed to spawn peripheral thread");
        self.threads.lock().unwrap().push(handle);
    }

    /// Ends the fetch loop: signals exit, wakes anything blocked in `wait`,
    /// joins registered threads with a bounded per-thread wait, and returns
    /// the final register/memory snapshot. Never terminates the process.
    pub(crate) fn halt(&self) -> HaltReport {
        self.exit.store(true, Ordering::SeqCst);
        self.intr_event.set();

        let handles = std::mem::take(&mut *self.threads.lock().unwrap());
        for handle in handles {
            let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
            let (done_tx, done_rx) = mpsc::channel();
            thread::spawn(move || {
                let _ = handle.join();
                let _ = done_tx.send(());
            });
            if done_rx.recv_timeout(THREAD_JOIN_TIMEOUT).is_err() {
                tracing::warn!(thread = %name, "registered thread did not exit within the bounded wait");
            }
        }

        let state = self.state.lock().unwrap();
        tracing::info!("cpu halted");
        HaltReport {
            registers: state.registers.snapshot(),
            memory: self.memory.to_vec(),
        }
    }
}

/// Default human-readable dump, used when a caller wants the behavior the
/// reference source's `halt` performed unconditionally (print and exit) —
/// minus the exit. Callers may ignore this and redirect the report however
/// they like.
pub fn dump_hex(report: &HaltReport) {
    let registers = report
        .registers
        .iter()
        .enumerate()
        .map(|(i, v)| format!("r{i:02x}=0x{v:x}"))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(%registers, "register file at halt");

    let memory = report
        .memory
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>();
    tracing::info!(%memory, "memory at halt");
}
