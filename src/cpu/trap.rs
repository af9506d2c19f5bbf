//! Trap and interrupt-mask state machine.
//!
//! Follows the reference source's `trap`/`intr`/`ret`/`eni`/`dsi`: every
//! operation here takes `state: &mut CpuState` because the source's
//! `trap()` can itself be invoked while the CPU lock is
//! already held (an illegal address or divide-by-zero discovered mid-step).
//! Rather than require a re-entrant mutex, every such operation is factored
//! into a `*_locked`/`*_on_locked_state` form that assumes the guard is
//! already held; the public `trap`/`interrupt` methods acquire the lock
//! themselves and are the only entry points producer threads use.

use super::{Cpu, CpuState};
use crate::consts::TrapVector;
use crate::intr_event::IntrEvent;

impl Cpu {
    /// Core trap delivery. Assumes `state`'s lock is already held.
    ///
    /// The source expresses double-trap escalation as a self-call
    /// (`return self.trap(TRAP_DTRAP)`). Because `TRAP_DTRAP` can never
    /// itself re-escalate (the guard excludes it), a single substitution of
    /// the effective vector has exactly the same observable effect as the
    /// recursive call and is used here instead.
    pub(crate) fn raise_trap_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        vector: TrapVector,
    ) {
        intr_event.set();
        Self::dsi_locked(state);

        let effective = if state.registers.trap_flag() && vector != TrapVector::Dtrap {
            tracing::warn!(from = %vector, "trap raised while already servicing a trap; escalating to DTRAP");
            TrapVector::Dtrap
        } else {
            vector
        };

        state.registers.set_trap_flag(true);
        state.registers.set_ret(state.registers.pc());
        state.registers.set_pc(effective.address());
        intr_event.clear();

        tracing::debug!(vector = %effective, pc = state.registers.pc(), "trap delivered");
    }

    /// External trap-raising entry point. Acquires the CPU lock itself; for
    /// use by producer threads and callers outside an in-progress step.
    pub fn trap(&self, vector: TrapVector) {
        let mut state = self.state.lock().unwrap();
        Self::raise_trap_locked(&mut state, &self.intr_event, vector);
    }

    /// `intr()`: external interrupt delivery. Assumes `state`'s lock is
    /// already held; used both by the `intr` opcode (dispatched while the
    /// step already holds the lock) and by `interrupt()` below.
    pub(crate) fn intr_on_locked_state(state: &mut CpuState, intr_event: &IntrEvent) {
        if state.intr_mask {
            state.intr_pending = true;
        } else {
            state.intr_pending = false;
            Self::raise_trap_locked(state, intr_event, TrapVector::Intr);
        }
    }

    /// Public interrupt-delivery entry point for peripheral producer
    /// threads. Acquires the CPU lock itself.
    pub fn interrupt(&self) {
        let mut state = self.state.lock().unwrap();
        Self::intr_on_locked_state(&mut state, &self.intr_event);
    }

    /// `ret()`: leave a trap handler.
    pub(crate) fn ret_locked(state: &mut CpuState, intr_event: &IntrEvent) {
        state.registers.set_trap_flag(false);
        let return_pc = state.registers.ret();
        state.registers.set_pc(return_pc);
        Self::eni_locked(state, intr_event);
    }

    /// `eni()`: unmask interrupts, delivering one immediately if a delivery
    /// was pending.
    pub(crate) fn eni_locked(state: &mut CpuState, intr_event: &IntrEvent) {
        state.intr_mask = false;
        if state.intr_pending {
            Self::intr_on_locked_state(state, intr_event);
        }
    }

    /// `dsi()`: mask interrupts.
    pub(crate) fn dsi_locked(state: &mut CpuState) {
        state.intr_mask = true;
    }
}
