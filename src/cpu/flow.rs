//! Branches, register moves, and `nop`.

use super::{Cpu, CpuState};
use crate::consts::TrapVector;
use crate::intr_event::IntrEvent;

impl Cpu {
    /// `jmp(addr)`. A negative address is illegal; everything this
    /// implementation ever passes through the decoded `ADDR` operand is
    /// non-negative, so the trap is reachable only defensively (the
    /// reference source checks it unconditionally, so it is kept here rather
    /// than treated as dead code).
    pub(crate) fn jmp_locked(state: &mut CpuState, intr_event: &IntrEvent, addr: i64) {
        if addr < 0 {
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
            return;
        }
        state.registers.set_pc(addr);
    }

    pub(crate) fn jmp_if_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        condition: bool,
        addr: i64,
    ) {
        if condition {
            Self::jmp_locked(state, intr_event, addr);
        }
    }

    /// `swap(r1, r2)`: true value exchange. The reference source's `swap`
    /// assigns `registers[r1] = reg2` — the raw *index*, not the value at
    /// that index — which is almost certainly a bug. This implementation
    /// performs the intended exchange instead.
    pub(crate) fn swap(state: &mut CpuState, r1: usize, r2: usize) {
        let a = state.registers.get(r1);
        let b = state.registers.get(r2);
        state.registers.set(r1, b);
        state.registers.set(r2, a);
    }

    /// `copy(r1, r2): r1 ← r2`. Destination is the first operand.
    pub(crate) fn copy(state: &mut CpuState, r1: usize, r2: usize) {
        state.registers.set(r1, state.registers.get(r2));
    }
}
