//! Load/store operations. `loadw`/`savew` trap ILL on an out-of-range
//! address (`addr + 3 > MAXVAL`, checked inside `Memory`, or out of the
//! buffer's actual length). `loadb`/`saveb` add a length bounds-check the
//! reference source does not perform.
//!
//! Immediate-store variants (`savewi`/`savebi`) never stage their literal
//! through the scratch register — the value is passed straight to the
//! underlying write.

use super::{Cpu, CpuState};
use crate::consts::TrapVector;
use crate::intr_event::IntrEvent;
use crate::memory::Memory;

impl Cpu {
    pub(crate) fn loadw_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        dest: usize,
        addr: i64,
    ) {
        match memory.read_word(addr) {
            Ok(value) => state.registers.set(dest, value as i64),
            Err(_) => Self::raise_trap_locked(state, intr_event, TrapVector::Ill),
        }
    }

    pub(crate) fn savew_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        src: usize,
        addr: i64,
    ) {
        let value = state.registers.get(src) as u32;
        if memory.write_word(addr, value).is_err() {
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
        }
    }

    pub(crate) fn savewi_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        value: i64,
        addr: i64,
    ) {
        if memory.write_word(addr, value as u32).is_err() {
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
        }
    }

    pub(crate) fn loadb_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        dest: usize,
        addr: i64,
    ) {
        match memory.read_byte(addr) {
            Ok(value) => state.registers.set(dest, value as i64),
            Err(_) => Self::raise_trap_locked(state, intr_event, TrapVector::Ill),
        }
    }

    pub(crate) fn saveb_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        src: usize,
        addr: i64,
    ) {
        let value = state.registers.get(src) as u8;
        if memory.write_byte(addr, value).is_err() {
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
        }
    }

    pub(crate) fn savebi_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        value: i64,
        addr: i64,
    ) {
        if memory.write_byte(addr, (value & 0xff) as u8).is_err() {
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::Cpu;

    #[test]
    fn word_store_then_load_round_trips() {
        let cpu = Cpu::with_memory_size(16);
        let mut state = cpu.state.lock().unwrap();
        Cpu::savewi_locked(&mut state, &cpu.intr_event, &cpu.memory, 0xdead_beefu32 as i64, 0);
        Cpu::loadw_locked(&mut state, &cpu.intr_event, &cpu.memory, 0x06, 0);
        assert_eq!(state.registers.get(0x06), 0xdead_beefu32 as i64);
        assert!(!state.registers.trap_flag());
    }

    #[test]
    fn byte_store_then_load_round_trips_low_byte_only() {
        let cpu = Cpu::with_memory_size(16);
        let mut state = cpu.state.lock().unwrap();
        Cpu::savebi_locked(&mut state, &cpu.intr_event, &cpu.memory, 0x1ff, 0);
        Cpu::loadb_locked(&mut state, &cpu.intr_event, &cpu.memory, 0x06, 0);
        assert_eq!(state.registers.get(0x06), 0xff);
    }

    #[test]
    fn word_store_past_memory_end_traps_ill() {
        let cpu = Cpu::with_memory_size(4);
        let mut state = cpu.state.lock().unwrap();
        Cpu::savew_locked(&mut state, &cpu.intr_event, &cpu.memory, 0x06, 2);
        assert!(state.registers.trap_flag());
        assert_eq!(state.registers.pc(), TrapVector::Ill.address());
    }
}
