//! The fetch-decode-dispatch step and the top-level run loop.
//!
//! Follows the reference source's `decode_next_instr` (cooperative yield,
//! lock, four word reads, opcode-range and register-operand validation)
//! translated into the locked/unlocked split described in `cpu/trap.rs`.

use super::{Cpu, CpuState, HaltReport, StepOutcome};
use crate::consts::{TrapVector, MAX_LEGAL_REGISTER, OPCODE_TABLE_LEN};
use crate::instruction::{ArgKind, DecodedOperand, Mnemonic, OPCODE_TABLE};
use crate::intr_event::IntrEvent;
use crate::memory::Memory;

impl Cpu {
    /// Reads the four words of one instruction, validates the opcode and
    /// any `REG` operands, and returns the mnemonic with its decoded
    /// operands. Returns `None` if a trap was raised mid-decode (the caller
    /// should simply proceed — PC already points at the trap vector).
    fn decode_locked(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
    ) -> Option<(Mnemonic, [DecodedOperand; 3])> {
        let opcode = Self::fetch_word_locked(state, intr_event, memory)?;
        let raw1 = Self::fetch_word_locked(state, intr_event, memory)?;
        let raw2 = Self::fetch_word_locked(state, intr_event, memory)?;
        let raw3 = Self::fetch_word_locked(state, intr_event, memory)?;

        if opcode as usize >= OPCODE_TABLE_LEN {
            tracing::warn!(opcode, "illegal opcode");
            Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
            return None;
        }

        let (k1, k2, k3, mnemonic) = OPCODE_TABLE[opcode as usize];
        let o1 = Self::decode_operand(state, intr_event, k1, raw1)?;
        let o2 = Self::decode_operand(state, intr_event, k2, raw2)?;
        let o3 = Self::decode_operand(state, intr_event, k3, raw3)?;

        Some((mnemonic, [o1, o2, o3]))
    }

    /// Reads one word at PC and advances PC by 4, going through the same
    /// bounds-checked path `loadw` uses — a PC near the top of the address
    /// space can itself raise ILL during fetch.
    fn fetch_word_locked(state: &mut CpuState, intr_event: &IntrEvent, memory: &Memory) -> Option<u32> {
        let pc = state.registers.pc();
        match memory.read_word(pc) {
            Ok(word) => {
                state.registers.set_pc(pc + 4);
                Some(word)
            }
            Err(_) => {
                Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
                None
            }
        }
    }

    fn decode_operand(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        kind: ArgKind,
        raw: u32,
    ) -> Option<DecodedOperand> {
        match kind {
            ArgKind::None => Some(DecodedOperand::None),
            ArgKind::Immed => Some(DecodedOperand::Immed(raw as i64)),
            ArgKind::Addr => Some(DecodedOperand::Addr(raw as i64)),
            ArgKind::Reg => {
                if raw as usize > MAX_LEGAL_REGISTER {
                    tracing::warn!(register = raw, "illegal register operand");
                    Self::raise_trap_locked(state, intr_event, TrapVector::Ill);
                    None
                } else {
                    Some(DecodedOperand::Reg(raw as usize))
                }
            }
        }
    }

    /// One fetch-decode-dispatch step. Yields cooperatively before taking
    /// the CPU lock so a concurrently-ready producer thread gets a chance to
    /// run; the lock is released automatically when this
    /// function returns, so `SuspendForInterrupt` is always reported with no
    /// lock held.
    pub(crate) fn step(&self) -> StepOutcome {
        std::thread::yield_now();

        let mut state = self.state.lock().unwrap();
        match Self::decode_locked(&mut state, &self.intr_event, &self.memory) {
            None => StepOutcome::Proceed,
            Some((mnemonic, operands)) => {
                Self::dispatch(&mut state, &self.intr_event, &self.memory, mnemonic, operands)
            }
        }
    }

    /// Runs the fetch loop until `halt`, returning the final register/memory
    /// snapshot. Joins registered threads as part of halting.
    pub fn run(&self) -> HaltReport {
        loop {
            match self.step() {
                StepOutcome::Proceed => {}
                StepOutcome::SuspendForInterrupt => self.intr_event.wait(),
                StepOutcome::Halted => break,
            }
        }
        self.halt()
    }
}
