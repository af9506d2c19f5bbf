//! Total dispatch over a decoded instruction, following the usual
//! `_instruction()` match-over-opcode shape, but over this crate's own
//! `Mnemonic` and operation semantics.

use super::{Cpu, CpuState, StepOutcome};
use crate::consts::TrapVector;
use crate::instruction::{DecodedOperand as Op, Mnemonic};
use crate::intr_event::IntrEvent;
use crate::memory::Memory;

fn reg(op: Op) -> usize {
    match op {
        Op::Reg(r) => r,
        _ => unreachable!("decoder guarantees operand kind matches the opcode table"),
    }
}

fn imm(op: Op) -> i64 {
    match op {
        Op::Immed(v) => v,
        _ => unreachable!("decoder guarantees operand kind matches the opcode table"),
    }
}

fn addr(op: Op) -> i64 {
    match op {
        Op::Addr(v) => v,
        _ => unreachable!("decoder guarantees operand kind matches the opcode table"),
    }
}

impl Cpu {
    pub(crate) fn dispatch(
        state: &mut CpuState,
        intr_event: &IntrEvent,
        memory: &Memory,
        mnemonic: Mnemonic,
        operands: [Op; 3],
    ) -> StepOutcome {
        let [o1, o2, o3] = operands;

        match mnemonic {
            Mnemonic::Nop => {}

            Mnemonic::Savew => Self::savew_locked(state, intr_event, memory, reg(o1), addr(o2)),
            Mnemonic::Savewr => {
                let target = state.registers.get(reg(o2));
                Self::savew_locked(state, intr_event, memory, reg(o1), target)
            }
            Mnemonic::Savewi => Self::savewi_locked(state, intr_event, memory, imm(o1), addr(o2)),
            Mnemonic::Loadw => Self::loadw_locked(state, intr_event, memory, reg(o1), addr(o2)),
            Mnemonic::Loadwr => {
                let source = state.registers.get(reg(o2));
                Self::loadw_locked(state, intr_event, memory, reg(o1), source)
            }
            Mnemonic::Loadwi => state.registers.set(reg(o1), imm(o2)),

            Mnemonic::Saveb => Self::saveb_locked(state, intr_event, memory, reg(o1), addr(o2)),
            Mnemonic::Savebr => {
                let target = state.registers.get(reg(o2));
                Self::saveb_locked(state, intr_event, memory, reg(o1), target)
            }
            Mnemonic::Savebi => Self::savebi_locked(state, intr_event, memory, imm(o1), addr(o2)),
            Mnemonic::Loadb => Self::loadb_locked(state, intr_event, memory, reg(o1), addr(o2)),
            Mnemonic::Loadbr => {
                let source = state.registers.get(reg(o2));
                Self::loadb_locked(state, intr_event, memory, reg(o1), source)
            }
            Mnemonic::Loadbi => state.registers.set(reg(o1), imm(o2) & 0xff),

            Mnemonic::Add => {
                let (value, carry) = super::alu::add(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Addi => {
                let (value, carry) = super::alu::add(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Sub => {
                let (value, carry) = super::alu::sub(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Subi => {
                let (value, carry) = super::alu::sub(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Mul => {
                let (value, carry) = super::alu::mul(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Muli => {
                let (value, carry) = super::alu::mul(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
                state.registers.set_carry(carry);
            }
            Mnemonic::Div => {
                let a = state.registers.get(reg(o1));
                let b = state.registers.get(reg(o2));
                match super::alu::div(a, b) {
                    Some(value) => {
                        state.registers.set(reg(o3), value);
                        state.registers.set_carry(false);
                    }
                    None => Self::raise_trap_locked(state, intr_event, TrapVector::Div),
                }
            }
            Mnemonic::Divi => {
                let a = state.registers.get(reg(o1));
                let b = imm(o2);
                match super::alu::div(a, b) {
                    Some(value) => {
                        state.registers.set(reg(o3), value);
                        state.registers.set_carry(false);
                    }
                    None => Self::raise_trap_locked(state, intr_event, TrapVector::Div),
                }
            }

            Mnemonic::Jmp => Self::jmp_locked(state, intr_event, addr(o1)),
            Mnemonic::Jmpeq => {
                let cond = state.registers.get(reg(o1)) == state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpne => {
                let cond = state.registers.get(reg(o1)) != state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmplt => {
                let cond = state.registers.get(reg(o1)) < state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpgt => {
                let cond = state.registers.get(reg(o1)) > state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmple => {
                let cond = state.registers.get(reg(o1)) <= state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpge => {
                let cond = state.registers.get(reg(o1)) >= state.registers.get(reg(o2));
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpeqi => {
                let cond = state.registers.get(reg(o1)) == imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpnei => {
                let cond = state.registers.get(reg(o1)) != imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmplti => {
                let cond = state.registers.get(reg(o1)) < imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpgti => {
                let cond = state.registers.get(reg(o1)) > imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmplei => {
                let cond = state.registers.get(reg(o1)) <= imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }
            Mnemonic::Jmpgei => {
                let cond = state.registers.get(reg(o1)) >= imm(o2);
                Self::jmp_if_locked(state, intr_event, cond, addr(o3));
            }

            Mnemonic::Halt => return StepOutcome::Halted,
            Mnemonic::Intr => Self::intr_on_locked_state(state, intr_event),
            Mnemonic::Ret => Self::ret_locked(state, intr_event),
            Mnemonic::Eni => Self::eni_locked(state, intr_event),
            Mnemonic::Dsi => Self::dsi_locked(state),
            Mnemonic::Wait => return StepOutcome::SuspendForInterrupt,

            Mnemonic::Swap => Self::swap(state, reg(o1), reg(o2)),
            Mnemonic::Copy => Self::copy(state, reg(o1), reg(o2)),

            Mnemonic::And => {
                let value = super::alu::bitand(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Or => {
                let value = super::alu::bitor(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Xor => {
                let value = super::alu::bitxor(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Andi => {
                let value = super::alu::bitand(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Ori => {
                let value = super::alu::bitor(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Xori => {
                let value = super::alu::bitxor(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Not => {
                let value = super::alu::bitnot(state.registers.get(reg(o1)));
                state.registers.set(reg(o2), value);
            }
            Mnemonic::Shl => {
                let value = super::alu::shl(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Shr => {
                let value = super::alu::shr(state.registers.get(reg(o1)), state.registers.get(reg(o2)));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Shli => {
                let value = super::alu::shl(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
            }
            Mnemonic::Shri => {
                let value = super::alu::shr(state.registers.get(reg(o1)), imm(o2));
                state.registers.set(reg(o3), value);
            }
        }

        StepOutcome::Proceed
    }
}
