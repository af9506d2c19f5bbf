//! The opcode table: the static mapping from opcode to (argument-kind
//! triple, mnemonic), plus the pure, lock-free parsing of a raw instruction
//! word quad into an `Instruction`.
//!
//! A tagged enum + static array + total match, rather than the reference
//! source's list of heterogeneous bound methods (`INSTRS`).

use crate::consts::OPCODE_TABLE_LEN;

/// The declared shape of one operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Present in the stream but ignored.
    None,
    /// A register index.
    Reg,
    /// A literal value.
    Immed,
    /// A memory address.
    Addr,
}

/// Every operation the machine understands, tagged for a total dispatch
/// match in `cpu::dispatch`. Variant discriminants are the opcode numbers
/// themselves (opcode == variant's index in `OPCODE_TABLE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mnemonic {
    Nop = 0x00,
    Savew = 0x01,
    Savewr = 0x02,
    Savewi = 0x03,
    Loadw = 0x04,
    Loadwr = 0x05,
    Loadwi = 0x06,
    Saveb = 0x07,
    Savebr = 0x08,
    Savebi = 0x09,
    Loadb = 0x0a,
    Loadbr = 0x0b,
    Loadbi = 0x0c,
    Add = 0x0d,
    Sub = 0x0e,
    Mul = 0x0f,
    Div = 0x10,
    Addi = 0x11,
    Subi = 0x12,
    Muli = 0x13,
    Divi = 0x14,
    Jmp = 0x15,
    Jmpeq = 0x16,
    Jmpne = 0x17,
    Jmplt = 0x18,
    Jmpgt = 0x19,
    Jmple = 0x1a,
    Jmpge = 0x1b,
    Jmpeqi = 0x1c,
    Jmpnei = 0x1d,
    Jmplti = 0x1e,
    Jmpgti = 0x1f,
    Jmplei = 0x20,
    Jmpgei = 0x21,
    Halt = 0x22,
    Intr = 0x23,
    Ret = 0x24,
    Eni = 0x25,
    Dsi = 0x26,
    Wait = 0x27,
    Swap = 0x28,
    Copy = 0x29,
    And = 0x2a,
    Or = 0x2b,
    Xor = 0x2c,
    Andi = 0x2d,
    Ori = 0x2e,
    Xori = 0x2f,
    Not = 0x30,
    Shl = 0x31,
    Shr = 0x32,
    Shli = 0x33,
    Shri = 0x34,
}

/// One row of the opcode table: the three operand kinds and the mnemonic.
pub type OpcodeEntry = (ArgKind, ArgKind, ArgKind, Mnemonic);

use ArgKind::{Addr, Immed, None as N, Reg};

/// The fixed opcode table, indexed by opcode (0x00..=0x34). Argument-kind
/// triples are taken verbatim from the reference source's `INSTRS` table.
pub static OPCODE_TABLE: [OpcodeEntry; OPCODE_TABLE_LEN] = [
    (N, N, N, Mnemonic::Nop),          // 0x00
    (Reg, Addr, N, Mnemonic::Savew),   // 0x01
    (Reg, Reg, N, Mnemonic::Savewr),   // 0x02
    (Immed, Addr, N, Mnemonic::Savewi),// 0x03
    (Reg, Addr, N, Mnemonic::Loadw),   // 0x04
    (Reg, Reg, N, Mnemonic::Loadwr),   // 0x05
    (Reg, Immed, N, Mnemonic::Loadwi), // 0x06
    (Reg, Addr, N, Mnemonic::Saveb),   // 0x07
    (Reg, Reg, N, Mnemonic::Savebr),   // 0x08
    (Immed, Addr, N, Mnemonic::Savebi),// 0x09
    (Reg, Addr, N, Mnemonic::Loadb),   // 0x0a
    (Reg, Reg, N, Mnemonic::Loadbr),   // 0x0b
    (Reg, Immed, N, Mnemonic::Loadbi), // 0x0c
    (Reg, Reg, Reg, Mnemonic::Add),    // 0x0d
    (Reg, Reg, Reg, Mnemonic::Sub),    // 0x0e
    (Reg, Reg, Reg, Mnemonic::Mul),    // 0x0f
    (Reg, Reg, Reg, Mnemonic::Div),    // 0x10
    (Reg, Immed, Reg, Mnemonic::Addi), // 0x11
    (Reg, Immed, Reg, Mnemonic::Subi), // 0x12
    (Reg, Immed, Reg, Mnemonic::Muli), // 0x13
    (Reg, Immed, Reg, Mnemonic::Divi), // 0x14
    (Addr, N, N, Mnemonic::Jmp),       // 0x15
    (Reg, Reg, Addr, Mnemonic::Jmpeq), // 0x16
    (Reg, Reg, Addr, Mnemonic::Jmpne), // 0x17
    (Reg, Reg, Addr, Mnemonic::Jmplt), // 0x18
    (Reg, Reg, Addr, Mnemonic::Jmpgt), // 0x19
    (Reg, Reg, Addr, Mnemonic::Jmple), // 0x1a
    (Reg, Reg, Addr, Mnemonic::Jmpge), // 0x1b
    (Reg, Immed, Addr, Mnemonic::Jmpeqi), // 0x1c
    (Reg, Immed, Addr, Mnemonic::Jmpnei), // 0x1d
    (Reg, Immed, Addr, Mnemonic::Jmplti), // 0x1e
    (Reg, Immed, Addr, Mnemonic::Jmpgti), // 0x1f
    (Reg, Immed, Addr, Mnemonic::Jmplei), // 0x20
    (Reg, Immed, Addr, Mnemonic::Jmpgei), // 0x21
    (N, N, N, Mnemonic::Halt),         // 0x22
    (N, N, N, Mnemonic::Intr),         // 0x23
    (N, N, N, Mnemonic::Ret),          // 0x24
    (N, N, N, Mnemonic::Eni),          // 0x25
    (N, N, N, Mnemonic::Dsi),          // 0x26
    (N, N, N, Mnemonic::Wait),         // 0x27
    (Reg, Reg, N, Mnemonic::Swap),     // 0x28
    (Reg, Reg, N, Mnemonic::Copy),     // 0x29
    (Reg, Reg, Reg, Mnemonic::And),    // 0x2a
    (Reg, Reg, Reg, Mnemonic::Or),     // 0x2b
    (Reg, Reg, Reg, Mnemonic::Xor),    // 0x2c
    (Reg, Immed, Reg, Mnemonic::Andi), // 0x2d
    (Reg, Immed, Reg, Mnemonic::Ori),  // 0x2e
    (Reg, Immed, Reg, Mnemonic::Xori), // 0x2f
    (Reg, Reg, N, Mnemonic::Not),      // 0x30
    (Reg, Reg, Reg, Mnemonic::Shl),    // 0x31
    (Reg, Reg, Reg, Mnemonic::Shr),    // 0x32
    (Reg, Immed, Reg, Mnemonic::Shli), // 0x33
    (Reg, Immed, Reg, Mnemonic::Shri), // 0x34
];

/// One operand after kind-validation: ready for `cpu::dispatch` to consume
/// without re-checking its shape.
#[derive(Debug, Clone, Copy)]
pub enum DecodedOperand {
    /// Present in the stream but ignored.
    None,
    /// A validated register index (`<= 0x1F`).
    Reg(usize),
    /// A literal value, zero-extended from the raw 32-bit word.
    Immed(i64),
    /// A memory address, zero-extended from the raw 32-bit word.
    Addr(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_entry_per_opcode() {
        assert_eq!(OPCODE_TABLE.len(), OPCODE_TABLE_LEN);
        assert_eq!(OPCODE_TABLE[0x00].3, Mnemonic::Nop);
        assert_eq!(OPCODE_TABLE[0x34].3, Mnemonic::Shri);
    }

    #[test]
    fn add_takes_three_registers() {
        assert_eq!(OPCODE_TABLE[0x0d], (Reg, Reg, Reg, Mnemonic::Add));
    }

    #[test]
    fn savewi_takes_immediate_and_address() {
        assert_eq!(OPCODE_TABLE[0x03], (Immed, Addr, N, Mnemonic::Savewi));
    }
}
