//! Register indices, trap vectors and arithmetic boundary constants.

/// Program counter: byte address of the next instruction to fetch.
pub const REG_PC: usize = 0x00;

/// Stack pointer. Software convention only — never touched by the CPU itself.
pub const REG_SP: usize = 0x01;

/// General result register. Software convention only.
pub const REG_RES: usize = 0x02;

/// Carry/overflow flag set by `add`, `sub` and `mul`. Always 0 or 1.
pub const REG_CARRY: usize = 0x03;

/// Saved PC, restored by `ret` when leaving a trap handler.
pub const REG_RET: usize = 0x04;

/// 1 while a trap is being serviced, else 0.
pub const REG_TRAP: usize = 0x05;

/// First general-purpose register.
pub const REG_GP_FIRST: usize = 0x06;

/// Last general-purpose register.
pub const REG_GP_LAST: usize = 0x1f;

/// Internal scratch register. Never addressable by a decoded instruction;
/// this implementation never writes to it at all (see `instruction.rs`).
pub const REG_RESVD: usize = 0x20;

/// Number of register slots (0x00..=0x20 inclusive).
pub const REGISTER_COUNT: usize = REG_RESVD + 1;

/// Width in bytes of a memory word.
pub const WORD_SIZE: usize = 4;

/// Number of entries in the opcode table.
pub const OPCODE_TABLE_LEN: usize = 0x35;

/// Modulus for `add`/`mul` overflow reduction. Not `2^32`: reducing against
/// `2^32 - 1` produces the documented anomaly `MAXVAL + 1 ≡ 1 (mod MAXVAL)`.
pub const MAXVAL: i64 = (1i64 << 32) - 1;

/// Modulus for `sub` overflow reduction. Negative, so every `sub` result is
/// reduced into `(MINVAL, 0]` — including mathematically positive results.
pub const MINVAL: i64 = -(1i64 << 32);

/// A register operand decoded from an instruction is illegal above this index.
pub const MAX_LEGAL_REGISTER: usize = REG_GP_LAST;

/// Trap vectors: fixed, operator-visible entry points for each trap class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum TrapVector {
    /// External interrupt, delivered via `intr()`.
    Intr = 0x10,
    /// Illegal opcode, illegal register operand, or illegal address.
    Ill = 0x20,
    /// Integer division by zero.
    Div = 0x30,
    /// A trap was raised while already servicing one.
    Dtrap = 0x40,
}

impl TrapVector {
    /// The vector's fixed memory address, as stored in PC.
    pub fn address(self) -> i64 {
        self as i64
    }
}

impl std::fmt::Display for TrapVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrapVector::Intr => "INTR",
            TrapVector::Ill => "ILL",
            TrapVector::Div => "DIV",
            TrapVector::Dtrap => "DTRAP",
        };
        write!(f, "{name}(0x{:02x})", self.address())
    }
}
