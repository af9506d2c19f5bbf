//! Host-level error conditions. Architectural faults (illegal opcode,
//! divide-by-zero, illegal address) are not represented here — they surface
//! as traps inside the running machine, never as a `Result::Err`.

use thiserror::Error;

/// Errors that can occur outside the architectural contract of the emulated
/// machine — setup and lifecycle failures rather than program faults.
#[derive(Debug, Error)]
pub enum CpuError {
    /// A memory address computed from a caller-supplied program falls
    /// outside the backing buffer and cannot even be attempted.
    #[error("address 0x{address:08x} is out of bounds for a {memory_len}-byte memory")]
    AddressOutOfBounds { address: i64, memory_len: usize },
}
