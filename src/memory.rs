//! Flat, byte-addressable memory shared between the CPU and any peripheral
//! producer threads.
//!
//! The reference model tolerates byte-level tearing between instructions and
//! places no lock around memory at all. Representing each
//! byte as an independent `AtomicU8` reproduces that contract directly: a
//! peripheral can write concurrently with the CPU's own reads/writes without
//! either side taking a lock, and a torn word read (one producer mid-write
//! while the CPU reads all four bytes) is possible by design, exactly as it
//! would be with the source's unsynchronized `bytearray`.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::consts::MAXVAL;
use crate::error::CpuError;

/// A fixed-length byte buffer addressable by a 32-bit (here: `i64`-typed,
/// always non-negative) address.
pub struct Memory {
    bytes: Vec<AtomicU8>,
}

impl Memory {
    /// Allocates a zero-filled memory of the given length.
    pub fn new(len: usize) -> Self {
        let mut bytes = Vec::with_capacity(len);
        bytes.resize_with(len, || AtomicU8::new(0));
        Memory { bytes }
    }

    /// Builds a memory preloaded with the given bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let bytes = data.into_iter().map(AtomicU8::new).collect();
        Memory { bytes }
    }

    /// Number of addressable bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check_in_bounds(&self, addr: i64) -> Result<usize, CpuError> {
        if addr < 0 || addr as u64 >= self.bytes.len() as u64 {
            return Err(CpuError::AddressOutOfBounds {
                address: addr,
                memory_len: self.bytes.len(),
            });
        }
        Ok(addr as usize)
    }

    /// Reads a single byte. Does not bounds-check against `MAXVAL` (the
    /// source never does for byte accesses); does bounds-check against the
    /// buffer length.
    pub fn read_byte(&self, addr: i64) -> Result<u8, CpuError> {
        let idx = self.check_in_bounds(addr)?;
        Ok(self.bytes[idx].load(Ordering::Relaxed))
    }

    /// Writes a single byte. See `read_byte` for the bounds-check contract.
    pub fn write_byte(&self, addr: i64, value: u8) -> Result<(), CpuError> {
        let idx = self.check_in_bounds(addr)?;
        self.bytes[idx].store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Reads a big-endian 32-bit word starting at `addr`. Bounds-checks both
    /// `addr + 3 <= MAXVAL` and `addr + 3` against the buffer length.
    pub fn read_word(&self, addr: i64) -> Result<u32, CpuError> {
        self.check_word_bounds(addr)?;
        let idx = addr as usize;
        let b0 = self.bytes[idx].load(Ordering::Relaxed);
        let b1 = self.bytes[idx + 1].load(Ordering::Relaxed);
        let b2 = self.bytes[idx + 2].load(Ordering::Relaxed);
        let b3 = self.bytes[idx + 3].load(Ordering::Relaxed);
        Ok(u32::from_be_bytes([b0, b1, b2, b3]))
    }

    /// Writes a big-endian 32-bit word starting at `addr`. See `read_word`
    /// for the bounds-check contract.
    pub fn write_word(&self, addr: i64, value: u32) -> Result<(), CpuError> {
        self.check_word_bounds(addr)?;
        let idx = addr as usize;
        let bytes = value.to_be_bytes();
        self.bytes[idx].store(bytes[0], Ordering::Relaxed);
        self.bytes[idx + 1].store(bytes[1], Ordering::Relaxed);
        self.bytes[idx + 2].store(bytes[2], Ordering::Relaxed);
        self.bytes[idx + 3].store(bytes[3], Ordering::Relaxed);
        Ok(())
    }

    fn check_word_bounds(&self, addr: i64) -> Result<(), CpuError> {
        if addr < 0 || addr.saturating_add(3) > MAXVAL {
            return Err(CpuError::AddressOutOfBounds {
                address: addr,
                memory_len: self.bytes.len(),
            });
        }
        let end = addr as u64 + 3;
        if end >= self.bytes.len() as u64 {
            return Err(CpuError::AddressOutOfBounds {
                address: addr,
                memory_len: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Snapshot of the full buffer, e.g. for the `halt` dump.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trips() {
        let mem = Memory::new(16);
        mem.write_word(4, 0xdead_beef).unwrap();
        assert_eq!(mem.read_word(4).unwrap(), 0xdead_beef);
        assert_eq!(mem.read_byte(4).unwrap(), 0xde);
        assert_eq!(mem.read_byte(7).unwrap(), 0xef);
    }

    #[test]
    fn byte_out_of_bounds_is_rejected() {
        let mem = Memory::new(4);
        assert!(mem.read_byte(4).is_err());
        assert!(mem.write_byte(-1, 0).is_err());
    }

    #[test]
    fn word_out_of_bounds_is_rejected_even_within_maxval() {
        let mem = Memory::new(4);
        assert!(mem.read_word(2).is_err());
        assert!(mem.read_word(0).is_ok());
    }
}
