// bitweave
// Copyright (C) 2024  bitweave contributors
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! In-memory bit stream reader/writer over a flat `Vec<u8>`, MSB-first
//! within each byte.

use alloc::vec::Vec;

use crate::error::EngineError;
use crate::model::BitValue;
use crate::outcome::{Outcome, VoidOutcome};
use crate::stream::{BitStreamReader, BitStreamSeeker, BitStreamWriter};

fn read_bits(data: &[u8], bit_pos: i64, n: u32) -> u64 {
    let mut result: u64 = 0;
    for i in 0..n as i64 {
        let abs_bit = bit_pos + i;
        let byte_index = (abs_bit / 8) as usize;
        let bit_index = 7 - (abs_bit % 8) as u32;
        let bit = (data[byte_index] >> bit_index) & 1;
        result = (result << 1) | bit as u64;
    }
    result
}

fn write_bits(data: &mut Vec<u8>, bit_pos: i64, value: u64, n: u32) {
    let needed_bytes = ((bit_pos + n as i64 + 7) / 8) as usize;
    if data.len() < needed_bytes {
        data.resize(needed_bytes, 0);
    }
    for i in 0..n as i64 {
        let abs_bit = bit_pos + i;
        let byte_index = (abs_bit / 8) as usize;
        let bit_index = 7 - (abs_bit % 8) as u32;
        let bit = (value >> (n as i64 - 1 - i)) & 1;
        if bit == 1 {
            data[byte_index] |= 1 << bit_index;
        } else {
            data[byte_index] &= !(1 << bit_index);
        }
    }
}

/// Reads bits out of a fixed, already-populated byte buffer.
pub struct MemoryBitReader {
    data: Vec<u8>,
    position: i64,
}

impl MemoryBitReader {
    /// Wraps `data` for reading, cursor starting at bit 0.
    pub fn new(data: Vec<u8>) -> Self {
        MemoryBitReader { data, position: 0 }
    }

    /// Total number of addressable bits in the buffer.
    pub fn total_bits(&self) -> i64 {
        self.data.len() as i64 * 8
    }
}

impl BitStreamSeeker for MemoryBitReader {
    fn position(&self) -> i64 {
        self.position
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        let next = self.position + offset;
        if next < 0 || next > self.total_bits() {
            return Outcome::err(EngineError::stream("seek out of bounds of the buffer"));
        }
        self.position = next;
        Outcome::ok(())
    }
}

impl BitStreamReader for MemoryBitReader {
    fn read(&mut self, n: u32) -> Outcome<BitValue> {
        if n == 0 || n > 64 {
            return Outcome::err(EngineError::argument_invalid("read length must be in 1..=64"));
        }
        if self.position + n as i64 > self.total_bits() {
            return Outcome::err(EngineError::stream("read past end of buffer"));
        }
        let bits = read_bits(&self.data, self.position, n);
        self.position += n as i64;
        Outcome::ok(BitValue::new(bits, n))
    }
}

/// Writes bits into a growable byte buffer, extending it with zero
/// bytes as the cursor advances past its current length.
pub struct MemoryBitWriter {
    data: Vec<u8>,
    position: i64,
}

impl MemoryBitWriter {
    /// An empty writer, cursor at bit 0.
    pub fn new() -> Self {
        MemoryBitWriter {
            data: Vec::new(),
            position: 0,
        }
    }

    /// Consumes the writer, returning its accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Borrows the accumulated bytes without consuming the writer.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for MemoryBitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitStreamSeeker for MemoryBitWriter {
    fn position(&self) -> i64 {
        self.position
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        let next = self.position + offset;
        if next < 0 {
            return Outcome::err(EngineError::stream("seek before start of buffer"));
        }
        self.position = next;
        Outcome::ok(())
    }
}

impl BitStreamWriter for MemoryBitWriter {
    fn write(&mut self, value: BitValue) -> VoidOutcome {
        if value.length() == 0 || value.length() > 64 {
            return Outcome::err(EngineError::argument_invalid("write length must be in 1..=64"));
        }
        write_bits(&mut self.data, self.position, value.bits(), value.length());
        self.position += value.length() as i64;
        Outcome::ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips_across_byte_boundary() {
        let mut writer = MemoryBitWriter::new();
        writer.write(BitValue::new(0b101, 3)).unwrap();
        writer.write(BitValue::new(0xAB, 8)).unwrap();
        writer.write(BitValue::new(0b1, 1)).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = MemoryBitReader::new(bytes);
        assert_eq!(reader.read(3).unwrap().bits(), 0b101);
        assert_eq!(reader.read(8).unwrap().bits(), 0xAB);
        assert_eq!(reader.read(1).unwrap().bits(), 0b1);
    }

    #[test]
    fn read_past_end_fails() {
        let mut reader = MemoryBitReader::new(alloc::vec![0xFF]);
        assert!(reader.read(9).is_err());
    }

    #[test]
    fn writer_seek_before_start_fails() {
        let mut writer = MemoryBitWriter::new();
        assert!(writer.move_by(-1).is_err());
    }

    #[test]
    fn writer_grows_buffer_as_position_advances() {
        let mut writer = MemoryBitWriter::new();
        writer.move_by(16).unwrap();
        writer.write(BitValue::new(0xFF, 8)).unwrap();
        assert_eq!(writer.bytes().len(), 3);
        assert_eq!(writer.bytes()[2], 0xFF);
    }
}
