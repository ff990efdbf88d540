//! PICT stream writer utilities.
//!
//! This module provides the `PictStreamWriter` which emits big-endian
//! fields, opcodes and packed rows into a caller-supplied buffer.

use crate::error::PictError;
use crate::pict_opcode::Opcode;

/// A writer for PICT opcode streams over a fixed destination buffer.
pub struct PictStreamWriter<'a> {
    destination: &'a mut [u8],
    position: usize,
}

impl<'a> PictStreamWriter<'a> {
    pub fn new(destination: &'a mut [u8]) -> Self {
        Self {
            destination,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn write_byte(&mut self, value: u8) -> Result<(), PictError> {
        let slot = self
            .destination
            .get_mut(self.position)
            .ok_or(PictError::DestinationTooSmall)?;
        *slot = value;
        self.position += 1;
        Ok(())
    }

    pub fn write_bytes(&mut self, values: &[u8]) -> Result<(), PictError> {
        let end = self.position + values.len();
        if end > self.destination.len() {
            return Err(PictError::DestinationTooSmall);
        }
        self.destination[self.position..end].copy_from_slice(values);
        self.position = end;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), PictError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), PictError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), PictError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), PictError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_opcode(&mut self, opcode: Opcode) -> Result<(), PictError> {
        self.write_u16(opcode.into())
    }

    /// Overwrites a previously written big-endian word.
    pub fn patch_u16(&mut self, offset: usize, value: u16) -> Result<(), PictError> {
        if offset + 2 > self.position {
            return Err(PictError::DestinationTooSmall);
        }
        self.destination[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn pad_to_word(&mut self) -> Result<(), PictError> {
        if self.position & 1 == 1 {
            self.write_byte(0)?;
        }
        Ok(())
    }
}
