//! Bounds-checked big-endian cursor over an in-memory PICT resource.
//!
//! Every read either returns the value and advances, or fails with
//! [`PictError::UnexpectedEndOfData`] and leaves the cursor untouched.

use crate::error::PictError;

pub struct PictStreamReader<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> PictStreamReader<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn remaining_data(&self) -> &'a [u8] {
        &self.source[self.position.min(self.source.len())..]
    }

    pub fn read_u8(&mut self) -> Result<u8, PictError> {
        let val = *self
            .source
            .get(self.position)
            .ok_or(PictError::UnexpectedEndOfData)?;
        self.position += 1;
        Ok(val)
    }

    pub fn read_i8(&mut self) -> Result<i8, PictError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, PictError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, PictError> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, PictError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, PictError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PictError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], PictError> {
        let end = self
            .position
            .checked_add(count)
            .filter(|&end| end <= self.source.len())
            .ok_or(PictError::UnexpectedEndOfData)?;
        let bytes = &self.source[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) -> Result<(), PictError> {
        self.read_bytes(count).map(|_| ())
    }

    /// Splits off a reader over exactly the next `count` bytes and moves
    /// this reader past them. Reads on the returned reader cannot cross
    /// that boundary.
    pub fn sub_reader(&mut self, count: usize) -> Result<PictStreamReader<'a>, PictError> {
        Ok(PictStreamReader::new(self.read_bytes(count)?))
    }

    /// Skips one pad byte if the cursor sits on an odd offset.
    pub fn align_to_word(&mut self) -> Result<(), PictError> {
        if self.position & 1 == 1 {
            self.skip(1)?;
        }
        Ok(())
    }
}
