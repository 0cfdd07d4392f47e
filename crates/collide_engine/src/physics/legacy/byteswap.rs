//! Byte-order aware reads over a legacy buffer
//!
//! Every read is bounds-checked and returns a corrected copy of the value;
//! the source buffer is never touched.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::LegacyFormatError;

/// Byte order of a legacy buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl Endianness {
    /// Byte order of the machine running this code
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Byte order of data written on this machine, or on a foreign one when
    /// `swap` is set
    pub fn from_swap_flag(swap: bool) -> Self {
        let native = Self::native();
        if swap {
            native.swapped()
        } else {
            native
        }
    }

    /// The opposite byte order
    pub fn swapped(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }
}

/// Reads fixed-size fields out of a legacy buffer in a declared byte order
#[derive(Debug, Clone, Copy)]
pub struct LegacyReader<'a> {
    data: &'a [u8],
    order: Endianness,
}

impl<'a> LegacyReader<'a> {
    /// Wrap a buffer stored in `order`
    pub fn new(data: &'a [u8], order: Endianness) -> Self {
        Self { data, order }
    }

    /// Declared byte order
    pub fn order(&self) -> Endianness {
        self.order
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes of a record, checked against the buffer end
    pub fn bytes(&self, offset: usize, needed: usize) -> Result<&'a [u8], LegacyFormatError> {
        offset
            .checked_add(needed)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(LegacyFormatError::Truncated {
                offset,
                needed,
                len: self.data.len(),
            })
    }

    /// A reader over a sub-range of this buffer
    pub fn slice(&self, offset: usize, len: usize) -> Result<Self, LegacyFormatError> {
        Ok(Self::new(self.bytes(offset, len)?, self.order))
    }

    /// Reader over everything from `offset` to the end
    pub fn tail(&self, offset: usize) -> Result<Self, LegacyFormatError> {
        let len = self.data.len().checked_sub(offset).ok_or(LegacyFormatError::Truncated {
            offset,
            needed: 0,
            len: self.data.len(),
        })?;
        self.slice(offset, len)
    }

    /// Unsigned byte
    pub fn read_u8(&self, offset: usize) -> Result<u8, LegacyFormatError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    /// 16-bit signed integer
    pub fn read_i16(&self, offset: usize) -> Result<i16, LegacyFormatError> {
        let bytes = self.bytes(offset, 2)?;
        Ok(match self.order {
            Endianness::Little => LittleEndian::read_i16(bytes),
            Endianness::Big => BigEndian::read_i16(bytes),
        })
    }

    /// 32-bit unsigned integer, also used for whole bitfield words
    pub fn read_u32(&self, offset: usize) -> Result<u32, LegacyFormatError> {
        let bytes = self.bytes(offset, 4)?;
        Ok(match self.order {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        })
    }

    /// 32-bit signed integer
    pub fn read_i32(&self, offset: usize) -> Result<i32, LegacyFormatError> {
        let bytes = self.bytes(offset, 4)?;
        Ok(match self.order {
            Endianness::Little => LittleEndian::read_i32(bytes),
            Endianness::Big => BigEndian::read_i32(bytes),
        })
    }

    /// 32-bit float
    pub fn read_f32(&self, offset: usize) -> Result<f32, LegacyFormatError> {
        let bytes = self.bytes(offset, 4)?;
        Ok(match self.order {
            Endianness::Little => LittleEndian::read_f32(bytes),
            Endianness::Big => BigEndian::read_f32(bytes),
        })
    }

    /// Three consecutive floats
    pub fn read_f32x3(&self, offset: usize) -> Result<[f32; 3], LegacyFormatError> {
        Ok([
            self.read_f32(offset)?,
            self.read_f32(offset + 4)?,
            self.read_f32(offset + 8)?,
        ])
    }

    /// Resolve a record-relative offset to an absolute buffer position
    pub fn resolve(&self, base: usize, relative: i32) -> Result<usize, LegacyFormatError> {
        let target = base as i64 + i64::from(relative);
        if target < 0 || target as u64 > self.data.len() as u64 {
            return Err(LegacyFormatError::BadOffset { offset: target });
        }
        Ok(target as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_follow_declared_order() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(LegacyReader::new(&data, Endianness::Little).read_u32(0).unwrap(), 0x0403_0201);
        assert_eq!(LegacyReader::new(&data, Endianness::Big).read_u32(0).unwrap(), 0x0102_0304);
        assert_eq!(LegacyReader::new(&data, Endianness::Big).read_i16(2).unwrap(), 0x0304);
    }

    #[test]
    fn test_float_in_both_orders() {
        let value = -12.5f32;
        let little = value.to_le_bytes();
        let big = value.to_be_bytes();
        assert_eq!(LegacyReader::new(&little, Endianness::Little).read_f32(0).unwrap(), value);
        assert_eq!(LegacyReader::new(&big, Endianness::Big).read_f32(0).unwrap(), value);
    }

    #[test]
    fn test_truncated_read_is_reported() {
        let data = [0u8; 6];
        let reader = LegacyReader::new(&data, Endianness::Little);
        assert_eq!(
            reader.read_u32(4).unwrap_err(),
            LegacyFormatError::Truncated { offset: 4, needed: 4, len: 6 }
        );
        assert!(reader.read_u32(usize::MAX).is_err());
    }

    #[test]
    fn test_resolve_rejects_negative_targets() {
        let data = [0u8; 32];
        let reader = LegacyReader::new(&data, Endianness::Little);
        assert_eq!(reader.resolve(16, -8).unwrap(), 8);
        assert_eq!(reader.resolve(4, -8).unwrap_err(), LegacyFormatError::BadOffset { offset: -4 });
        assert!(reader.resolve(16, 100).is_err());
    }

    #[test]
    fn test_swap_flag() {
        assert_eq!(Endianness::from_swap_flag(false), Endianness::native());
        assert_eq!(Endianness::from_swap_flag(true), Endianness::native().swapped());
    }
}
