//! Six-bit printable packing.
//!
//! Fields are written most significant bit first into a continuous bit
//! stream, which is cut into 6-bit groups. Each group becomes the character
//! `group + 64`, so every idcode character lies in `'@'..='\x7f'`.

use super::error::IdCodeError;

const GROUP_BITS: u32 = 6;
const CHAR_OFFSET: u8 = 64;

#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    groups: Vec<u8>,
    free: u32,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes the low `bits` bits of `value`.
    pub(crate) fn write(&mut self, bits: u32, value: u64) {
        debug_assert!(bits == 64 || value >> bits == 0, "{value} does not fit in {bits} bits");
        let mut remaining = bits;
        while remaining > 0 {
            if self.free == 0 {
                self.groups.push(0);
                self.free = GROUP_BITS;
            }
            let take = remaining.min(self.free);
            let chunk = ((value >> (remaining - take)) & ((1u64 << take) - 1)) as u8;
            if let Some(last) = self.groups.last_mut() {
                *last |= chunk << (self.free - take);
            }
            self.free -= take;
            remaining -= take;
        }
    }

    pub(crate) fn write_flag(&mut self, flag: bool) {
        self.write(1, u64::from(flag));
    }

    /// Pads the last group with zeros and renders the characters.
    pub(crate) fn finish(self) -> String {
        self.groups.iter().map(|&g| char::from(g + CHAR_OFFSET)).collect()
    }
}

#[derive(Debug)]
pub(crate) struct BitReader {
    groups: Vec<u8>,
    position: usize,
}

impl BitReader {
    pub(crate) fn new(code: &str) -> Result<Self, IdCodeError> {
        let groups = code
            .chars()
            .enumerate()
            .map(|(pos, ch)| match u8::try_from(ch) {
                Ok(b) if (CHAR_OFFSET..=127).contains(&b) => Ok(b - CHAR_OFFSET),
                _ => Err(IdCodeError::InvalidCharacter { pos, ch }),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self { groups, position: 0 })
    }

    pub(crate) fn read(&mut self, bits: u32) -> Result<u64, IdCodeError> {
        let mut value = 0u64;
        for _ in 0..bits {
            let group = self
                .groups
                .get(self.position / GROUP_BITS as usize)
                .ok_or(IdCodeError::Truncated)?;
            let shift = GROUP_BITS as usize - 1 - self.position % GROUP_BITS as usize;
            value = (value << 1) | u64::from((group >> shift) & 1);
            self.position += 1;
        }
        Ok(value)
    }

    pub(crate) fn read_usize(&mut self, bits: u32) -> Result<usize, IdCodeError> {
        Ok(self.read(bits)? as usize)
    }

    pub(crate) fn read_flag(&mut self) -> Result<bool, IdCodeError> {
        Ok(self.read(1)? == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_msb_first() {
        let mut w = BitWriter::new();
        w.write(4, 9);
        w.write(4, 2);
        // 1001 0010 -> 100100 10(0000)
        assert_eq!(w.finish(), "d`");
    }

    #[test]
    fn empty_writer_is_empty_string() {
        assert_eq!(BitWriter::new().finish(), "");
    }

    #[test]
    fn reader_follows_writer() {
        let mut w = BitWriter::new();
        w.write(10, 777);
        w.write_flag(true);
        w.write(32, 0xdead_beef);
        w.write(3, 5);
        let code = w.finish();

        let mut r = BitReader::new(&code).unwrap();
        assert_eq!(r.read(10).unwrap(), 777);
        assert!(r.read_flag().unwrap());
        assert_eq!(r.read(32).unwrap(), 0xdead_beef);
        assert_eq!(r.read_usize(3).unwrap(), 5);
    }

    #[test]
    fn reading_past_end_is_truncation() {
        let mut r = BitReader::new("@").unwrap();
        assert_eq!(r.read(6).unwrap(), 0);
        assert_eq!(r.read(1), Err(IdCodeError::Truncated));
    }

    #[test]
    fn rejects_characters_below_offset() {
        let err = BitReader::new("d`?").unwrap_err();
        assert_eq!(err, IdCodeError::InvalidCharacter { pos: 2, ch: '?' });
        assert!(BitReader::new("dé").is_err());
    }
}
