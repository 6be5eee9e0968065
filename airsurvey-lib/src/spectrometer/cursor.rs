/// Little-endian field reader over a byte slice.
///
/// Values are assembled from individual bytes so decoding does not depend on host
/// endianness or alignment. Callers must ensure the slice is long enough for the reads
/// they perform.
pub(crate) struct Cursor<'a> {
    dat: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn at(dat: &'a [u8], offset: usize) -> Self {
        Cursor { dat, offset }
    }

    pub fn read_u16_le(&mut self) -> u16 {
        let o = self.offset;
        self.offset += 2;
        u16::from_le_bytes([self.dat[o], self.dat[o + 1]])
    }

    pub fn read_u32_le(&mut self) -> u32 {
        let o = self.offset;
        self.offset += 4;
        u32::from_le_bytes([self.dat[o], self.dat[o + 1], self.dat[o + 2], self.dat[o + 3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_offset() {
        let dat = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut cur = Cursor::at(&dat, 0);
        assert_eq!(cur.read_u16_le(), 0x0201);
        assert_eq!(cur.read_u32_le(), 0x0605_0403);
        assert_eq!(cur.offset, 6);
    }

    #[test]
    fn lowest_offset_is_least_significant() {
        let dat = [0xff, 0x00, 0x00, 0x80];
        assert_eq!(Cursor::at(&dat, 0).read_u32_le(), 0x8000_00ff);
        assert_eq!(Cursor::at(&dat, 2).read_u16_le(), 0x8000);
    }
}
