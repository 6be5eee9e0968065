use std::io::{self, BufRead, ErrorKind, Read};

/// Longest line, including its terminator, returned by [RecordReader::read_line].
pub const MAX_LINE_LEN: usize = 256;

/// RecordReader reads a mixed stream of newline terminated text lines and fixed length
/// binary blocks, tracking the byte offset into the stream.
pub struct RecordReader<R>
where
    R: BufRead,
{
    reader: R,
    num_read: usize,
}

impl<R> RecordReader<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        RecordReader {
            reader,
            num_read: 0,
        }
    }

    /// Read the next line, including its terminator, replacing the contents of `buf`.
    ///
    /// Returns the full length of the line, or `None` at EOF. At most [MAX_LINE_LEN]
    /// bytes are kept in `buf`; the rest of a longer line is read and discarded, so the
    /// returned length is greater than `buf.len()`.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<usize>, io::Error> {
        buf.clear();
        let mut n = (&mut self.reader)
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', buf)?;
        if n == 0 {
            return Ok(None);
        }
        if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') {
            n += self.discard_line()?;
        }
        self.num_read += n;
        Ok(Some(n))
    }

    // Consume through the next newline or EOF, returning the number of bytes consumed.
    fn discard_line(&mut self) -> Result<usize, io::Error> {
        let mut discarded = 0;
        loop {
            let (done, used) = {
                let available = match self.reader.fill_buf() {
                    Ok(available) => available,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err),
                };
                match available.iter().position(|b| *b == b'\n') {
                    Some(idx) => (true, idx + 1),
                    None => (available.is_empty(), available.len()),
                }
            };
            self.reader.consume(used);
            discarded += used;
            if done {
                return Ok(discarded);
            }
        }
    }

    /// Read until `buf` is full or EOF, returning the number of bytes read. A value less
    /// than `buf.len()` means the stream ended.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        self.num_read += filled;
        Ok(filled)
    }

    pub fn offset(&self) -> usize {
        self.num_read
    }
}
