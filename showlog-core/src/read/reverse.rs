use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::debug;

/// Walks a file of fixed-size records from the end towards the start.
///
/// Every item is one raw record of exactly `record_len` bytes, newest first.
/// The walk stops quietly at the beginning of the file or on the first seek or
/// read failure; a trailing partial record is never returned.
pub struct ReverseScanner<F> {
    f: F,
    record_len: usize,
    // Offset of the record returned last; `None` until the first step.
    pos: Option<u64>,
    done: bool,
}

impl<F: Read + Seek> ReverseScanner<F> {
    pub fn new(f: F, record_len: usize) -> Self {
        Self {
            f,
            record_len,
            pos: None,
            done: record_len == 0,
        }
    }

    fn step(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let pos = match self.pos {
            Some(p) => p,
            None => self.f.seek(SeekFrom::End(0))?,
        };
        let len = self.record_len as u64;
        if pos < len {
            debug!(pos, "reverse scan reached start of file");
            return Ok(None);
        }
        let start = pos - len;
        self.f.seek(SeekFrom::Start(start))?;

        let mut buf = vec![0u8; self.record_len];
        if let Err(e) = self.f.read_exact(&mut buf) {
            if e.kind() == ErrorKind::UnexpectedEof {
                debug!(start, "short read, ending reverse scan");
                return Ok(None);
            }
            return Err(e);
        }
        // Park the cursor on the record just read; the next step backs off from here.
        self.f.seek(SeekFrom::Start(start))?;
        self.pos = Some(start);
        Ok(Some(buf))
    }
}

impl<F: Read + Seek> Iterator for ReverseScanner<F> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(buf)) => Some(buf),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                debug!(error = %e, "reverse scan stopped on I/O error");
                self.done = true;
                None
            }
        }
    }
}
