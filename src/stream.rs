//! Byte-stream collaborator.
//!
//! A pass-through file I/O binding for handlers that persist decisions or
//! audit logs. [`FileStream`] exposes raw bytes with independent read and
//! write cursors; [`TextFileStream`] layers a line-buffered text encoding on
//! top (ASCII only in the current surface). No decision logic lives here;
//! failures propagate uninterpreted as [`StreamError`].

use crate::error::StreamError;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Low-level binary file stream with independent read and write cursors.
///
/// The file is opened in read+write mode. The two cursors move separately:
/// reading never disturbs the write position and vice versa.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    read_pos: u64,
    write_pos: u64,
}

impl FileStream {
    /// Open a file at `path` in read+write mode.
    ///
    /// # Errors
    ///
    /// Propagates the underlying open failure (not found, permission
    /// denied, ...).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            file,
            read_pos: 0,
            write_pos: 0,
        })
    }

    /// Total size of the file in bytes.
    pub fn len(&self) -> Result<u64, StreamError> {
        Ok(self.file.metadata()?.len())
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> Result<bool, StreamError> {
        Ok(self.len()? == 0)
    }

    /// Current read position from the start of the file.
    pub fn tell_read(&self) -> u64 {
        self.read_pos
    }

    /// Current write position from the start of the file.
    pub fn tell_write(&self) -> u64 {
        self.write_pos
    }

    /// Move the read cursor. Returns the new absolute position.
    pub fn seek_read(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.read_pos = self.resolve(pos, self.read_pos)?;
        Ok(self.read_pos)
    }

    /// Move the write cursor. Returns the new absolute position.
    pub fn seek_write(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.write_pos = self.resolve(pos, self.write_pos)?;
        Ok(self.write_pos)
    }

    fn resolve(&self, pos: SeekFrom, current: u64) -> Result<u64, StreamError> {
        let target = match pos {
            SeekFrom::Start(offset) => return Ok(offset),
            SeekFrom::Current(delta) => current as i64 + delta,
            SeekFrom::End(delta) => self.len()? as i64 + delta,
        };
        if target < 0 {
            return Err(StreamError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of file",
            )));
        }
        Ok(target as u64)
    }

    /// Read up to `n` bytes at the read cursor.
    ///
    /// Returns the bytes actually read, which may be fewer than `n` at EOF.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, StreamError> {
        let mut buf = vec![0u8; n];
        let bytes_read = self.read_buf(&mut buf)?;
        buf.truncate(bytes_read);
        Ok(buf)
    }

    /// Read bytes into an existing buffer; returns the count actually read.
    pub fn read_buf(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        self.file.seek(SeekFrom::Start(self.read_pos))?;
        let mut total = 0;
        while total < buf.len() {
            let n = self.file.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        self.read_pos += total as u64;
        Ok(total)
    }

    /// Write all bytes at the write cursor.
    pub fn write(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.file.seek(SeekFrom::Start(self.write_pos))?;
        self.file.write_all(data)?;
        self.write_pos += data.len() as u64;
        Ok(())
    }

    /// Append bytes at the end of the file (moves the write cursor to EOF).
    pub fn append(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.seek_write(SeekFrom::End(0))?;
        self.write(data)
    }

    /// Read the whole file from the start; leaves the read cursor at EOF.
    pub fn read_entire(&mut self) -> Result<Vec<u8>, StreamError> {
        let size = self.len()?;
        self.seek_read(SeekFrom::Start(0))?;
        self.read(size as usize)
    }

    /// Close the stream, flushing buffered writes.
    ///
    /// Dropping the stream closes it too; this form surfaces the flush
    /// error instead of discarding it.
    pub fn close(mut self) -> Result<(), StreamError> {
        self.file.flush()?;
        Ok(())
    }
}

/// Text encodings supported by [`TextFileStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Seven-bit ASCII. The only encoding in the current surface.
    #[default]
    Ascii,
}

impl Encoding {
    fn decode(self, raw: &[u8], base_offset: u64) -> Result<String, StreamError> {
        match self {
            Encoding::Ascii => {
                for (i, &byte) in raw.iter().enumerate() {
                    if !byte.is_ascii() {
                        return Err(StreamError::NonAscii {
                            byte,
                            offset: base_offset + i as u64,
                        });
                    }
                }
                // Checked above: every byte is ASCII, so this is valid UTF-8.
                Ok(raw.iter().map(|&b| b as char).collect())
            }
        }
    }

    fn encode(self, data: &str) -> Result<Vec<u8>, StreamError> {
        match self {
            Encoding::Ascii => {
                if let Some(ch) = data.chars().find(|c| !c.is_ascii()) {
                    return Err(StreamError::UnencodableChar(ch));
                }
                Ok(data.bytes().collect())
            }
        }
    }
}

/// Buffer size for delimiter scans in [`TextFileStream::read_until`].
const READ_UNTIL_BUF: usize = 32;

/// Line-buffered encoded text layer over a [`FileStream`].
#[derive(Debug)]
pub struct TextFileStream {
    inner: FileStream,
    encoding: Encoding,
}

impl TextFileStream {
    /// Open a text file at `path` with the given encoding.
    pub fn open(path: impl AsRef<Path>, encoding: Encoding) -> Result<Self, StreamError> {
        Ok(Self {
            inner: FileStream::open(path)?,
            encoding,
        })
    }

    /// The underlying byte stream.
    pub fn raw(&mut self) -> &mut FileStream {
        &mut self.inner
    }

    /// Read and decode up to `chars` characters (fewer at EOF).
    pub fn read(&mut self, chars: usize) -> Result<String, StreamError> {
        let base = self.inner.tell_read();
        let bytes = self.inner.read(chars)?;
        self.encoding.decode(&bytes, base)
    }

    /// Encode and write a string at the write cursor.
    pub fn write(&mut self, data: &str) -> Result<(), StreamError> {
        let bytes = self.encoding.encode(data)?;
        self.inner.write(&bytes)
    }

    /// Encode and append a string at the end of the file.
    pub fn append(&mut self, data: &str) -> Result<(), StreamError> {
        let bytes = self.encoding.encode(data)?;
        self.inner.append(&bytes)
    }

    /// Read until `delimiter` or EOF, scanning in buffered chunks.
    ///
    /// The delimiter is consumed from the stream but not included in the
    /// result. Returns everything up to EOF if the delimiter never appears.
    pub fn read_until(&mut self, delimiter: char) -> Result<String, StreamError> {
        if !delimiter.is_ascii() {
            return Err(StreamError::UnencodableChar(delimiter));
        }
        let delimiter = delimiter as u8;
        let mut collected: Vec<u8> = Vec::new();
        let mut buf = [0u8; READ_UNTIL_BUF];
        let base = self.inner.tell_read();

        loop {
            let bytes_read = self.inner.read_buf(&mut buf)?;
            if let Some(i) = buf[..bytes_read].iter().position(|&b| b == delimiter) {
                // Rewind past the unconsumed tail, leaving the cursor just
                // after the delimiter.
                let overshoot = bytes_read as i64 - i as i64 - 1;
                self.inner.seek_read(SeekFrom::Current(-overshoot))?;
                collected.extend_from_slice(&buf[..i]);
                break;
            }
            collected.extend_from_slice(&buf[..bytes_read]);
            if bytes_read < buf.len() {
                break;
            }
        }

        self.encoding.decode(&collected, base)
    }

    /// Read one line; the trailing newline is consumed but not returned,
    /// and a trailing `\r` is stripped.
    pub fn read_line(&mut self) -> Result<String, StreamError> {
        let mut line = self.read_until('\n')?;
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Read all remaining lines until EOF.
    pub fn read_lines(&mut self) -> Result<Vec<String>, StreamError> {
        let mut lines = Vec::new();
        let mut current = self.inner.tell_read();
        loop {
            let line = self.read_line()?;
            let after = self.inner.tell_read();
            if line.is_empty() && after == current {
                break;
            }
            lines.push(line);
            current = after;
        }
        Ok(lines)
    }

    /// Read and decode the whole file from the start.
    pub fn read_entire(&mut self) -> Result<String, StreamError> {
        let raw = self.inner.read_entire()?;
        self.encoding.decode(&raw, 0)
    }

    /// Close the underlying stream.
    pub fn close(self) -> Result<(), StreamError> {
        self.inner.close()
    }
}
