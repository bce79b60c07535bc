use std::{
    fmt,
    io::{Error, ErrorKind, Result, SeekFrom},
    path::Path,
};

use super::RawFile;
use crate::{OpenMode, StreamState};

const BUFFER_SIZE: usize = 8 * 1024;

fn not_open() -> Error {
    Error::new(ErrorKind::NotConnected, "file stream is not open")
}

/// Line oriented stream over a [`RawFile`], shared by the public stream handles.
///
/// Reads go through an internal buffer; writes are passed straight to the
/// file after any unread buffered input is given back with a seek.
pub(crate) struct LineStream {
    file: Option<RawFile>,
    buffer: Box<[u8]>,
    pos: usize,
    filled: usize,
    state: StreamState,
}

impl fmt::Debug for LineStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStream")
            .field("file", &self.file)
            .field("buffered", &(self.filled - self.pos))
            .field("state", &self.state)
            .finish()
    }
}

impl Default for LineStream {
    fn default() -> Self {
        Self {
            file: None,
            buffer: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
            state: StreamState::empty(),
        }
    }
}

impl LineStream {
    pub fn open(&mut self, path: &Path, mode: OpenMode) -> Result<()> {
        if self.file.is_some() {
            self.state |= StreamState::FAIL;

            return Err(Error::new(ErrorKind::Other, "file stream is already open"));
        }

        match RawFile::open(path, &mode) {
            Ok(file) => {
                self.file = Some(file);
                self.pos = 0;
                self.filled = 0;
                self.state = StreamState::empty();

                Ok(())
            }
            Err(err) => {
                self.state |= StreamState::FAIL;

                Err(err)
            }
        }
    }

    pub fn close(&mut self) -> Result<()> {
        self.pos = 0;
        self.filled = 0;

        match self.file.take() {
            Some(file) => file.close().map_err(|err| {
                self.state |= StreamState::FAIL;
                err
            }),
            None => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn clear(&mut self) {
        self.state = StreamState::empty();
    }

    pub fn get_line(&mut self, line: &mut String) -> Result<usize> {
        let Some(file) = self.file.as_mut() else {
            self.state |= StreamState::FAIL;
            return Err(not_open());
        };

        // A stream that already hit eof or failed extracts nothing until cleared.
        if !self.state.is_good() {
            self.state |= StreamState::FAIL;
            return Ok(0);
        }

        let mut bytes = Vec::new();
        let mut consumed = 0;

        loop {
            if self.pos == self.filled {
                self.pos = 0;
                self.filled = 0;

                match file.read(&mut self.buffer) {
                    Ok(0) => {
                        self.state |= StreamState::EOF;

                        if consumed == 0 {
                            self.state |= StreamState::FAIL;
                        }

                        break;
                    }
                    Ok(len) => self.filled = len,
                    Err(err) => {
                        self.state |= StreamState::BAD;
                        return Err(err);
                    }
                }
            }

            let available = &self.buffer[self.pos..self.filled];

            match available.iter().position(|b| *b == b'\n') {
                Some(offset) => {
                    bytes.extend_from_slice(&available[..offset]);
                    self.pos += offset + 1;
                    consumed += offset + 1;
                    break;
                }
                None => {
                    bytes.extend_from_slice(available);
                    consumed += available.len();
                    self.pos = self.filled;
                }
            }
        }

        match std::str::from_utf8(&bytes) {
            Ok(text) => {
                line.push_str(text);

                Ok(consumed)
            }
            Err(err) => {
                self.state |= StreamState::FAIL;

                Err(Error::new(ErrorKind::InvalidData, err))
            }
        }
    }

    pub fn put_line(&mut self, line: &str) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            self.state |= StreamState::FAIL;
            return Err(not_open());
        };

        if self.state.is_fail() {
            self.state |= StreamState::FAIL;
            return Err(Error::new(ErrorKind::Other, "file stream is in a failed state"));
        }

        let unread = self.filled - self.pos;

        if unread > 0 {
            if let Err(err) = file.seek(SeekFrom::Current(-(unread as i64))) {
                self.state |= StreamState::BAD;
                return Err(err);
            }
        }

        self.pos = 0;
        self.filled = 0;

        let mut data = Vec::with_capacity(line.len() + 1);

        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');

        file.write_all(&data).map_err(|err| {
            self.state |= StreamState::BAD;
            err
        })
    }
}
