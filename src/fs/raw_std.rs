use std::{
    fs::{File, OpenOptions},
    io::{Read, Result, Seek, SeekFrom, Write},
    path::Path,
};

use crate::OpenMode;

/// Portable file backed by [`std::fs::File`], closed on drop.
#[derive(Debug)]
pub struct RawFile {
    file: File,
}

impl RawFile {
    pub fn open(path: &Path, mode: &OpenMode) -> Result<Self> {
        mode.validate()?;

        let file = OpenOptions::new()
            .read(mode.read)
            .write(mode.is_writable())
            .append(mode.append)
            .create(mode.creates())
            .truncate(mode.truncates())
            .open(path)?;

        log::trace!("file({:?}) open {:?}", path, mode);

        Ok(Self { file })
    }

    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let len = self.file.read(buffer)?;

        log::trace!("file read({}) -> {}", buffer.len(), len);

        Ok(len)
    }

    pub fn write_all(&mut self, buffer: &[u8]) -> Result<()> {
        log::trace!("file write({})", buffer.len());

        self.file.write_all(buffer)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.file.seek(pos)
    }

    /// Flush to the os before dropping, std reports no error from the close itself.
    pub fn close(mut self) -> Result<()> {
        log::trace!("file close");

        self.file.flush()
    }
}
