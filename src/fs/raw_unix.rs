use std::{
    ffi::{c_void, CString},
    io::{Error, ErrorKind, Result, SeekFrom},
    os::{
        fd::{AsRawFd, RawFd},
        unix::ffi::OsStrExt,
    },
    path::Path,
};

use libc::{c_int, c_uint, EINTR, O_APPEND, O_CLOEXEC, O_CREAT, O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY};

use crate::OpenMode;

/// Owned os file descriptor, closed on drop.
#[derive(Debug)]
pub struct RawFile {
    fd: RawFd,
}

fn last_os_error() -> Error {
    let e = errno::errno();

    Error::from_raw_os_error(e.0)
}

fn open_flags(mode: &OpenMode) -> c_int {
    let mut flags = O_CLOEXEC;

    flags |= match (mode.read, mode.is_writable()) {
        (true, true) => O_RDWR,
        (false, true) => O_WRONLY,
        _ => O_RDONLY,
    };

    if mode.creates() {
        flags |= O_CREAT;
    }

    if mode.truncates() {
        flags |= O_TRUNC;
    }

    if mode.append {
        flags |= O_APPEND;
    }

    flags
}

impl RawFile {
    pub fn open(path: &Path, mode: &OpenMode) -> Result<Self> {
        mode.validate()?;

        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            Error::new(ErrorKind::InvalidInput, "path contains an interior nul byte")
        })?;

        let fd = unsafe { libc::open(c_path.as_ptr(), open_flags(mode), 0o666 as c_uint) };

        if fd < 0 {
            return Err(last_os_error());
        }

        log::trace!("file({}) open {:?} {:?}", fd, path, mode);

        Ok(Self { fd })
    }

    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        loop {
            let len = unsafe {
                libc::read(
                    self.fd,
                    buffer.as_mut_ptr() as *mut c_void,
                    buffer.len(),
                )
            };

            if len < 0 {
                let e = errno::errno();

                if e.0 == EINTR {
                    continue;
                }

                return Err(Error::from_raw_os_error(e.0));
            }

            log::trace!("file({}) read({}) -> {}", self.fd, buffer.len(), len);

            return Ok(len as usize);
        }
    }

    pub fn write_all(&mut self, mut buffer: &[u8]) -> Result<()> {
        while !buffer.is_empty() {
            let len = unsafe {
                libc::write(self.fd, buffer.as_ptr() as *const c_void, buffer.len())
            };

            if len < 0 {
                let e = errno::errno();

                if e.0 == EINTR {
                    continue;
                }

                return Err(Error::from_raw_os_error(e.0));
            }

            if len == 0 {
                return Err(ErrorKind::WriteZero.into());
            }

            log::trace!("file({}) write({}) -> {}", self.fd, buffer.len(), len);

            buffer = &buffer[len as usize..];
        }

        Ok(())
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => (offset as libc::off_t, libc::SEEK_SET),
            SeekFrom::Current(offset) => (offset as libc::off_t, libc::SEEK_CUR),
            SeekFrom::End(offset) => (offset as libc::off_t, libc::SEEK_END),
        };

        let offset = unsafe { libc::lseek(self.fd, offset, whence) };

        if offset < 0 {
            return Err(last_os_error());
        }

        log::trace!("file({}) seek {:?} -> {}", self.fd, pos, offset);

        Ok(offset as u64)
    }

    /// Close the descriptor, reporting the close error that drop would discard.
    pub fn close(mut self) -> Result<()> {
        let fd = std::mem::replace(&mut self.fd, -1);

        log::trace!("file({}) close", fd);

        if unsafe { libc::close(fd) } < 0 {
            return Err(last_os_error());
        }

        Ok(())
    }
}

impl AsRawFd for RawFile {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for RawFile {
    fn drop(&mut self) {
        if self.fd >= 0 {
            log::trace!("file({}) close on drop", self.fd);

            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_flags() {
        assert_eq!(open_flags(&OpenMode::reading()) & O_RDWR, O_RDONLY);
        assert_eq!(
            open_flags(&OpenMode::writing()),
            O_CLOEXEC | O_WRONLY | O_CREAT | O_TRUNC
        );
        assert_eq!(
            open_flags(&OpenMode::reading().union(OpenMode::appending())),
            O_CLOEXEC | O_RDWR | O_CREAT | O_APPEND
        );
        assert_eq!(
            open_flags(&OpenMode::reading().write(true)),
            O_CLOEXEC | O_RDWR
        );
    }

    #[test]
    fn test_write_seek_read() {
        _ = pretty_env_logger::try_init();

        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("raw");

        let mut file = RawFile::open(&path, &OpenMode::reading().write(true).truncate(true)).unwrap();

        file.write_all(b"hello world").unwrap();

        assert_eq!(file.seek(SeekFrom::Start(6)).unwrap(), 6);

        let mut buff = [0u8; 16];

        let len = file.read(&mut buff).unwrap();

        assert_eq!(&buff[..len], b"world");

        assert_eq!(file.read(&mut buff).unwrap(), 0);

        file.close().unwrap();
    }

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();

        let err = RawFile::open(&dir.path().join("missing"), &OpenMode::reading()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_interior_nul() {
        let err = RawFile::open(Path::new("bad\0name"), &OpenMode::writing()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
