use std::{io, path::PathBuf};

/// Errors raised by [`ScopedFile`](crate::ScopedFile) operations.
///
/// Read and write errors leave the handle open but its health untrusted;
/// closing and dropping the wrapper is the only safe recovery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Open by name did not produce an open handle.
    #[error("failed to open file: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A line write left the handle unhealthy.
    #[error("write error to file")]
    Write(#[source] io::Error),
    /// No line could be extracted, end of data or unhealthy handle.
    #[error("read error from file")]
    Read(#[source] io::Error),
}

impl Error {
    /// Returns true if this is a read that failed only because no data was left.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Read(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }

    /// The underlying io error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Error::Open { source, .. } => source,
            Error::Write(err) | Error::Read(err) => err,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
