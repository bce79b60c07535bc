//! File open mode description.

use std::io::{Error, ErrorKind, Result};

/// Open mode passed to [`Openable::open`](crate::Openable::open).
///
/// Built like [`std::fs::OpenOptions`], but as a plain `Copy` value with
/// `const` builder methods so handle types can declare their default mode
/// as a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
}

impl OpenMode {
    /// Create an empty open mode; at least one access flag must be set before use.
    pub const fn new() -> Self {
        Self {
            read: false,
            write: false,
            append: false,
            truncate: false,
        }
    }

    /// Read only access to an existing file.
    pub const fn reading() -> Self {
        Self::new().read(true)
    }

    /// Write only access, the file is created or truncated.
    pub const fn writing() -> Self {
        Self::new().write(true).truncate(true)
    }

    /// Write access positioned at end of file, the file is created if missing.
    pub const fn appending() -> Self {
        Self::new().write(true).append(true)
    }

    pub const fn read(mut self, flag: bool) -> Self {
        self.read = flag;

        self
    }

    pub const fn write(mut self, flag: bool) -> Self {
        self.write = flag;

        self
    }

    pub const fn append(mut self, flag: bool) -> Self {
        self.append = flag;

        self
    }

    pub const fn truncate(mut self, flag: bool) -> Self {
        self.truncate = flag;

        self
    }

    /// Combine two modes, keeping every flag set in either.
    pub const fn union(self, other: Self) -> Self {
        Self {
            read: self.read || other.read,
            write: self.write || other.write,
            append: self.append || other.append,
            truncate: self.truncate || other.truncate,
        }
    }

    /// Returns true if writes are allowed, `append` implies write access.
    pub const fn is_writable(&self) -> bool {
        self.write || self.append
    }

    /// Returns true if the file is created when it does not exist.
    pub const fn creates(&self) -> bool {
        self.append || self.truncate || (self.write && !self.read)
    }

    /// Returns true if an existing file is cut to zero length on open.
    pub const fn truncates(&self) -> bool {
        self.truncate || (self.write && !self.read && !self.append)
    }

    /// Check the flag combination is one a file stream can honor.
    pub fn validate(&self) -> Result<()> {
        if !self.read && !self.is_writable() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "open mode requests neither read nor write access",
            ));
        }

        if self.append && self.truncate {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "open mode can't both append and truncate",
            ));
        }

        if self.truncate && !self.is_writable() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "open mode truncates without write access",
            ));
        }

        Ok(())
    }
}
