//! Line oriented file stream handles.
//!
//! [`FileStream`] reads and writes, [`InputFile`] only reads and
//! [`OutputFile`] only writes; each implements exactly the capability traits
//! its access allows, so the matching [`ScopedFile`](crate::ScopedFile)
//! methods are available or absent at compile time.

#[cfg_attr(target_family = "unix", path = "raw_unix.rs")]
#[cfg_attr(not(target_family = "unix"), path = "raw_std.rs")]
mod raw;
pub(crate) use raw::RawFile;

mod stream;

mod file;
pub use file::*;
