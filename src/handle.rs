//! Handle capability traits.
//!
//! A handle is whatever [`ScopedFile`](crate::ScopedFile) owns: something that
//! can be opened by path, closed and asked whether it is open
//! ([`Openable`]), and that reads lines ([`LineRead`]), writes lines
//! ([`LineWrite`]) or both. [`FileLike`] ties these together: its `Access`
//! marker names which line operations the handle supports, and the marker
//! only type-checks when the handle really implements them.
//!
//! Everything here is resolved during type checking. A handle that is not
//! openable can't be wrapped:
//!
//! ```compile_fail
//! use smartfile::ScopedFile;
//!
//! struct Blob(Vec<u8>);
//!
//! let _file = ScopedFile::new(Blob(vec![]));
//! ```
//!
//! Neither can a handle that declares an access it does not implement:
//!
//! ```compile_fail
//! use std::{io, path::Path};
//! use smartfile::{FileLike, OpenMode, Openable, ReadOnly};
//!
//! struct Closed;
//!
//! impl Openable for Closed {
//!     fn open(&mut self, _: &Path, _: OpenMode) -> io::Result<()> { Ok(()) }
//!     fn close(&mut self) -> io::Result<()> { Ok(()) }
//!     fn is_open(&self) -> bool { false }
//! }
//!
//! impl FileLike for Closed {
//!     type Access = ReadOnly;
//! }
//! ```
//!
//! Line operations only exist for handles that support them:
//!
//! ```compile_fail
//! use smartfile::{fs::OutputFile, ScopedFile};
//!
//! fn peek(file: &mut ScopedFile<OutputFile>) {
//!     let _ = file.read_line();
//! }
//! ```
//!
//! The declared access is what counts. A handle that can read lines but
//! declares itself write only gets no `read_line`:
//!
//! ```compile_fail
//! use std::{io, path::Path};
//! use smartfile::{
//!     FileLike, LineRead, LineWrite, OpenMode, Openable, ScopedFile, Stream, StreamState,
//!     WriteOnly,
//! };
//!
//! #[derive(Default)]
//! struct Sink;
//!
//! impl Openable for Sink {
//!     fn open(&mut self, _: &Path, _: OpenMode) -> io::Result<()> { Ok(()) }
//!     fn close(&mut self) -> io::Result<()> { Ok(()) }
//!     fn is_open(&self) -> bool { true }
//! }
//!
//! impl Stream for Sink {
//!     fn state(&self) -> StreamState { StreamState::empty() }
//!     fn clear(&mut self) {}
//! }
//!
//! impl LineRead for Sink {
//!     fn get_line(&mut self, line: &mut String) -> io::Result<usize> {
//!         line.push_str("secret");
//!         Ok(7)
//!     }
//! }
//!
//! impl LineWrite for Sink {
//!     fn put_line(&mut self, _: &str) -> io::Result<()> { Ok(()) }
//! }
//!
//! impl FileLike for Sink {
//!     type Access = WriteOnly;
//! }
//!
//! let mut file: ScopedFile<Sink> = ScopedFile::new(Sink);
//! let _ = file.read_line();
//! ```
//!
//! ```compile_fail
//! use smartfile::{fs::InputFile, ScopedFile};
//!
//! fn poke(file: &mut ScopedFile<InputFile>) {
//!     let _ = file.write_line("hello");
//! }
//! ```

use std::{io::Result, path::Path};

use crate::OpenMode;

bitflags::bitflags! {
    /// Stream health indicator, empty when the stream is good.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct StreamState: u8 {
        /// Last read reached end of data.
        const EOF = 0b001;
        /// Last operation extracted or stored nothing.
        const FAIL = 0b010;
        /// The underlying file reported an io error.
        const BAD = 0b100;
    }
}

impl StreamState {
    pub fn is_good(&self) -> bool {
        self.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        self.contains(StreamState::EOF)
    }

    /// Returns true if the last operation failed, either logically or with an io error.
    pub fn is_fail(&self) -> bool {
        self.intersects(StreamState::FAIL | StreamState::BAD)
    }

    pub fn is_bad(&self) -> bool {
        self.contains(StreamState::BAD)
    }
}

/// Handle with an inspectable health indicator.
pub trait Stream {
    /// Current health of the stream.
    fn state(&self) -> StreamState;

    /// Reset the health indicator to good.
    fn clear(&mut self);
}

/// Handle that can be opened by path, closed, and queried for open state.
pub trait Openable {
    /// Mode used by [`ScopedFile::open`](crate::ScopedFile::open).
    const DEFAULT_MODE: OpenMode = OpenMode::new().read(true).write(true).append(true);

    /// Open the file at `path`. A failed open leaves the handle closed.
    fn open(&mut self, path: &Path, mode: OpenMode) -> Result<()>;

    /// Close the file if it is open.
    fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;
}

/// Handle that writes text lines.
pub trait LineWrite: Stream {
    /// Write `line` followed by a `\n` terminator.
    ///
    /// Failures are also recorded in [`Stream::state`].
    fn put_line(&mut self, line: &str) -> Result<()>;
}

/// Handle that reads text lines.
pub trait LineRead: Stream {
    /// Extract the next line into `line`, without its `\n` terminator.
    ///
    /// Returns the number of bytes consumed, terminator included. When nothing
    /// could be extracted the stream state has [`StreamState::FAIL`] set, with
    /// [`StreamState::EOF`] if data ran out.
    fn get_line(&mut self, line: &mut String) -> Result<usize>;
}

/// Type-level description of which line operations a handle supports.
#[diagnostic::on_unimplemented(
    message = "`{H}` does not implement the line operations named by `{Self}`",
    note = "`ReadOnly` needs `LineRead`, `WriteOnly` needs `LineWrite`, `ReadWrite` needs both"
)]
pub trait Access<H: ?Sized> {
    const READABLE: bool;
    const WRITABLE: bool;
}

/// Access marker for handles implementing [`LineRead`].
#[derive(Debug)]
pub enum ReadOnly {}

/// Access marker for handles implementing [`LineWrite`].
#[derive(Debug)]
pub enum WriteOnly {}

/// Access marker for handles implementing both [`LineRead`] and [`LineWrite`].
#[derive(Debug)]
pub enum ReadWrite {}

impl<H: LineRead + ?Sized> Access<H> for ReadOnly {
    const READABLE: bool = true;
    const WRITABLE: bool = false;
}

impl<H: LineWrite + ?Sized> Access<H> for WriteOnly {
    const READABLE: bool = false;
    const WRITABLE: bool = true;
}

impl<H: LineRead + LineWrite + ?Sized> Access<H> for ReadWrite {
    const READABLE: bool = true;
    const WRITABLE: bool = true;
}

/// Access markers that allow [`ScopedFile::read_line`](crate::ScopedFile::read_line).
#[diagnostic::on_unimplemented(
    message = "`{Self}` access does not allow reading lines",
    note = "declare `ReadOnly` or `ReadWrite` as the handle's `FileLike::Access`"
)]
pub trait Readable {}

/// Access markers that allow [`ScopedFile::write_line`](crate::ScopedFile::write_line).
#[diagnostic::on_unimplemented(
    message = "`{Self}` access does not allow writing lines",
    note = "declare `WriteOnly` or `ReadWrite` as the handle's `FileLike::Access`"
)]
pub trait Writable {}

impl Readable for ReadOnly {}
impl Readable for ReadWrite {}

impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

/// Openable handle that is readable, writable or both.
///
/// There is no access marker for "neither", so a handle without line
/// operations can never be file-like.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a file-like handle",
    label = "can't be owned by a `ScopedFile`",
    note = "implement `Openable` and at least one of `LineRead` / `LineWrite`, then `FileLike` naming that access"
)]
pub trait FileLike: Openable + Sized {
    type Access: Access<Self>;
}

/// Returns true if `H` supports [`LineRead`].
pub const fn is_readable<H: FileLike>() -> bool {
    <H::Access as Access<H>>::READABLE
}

/// Returns true if `H` supports [`LineWrite`].
pub const fn is_writable<H: FileLike>() -> bool {
    <H::Access as Access<H>>::WRITABLE
}
