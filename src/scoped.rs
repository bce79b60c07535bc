//! Scope-bound file handle ownership.

use std::{
    io,
    mem::ManuallyDrop,
    path::{Path, PathBuf},
};

use crate::{
    policy::close_quietly, CloseHandle, Error, FileLike, LineRead, LineWrite, OpenMode,
    Readable, ReleasePolicy, Result, Writable,
};

/// Owns one file handle and guarantees it is released when the wrapper goes away.
///
/// The handle's declared [`FileLike::Access`] decides which line operations
/// exist: [`read_line`] is only available when it is [`Readable`] and
/// [`write_line`] only when it is [`Writable`]. On drop the release policy
/// `R` runs exactly once; the default [`CloseHandle`] closes the handle if it
/// is still open.
///
/// `ScopedFile` is move-only. Moving it transfers the handle together with
/// the policy, and the moved-from binding can no longer release anything.
/// It is not `Clone`:
///
/// ```compile_fail
/// use smartfile::{fs::FileStream, ScopedFile};
///
/// fn dup(file: &ScopedFile<FileStream>) -> ScopedFile<FileStream> {
///     Clone::clone(file)
/// }
/// ```
///
/// After [`close`](ScopedFile::close) only [`is_open`](ScopedFile::is_open)
/// and `close` are meaningful. Reads and writes on a closed wrapper fail
/// with [`Error::Read`] / [`Error::Write`] of kind
/// [`NotConnected`](io::ErrorKind::NotConnected) without touching the handle.
///
/// [`read_line`]: ScopedFile::read_line
/// [`write_line`]: ScopedFile::write_line
#[derive(Debug)]
pub struct ScopedFile<H: FileLike, R: ReleasePolicy<H> = CloseHandle> {
    handle: ManuallyDrop<H>,
    policy: ManuallyDrop<R>,
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "scoped file is closed")
}

impl<H: FileLike, R: ReleasePolicy<H> + Default> ScopedFile<H, R> {
    /// Take ownership of an already opened handle.
    pub fn new(handle: H) -> Self {
        Self::with_policy(handle, R::default())
    }
}

impl<H: FileLike + Default, R: ReleasePolicy<H> + Default> ScopedFile<H, R> {
    /// Open `path` with the handle's [`DEFAULT_MODE`](crate::Openable::DEFAULT_MODE).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, H::DEFAULT_MODE)
    }

    /// Open `path` with `mode` and wrap the new handle.
    ///
    /// Fails with [`Error::Open`] if the handle reports an error or is still
    /// not open after the attempt.
    pub fn open_with<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();

        let mut handle = H::default();

        let open_error = |source: io::Error| Error::Open {
            path: PathBuf::from(path),
            source,
        };

        handle.open(path, mode).map_err(open_error)?;

        if !handle.is_open() {
            return Err(open_error(io::Error::new(
                io::ErrorKind::Other,
                "handle is not open after open",
            )));
        }

        Ok(Self::new(handle))
    }
}

impl<H: FileLike, R: ReleasePolicy<H>> ScopedFile<H, R> {
    /// Take ownership of an already opened handle, releasing it with `policy`.
    pub fn with_policy(handle: H, policy: R) -> Self {
        Self {
            handle: ManuallyDrop::new(handle),
            policy: ManuallyDrop::new(policy),
        }
    }

    /// Close the handle if it is open. Calling it again does nothing.
    ///
    /// Close errors are logged and dropped, like on release.
    pub fn close(&mut self) {
        close_quietly(&mut *self.handle);
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Borrow the owned handle, e.g. to inspect its stream state.
    pub fn handle(&self) -> &H {
        &*self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut *self.handle
    }

    /// Give up ownership of the handle without running the release policy.
    pub fn into_inner(self) -> H {
        self.into_parts().0
    }

    /// Give up ownership of the handle and policy without running the policy.
    pub fn into_parts(self) -> (H, R) {
        let mut this = ManuallyDrop::new(self);

        // `this` is never dropped, so `Drop` can't take the parts again.
        unsafe { this.take_parts() }
    }

    /// Move the handle and policy out of their slots.
    ///
    /// # Safety
    ///
    /// Must be called at most once per wrapper, and the fields must not be
    /// touched afterwards. Callers are `Drop` and `into_parts`, which never
    /// both run for the same value.
    unsafe fn take_parts(&mut self) -> (H, R) {
        (
            ManuallyDrop::take(&mut self.handle),
            ManuallyDrop::take(&mut self.policy),
        )
    }
}

impl<H, R> ScopedFile<H, R>
where
    H: FileLike + LineWrite,
    H::Access: Writable,
    R: ReleasePolicy<H>,
{
    /// Write `line` followed by a newline.
    ///
    /// On [`Error::Write`] the handle stays open but its health is no
    /// longer trusted.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        if !self.handle.is_open() {
            return Err(Error::Write(closed_error()));
        }

        self.handle.put_line(line).map_err(Error::Write)?;

        if self.handle.state().is_fail() {
            return Err(Error::Write(io::Error::new(
                io::ErrorKind::Other,
                "file stream is unhealthy after write",
            )));
        }

        Ok(())
    }
}

impl<H, R> ScopedFile<H, R>
where
    H: FileLike + LineRead,
    H::Access: Readable,
    R: ReleasePolicy<H>,
{
    /// Read the next line, without its newline terminator.
    ///
    /// A final line without terminator is returned normally; the read after
    /// it fails with an [`Error::Read`] for which [`Error::is_eof`] holds.
    pub fn read_line(&mut self) -> Result<String> {
        if !self.handle.is_open() {
            return Err(Error::Read(closed_error()));
        }

        let mut line = String::new();

        self.handle.get_line(&mut line).map_err(Error::Read)?;

        let state = self.handle.state();

        if state.is_fail() {
            let source = if state.is_eof() {
                io::ErrorKind::UnexpectedEof.into()
            } else {
                io::Error::new(io::ErrorKind::Other, "file stream is unhealthy")
            };

            return Err(Error::Read(source));
        }

        Ok(line)
    }

    /// Iterate over the remaining lines, stopping quietly at end of data.
    pub fn lines(&mut self) -> Lines<'_, H, R> {
        Lines {
            file: self,
            done: false,
        }
    }
}

impl<H: FileLike, R: ReleasePolicy<H> + Default> From<H> for ScopedFile<H, R> {
    fn from(handle: H) -> Self {
        Self::new(handle)
    }
}

impl<H: FileLike, R: ReleasePolicy<H>> Drop for ScopedFile<H, R> {
    fn drop(&mut self) {
        log::debug!("release scoped file, open={}", self.handle.is_open());

        // The value is going away, nothing reads the fields after this.
        let (mut handle, mut policy) = unsafe { self.take_parts() };

        policy.release(&mut handle);
    }
}

/// Iterator returned by [`ScopedFile::lines`].
///
/// Yields `Err` once for a read failure other than end of data, then stops.
#[derive(Debug)]
pub struct Lines<'a, H: FileLike, R: ReleasePolicy<H>> {
    file: &'a mut ScopedFile<H, R>,
    done: bool,
}

impl<'a, H, R> Iterator for Lines<'a, H, R>
where
    H: FileLike + LineRead,
    H::Access: Readable,
    R: ReleasePolicy<H>,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.file.read_line() {
            Ok(line) => Some(Ok(line)),
            Err(err) => {
                self.done = true;

                if err.is_eof() {
                    None
                } else {
                    Some(Err(err))
                }
            }
        }
    }
}
