//! End-of-life release policies.

use crate::Openable;

/// Strategy run exactly once when a [`ScopedFile`](crate::ScopedFile) is dropped.
///
/// Releasing must not fail: implementations swallow close errors. Closures
/// taking `&mut H` are release policies too.
pub trait ReleasePolicy<H> {
    fn release(&mut self, handle: &mut H);
}

/// Default policy: close the handle if it is still open.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseHandle;

impl<H: Openable> ReleasePolicy<H> for CloseHandle {
    fn release(&mut self, handle: &mut H) {
        close_quietly(handle);
    }
}

impl<H, F> ReleasePolicy<H> for F
where
    F: FnMut(&mut H),
{
    fn release(&mut self, handle: &mut H) {
        self(handle)
    }
}

/// Close `handle` if open, logging instead of returning a close error.
pub(crate) fn close_quietly<H: Openable>(handle: &mut H) {
    if handle.is_open() {
        if let Err(err) = handle.close() {
            log::warn!("close file handle failed, {}", err);
        }
    }
}
