//! Access to the calling thread's errno
//!
//! errno is thread-local in every libc this crate supports, but nothing
//! stops other code on the same thread from touching it between a call and
//! its check. Keeping that window clean is the caller's job.
//!
//! On Unix targets errno is read and written through [`nix::errno::Errno`].
//! Elsewhere it can only be read, and [`set_errno`] does nothing.

#[cfg(unix)]
use nix::errno::Errno;

/// Current errno of the calling thread
#[cfg(unix)]
pub fn errno() -> i32 {
    Errno::last_raw()
}

/// Current errno of the calling thread
#[cfg(not(unix))]
pub fn errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Overwrite errno for the calling thread.
#[cfg(unix)]
pub fn set_errno(code: i32) {
    Errno::set_raw(code);
}

/// Overwrite errno for the calling thread.
///
/// This target has no writable errno, so this does nothing.
#[cfg(not(unix))]
pub fn set_errno(_code: i32) {}

/// Reset errno to `0`
#[inline]
pub fn clear_errno() {
    #[cfg(unix)]
    Errno::clear();
    #[cfg(not(unix))]
    set_errno(0);
}
