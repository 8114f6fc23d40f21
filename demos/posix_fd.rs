//! Reads a file through raw POSIX calls, by hand and with guards
//!
//! Run with: cargo run --example posix_fd -- [PATH]
//!
//! Add `--features tracing` to see rejected calls and releases logged.

#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::os::raw::{c_char, c_int};

#[cfg(unix)]
use cwrap::check::CallCheckContext;
#[cfg(unix)]
use cwrap::guard::{Fallible, Guard};
#[cfg(unix)]
use cwrap::policy::{ErrnoError, IsNotNegative, IsZero};

/// `close(2)`: zero on success, errno on failure
#[cfg(unix)]
type Posix = CallCheckContext<IsZero, ErrnoError>;

/// `open(2)`, `read(2)`: a descriptor or count, `-1` and errno on failure
#[cfg(unix)]
type PosixCount = CallCheckContext<IsNotNegative, ErrnoError>;

#[cfg(unix)]
const CHUNK: usize = 4096;

#[cfg(unix)]
fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/hostname".to_string());

    tracing::info!("Reading {} by hand", path);
    match read_by_hand(&path) {
        Ok(text) => tracing::info!("Read {} bytes", text.len()),
        Err(e) => tracing::error!("Manual read failed: {}", e),
    }

    tracing::info!("Reading {} through guards", path);
    match read_guarded(&path) {
        Ok(text) => print!("{}", text),
        Err(e) => tracing::error!("Guarded read failed: {}", e),
    }

    if let Err(e) = read_guarded("/nonexistent/cwrap-demo") {
        tracing::info!("Missing file reported as: {}", e);
    }
}

#[cfg(not(unix))]
fn main() {
    eprintln!("posix_fd needs a Unix target");
}

/// Every call checked inline, every exit path closing the descriptor itself
#[cfg(unix)]
fn read_by_hand(path: &str) -> io::Result<String> {
    let c_path = CString::new(path).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDONLY) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }

    let mut bytes = Vec::new();
    let mut chunk = [0u8; CHUNK];
    loop {
        let n = unsafe { libc::read(fd, chunk.as_mut_ptr().cast(), chunk.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n as usize]);
    }

    if unsafe { libc::close(fd) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The same read, with the descriptor owned by a guard
#[cfg(unix)]
fn read_guarded(path: &str) -> cwrap::Result<String> {
    let c_path = CString::new(path).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let open = |path: *const c_char, flags: c_int| unsafe { libc::open(path, flags) };
    let fd = PosixCount::call_checked(open, (c_path.as_ptr(), libc::O_RDONLY))?;

    let close = |fd: c_int| unsafe { libc::close(fd) };
    let fd = Guard::with_value(
        Fallible::new(move |fd: &mut c_int| Posix::call_checked(close, (*fd,)).map(|_| ())),
        fd,
    );

    let mut read = PosixCount::bind(|fd: c_int, buf: &mut [u8]| unsafe {
        libc::read(fd, buf.as_mut_ptr().cast(), buf.len())
    });

    let mut bytes = Vec::new();
    let mut chunk = [0u8; CHUNK];
    loop {
        let n = read.call((*fd, &mut chunk[..]))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n as usize]);
    }

    // Closing can fail too; release() surfaces that instead of panicking
    fd.release()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
