//! Where CPU feature flags are read from.
//!
//! [`FlagSource`] is the boundary between the prober and the machine it runs
//! on. [`HostSource`] reads the real system; anything else implementing the
//! trait can stand in for it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::trace;

use crate::error::ProbeError;

/// Default location of the Linux processor info pseudo-file.
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Provides the raw text the prober extracts feature flags from.
pub trait FlagSource {
    /// Reads the string value of a sysctl `key`, or `default` if the key
    /// does not exist.
    ///
    /// # Errors
    ///
    /// - `ProbeError::Sysctl` if the query fails.
    fn sysctl_string(&self, key: &'static str, default: &str) -> Result<String, ProbeError>;

    /// Reads the whole processor info file.
    ///
    /// # Errors
    ///
    /// - `ProbeError::Read` if the file cannot be read.
    fn cpuinfo(&self) -> Result<String, ProbeError>;
}

impl<S: FlagSource + ?Sized> FlagSource for &S {
    #[inline]
    fn sysctl_string(&self, key: &'static str, default: &str) -> Result<String, ProbeError> {
        (**self).sysctl_string(key, default)
    }

    #[inline]
    fn cpuinfo(&self) -> Result<String, ProbeError> {
        (**self).cpuinfo()
    }
}

/// Reads feature flags from the running system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSource {
    cpuinfo_path: PathBuf,
}

impl Default for HostSource {
    #[inline]
    fn default() -> Self {
        HostSource {
            cpuinfo_path: PathBuf::from(CPUINFO_PATH),
        }
    }
}

impl HostSource {
    /// Reads processor info from `path` instead of `/proc/cpuinfo`.
    #[inline]
    pub fn with_cpuinfo_path<P: Into<PathBuf>>(path: P) -> Self {
        HostSource {
            cpuinfo_path: path.into(),
        }
    }

    /// The processor info file this source reads.
    #[inline]
    pub fn cpuinfo_path(&self) -> &Path {
        &self.cpuinfo_path
    }
}

impl FlagSource for HostSource {
    #[inline]
    fn sysctl_string(&self, key: &'static str, default: &str) -> Result<String, ProbeError> {
        scoped_read(key, || sysctl::read_string(key, default))
    }

    #[inline]
    fn cpuinfo(&self) -> Result<String, ProbeError> {
        let path = &self.cpuinfo_path;
        scoped_read(&path.to_string_lossy(), || {
            fs::read_to_string(path).map_err(|source| ProbeError::Read {
                path: path.clone(),
                source,
            })
        })
    }
}

/// Releases the read scope when dropped, including during unwinding.
struct ReadScope<'a> {
    target: &'a str,
}

impl Drop for ReadScope<'_> {
    fn drop(&mut self) {
        trace!("released read scope for {}", self.target);
    }
}

/// Runs exactly one system read inside a scope that is released on every
/// exit path.
pub(crate) fn scoped_read<T>(target: &str, read: impl FnOnce() -> T) -> T {
    trace!("acquired read scope for {}", target);
    let _scope = ReadScope { target };
    read()
}

#[cfg(target_os = "macos")]
mod sysctl {
    use std::{ffi::CString, io, ptr};

    use crate::error::ProbeError;

    pub(super) fn read_string(key: &'static str, default: &str) -> Result<String, ProbeError> {
        let fail = |source| ProbeError::Sysctl { key, source };
        let name = CString::new(key)
            .map_err(|e| fail(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let mut len: libc::size_t = 0;
        // SAFETY: `name` is NUL terminated and a null output buffer asks only for the size.
        let rc = unsafe {
            libc::sysctlbyname(name.as_ptr(), ptr::null_mut(), &mut len, ptr::null_mut(), 0)
        };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ENOENT) {
                return Ok(default.to_owned());
            }
            return Err(fail(err));
        }

        let mut buf = vec![0u8; len];
        // SAFETY: `buf` holds `len` writable bytes and `len` tells the kernel so.
        let rc = unsafe {
            libc::sysctlbyname(
                name.as_ptr(),
                buf.as_mut_ptr().cast(),
                &mut len,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            return Err(fail(io::Error::last_os_error()));
        }

        buf.truncate(len);
        while buf.last() == Some(&0) {
            buf.pop();
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(not(target_os = "macos"))]
mod sysctl {
    use std::io;

    use crate::error::ProbeError;

    pub(super) fn read_string(key: &'static str, _default: &str) -> Result<String, ProbeError> {
        Err(ProbeError::Sysctl {
            key,
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "sysctl is not available on this platform",
            ),
        })
    }
}
