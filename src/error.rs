use std::{io, path::PathBuf};

use thiserror::Error;

/// A capability source could not be read.
///
/// This is the only failure the prober knows about. The public
/// `is_*_supported` functions never return it: they log it and answer
/// `false` instead. The `try_*` methods on [`Prober`](crate::Prober) hand
/// it back to callers that want the details.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The system control query failed.
    #[error("sysctl `{key}` failed: {source}")]
    Sysctl {
        /// The queried key.
        key: &'static str,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The processor info file could not be read.
    #[error("error reading file {}: {source}", .path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}
