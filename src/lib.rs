//! Runtime detection of the AVX2 and AVX512 SIMD extensions.
//!
//! Callers use this to pick an optimized kernel: [`is_avx2_supported`] and
//! [`is_avx512_supported`] answer from the live system and never fail. A
//! source that cannot be read is logged and counts as "not supported".
//!
//! On macOS the answer comes from the `machdep.cpu.leaf7_features` sysctl,
//! on Linux from the first `flags` line of `/proc/cpuinfo`. Every other
//! platform, and every non-x86 CPU, reports `false`.
//!
//! [`Prober`] exposes the same checks over any [`FlagSource`], along with
//! fallible `try_*` variants.

mod error;
mod flags;
mod platform;
mod probe;
mod source;

pub use crate::{
    error::ProbeError,
    flags::{AVX512_FEATURES, FeatureFlags},
    platform::{Arch, LEAF7_FEATURES_DEFAULT, LEAF7_FEATURES_KEY, Os, Platform},
    probe::Prober,
    source::{CPUINFO_PATH, FlagSource, HostSource},
};

/// Both capability answers for one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Capabilities {
    /// AVX2 is available.
    pub avx2: bool,
    /// All of [`AVX512_FEATURES`] are available.
    pub avx512: bool,
}

/// Returns whether the host CPU supports AVX2.
///
/// Reads the system every time it is called.
#[inline]
pub fn is_avx2_supported() -> bool {
    Prober::host().avx2_supported()
}

/// Returns whether the host CPU supports AVX512, meaning every extension in
/// [`AVX512_FEATURES`].
///
/// Only x86 Linux has a detection path; elsewhere this is `false`.
#[inline]
pub fn is_avx512_supported() -> bool {
    Prober::host().avx512_supported()
}
