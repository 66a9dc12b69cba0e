
use log::{debug, error};

use crate::{
    Capabilities,
    error::ProbeError,
    flags::{AVX512_FEATURES, FeatureFlags},
    platform::{LEAF7_FEATURES_DEFAULT, Platform, Strategy},
    source::{FlagSource, HostSource},
};

/// Answers SIMD capability questions for one platform and flag source.
///
/// Nothing is cached: every call reads its source again.
#[derive(Debug, Clone, Default)]
pub struct Prober<S = HostSource> {
    platform: Platform,
    source: S,
}

impl Prober {
    /// A prober for the running system.
    #[inline]
    pub fn host() -> Self {
        Prober::default()
    }
}

impl<S: FlagSource> Prober<S> {
    /// Creates a prober that treats `source` as belonging to `platform`.
    #[inline]
    pub const fn new(platform: Platform, source: S) -> Self {
        Prober { platform, source }
    }

    /// The platform whose detection strategy is used.
    #[inline]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// The source flags are read from.
    #[inline]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns whether the CPU supports AVX2.
    ///
    /// A source that cannot be read is logged and reported as `false`.
    #[inline]
    pub fn avx2_supported(&self) -> bool {
        absorb("avx2", self.try_avx2_supported())
    }

    /// Returns whether the CPU supports every AVX512 sub-extension in
    /// [`AVX512_FEATURES`].
    ///
    /// A source that cannot be read is logged and reported as `false`.
    #[inline]
    pub fn avx512_supported(&self) -> bool {
        absorb("avx512", self.try_avx512_supported())
    }

    /// Like [`Prober::avx2_supported`], but hands back read failures.
    ///
    /// # Errors
    ///
    /// - If the flag source for this platform cannot be read.
    #[inline]
    pub fn try_avx2_supported(&self) -> Result<bool, ProbeError> {
        Ok(self
            .read_flags(self.platform.avx2_strategy())?
            .is_some_and(|flags| flags.contains("avx2")))
    }

    /// Like [`Prober::avx512_supported`], but hands back read failures.
    ///
    /// # Errors
    ///
    /// - If the flag source for this platform cannot be read.
    #[inline]
    pub fn try_avx512_supported(&self) -> Result<bool, ProbeError> {
        Ok(self
            .read_flags(self.platform.avx512_strategy())?
            .is_some_and(|flags| flags.contains_all(&AVX512_FEATURES)))
    }

    /// Answers both questions.
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            avx2: self.avx2_supported(),
            avx512: self.avx512_supported(),
        }
    }

    /// Returns `None` when the strategy has nothing to read.
    fn read_flags(&self, strategy: Strategy) -> Result<Option<FeatureFlags>, ProbeError> {
        let flags = match strategy {
            Strategy::Sysctl(key) => {
                FeatureFlags::parse(&self.source.sysctl_string(key, LEAF7_FEATURES_DEFAULT)?)
            }
            Strategy::CpuInfo => FeatureFlags::from_cpuinfo(&self.source.cpuinfo()?),
            Strategy::Unsupported => return Ok(None),
        };
        Ok(Some(flags))
    }
}

fn absorb(feature: &str, result: Result<bool, ProbeError>) -> bool {
    match result {
        Ok(supported) => {
            debug!("[SIMD] {} supported: {}", feature, supported);
            supported
        }
        Err(err) => {
            error!("[SIMD] Error fetching cpu flags for {}: {}", feature, err);
            false
        }
    }
}
