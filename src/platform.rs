use cfg_if::cfg_if;

/// sysctl key listing the CPUID leaf 7 feature flags on macOS.
pub const LEAF7_FEATURES_KEY: &str = "machdep.cpu.leaf7_features";

/// Value reported for [`LEAF7_FEATURES_KEY`] when the key is not set.
pub const LEAF7_FEATURES_DEFAULT: &str = "empty";

/// CPU architecture family, as far as SIMD probing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 32 or 64 bit x86.
    X86,
    /// Anything else. Never reports AVX support.
    Other,
}

/// Operating system, as far as SIMD probing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Reports CPU features through sysctl.
    MacOs,
    /// Reports CPU features through `/proc/cpuinfo`.
    Linux,
    /// No detection path. Windows lands here.
    Other,
}

/// An architecture and operating system pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// CPU architecture.
    pub arch: Arch,
    /// Operating system.
    pub os: Os,
}

/// Where the answer to one capability question comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// Query the given sysctl key.
    Sysctl(&'static str),
    /// Read the first `flags` line of the processor info file.
    CpuInfo,
    /// No detection path exists; the answer is `false`.
    Unsupported,
}

impl Platform {
    /// Creates a platform from its parts.
    #[inline]
    pub const fn new(arch: Arch, os: Os) -> Self {
        Platform { arch, os }
    }

    /// The platform this crate was compiled for.
    #[inline]
    pub const fn host() -> Self {
        Platform::new(host_arch(), host_os())
    }

    pub(crate) const fn avx2_strategy(self) -> Strategy {
        match (self.arch, self.os) {
            (Arch::X86, Os::MacOs) => Strategy::Sysctl(LEAF7_FEATURES_KEY),
            (Arch::X86, Os::Linux) => Strategy::CpuInfo,
            _ => Strategy::Unsupported,
        }
    }

    pub(crate) const fn avx512_strategy(self) -> Strategy {
        match (self.arch, self.os) {
            (Arch::X86, Os::Linux) => Strategy::CpuInfo,
            _ => Strategy::Unsupported,
        }
    }
}

impl Default for Platform {
    #[inline]
    fn default() -> Self {
        Platform::host()
    }
}

const fn host_arch() -> Arch {
    cfg_if! {
        if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
            Arch::X86
        } else {
            Arch::Other
        }
    }
}

const fn host_os() -> Os {
    cfg_if! {
        if #[cfg(target_os = "macos")] {
            Os::MacOs
        } else if #[cfg(target_os = "linux")] {
            Os::Linux
        } else {
            Os::Other
        }
    }
}
