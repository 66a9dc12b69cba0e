use std::collections::BTreeSet;

/// The sub-extensions that together count as AVX512 support.
pub const AVX512_FEATURES: [&str; 5] = ["avx512f", "avx512cd", "avx512vl", "avx512dq", "avx512bw"];

/// A set of lowercase CPU feature tokens.
///
/// Membership is by whole token, so `avx2` is not found inside `avx2x`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    tokens: BTreeSet<String>,
}

impl FeatureFlags {
    /// Splits `raw` on ASCII whitespace and commas, lowercasing each token.
    #[inline]
    pub fn parse(raw: &str) -> Self {
        FeatureFlags {
            tokens: raw
                .split(|c: char| c.is_ascii_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(str::to_ascii_lowercase)
                .collect(),
        }
    }

    /// Extracts the flags from the text of a Linux `/proc/cpuinfo`.
    ///
    /// Only the first line starting with `flags` is consulted. The result is
    /// empty when there is no such line.
    #[inline]
    pub fn from_cpuinfo(cpuinfo: &str) -> Self {
        cpuinfo
            .lines()
            .find(|line| line.starts_with("flags"))
            .map(|line| {
                // "flags\t\t: fpu vme ..."
                let list = line.split_once(':').map_or(line, |(_, list)| list);
                Self::parse(list)
            })
            .unwrap_or_default()
    }

    /// Returns whether `feature` is one of the tokens, ignoring case.
    #[inline]
    pub fn contains(&self, feature: &str) -> bool {
        self.tokens.contains(&feature.to_ascii_lowercase())
    }

    /// Returns whether every one of `features` is present.
    #[inline]
    pub fn contains_all(&self, features: &[&str]) -> bool {
        features.iter().all(|feature| self.contains(feature))
    }

    /// Number of distinct tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when no tokens were found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0\n\
                           vendor_id\t: GenuineIntel\n\
                           flags\t\t: fpu vme de pse avx avx2 sse4_2\n\
                           bugs\t\t: spectre_v1\n\
                           \n\
                           processor\t: 1\n\
                           flags\t\t: fpu avx512f\n";

    #[test]
    fn parse_splits_on_whitespace_and_commas() {
        let flags = FeatureFlags::parse("AVX2 avx,sse4_2\tFMA\n");
        assert_eq!(flags.len(), 4);
        for feature in ["avx2", "avx", "sse4_2", "fma"] {
            assert!(flags.contains(feature), "{feature}");
        }
    }

    #[test]
    fn matches_whole_tokens_only() {
        let flags = FeatureFlags::parse("avx2x avx512 xavx2");
        assert!(!flags.contains("avx2"));
        assert!(!flags.contains("avx512f"));
    }

    #[test]
    fn contains_ignores_case() {
        let flags = FeatureFlags::parse("avx2");
        assert!(flags.contains("AVX2"));
    }

    #[test]
    fn cpuinfo_uses_first_flags_line() {
        let flags = FeatureFlags::from_cpuinfo(CPUINFO);
        assert!(flags.contains("avx2"));
        assert!(!flags.contains("avx512f"));
        assert!(!flags.contains("flags"));
        assert!(!flags.contains("spectre_v1"));
    }

    #[test]
    fn cpuinfo_without_flags_line_is_empty() {
        let flags = FeatureFlags::from_cpuinfo("processor\t: 0\nFeatures\t: fp asimd\n");
        assert!(flags.is_empty());
    }

    #[test]
    fn cpuinfo_flags_line_without_colon() {
        let flags = FeatureFlags::from_cpuinfo("flags avx2\n");
        assert!(flags.contains("avx2"));
    }

    #[test]
    fn contains_all_needs_every_feature() {
        let flags = FeatureFlags::parse("avx512f avx512cd avx512vl avx512dq avx512bw");
        assert!(flags.contains_all(&AVX512_FEATURES));
        for missing in AVX512_FEATURES {
            let partial = AVX512_FEATURES
                .iter()
                .filter(|&&feature| feature != missing)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            assert!(!FeatureFlags::parse(&partial).contains_all(&AVX512_FEATURES));
        }
    }
}
