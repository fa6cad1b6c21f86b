//! Version strategy types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use herald_core::types::{ReleaseType, VersioningScheme};
use herald_core::VersionError;

/// Kind of a pre-release, ordered alpha < beta < rc
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreReleaseKind {
    Alpha,
    Beta,
    Rc,
}

impl PreReleaseKind {
    /// Returns the identifier used in version strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Rc => "rc",
        }
    }

    /// Parse an identifier (`alpha`, `a`, `beta`, `b`, `rc`)
    pub fn from_identifier(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "alpha" | "a" => Some(Self::Alpha),
            "beta" | "b" => Some(Self::Beta),
            "rc" => Some(Self::Rc),
            _ => None,
        }
    }
}

/// Pre-release segment, e.g. `beta2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PreRelease {
    pub kind: PreReleaseKind,
    pub number: u64,
}

impl PreRelease {
    pub fn new(kind: PreReleaseKind, number: u64) -> Self {
        Self { kind, number }
    }
}

impl std::fmt::Display for PreRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.as_str(), self.number)
    }
}

/// A parsed version
///
/// Versions of different schemes are never comparable: `partial_cmp` returns
/// `None` for them and [`Version::try_cmp`] reports an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    scheme: VersioningScheme,
    major: u64,
    minor: u64,
    patch: u64,
    pre: Option<PreRelease>,
    dev: Option<u64>,
}

impl Version {
    /// Create a semantic release version
    pub fn semantic(major: u64, minor: u64, patch: u64) -> Self {
        Self::new(VersioningScheme::Semantic, major, minor, patch)
    }

    /// Create a calendar release version
    pub fn calendar(year: u64, month: u64, patch: u64) -> Self {
        Self::new(VersioningScheme::Calendar, year, month, patch)
    }

    fn new(scheme: VersioningScheme, major: u64, minor: u64, patch: u64) -> Self {
        Self {
            scheme,
            major,
            minor,
            patch,
            pre: None,
            dev: None,
        }
    }

    /// Set the pre-release segment
    pub fn with_pre(mut self, pre: PreRelease) -> Self {
        self.pre = Some(pre);
        self
    }

    /// Set the development number
    pub fn with_dev(mut self, dev: u64) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Drop pre-release and development suffixes
    pub fn release(&self) -> Self {
        Self::new(self.scheme, self.major, self.minor, self.patch)
    }

    pub fn scheme(&self) -> VersioningScheme {
        self.scheme
    }

    /// Major version, or the year for calendar versions
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor version, or the month for calendar versions
    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// Whether this version is an alpha, beta or release candidate
    pub fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }

    /// Whether this version is a development version
    pub fn is_dev_release(&self) -> bool {
        self.dev.is_some()
    }

    /// Compare two versions of the same scheme
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, VersionError> {
        self.partial_cmp(other)
            .ok_or_else(|| VersionError::IncomparableSchemes {
                a: self.to_string(),
                left: self.scheme.to_string(),
                b: other.to_string(),
                right: other.scheme.to_string(),
            })
    }

    /// Ordering key: dev-only < pre-release with dev < pre-release < release
    fn sort_key(&self) -> (u64, u64, u64, u8, Option<PreRelease>, u8, u64) {
        let (stage, pre, final_pre, dev) = match (self.pre, self.dev) {
            (None, Some(dev)) => (0, None, 0, dev),
            (Some(pre), Some(dev)) => (1, Some(pre), 0, dev),
            (Some(pre), None) => (1, Some(pre), 1, 0),
            (None, None) => (2, None, 0, 0),
        };
        (self.major, self.minor, self.patch, stage, pre, final_pre, dev)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.scheme != other.scheme {
            return None;
        }
        Some(self.sort_key().cmp(&other.sort_key()))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        match self.scheme {
            VersioningScheme::Semantic => {
                if let Some(pre) = &self.pre {
                    write!(f, "-{}", pre)?;
                }
                if let Some(dev) = self.dev {
                    write!(f, "-dev{}", dev)?;
                }
            }
            VersioningScheme::Calendar => {
                if let Some(pre) = &self.pre {
                    write!(f, "{}", pre)?;
                }
                if let Some(dev) = self.dev {
                    write!(f, ".dev{}", dev)?;
                }
            }
        }

        Ok(())
    }
}

/// Type of version bump applied by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
    /// Pre-release bump
    PreRelease(PreReleaseKind),
    /// Calendar period release
    Calendar,
}

impl std::fmt::Display for BumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::PreRelease(kind) => write!(f, "{}", kind.as_str()),
            Self::Calendar => write!(f, "calendar"),
        }
    }
}

/// What kind of release to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Derive the bump from the classified commits
    Infer,
    Major,
    Minor,
    Patch,
    Calendar,
    PreRelease(PreReleaseKind),
    /// Use this exact version; it must be greater than the current one
    Explicit(Version),
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infer => write!(f, "inferred"),
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Calendar => write!(f, "calendar"),
            Self::PreRelease(kind) => write!(f, "{}", kind.as_str()),
            Self::Explicit(version) => write!(f, "explicit {}", version),
        }
    }
}

impl From<ReleaseType> for Directive {
    fn from(release_type: ReleaseType) -> Self {
        match release_type {
            ReleaseType::Major => Self::Major,
            ReleaseType::Minor => Self::Minor,
            ReleaseType::Patch => Self::Patch,
            ReleaseType::Calendar => Self::Calendar,
            ReleaseType::Alpha => Self::PreRelease(PreReleaseKind::Alpha),
            ReleaseType::Beta => Self::PreRelease(PreReleaseKind::Beta),
            ReleaseType::ReleaseCandidate => Self::PreRelease(PreReleaseKind::Rc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(n: u64) -> PreRelease {
        PreRelease::new(PreReleaseKind::Alpha, n)
    }

    #[test]
    fn test_display_semantic() {
        assert_eq!(Version::semantic(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::semantic(1, 2, 3).with_dev(1).to_string(), "1.2.3-dev1");
        assert_eq!(
            Version::semantic(1, 2, 3).with_pre(alpha(1)).with_dev(2).to_string(),
            "1.2.3-alpha1-dev2"
        );
    }

    #[test]
    fn test_display_calendar() {
        assert_eq!(Version::calendar(22, 5, 0).to_string(), "22.5.0");
        assert_eq!(Version::calendar(22, 5, 1).with_dev(1).to_string(), "22.5.1.dev1");
    }

    #[test]
    fn test_suffix_ordering() {
        let dev = Version::semantic(1, 2, 3).with_dev(1);
        let alpha_dev = Version::semantic(1, 2, 3).with_pre(alpha(1)).with_dev(1);
        let alpha1 = Version::semantic(1, 2, 3).with_pre(alpha(1));
        let beta1 = Version::semantic(1, 2, 3).with_pre(PreRelease::new(PreReleaseKind::Beta, 1));
        let release = Version::semantic(1, 2, 3);
        let next = Version::semantic(1, 2, 4).with_dev(1);

        assert!(dev < alpha_dev);
        assert!(alpha_dev < alpha1);
        assert!(alpha1 < beta1);
        assert!(beta1 < release);
        assert!(release < next);
    }

    #[test]
    fn test_cross_scheme_comparison_fails() {
        let a = Version::semantic(22, 5, 0);
        let b = Version::calendar(22, 5, 0);

        assert_ne!(a, b);
        assert!(a.partial_cmp(&b).is_none());
        assert!(matches!(
            a.try_cmp(&b),
            Err(VersionError::IncomparableSchemes { .. })
        ));
    }

    #[test]
    fn test_release_strips_suffixes() {
        let v = Version::semantic(1, 0, 0).with_pre(alpha(2)).with_dev(3);
        assert_eq!(v.release(), Version::semantic(1, 0, 0));
        assert!(!v.release().is_pre_release());
        assert!(!v.release().is_dev_release());
    }

    #[test]
    fn test_directive_from_release_type() {
        assert_eq!(Directive::from(ReleaseType::Major), Directive::Major);
        assert_eq!(
            Directive::from(ReleaseType::ReleaseCandidate),
            Directive::PreRelease(PreReleaseKind::Rc)
        );
    }

    #[test]
    fn test_version_serializes() {
        let json = serde_json::to_value(Version::calendar(22, 5, 1)).unwrap();
        assert_eq!(json["scheme"], "calendar");
        assert_eq!(json["minor"], 5);
    }
}
