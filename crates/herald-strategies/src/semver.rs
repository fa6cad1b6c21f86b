//! SemVer version strategy
//!
//! Versions look like `1.2.3`, `1.2.3-beta2`, `1.2.3-dev1` or
//! `1.2.3-rc1-dev2`. A trailing `.devN` is accepted on input and
//! normalized to `-devN`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use herald_core::types::VersioningScheme;
use herald_core::VersionError;
use regex::Regex;

use crate::traits::VersionStrategy;
use crate::types::{BumpType, PreRelease, PreReleaseKind, Version};
use crate::Result;

/// Pre-release identifier: `alpha1`, `dev3`, `beta2-dev1`
static PRE_RELEASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z]+)\.?(\d+)(?:[-.]([a-zA-Z]+)\.?(\d+))?$")
        .expect("Invalid pre-release regex")
});

/// Trailing python style dev segment, e.g. `1.2.3.dev1`
static DOT_DEV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(dev\d+)$").expect("Invalid dev regex"));

/// Semantic Versioning strategy
#[derive(Debug, Clone, Default)]
pub struct SemVerStrategy;

impl SemVerStrategy {
    /// Create a new SemVer strategy
    pub fn new() -> Self {
        Self
    }

    fn parse_pre(version: &str, pre: &str) -> Result<(Option<PreRelease>, Option<u64>)> {
        let invalid = |reason: &str| {
            VersionError::ParseFailed(version.to_string(), reason.to_string())
        };

        let caps = PRE_RELEASE_REGEX
            .captures(pre)
            .ok_or_else(|| invalid("unsupported pre-release identifier"))?;

        let number = |i: usize| -> Result<u64> {
            caps[i]
                .parse()
                .map_err(|_| invalid("pre-release number out of range"))
        };

        let identifier = &caps[1];
        if identifier.eq_ignore_ascii_case("dev") {
            if caps.get(3).is_some() {
                return Err(invalid("dev segment must come last"));
            }
            return Ok((None, Some(number(2)?)));
        }

        let kind = PreReleaseKind::from_identifier(identifier)
            .ok_or_else(|| invalid("pre-release must be alpha, beta or rc"))?;
        let pre = PreRelease::new(kind, number(2)?);

        match caps.get(3) {
            Some(dev) if dev.as_str().eq_ignore_ascii_case("dev") => {
                Ok((Some(pre), Some(number(4)?)))
            }
            Some(_) => Err(invalid("only a dev segment may follow a pre-release")),
            None => Ok((Some(pre), None)),
        }
    }

    fn bump_pre_release(current: &Version, kind: PreReleaseKind) -> Version {
        let base = current.release();

        match current.pre() {
            // 1.2.4-beta1-dev2 -> 1.2.4-beta1
            Some(pre) if pre.kind == kind && current.is_dev_release() => base.with_pre(pre),
            Some(pre) if pre.kind == kind => {
                base.with_pre(PreRelease::new(kind, pre.number + 1))
            }
            Some(pre) if pre.kind < kind => base.with_pre(PreRelease::new(kind, 1)),
            // 1.2.4-dev1 -> 1.2.4-alpha1
            None if current.is_dev_release() => base.with_pre(PreRelease::new(kind, 1)),
            _ => Version::semantic(base.major(), base.minor(), base.patch() + 1)
                .with_pre(PreRelease::new(kind, 1)),
        }
    }
}

impl VersionStrategy for SemVerStrategy {
    fn name(&self) -> &'static str {
        "semver"
    }

    fn scheme(&self) -> VersioningScheme {
        VersioningScheme::Semantic
    }

    fn parse(&self, version: &str) -> Result<Version> {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        let normalized = DOT_DEV_REGEX.replace(version, "-$1");

        let v = ::semver::Version::parse(&normalized)
            .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()))?;

        if !v.build.is_empty() {
            return Err(VersionError::InvalidFormat(format!(
                "build metadata is not supported: {}",
                version
            )));
        }

        let mut result = Version::semantic(v.major, v.minor, v.patch);
        if !v.pre.is_empty() {
            let (pre, dev) = Self::parse_pre(version, v.pre.as_str())?;
            if let Some(pre) = pre {
                result = result.with_pre(pre);
            }
            if let Some(dev) = dev {
                result = result.with_dev(dev);
            }
        }

        Ok(result)
    }

    fn bump(&self, current: &Version, bump_type: BumpType, _today: NaiveDate) -> Result<Version> {
        let next = match bump_type {
            BumpType::Major => Version::semantic(current.major() + 1, 0, 0),
            BumpType::Minor => Version::semantic(current.major(), current.minor() + 1, 0),
            BumpType::Patch => {
                Version::semantic(current.major(), current.minor(), current.patch() + 1)
            }
            BumpType::PreRelease(kind) => Self::bump_pre_release(current, kind),
            BumpType::Calendar => return Err(self.unsupported(bump_type)),
        };

        Ok(next)
    }

    fn next_dev(&self, current: &Version) -> Result<Version> {
        let next = match (current.pre(), current.dev()) {
            (_, Some(dev)) => {
                let base = current.release();
                let base = match current.pre() {
                    Some(pre) => base.with_pre(pre),
                    None => base,
                };
                base.with_dev(dev + 1)
            }
            (Some(pre), None) => current
                .release()
                .with_pre(PreRelease::new(pre.kind, pre.number + 1))
                .with_dev(1),
            (None, None) => {
                Version::semantic(current.major(), current.minor(), current.patch() + 1)
                    .with_dev(1)
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::types::CommitEntry;
    use std::cmp::Ordering;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 10).unwrap()
    }

    fn commit(commit_type: &str, breaking: bool) -> CommitEntry {
        CommitEntry::conventional("msg", commit_type, None, "msg", breaking, None)
    }

    #[test]
    fn test_parse_simple() {
        let strategy = SemVerStrategy::new();
        let v = strategy.parse("1.2.3").unwrap();

        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert!(v.pre().is_none());
    }

    #[test]
    fn test_parse_with_v_prefix() {
        let strategy = SemVerStrategy::new();
        assert_eq!(strategy.parse("v1.2.3").unwrap(), Version::semantic(1, 2, 3));
    }

    #[test]
    fn test_parse_suffixes() {
        let strategy = SemVerStrategy::new();

        let v = strategy.parse("1.0.0-beta2").unwrap();
        assert_eq!(v.pre(), Some(PreRelease::new(PreReleaseKind::Beta, 2)));
        assert!(v.dev().is_none());

        let v = strategy.parse("1.0.0-rc1-dev3").unwrap();
        assert_eq!(v.pre(), Some(PreRelease::new(PreReleaseKind::Rc, 1)));
        assert_eq!(v.dev(), Some(3));

        let v = strategy.parse("1.0.0.dev4").unwrap();
        assert_eq!(v.to_string(), "1.0.0-dev4");
    }

    #[test]
    fn test_parse_rejects_unknown_suffixes() {
        let strategy = SemVerStrategy::new();
        assert!(strategy.parse("1.0.0-foo1").is_err());
        assert!(strategy.parse("1.0.0-dev1-alpha1").is_err());
        assert!(strategy.parse("1.0.0+build.5").is_err());
        assert!(strategy.parse("1.0").is_err());
    }

    #[test]
    fn test_bump_major() {
        let strategy = SemVerStrategy::new();
        let next = strategy
            .bump(&Version::semantic(1, 2, 3), BumpType::Major, today())
            .unwrap();
        assert_eq!(next, Version::semantic(2, 0, 0));
    }

    #[test]
    fn test_bump_minor() {
        let strategy = SemVerStrategy::new();
        let next = strategy
            .bump(&Version::semantic(1, 2, 3), BumpType::Minor, today())
            .unwrap();
        assert_eq!(next, Version::semantic(1, 3, 0));
    }

    #[test]
    fn test_bump_patch_strips_suffixes() {
        let strategy = SemVerStrategy::new();
        let current = strategy.parse("1.2.3-rc1-dev2").unwrap();
        let next = strategy.bump(&current, BumpType::Patch, today()).unwrap();
        assert_eq!(next, Version::semantic(1, 2, 4));
    }

    #[test]
    fn test_bump_pre_release() {
        let strategy = SemVerStrategy::new();
        let alpha = BumpType::PreRelease(PreReleaseKind::Alpha);
        let beta = BumpType::PreRelease(PreReleaseKind::Beta);

        let bumped = |current: &str, bump| {
            let current = strategy.parse(current).unwrap();
            strategy.bump(&current, bump, today()).unwrap().to_string()
        };

        assert_eq!(bumped("1.2.3", alpha), "1.2.4-alpha1");
        assert_eq!(bumped("1.2.4-alpha1", alpha), "1.2.4-alpha2");
        assert_eq!(bumped("1.2.4-alpha2", beta), "1.2.4-beta1");
        assert_eq!(bumped("1.2.4-beta1", alpha), "1.2.5-alpha1");
        assert_eq!(bumped("1.2.4-dev1", beta), "1.2.4-beta1");
        assert_eq!(bumped("1.2.4-beta1-dev3", beta), "1.2.4-beta1");
    }

    #[test]
    fn test_bump_calendar_is_unsupported() {
        let strategy = SemVerStrategy::new();
        let result = strategy.bump(&Version::semantic(1, 2, 3), BumpType::Calendar, today());
        assert!(matches!(
            result,
            Err(VersionError::UnsupportedDirective { .. })
        ));
    }

    #[test]
    fn test_next_dev() {
        let strategy = SemVerStrategy::new();
        let next_dev = |current: &str| {
            let current = strategy.parse(current).unwrap();
            strategy.next_dev(&current).unwrap().to_string()
        };

        assert_eq!(next_dev("1.2.3"), "1.2.4-dev1");
        assert_eq!(next_dev("1.2.4-dev1"), "1.2.4-dev2");
        assert_eq!(next_dev("1.2.4-alpha1"), "1.2.4-alpha2-dev1");
        assert_eq!(next_dev("1.2.4-alpha2-dev1"), "1.2.4-alpha2-dev2");
    }

    #[test]
    fn test_determine_bump_type() {
        let strategy = SemVerStrategy::new();

        assert_eq!(strategy.determine_bump_type(&[]), BumpType::Patch);
        assert_eq!(
            strategy.determine_bump_type(&[commit("fix", false), commit("feat", false)]),
            BumpType::Minor
        );
        assert_eq!(
            strategy.determine_bump_type(&[commit("feat", false), commit("fix", true)]),
            BumpType::Major
        );
        assert_eq!(
            strategy.determine_bump_type(&[CommitEntry::other("Update readme")]),
            BumpType::Patch
        );
    }

    #[test]
    fn test_compare() {
        let strategy = SemVerStrategy::new();

        assert_eq!(strategy.compare("1.0.0", "1.0.1").unwrap(), Ordering::Less);
        assert_eq!(strategy.compare("1.1.0", "1.0.1").unwrap(), Ordering::Greater);
        assert_eq!(strategy.compare("v1.0.0", "1.0.0").unwrap(), Ordering::Equal);
        assert_eq!(
            strategy.compare("1.0.0-alpha1", "1.0.0").unwrap(),
            Ordering::Less
        );
        assert_eq!(
            strategy.compare("1.0.0-dev1", "1.0.0-alpha1-dev1").unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_is_valid() {
        let strategy = SemVerStrategy::new();
        assert!(strategy.is_valid("0.1.0"));
        assert!(!strategy.is_valid("22.5"));
    }
}
