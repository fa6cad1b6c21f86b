//! CalVer (Calendar Versioning) strategy
//!
//! Versions use the `YY.MM.MICRO` layout (e.g. `22.5.0`) or, with the
//! full-year format, `YYYY.MM.MICRO`. Development versions carry a
//! `.devN` suffix.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use herald_core::config::CalendarFormat;
use herald_core::types::{CommitEntry, VersioningScheme};
use herald_core::VersionError;
use regex::Regex;
use tracing::debug;

use crate::traits::VersionStrategy;
use crate::types::{BumpType, Version};
use crate::Result;

static CALVER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:[.-]?dev(\d+))?$").expect("Invalid calver regex")
});

/// CalVer strategy for calendar-based versioning
#[derive(Debug, Clone, Default)]
pub struct CalVerStrategy {
    format: CalendarFormat,
}

impl CalVerStrategy {
    /// Create a new CalVer strategy with the short year format
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific format
    pub fn with_format(format: CalendarFormat) -> Self {
        Self { format }
    }

    /// Year and month of `today` in this strategy's notation
    fn period(&self, today: NaiveDate) -> (u64, u64) {
        let year = today.year().max(0) as u64;
        let year = match self.format {
            CalendarFormat::ShortYear => year % 100,
            CalendarFormat::FullYear => year,
        };
        (year, today.month() as u64)
    }

    fn valid_year(&self, year: u64) -> bool {
        match self.format {
            CalendarFormat::ShortYear => year < 100,
            CalendarFormat::FullYear => (1000..10000).contains(&year),
        }
    }
}

impl VersionStrategy for CalVerStrategy {
    fn name(&self) -> &'static str {
        "calver"
    }

    fn scheme(&self) -> VersioningScheme {
        VersioningScheme::Calendar
    }

    fn parse(&self, version: &str) -> Result<Version> {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);

        let caps = CALVER_REGEX.captures(version).ok_or_else(|| {
            VersionError::InvalidFormat(format!(
                "Expected format YY.MM.MICRO or similar, got: {}",
                version
            ))
        })?;

        let number = |i: usize, what: &str| -> Result<Option<u64>> {
            caps.get(i)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|_| {
                        VersionError::ParseFailed(version.to_string(), format!("Invalid {}", what))
                    })
                })
                .transpose()
        };

        let year = number(1, "year")?.unwrap_or_default();
        let month = number(2, "month")?.unwrap_or_default();
        let patch = number(3, "micro")?.unwrap_or(0);
        let dev = number(4, "dev number")?;

        if !self.valid_year(year) {
            return Err(VersionError::ParseFailed(
                version.to_string(),
                "Invalid year".to_string(),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(VersionError::ParseFailed(
                version.to_string(),
                "Invalid month".to_string(),
            ));
        }

        let parsed = Version::calendar(year, month, patch);
        Ok(match dev {
            Some(dev) => parsed.with_dev(dev),
            None => parsed,
        })
    }

    fn bump(&self, current: &Version, bump_type: BumpType, today: NaiveDate) -> Result<Version> {
        if !matches!(bump_type, BumpType::Calendar | BumpType::Patch) {
            return Err(self.unsupported(bump_type));
        }

        let (year, month) = self.period(today);
        if (current.major(), current.minor()) > (year, month) {
            return Err(VersionError::CalendarRegression {
                current: current.to_string(),
                period: format!("{}.{}", year, month),
            });
        }

        let candidate = Version::calendar(year, month, 0);
        let next = if candidate > *current {
            candidate
        } else if current.is_dev_release() {
            // 22.5.1.dev1 releases as 22.5.1
            current.release()
        } else {
            Version::calendar(year, month, current.patch() + 1)
        };

        debug!(current = %current, next = %next, "calendar bump");
        Ok(next)
    }

    fn next_dev(&self, current: &Version) -> Result<Version> {
        Ok(match current.dev() {
            Some(dev) => current.release().with_dev(dev + 1),
            None => Version::calendar(current.major(), current.minor(), current.patch() + 1)
                .with_dev(1),
        })
    }

    /// Every calendar release is a period release, regardless of commits
    fn determine_bump_type(&self, _commits: &[CommitEntry]) -> BumpType {
        BumpType::Calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_2022() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 17).unwrap()
    }

    #[test]
    fn test_parse() {
        let strategy = CalVerStrategy::new();

        assert_eq!(strategy.parse("22.4.3").unwrap(), Version::calendar(22, 4, 3));
        assert_eq!(strategy.parse("v22.4").unwrap(), Version::calendar(22, 4, 0));
        assert_eq!(
            strategy.parse("22.5.1.dev2").unwrap(),
            Version::calendar(22, 5, 1).with_dev(2)
        );
        assert_eq!(
            strategy.parse("22.5.1-dev2").unwrap(),
            Version::calendar(22, 5, 1).with_dev(2)
        );
    }

    #[test]
    fn test_parse_invalid() {
        let strategy = CalVerStrategy::new();

        assert!(strategy.parse("22.13.0").is_err());
        assert!(strategy.parse("22.0.0").is_err());
        assert!(strategy.parse("2022.5.0").is_err());
        assert!(strategy.parse("22.5.0-alpha1").is_err());
        assert!(strategy.parse("latest").is_err());
    }

    #[test]
    fn test_parse_full_year() {
        let strategy = CalVerStrategy::with_format(CalendarFormat::FullYear);

        assert_eq!(strategy.parse("2022.5.0").unwrap(), Version::calendar(2022, 5, 0));
        assert!(strategy.parse("22.5.0").is_err());
    }

    #[test]
    fn test_bump_new_month() {
        let strategy = CalVerStrategy::new();
        let next = strategy
            .bump(&Version::calendar(22, 4, 3), BumpType::Calendar, may_2022())
            .unwrap();
        assert_eq!(next, Version::calendar(22, 5, 0));
    }

    #[test]
    fn test_bump_same_month() {
        let strategy = CalVerStrategy::new();
        let first = strategy
            .bump(&Version::calendar(22, 4, 3), BumpType::Calendar, may_2022())
            .unwrap();
        let second = strategy.bump(&first, BumpType::Calendar, may_2022()).unwrap();

        assert_eq!(second, Version::calendar(22, 5, 1));
    }

    #[test]
    fn test_bump_dev_version() {
        let strategy = CalVerStrategy::new();

        let next = strategy
            .bump(&Version::calendar(22, 5, 0).with_dev(1), BumpType::Patch, may_2022())
            .unwrap();
        assert_eq!(next, Version::calendar(22, 5, 0));

        let next = strategy
            .bump(&Version::calendar(22, 5, 1).with_dev(3), BumpType::Calendar, may_2022())
            .unwrap();
        assert_eq!(next, Version::calendar(22, 5, 1));
    }

    #[test]
    fn test_bump_full_year() {
        let strategy = CalVerStrategy::with_format(CalendarFormat::FullYear);
        let next = strategy
            .bump(&Version::calendar(2021, 11, 2), BumpType::Calendar, may_2022())
            .unwrap();
        assert_eq!(next.to_string(), "2022.5.0");
    }

    #[test]
    fn test_bump_from_future_fails() {
        let strategy = CalVerStrategy::new();
        let result = strategy.bump(&Version::calendar(22, 6, 0), BumpType::Calendar, may_2022());
        assert!(matches!(
            result,
            Err(VersionError::CalendarRegression { .. })
        ));
    }

    #[test]
    fn test_bump_major_unsupported() {
        let strategy = CalVerStrategy::new();
        let result = strategy.bump(&Version::calendar(22, 4, 0), BumpType::Major, may_2022());
        assert!(matches!(
            result,
            Err(VersionError::UnsupportedDirective { .. })
        ));
    }

    #[test]
    fn test_next_dev() {
        let strategy = CalVerStrategy::new();

        assert_eq!(
            strategy.next_dev(&Version::calendar(22, 5, 0)).unwrap().to_string(),
            "22.5.1.dev1"
        );
        assert_eq!(
            strategy
                .next_dev(&Version::calendar(22, 5, 1).with_dev(1))
                .unwrap()
                .to_string(),
            "22.5.1.dev2"
        );
    }

    #[test]
    fn test_determine_bump_type_ignores_commits() {
        let strategy = CalVerStrategy::new();
        let commits = vec![CommitEntry::conventional(
            "feat!: x", "feat", None, "x", true, None,
        )];
        assert_eq!(strategy.determine_bump_type(&commits), BumpType::Calendar);
    }
}
