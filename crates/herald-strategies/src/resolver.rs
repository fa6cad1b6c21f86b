//! Next version resolution

use chrono::{Local, NaiveDate};
use herald_core::config::VersioningConfig;
use herald_core::types::{CommitEntry, VersioningScheme};
use herald_core::VersionError;
use tracing::{debug, info, instrument};

use crate::calver::CalVerStrategy;
use crate::semver::SemVerStrategy;
use crate::traits::VersionStrategy;
use crate::types::{BumpType, Directive, Version};
use crate::Result;

/// Computes the next release version under one versioning scheme
pub struct VersionResolver {
    strategy: Box<dyn VersionStrategy>,
}

impl VersionResolver {
    /// Create a resolver around a strategy
    pub fn new(strategy: impl VersionStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Create the resolver for the configured scheme
    pub fn from_config(config: &VersioningConfig) -> Self {
        match config.scheme {
            VersioningScheme::Semantic => Self::new(SemVerStrategy::new()),
            VersioningScheme::Calendar => {
                Self::new(CalVerStrategy::with_format(config.calendar_format))
            }
        }
    }

    /// Scheme this resolver works in
    pub fn scheme(&self) -> VersioningScheme {
        self.strategy.scheme()
    }

    /// Parse a version string in this resolver's scheme
    pub fn parse(&self, version: &str) -> Result<Version> {
        self.strategy.parse(version)
    }

    /// Resolve the next version, anchoring calendar releases at today's date
    pub fn resolve(
        &self,
        current: &Version,
        directive: &Directive,
        commits: &[CommitEntry],
    ) -> Result<Version> {
        self.resolve_on(current, directive, commits, Local::now().date_naive())
    }

    /// Resolve the next version as if invoked on `today`
    #[instrument(skip(self, commits), fields(scheme = %self.scheme(), commits = commits.len()))]
    pub fn resolve_on(
        &self,
        current: &Version,
        directive: &Directive,
        commits: &[CommitEntry],
        today: NaiveDate,
    ) -> Result<Version> {
        self.ensure_scheme(current)?;

        let bump_type = match directive {
            Directive::Explicit(target) => return self.check_explicit(current, target),
            Directive::Infer => {
                let bump_type = self.strategy.determine_bump_type(commits);
                debug!(bump = %bump_type, "inferred bump from commits");
                bump_type
            }
            Directive::Major => BumpType::Major,
            Directive::Minor => BumpType::Minor,
            Directive::Patch => BumpType::Patch,
            Directive::Calendar => BumpType::Calendar,
            Directive::PreRelease(kind) => BumpType::PreRelease(*kind),
        };

        let next = self
            .strategy
            .bump(current, bump_type, today)
            .map_err(|e| match e {
                // Report the directive the caller asked for
                VersionError::UnsupportedDirective { scheme, .. } => {
                    VersionError::UnsupportedDirective {
                        directive: directive.to_string(),
                        scheme,
                    }
                }
                other => other,
            })?;

        info!(current = %current, next = %next, bump = %bump_type, "resolved next version");
        Ok(next)
    }

    /// Parse `current` and resolve the next version from it
    pub fn resolve_str(
        &self,
        current: &str,
        directive: &Directive,
        commits: &[CommitEntry],
    ) -> Result<Version> {
        let current = self.parse(current)?;
        self.resolve(&current, directive, commits)
    }

    /// Development version opened after releasing `current`
    pub fn next_dev_version(&self, current: &Version) -> Result<Version> {
        self.ensure_scheme(current)?;
        let next = self.strategy.next_dev(current)?;
        debug!(current = %current, next = %next, "derived next development version");
        Ok(next)
    }

    fn ensure_scheme(&self, version: &Version) -> Result<()> {
        if version.scheme() != self.scheme() {
            return Err(VersionError::SchemeMismatch {
                version: version.to_string(),
                expected: self.scheme().to_string(),
            });
        }
        Ok(())
    }

    fn check_explicit(&self, current: &Version, target: &Version) -> Result<Version> {
        self.ensure_scheme(target)?;

        if target.try_cmp(current)?.is_le() {
            return Err(VersionError::NotIncreasing {
                current: current.to_string(),
                target: target.to_string(),
            });
        }

        info!(current = %current, next = %target, "using explicit release version");
        Ok(target.clone())
    }
}

impl std::fmt::Debug for VersionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionResolver")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::config::CalendarFormat;
    use crate::types::PreReleaseKind;

    fn may_2022() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 17).unwrap()
    }

    fn semantic() -> VersionResolver {
        VersionResolver::new(SemVerStrategy::new())
    }

    fn calendar() -> VersionResolver {
        VersionResolver::new(CalVerStrategy::new())
    }

    fn feat() -> CommitEntry {
        CommitEntry::conventional("feat: add x", "feat", None, "add x", false, None)
    }

    fn fix() -> CommitEntry {
        CommitEntry::conventional("fix: y", "fix", None, "y", false, None)
    }

    fn breaking_fix() -> CommitEntry {
        CommitEntry::conventional("fix!: z", "fix", None, "z", true, None)
    }

    #[test]
    fn test_infer_minor_from_feature() {
        let next = semantic()
            .resolve_on(
                &Version::semantic(1, 2, 3),
                &Directive::Infer,
                &[feat(), fix()],
                may_2022(),
            )
            .unwrap();
        assert_eq!(next.to_string(), "1.3.0");
    }

    #[test]
    fn test_infer_major_from_breaking() {
        for current in [Version::semantic(0, 4, 9), Version::semantic(3, 0, 0)] {
            let next = semantic()
                .resolve_on(&current, &Directive::Infer, &[fix(), breaking_fix()], may_2022())
                .unwrap();
            assert_eq!(next, Version::semantic(current.major() + 1, 0, 0));
        }
    }

    #[test]
    fn test_infer_patch_without_features() {
        let next = semantic()
            .resolve_on(&Version::semantic(1, 2, 3), &Directive::Infer, &[fix()], may_2022())
            .unwrap();
        assert_eq!(next, Version::semantic(1, 2, 4));
    }

    #[test]
    fn test_directives_override_commits() {
        let resolver = semantic();
        let current = Version::semantic(1, 2, 3);
        let commits = [breaking_fix()];

        let resolve = |directive| resolver.resolve_on(&current, &directive, &commits, may_2022());

        assert_eq!(resolve(Directive::Patch).unwrap(), Version::semantic(1, 2, 4));
        assert_eq!(resolve(Directive::Minor).unwrap(), Version::semantic(1, 3, 0));
        assert_eq!(resolve(Directive::Major).unwrap(), Version::semantic(2, 0, 0));
        assert_eq!(
            resolve(Directive::PreRelease(PreReleaseKind::Rc)).unwrap().to_string(),
            "1.2.4-rc1"
        );
    }

    #[test]
    fn test_patch_with_no_commits() {
        let resolver = semantic();
        for (major, minor, patch) in [(0, 0, 0), (1, 2, 3), (10, 0, 99)] {
            let next = resolver
                .resolve_on(
                    &Version::semantic(major, minor, patch),
                    &Directive::Patch,
                    &[],
                    may_2022(),
                )
                .unwrap();
            assert_eq!(next, Version::semantic(major, minor, patch + 1));
        }
    }

    #[test]
    fn test_explicit_version() {
        let resolver = semantic();
        let current = Version::semantic(1, 2, 3);

        let next = resolver
            .resolve_on(
                &current,
                &Directive::Explicit(Version::semantic(2, 5, 0)),
                &[],
                may_2022(),
            )
            .unwrap();
        assert_eq!(next, Version::semantic(2, 5, 0));

        let err = resolver
            .resolve_on(
                &current,
                &Directive::Explicit(Version::semantic(1, 2, 3)),
                &[],
                may_2022(),
            )
            .unwrap_err();
        assert!(matches!(err, VersionError::NotIncreasing { .. }));
    }

    #[test]
    fn test_explicit_version_of_other_scheme_fails() {
        let err = semantic()
            .resolve_on(
                &Version::semantic(1, 2, 3),
                &Directive::Explicit(Version::calendar(22, 5, 0)),
                &[],
                may_2022(),
            )
            .unwrap_err();
        assert!(matches!(err, VersionError::SchemeMismatch { .. }));
    }

    #[test]
    fn test_current_of_other_scheme_fails() {
        let err = calendar()
            .resolve_on(&Version::semantic(1, 2, 3), &Directive::Calendar, &[], may_2022())
            .unwrap_err();
        assert!(matches!(err, VersionError::SchemeMismatch { .. }));
    }

    #[test]
    fn test_calendar_directive_on_semantic_fails() {
        let err = semantic()
            .resolve_on(&Version::semantic(1, 2, 3), &Directive::Calendar, &[], may_2022())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot apply a calendar release with the semantic versioning scheme"
        );
    }

    #[test]
    fn test_minor_directive_on_calendar_fails() {
        let err = calendar()
            .resolve_on(&Version::calendar(22, 4, 3), &Directive::Minor, &[], may_2022())
            .unwrap_err();
        assert!(matches!(
            err,
            VersionError::UnsupportedDirective { ref directive, .. } if directive == "minor"
        ));
    }

    #[test]
    fn test_calendar_release_sequence() {
        let resolver = calendar();

        let first = resolver
            .resolve_on(&Version::calendar(22, 4, 3), &Directive::Calendar, &[], may_2022())
            .unwrap();
        assert_eq!(first.to_string(), "22.5.0");

        let second = resolver
            .resolve_on(&first, &Directive::Calendar, &[feat()], may_2022())
            .unwrap();
        assert_eq!(second.to_string(), "22.5.1");

        let inferred = resolver
            .resolve_on(&second, &Directive::Infer, &[breaking_fix()], may_2022())
            .unwrap();
        assert_eq!(inferred.to_string(), "22.5.2");
    }

    #[test]
    fn test_from_config() {
        let mut config = VersioningConfig::default();
        assert_eq!(VersionResolver::from_config(&config).scheme(), VersioningScheme::Semantic);

        config.scheme = VersioningScheme::Calendar;
        config.calendar_format = CalendarFormat::FullYear;
        let resolver = VersionResolver::from_config(&config);
        assert_eq!(resolver.scheme(), VersioningScheme::Calendar);
        assert!(resolver.parse("2022.5.0").is_ok());
    }

    #[test]
    fn test_resolve_str() {
        let next = semantic()
            .resolve_str("v0.9.1", &Directive::Minor, &[])
            .unwrap();
        assert_eq!(next.to_string(), "0.10.0");
        assert!(semantic().resolve_str("nope", &Directive::Minor, &[]).is_err());
    }

    #[test]
    fn test_next_dev_version() {
        let resolver = semantic();
        let dev = resolver.next_dev_version(&Version::semantic(1, 3, 0)).unwrap();
        assert_eq!(dev.to_string(), "1.3.1-dev1");

        assert!(calendar()
            .next_dev_version(&Version::semantic(1, 3, 0))
            .is_err());
    }
}
