//! Release planning shared by the version, changelog and release commands

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use tracing::{debug, info, instrument};

use herald_changelog::{ChangelogDocument, ChangelogEditor, ConventionalParser, EditorOptions};
use herald_core::config::{load_config_or_default, Config};
use herald_core::types::{CommitEntry, ReleaseType, VersioningScheme};
use herald_git::{CommitInfo, GitRepo, TagInfo};
use herald_strategies::{Directive, Version, VersionResolver};

use crate::cli::{files, output, Cli, OutputFormat};

/// Options selecting the release to prepare
#[derive(Debug, Clone, Default, Args)]
pub struct ReleaseArgs {
    /// Force a release type (major, minor, patch, calendar, alpha, beta, rc)
    #[arg(short, long)]
    pub release_type: Option<ReleaseType>,

    /// Release this exact version; it must be greater than the current one
    #[arg(long, value_name = "VERSION", conflicts_with = "release_type")]
    pub release_version: Option<String>,
}

/// Configuration, repository and resolver for one command invocation
pub struct ReleaseContext {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub repo: GitRepo,
    pub resolver: VersionResolver,
    pub parser: ConventionalParser,
}

/// Everything known about the next release before anything is written
#[derive(Debug)]
pub struct ReleasePlan {
    pub latest_tag: Option<TagInfo>,
    pub current: Version,
    pub commits: Vec<CommitInfo>,
    pub entries: Vec<CommitEntry>,
    pub directive: Directive,
    pub next: Version,
    pub date: NaiveDate,
}

impl ReleaseContext {
    /// Load configuration and open the repository for the working directory
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = cli.working_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        if config_path.is_none() && !cli.quiet && cli.format == OutputFormat::Text {
            output::warning(&format!(
                "No configuration found, using defaults. Run {} to create one.",
                style("herald init").cyan()
            ));
        }

        let repo = GitRepo::discover(&cwd)?;
        let resolver = VersionResolver::from_config(&config.versioning);
        let parser = ConventionalParser::from_config(&config.changelog)?;

        Ok(Self {
            config,
            config_path,
            repo,
            resolver,
            parser,
        })
    }

    /// Changelog file, relative paths resolved against the repository root
    pub fn changelog_path(&self) -> PathBuf {
        self.repo.path().join(&self.config.changelog.file)
    }

    /// Release notes file, relative paths resolved against the repository root
    pub fn release_notes_path(&self) -> PathBuf {
        self.repo.path().join(&self.config.changelog.release_notes_file)
    }

    pub fn tag_name(&self, version: &Version) -> String {
        format!("{}{}", self.config.versioning.tag_prefix, version)
    }

    pub fn editor(&self) -> ChangelogEditor {
        ChangelogEditor::new(EditorOptions::from_config(
            &self.config.versioning,
            &self.config.changelog,
        ))
    }

    /// Directive requested on the command line, inference when none
    pub fn directive(&self, args: &ReleaseArgs) -> anyhow::Result<Directive> {
        if let Some(version) = &args.release_version {
            let version = version.strip_prefix(&self.config.versioning.tag_prefix).unwrap_or(version);
            return Ok(Directive::Explicit(self.resolver.parse(version)?));
        }
        Ok(args.release_type.map(Directive::from).unwrap_or(Directive::Infer))
    }

    /// Highest release tag and its version
    pub fn latest_release(&self) -> anyhow::Result<Option<(TagInfo, Version)>> {
        let prefix = &self.config.versioning.tag_prefix;
        Ok(self
            .repo
            .find_latest_tag(prefix, |v| self.resolver.parse(v).ok())?)
    }

    /// Commits since the latest release, newest first
    pub fn commits_since(&self, tag: Option<&TagInfo>) -> anyhow::Result<Vec<CommitInfo>> {
        if !self.repo.has_commits() {
            return Ok(Vec::new());
        }
        Ok(self.repo.commits_since_tag(tag.map(|t| t.name.as_str()))?)
    }

    /// Resolve the next release without touching the repository
    #[instrument(skip(self, args))]
    pub fn plan(&self, args: &ReleaseArgs, date: Option<NaiveDate>) -> anyhow::Result<ReleasePlan> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        let directive = self.directive(args)?;

        let (latest_tag, current) = match self.latest_release()? {
            Some((tag, version)) => (Some(tag), version),
            None => (None, initial_version(self.resolver.scheme())),
        };
        debug!(tag = ?latest_tag.as_ref().map(|t| &t.name), current = %current, "current release");

        let commits = self.commits_since(latest_tag.as_ref())?;
        let entries = self
            .parser
            .classify_all(commits.iter().map(CommitInfo::full_message));

        let next = self.resolver.resolve_on(&current, &directive, &entries, date)?;
        info!(current = %current, next = %next, commits = commits.len(), "planned release");

        Ok(ReleasePlan {
            latest_tag,
            current,
            commits,
            entries,
            directive,
            next,
            date,
        })
    }

    /// Current changelog text, or the configured header when the file is missing
    pub fn read_changelog(&self) -> anyhow::Result<String> {
        let path = self.changelog_path();
        Ok(files::read_optional(&path)?.unwrap_or_else(|| {
            debug!(path = %path.display(), "changelog missing, starting from header");
            self.config.changelog.header.clone()
        }))
    }

    /// Changelog with the planned release applied
    pub fn updated_changelog(&self, plan: &ReleasePlan) -> anyhow::Result<ChangelogDocument> {
        let text = self.read_changelog()?;
        let doc = self
            .editor()
            .apply(&text, &plan.next.to_string(), plan.date, &plan.entries)?;
        Ok(doc)
    }
}

/// Version assumed before the first release tag
pub fn initial_version(scheme: VersioningScheme) -> Version {
    match scheme {
        VersioningScheme::Semantic => Version::semantic(0, 0, 0),
        VersioningScheme::Calendar => Version::calendar(0, 0, 0),
    }
}
