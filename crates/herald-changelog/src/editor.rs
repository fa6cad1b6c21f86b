//! Changelog editor
//!
//! Turns the Unreleased section of a changelog into a dated release section,
//! merging in classified commits, and opens a fresh Unreleased section above
//! it. Applying the same release twice changes nothing the second time.

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use herald_core::config::{ChangelogConfig, VersioningConfig};
use herald_core::types::CommitEntry;
use herald_core::ChangelogFormatError;

use crate::document::{parse_link, strip_terminator, ChangelogDocument, ReleaseSection, SectionHeading};
use crate::formatter::MarkdownFormatter;
use crate::types::{category_rank, CategoryGroup, CATEGORY_ORDER};

/// Options controlling how releases are written
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Prefix of release tags, used in comparison links
    pub tag_prefix: String,
    /// Base URL of comparison links, e.g. `https://github.com/org/project/compare`
    pub compare_url: Option<String>,
    /// Category receiving commits without a category
    pub catch_all: Option<String>,
    /// Prefix breaking entries with `**BREAKING**`
    pub mark_breaking: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tag_prefix: "v".to_string(),
            compare_url: None,
            catch_all: None,
            mark_breaking: true,
        }
    }
}

impl EditorOptions {
    /// Build options from configuration
    pub fn from_config(versioning: &VersioningConfig, changelog: &ChangelogConfig) -> Self {
        Self {
            tag_prefix: versioning.tag_prefix.clone(),
            compare_url: changelog.compare_url.clone(),
            catch_all: changelog.catch_all.clone(),
            mark_breaking: changelog.mark_breaking,
        }
    }

    /// Set the tag prefix
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    /// Set the comparison link base URL
    pub fn with_compare_url(mut self, url: impl Into<String>) -> Self {
        self.compare_url = Some(url.into());
        self
    }

    /// Set the catch-all category
    pub fn with_catch_all(mut self, category: impl Into<String>) -> Self {
        self.catch_all = Some(category.into());
        self
    }
}

/// Applies releases to changelog documents
#[derive(Debug, Clone, Default)]
pub struct ChangelogEditor {
    options: EditorOptions,
    formatter: MarkdownFormatter,
}

impl ChangelogEditor {
    /// Create an editor
    pub fn new(options: EditorOptions) -> Self {
        let formatter = MarkdownFormatter::new().with_mark_breaking(options.mark_breaking);
        Self { options, formatter }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Group rendered entries by category
    ///
    /// Canonical categories come first, then other configured categories in
    /// order of appearance, then the catch-all. Commits without a category
    /// are dropped when no catch-all is configured.
    pub fn group(&self, commits: &[CommitEntry]) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> =
            CATEGORY_ORDER.iter().map(|c| CategoryGroup::new(*c)).collect();
        let mut extra: Vec<CategoryGroup> = Vec::new();
        let mut catch_all = self.options.catch_all.as_deref().map(CategoryGroup::new);
        let mut dropped = 0;

        for commit in commits {
            let entry = self.formatter.entry(commit);

            let group = match commit.category() {
                Some(name) => match category_rank(name) {
                    Some(rank) => &mut groups[rank],
                    None => match catch_all
                        .as_mut()
                        .filter(|g| g.name.eq_ignore_ascii_case(name))
                    {
                        Some(group) => group,
                        None => group_named(&mut extra, name),
                    },
                },
                None => match catch_all.as_mut() {
                    Some(group) => group,
                    None => {
                        dropped += 1;
                        continue;
                    }
                },
            };
            group.push(entry);
        }

        if dropped > 0 {
            debug!(dropped, "commits without category left out");
        }

        groups.extend(extra);
        groups.extend(catch_all);
        groups.retain(|g| !g.is_empty());
        groups
    }

    /// Render the section a release would get, without touching any document
    pub fn preview(&self, version: &str, date: NaiveDate, commits: &[CommitEntry]) -> String {
        self.formatter
            .format_section(version, Some(date), &self.group(commits))
    }

    /// Parse `text` and apply a release to it
    #[instrument(skip(self, text, commits), fields(commits = commits.len()))]
    pub fn apply(
        &self,
        text: &str,
        version: &str,
        date: NaiveDate,
        commits: &[CommitEntry],
    ) -> Result<ChangelogDocument, ChangelogFormatError> {
        let doc = ChangelogDocument::parse(text)?;
        Ok(self.apply_to(&doc, version, date, commits))
    }

    /// Apply a release to a parsed document, returning the edited copy
    pub fn apply_to(
        &self,
        doc: &ChangelogDocument,
        version: &str,
        date: NaiveDate,
        commits: &[CommitEntry],
    ) -> ChangelogDocument {
        let mut doc = doc.clone();
        let newline = doc.newline();
        let groups = self.group(commits);

        if let Some(index) = doc.position(version) {
            merge(&mut doc.sections_mut()[index], &groups, newline);
            info!(version, "release section exists, merged missing entries");
            return doc;
        }

        let heading = SectionHeading::new(
            format!("{}{}", self.formatter.heading(version, Some(date)), newline),
            version,
            Some(date),
            false,
        );

        if doc.unreleased().is_some() {
            let section = &mut doc.sections_mut()[0];
            merge(section, &groups, newline);
            section.set_heading(heading);

            let link_moved = self.rewrite_unreleased_link(&mut doc, version);

            let mut fresh = ReleaseSection::new(SectionHeading::new(
                format!("{}{}", self.formatter.unreleased_heading(), newline),
                "Unreleased",
                None,
                true,
            ));
            fresh.push_lead(newline.to_string());
            if !link_moved {
                let url = self.unreleased_url(None, version);
                fresh.push_trailer(format!("{}{}", self.formatter.link("Unreleased", &url), newline));
                fresh.push_trailer(newline.to_string());
            }
            doc.insert_first(fresh);

            info!(version, "released Unreleased section");
        } else {
            let mut section = ReleaseSection::new(heading);
            merge(&mut section, &groups, newline);
            doc.insert_first(section);

            info!(version, "added release section");
        }

        doc
    }

    /// Rewrite `[Unreleased]: .../base...HEAD` to point at the new tag and
    /// add a fresh Unreleased link above it
    fn rewrite_unreleased_link(&self, doc: &mut ChangelogDocument, version: &str) -> bool {
        let newline = doc.newline();

        for section in doc.sections_mut().iter_mut() {
            for lines in section.lines_mut() {
                let found = lines.iter().enumerate().find_map(|(i, line)| {
                    let (label, url) = parse_link(line)?;
                    let base = url.strip_suffix("HEAD")?;
                    label
                        .eq_ignore_ascii_case("unreleased")
                        .then(|| (i, base.to_string(), url.to_string()))
                });

                let Some((i, base, old_url)) = found else {
                    continue;
                };

                let terminator = &lines[i][strip_terminator(&lines[i]).len()..];
                let released_url = format!("{}{}{}", base, self.options.tag_prefix, version);
                let released = format!(
                    "{}{}",
                    self.formatter.link(version, &released_url),
                    terminator
                );
                let unreleased_url = self.unreleased_url(Some(&old_url), version);
                let unreleased = format!(
                    "{}{}",
                    self.formatter.link("Unreleased", &unreleased_url),
                    newline
                );

                lines[i] = released;
                lines.insert(i, unreleased);
                debug!(url = %released_url, "rewrote Unreleased link");
                return true;
            }
        }

        false
    }

    /// Comparison link from the new tag to HEAD
    ///
    /// Uses the configured base URL, else the directory of an existing link.
    fn unreleased_url(&self, existing: Option<&str>, version: &str) -> String {
        let tail = format!("{}{}...HEAD", self.options.tag_prefix, version);

        match (&self.options.compare_url, existing) {
            (Some(base), _) => format!("{}/{}", base.trim_end_matches('/'), tail),
            (None, Some(url)) => match url.rfind('/') {
                Some(pos) => format!("{}{}", &url[..=pos], tail),
                None => tail,
            },
            (None, None) => tail,
        }
    }
}

fn group_named<'a>(groups: &'a mut Vec<CategoryGroup>, name: &str) -> &'a mut CategoryGroup {
    let index = match groups.iter().position(|g| g.name.eq_ignore_ascii_case(name)) {
        Some(index) => index,
        None => {
            groups.push(CategoryGroup::new(name));
            groups.len() - 1
        }
    };
    &mut groups[index]
}

/// Insert the entries of `groups` the section does not already contain
fn merge(section: &mut ReleaseSection, groups: &[CategoryGroup], newline: &str) {
    for group in groups {
        let missing: Vec<String> = group
            .entries
            .iter()
            .filter(|entry| !section.contains_line(entry))
            .cloned()
            .collect();
        section.insert_entries(&group.name, &missing, newline);
    }
}
