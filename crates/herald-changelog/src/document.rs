//! Changelog document model
//!
//! A document is a free-form preamble followed by release sections. Every
//! line is stored together with its terminator, so a document that was not
//! edited serializes back byte for byte.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use herald_core::ChangelogFormatError;

use crate::types::category_rank;

/// Release heading: `## [1.2.3] - 2022-05-17`, `## [Unreleased]`, `## [1.2.4] (Unreleased)`,
/// `## [0.0.5] - 2014-12-13 [YANKED]`
static RELEASE_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^##[ \t]+\[?(?P<label>[^\]\s]+)\]?(?:[ \t]+\((?P<status>[Uu]nreleased)\))?(?:[ \t]+-[ \t]+(?P<date>[^\s\[]+))?(?:[ \t]+\[YANKED\])?[ \t]*$",
    )
    .expect("Invalid regex")
});

/// Link reference definition: `[1.2.3]: https://...`, optionally followed by a title
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\[(?P<label>[^\]]+)\]:[ \t]*(?P<url>\S+)(?:[ \t]+(?:"[^"]*"|'[^']*'|\([^)]*\)))?[ \t]*$"#,
    )
    .expect("Invalid regex")
});

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex"));

/// Heading of a release section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    line: String,
    label: String,
    date: Option<NaiveDate>,
    unreleased: bool,
}

impl SectionHeading {
    /// Parse a level 2 heading line (terminator included)
    pub fn parse(line: &str, line_number: usize) -> Result<Self, ChangelogFormatError> {
        let content = strip_terminator(line);
        let caps = RELEASE_HEADING_REGEX.captures(content).ok_or_else(|| {
            ChangelogFormatError::MalformedHeading {
                line: line_number,
                text: content.to_string(),
            }
        })?;

        let label = caps["label"].to_string();
        let unreleased = caps.name("status").is_some() || label.eq_ignore_ascii_case("unreleased");

        let date = caps
            .name("date")
            .map(|m| {
                let date = m.as_str();
                DATE_REGEX
                    .is_match(date)
                    .then(|| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                    .flatten()
                    .ok_or_else(|| ChangelogFormatError::InvalidDate {
                        line: line_number,
                        date: date.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            line: line.to_string(),
            label,
            date,
            unreleased,
        })
    }

    pub(crate) fn new(
        line: String,
        label: impl Into<String>,
        date: Option<NaiveDate>,
        unreleased: bool,
    ) -> Self {
        Self {
            line,
            label: label.into(),
            date,
            unreleased,
        }
    }

    /// The heading line as written
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Version label, or `Unreleased`
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Whether this heading opens the Unreleased section
    pub fn is_unreleased(&self) -> bool {
        self.unreleased
    }
}

/// A `### Category` block and the lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    heading: String,
    name: String,
    lines: Vec<String>,
}

impl CategoryBlock {
    fn new(heading: String) -> Self {
        let name = strip_terminator(&heading)
            .trim_start_matches('#')
            .trim()
            .to_string();
        Self {
            heading,
            name,
            lines: Vec::new(),
        }
    }

    /// Category name, e.g. "Added"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry lines without terminators, blank lines skipped
    pub fn entries(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| !is_blank(l))
            .map(|l| strip_terminator(l))
            .collect()
    }
}

/// One release section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSection {
    heading: SectionHeading,
    lead: Vec<String>,
    categories: Vec<CategoryBlock>,
    trailer: Vec<String>,
}

impl ReleaseSection {
    /// Create an empty section
    pub fn new(heading: SectionHeading) -> Self {
        Self {
            heading,
            lead: Vec::new(),
            categories: Vec::new(),
            trailer: Vec::new(),
        }
    }

    pub fn heading(&self) -> &SectionHeading {
        &self.heading
    }

    pub fn label(&self) -> &str {
        self.heading.label()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.heading.date()
    }

    pub fn is_unreleased(&self) -> bool {
        self.heading.is_unreleased()
    }

    /// Category blocks in document order
    pub fn categories(&self) -> &[CategoryBlock] {
        &self.categories
    }

    /// Find a category block by name, ignoring case
    pub fn category(&self, name: &str) -> Option<&CategoryBlock> {
        self.categories
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Ordered mapping of category name to entry lines
    pub fn entries(&self) -> Vec<(&str, Vec<&str>)> {
        self.categories
            .iter()
            .map(|b| (b.name(), b.entries()))
            .collect()
    }

    /// Whether any line of the section body reads `text`
    pub fn contains_line(&self, text: &str) -> bool {
        let text = text.trim();
        self.lead
            .iter()
            .chain(self.categories.iter().flat_map(|b| b.lines.iter()))
            .any(|l| l.trim() == text)
    }

    /// Release notes: the section without its link references
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = std::iter::once(self.heading.line.as_str())
            .chain(self.lead.iter().map(String::as_str))
            .chain(self.categories.iter().flat_map(|b| {
                std::iter::once(b.heading.as_str()).chain(b.lines.iter().map(String::as_str))
            }))
            .collect();

        while lines.last().is_some_and(|l| is_blank(l)) {
            lines.pop();
        }

        let mut notes: String = lines.concat();
        if !notes.ends_with('\n') {
            notes.push('\n');
        }
        notes
    }

    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.heading.line)?;
        for line in &self.lead {
            f.write_str(line)?;
        }
        for block in &self.categories {
            f.write_str(&block.heading)?;
            for line in &block.lines {
                f.write_str(line)?;
            }
        }
        for line in &self.trailer {
            f.write_str(line)?;
        }
        Ok(())
    }

    /// Move the trailing link references of the last block into the trailer
    fn finish(mut self) -> Self {
        let container = match self.categories.last_mut() {
            Some(block) => &mut block.lines,
            None => &mut self.lead,
        };

        let run_start = container
            .iter()
            .rposition(|l| !is_blank(l) && !is_link(l))
            .map_or(0, |i| i + 1);

        if let Some(first_link) = container[run_start..].iter().position(|l| is_link(l)) {
            self.trailer = container.split_off(run_start + first_link);
        }

        self
    }

    pub(crate) fn set_heading(&mut self, heading: SectionHeading) {
        self.heading = heading;
    }

    /// Line containers in document order
    pub(crate) fn lines_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        std::iter::once(&mut self.lead)
            .chain(self.categories.iter_mut().map(|b| &mut b.lines))
            .chain(std::iter::once(&mut self.trailer))
    }

    pub(crate) fn push_lead(&mut self, line: String) {
        self.lead.push(line);
    }

    pub(crate) fn push_trailer(&mut self, line: String) {
        self.trailer.push(line);
    }

    /// Append entry lines to a category, creating the block when missing
    ///
    /// New blocks go before the first block that follows them in the
    /// canonical category order; other categories keep their position.
    pub(crate) fn insert_entries(&mut self, name: &str, entries: &[String], newline: &str) {
        if entries.is_empty() {
            return;
        }
        ensure_terminated(&mut self.heading.line, newline);
        let new_lines = entries.iter().map(|e| format!("{}{}", e, newline));

        if let Some(block) = self
            .categories
            .iter_mut()
            .find(|b| b.name.eq_ignore_ascii_case(name))
        {
            let at = block
                .lines
                .iter()
                .rposition(|l| !is_blank(l))
                .map_or(0, |i| i + 1);
            match at.checked_sub(1) {
                Some(prev) => ensure_terminated(&mut block.lines[prev], newline),
                None => ensure_terminated(&mut block.heading, newline),
            }
            block.lines.splice(at..at, new_lines);
            return;
        }

        let index = category_rank(name)
            .and_then(|rank| {
                self.categories
                    .iter()
                    .position(|b| category_rank(&b.name).is_some_and(|r| r > rank))
            })
            .unwrap_or(self.categories.len());

        if index == 0 {
            separate(&mut self.lead, None, newline);
        } else {
            let prev = &mut self.categories[index - 1];
            separate(&mut prev.lines, Some(&mut prev.heading), newline);
        }

        let mut block = CategoryBlock::new(format!("### {}{}", name, newline));
        block.lines.extend(new_lines);
        block.lines.push(newline.to_string());
        self.categories.insert(index, block);
    }

    /// Make sure the section ends with a blank line
    pub(crate) fn ensure_trailing_blank(&mut self, newline: &str) {
        ensure_terminated(&mut self.heading.line, newline);
        let container = if !self.trailer.is_empty() {
            &mut self.trailer
        } else if let Some(block) = self.categories.last_mut() {
            &mut block.lines
        } else {
            &mut self.lead
        };

        match container.last_mut() {
            Some(last) if is_blank(last) => {}
            Some(last) => {
                ensure_terminated(last, newline);
                container.push(newline.to_string());
            }
            None => container.push(newline.to_string()),
        }
    }
}

/// Parsed changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    preamble: Vec<String>,
    sections: Vec<ReleaseSection>,
    newline: &'static str,
}

impl ChangelogDocument {
    /// Parse changelog text
    ///
    /// Fails on headings out of place, malformed release headings, dates or
    /// link references, and on an Unreleased section that is duplicated or
    /// not the first section.
    pub fn parse(text: &str) -> Result<Self, ChangelogFormatError> {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };

        let mut preamble = Vec::new();
        let mut sections: Vec<ReleaseSection> = Vec::new();
        let mut current: Option<ReleaseSection> = None;
        let mut in_fence = false;

        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let line_number = idx + 1;
            let content = strip_terminator(line);

            if is_fence(content) {
                in_fence = !in_fence;
            } else if !in_fence {
                if let Some(level) = heading_level(content) {
                    match level {
                        1 if current.is_none() => {}
                        2 => {
                            if let Some(section) = current.take() {
                                sections.push(section.finish());
                            }
                            let heading = SectionHeading::parse(line, line_number)?;
                            if heading.is_unreleased() {
                                if sections.iter().any(ReleaseSection::is_unreleased) {
                                    return Err(ChangelogFormatError::DuplicateUnreleased {
                                        line: line_number,
                                    });
                                }
                                if !sections.is_empty() {
                                    return Err(ChangelogFormatError::UnreleasedNotFirst {
                                        line: line_number,
                                    });
                                }
                            }
                            current = Some(ReleaseSection::new(heading));
                            continue;
                        }
                        3 if current.is_some() => {
                            if let Some(section) = current.as_mut() {
                                section.categories.push(CategoryBlock::new(line.to_string()));
                            }
                            continue;
                        }
                        level => {
                            return Err(ChangelogFormatError::UnexpectedHeading {
                                line: line_number,
                                level,
                                text: content.to_string(),
                            });
                        }
                    }
                }

                if content.starts_with('[') && content.contains("]:") && !LINK_REGEX.is_match(content)
                {
                    return Err(ChangelogFormatError::MalformedLink {
                        line: line_number,
                        text: content.to_string(),
                    });
                }
            }

            let container = match current.as_mut() {
                Some(section) => match section.categories.last_mut() {
                    Some(block) => &mut block.lines,
                    None => &mut section.lead,
                },
                None => &mut preamble,
            };
            container.push(line.to_string());
        }

        if let Some(section) = current {
            sections.push(section.finish());
        }

        debug!(sections = sections.len(), "parsed changelog");
        Ok(Self {
            preamble,
            sections,
            newline,
        })
    }

    /// Lines before the first release section
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    /// Release sections in document order
    pub fn sections(&self) -> &[ReleaseSection] {
        &self.sections
    }

    /// The Unreleased section, if any
    pub fn unreleased(&self) -> Option<&ReleaseSection> {
        self.sections.first().filter(|s| s.is_unreleased())
    }

    /// Find the released section for a version label
    ///
    /// A leading `v` on either side is ignored.
    pub fn section(&self, label: &str) -> Option<&ReleaseSection> {
        self.position(label).map(|i| &self.sections[i])
    }

    /// Line terminator used by the document
    pub fn newline(&self) -> &'static str {
        self.newline
    }

    pub(crate) fn position(&self, label: &str) -> Option<usize> {
        let wanted = label.trim_start_matches('v');
        self.sections
            .iter()
            .position(|s| !s.is_unreleased() && s.label().trim_start_matches('v') == wanted)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut Vec<ReleaseSection> {
        &mut self.sections
    }

    /// Insert a section directly after the preamble
    pub(crate) fn insert_first(&mut self, mut section: ReleaseSection) {
        let newline = self.newline;
        if let Some(last) = self.preamble.last_mut() {
            if !is_blank(last) {
                ensure_terminated(last, newline);
                self.preamble.push(newline.to_string());
            }
        }
        if !self.sections.is_empty() {
            section.ensure_trailing_blank(newline);
        }
        self.sections.insert(0, section);
    }
}

impl fmt::Display for ChangelogDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.preamble {
            f.write_str(line)?;
        }
        for section in &self.sections {
            section.write_to(f)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ChangelogDocument {
    type Err = ChangelogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a link reference definition into `(label, url)`
pub(crate) fn parse_link(line: &str) -> Option<(&str, &str)> {
    let caps = LINK_REGEX.captures(strip_terminator(line))?;
    Some((caps.name("label")?.as_str(), caps.name("url")?.as_str()))
}

pub(crate) fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

pub(crate) fn ensure_terminated(line: &mut String, newline: &str) {
    if !line.ends_with('\n') {
        line.push_str(newline);
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_link(line: &str) -> bool {
    LINK_REGEX.is_match(strip_terminator(line))
}

fn is_fence(content: &str) -> bool {
    let trimmed = content.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// ATX heading level of a line, `None` when it is not a heading
fn heading_level(content: &str) -> Option<usize> {
    let level = content.bytes().take_while(|b| *b == b'#').count();
    if level == 0 {
        return None;
    }
    match content[level..].chars().next() {
        None | Some(' ') | Some('\t') => Some(level),
        _ => None,
    }
}

/// Blank line between `lines` and a block inserted after them
fn separate(lines: &mut Vec<String>, heading: Option<&mut String>, newline: &str) {
    match lines.last_mut() {
        Some(last) if is_blank(last) => {}
        Some(last) => {
            ensure_terminated(last, newline);
            lines.push(newline.to_string());
        }
        None => {
            if let Some(heading) = heading {
                ensure_terminated(heading, newline);
            }
            lines.push(newline.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "# Changelog\n\
\n\
All notable changes to this project will be documented in this file.\n\
\n\
## [Unreleased]\n\
### Added\n\
- new thing\n\
\n\
## [1.0.0] - 2022-01-10\n\
Initial release.\n\
\n\
### Added\n\
- first thing (cli)\n\
\n\
### Dependencies\n\
- bump serde\n\
\n\
[Unreleased]: https://example.com/compare/v1.0.0...HEAD\n\
[1.0.0]: https://example.com/releases/v1.0.0\n";

    #[test]
    fn test_round_trip_is_byte_identical() {
        let doc = ChangelogDocument::parse(CHANGELOG).unwrap();
        assert_eq!(doc.to_string(), CHANGELOG);
    }

    #[test]
    fn test_round_trip_keeps_crlf_and_missing_final_newline() {
        let text = "# Changelog\r\n\r\n## [1.0.0] - 2022-01-10\r\n### Fixed\r\n- x";
        let doc = ChangelogDocument::parse(text).unwrap();
        assert_eq!(doc.newline(), "\r\n");
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_round_trip_empty() {
        let doc = ChangelogDocument::parse("").unwrap();
        assert!(doc.sections().is_empty());
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn test_structure() {
        let doc = ChangelogDocument::parse(CHANGELOG).unwrap();

        assert_eq!(doc.preamble().len(), 4);
        assert_eq!(doc.sections().len(), 2);
        assert!(doc.unreleased().is_some());

        let release = doc.section("v1.0.0").unwrap();
        assert_eq!(release.date(), NaiveDate::from_ymd_opt(2022, 1, 10));
        assert_eq!(
            release.entries(),
            vec![
                ("Added", vec!["- first thing (cli)"]),
                ("Dependencies", vec!["- bump serde"]),
            ]
        );
        assert!(release.contains_line("- bump serde"));
        assert!(!release.contains_line("- new thing"));
    }

    #[test]
    fn test_render_excludes_links() {
        let doc = ChangelogDocument::parse(CHANGELOG).unwrap();
        let notes = doc.section("1.0.0").unwrap().render();

        assert!(notes.starts_with("## [1.0.0] - 2022-01-10\n"));
        assert!(notes.ends_with("- bump serde\n"));
        assert!(!notes.contains("[Unreleased]:"));
    }

    #[test]
    fn test_unreleased_with_version_label() {
        let doc = ChangelogDocument::parse("## [1.2.4] (Unreleased)\n- x\n").unwrap();
        let section = &doc.sections()[0];
        assert!(section.is_unreleased());
        assert_eq!(section.label(), "1.2.4");
        assert!(doc.section("1.2.4").is_none());
    }

    #[test]
    fn test_yanked_release() {
        let text = "# Changelog\n\n## [1.0.0] - 2015-01-02\n- y\n\n## [0.0.5] - 2014-12-13 [YANKED]\n- x\n";
        let doc = ChangelogDocument::parse(text).unwrap();

        let yanked = doc.section("0.0.5").unwrap();
        assert_eq!(yanked.date(), NaiveDate::from_ymd_opt(2014, 12, 13));
        assert_eq!(yanked.heading().line(), "## [0.0.5] - 2014-12-13 [YANKED]\n");
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_link_with_title() {
        let text = "## [1.0.0]\n- x\n\n[1.0.0]: https://x/v1.0.0 \"Release 1.0.0\"\n";
        let doc = ChangelogDocument::parse(text).unwrap();
        assert_eq!(doc.to_string(), text);
        assert_eq!(
            parse_link("[1.0.0]: https://x/v1.0.0 'Release'\n"),
            Some(("1.0.0", "https://x/v1.0.0"))
        );
        assert_eq!(
            parse_link("[1.0.0]: https://x/v1.0.0 (Release)"),
            Some(("1.0.0", "https://x/v1.0.0"))
        );
    }

    #[test]
    fn test_headings_inside_code_fence_are_ignored() {
        let text = "## [1.0.0]\n```sh\n# not a heading\n[x]: y z\n```\n";
        let doc = ChangelogDocument::parse(text).unwrap();
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_duplicate_unreleased() {
        let err = ChangelogDocument::parse("## [Unreleased]\n\n## Unreleased\n").unwrap_err();
        assert_eq!(err, ChangelogFormatError::DuplicateUnreleased { line: 3 });
    }

    #[test]
    fn test_unreleased_not_first() {
        let err =
            ChangelogDocument::parse("## [1.0.0] - 2022-01-10\n\n## [Unreleased]\n").unwrap_err();
        assert_eq!(err, ChangelogFormatError::UnreleasedNotFirst { line: 3 });
    }

    #[test]
    fn test_unexpected_headings() {
        let err = ChangelogDocument::parse("# Changelog\n### Added\n").unwrap_err();
        assert!(matches!(
            err,
            ChangelogFormatError::UnexpectedHeading { line: 2, level: 3, .. }
        ));

        let err = ChangelogDocument::parse("## [1.0.0]\n# Title\n").unwrap_err();
        assert!(matches!(
            err,
            ChangelogFormatError::UnexpectedHeading { line: 2, level: 1, .. }
        ));

        let err = ChangelogDocument::parse("## [1.0.0]\n### Added\n#### Detail\n").unwrap_err();
        assert!(matches!(
            err,
            ChangelogFormatError::UnexpectedHeading { line: 3, level: 4, .. }
        ));
    }

    #[test]
    fn test_hashtag_is_not_a_heading() {
        let doc = ChangelogDocument::parse("## [1.0.0]\n#123 fixed\n").unwrap();
        assert_eq!(doc.sections().len(), 1);
    }

    #[test]
    fn test_malformed_heading() {
        let err = ChangelogDocument::parse("# Changelog\n\n## Release notes for June\n").unwrap_err();
        assert_eq!(
            err,
            ChangelogFormatError::MalformedHeading {
                line: 3,
                text: "## Release notes for June".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_date() {
        for date in ["2022-13-01", "10.01.2022", "2022-1-1"] {
            let text = format!("## [1.0.0] - {}\n", date);
            let err = ChangelogDocument::parse(&text).unwrap_err();
            assert!(matches!(err, ChangelogFormatError::InvalidDate { line: 1, .. }));
        }
    }

    #[test]
    fn test_malformed_link() {
        let err = ChangelogDocument::parse("## [1.0.0]\n\n[1.0.0]: \n").unwrap_err();
        assert!(matches!(err, ChangelogFormatError::MalformedLink { line: 3, .. }));
    }

    #[test]
    fn test_insert_entries_orders_categories() {
        let mut doc = ChangelogDocument::parse(
            "## [Unreleased]\n### Fixed\n- a\n\n### Dependencies\n- b\n",
        )
        .unwrap();
        let section = &mut doc.sections_mut()[0];

        section.insert_entries("Added", &["- c".to_string()], "\n");
        section.insert_entries("Fixed", &["- d".to_string()], "\n");
        section.insert_entries("Security", &["- e".to_string()], "\n");

        assert_eq!(
            doc.to_string(),
            "## [Unreleased]\n\n### Added\n- c\n\n### Fixed\n- a\n- d\n\n### Dependencies\n- b\n\n### Security\n- e\n\n"
        );
    }

    #[test]
    fn test_parse_link() {
        assert_eq!(
            parse_link("[Unreleased]: https://x/compare/v1...HEAD\n"),
            Some(("Unreleased", "https://x/compare/v1...HEAD"))
        );
        assert_eq!(parse_link("- [x]: y"), None);
    }
}
