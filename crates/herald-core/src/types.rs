//! Core types for Herald

use serde::{Deserialize, Serialize};

/// Fixed vocabulary of commit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    /// New feature
    Feat,
    /// Bug fix
    Fix,
    /// Documentation
    Docs,
    /// Maintenance
    Chore,
    /// Commit typed `breaking:`
    Breaking,
    /// Anything else, including unparsable messages
    Other,
}

impl CommitKind {
    /// Map a conventional commit type token onto the fixed vocabulary
    pub fn from_type(commit_type: &str) -> Self {
        match commit_type.to_lowercase().as_str() {
            "feat" | "feature" => Self::Feat,
            "fix" | "bugfix" => Self::Fix,
            "docs" | "doc" => Self::Docs,
            "chore" => Self::Chore,
            "breaking" => Self::Breaking,
            _ => Self::Other,
        }
    }

    /// Returns the string representation of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Chore => "chore",
            Self::Breaking => "breaking",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for CommitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified commit message
///
/// Built once by the commit classifier and read by the version resolver and
/// the changelog editor. There are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    raw: String,
    kind: CommitKind,
    commit_type: String,
    scope: Option<String>,
    description: String,
    breaking: bool,
    category: Option<String>,
}

impl CommitEntry {
    /// Create an entry for a message that follows the conventional commit grammar
    pub fn conventional(
        raw: impl Into<String>,
        commit_type: impl Into<String>,
        scope: Option<String>,
        description: impl Into<String>,
        breaking: bool,
        category: Option<String>,
    ) -> Self {
        let commit_type = commit_type.into();
        Self {
            raw: raw.into(),
            kind: CommitKind::from_type(&commit_type),
            commit_type,
            scope: scope.filter(|s| !s.is_empty()),
            description: description.into(),
            breaking,
            category,
        }
    }

    /// Create the fallback entry for a message that could not be classified
    pub fn other(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            description: raw.clone(),
            raw,
            kind: CommitKind::Other,
            commit_type: String::new(),
            scope: None,
            breaking: false,
            category: None,
        }
    }

    /// The full original message
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Kind from the fixed vocabulary
    pub fn kind(&self) -> CommitKind {
        self.kind
    }

    /// Literal type token, empty for unclassified messages
    pub fn commit_type(&self) -> &str {
        &self.commit_type
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this commit introduces a breaking change
    pub fn is_breaking(&self) -> bool {
        self.breaking
    }

    /// Whether this commit adds a feature
    pub fn is_feature(&self) -> bool {
        self.kind == CommitKind::Feat
    }

    /// Display category, `None` for the fallback "other" category
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Versioning scheme of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningScheme {
    /// major.minor.patch
    #[default]
    #[serde(alias = "semver")]
    Semantic,
    /// year.month.patch
    #[serde(alias = "calver")]
    Calendar,
}

impl VersioningScheme {
    /// Returns the string representation of the scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Calendar => "calendar",
        }
    }
}

impl std::fmt::Display for VersioningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VersioningScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" | "semver" => Ok(Self::Semantic),
            "calendar" | "calver" => Ok(Self::Calendar),
            _ => Err(format!("Unknown versioning scheme: {}", s)),
        }
    }
}

/// Type of release requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
    /// Calendar based release
    Calendar,
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    #[serde(rename = "rc")]
    ReleaseCandidate,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Calendar => "calendar",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::ReleaseCandidate => "rc",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "calendar" | "cal" => Ok(Self::Calendar),
            "alpha" => Ok(Self::Alpha),
            "beta" => Ok(Self::Beta),
            "rc" | "release-candidate" => Ok(Self::ReleaseCandidate),
            _ => Err(format!("Unknown release type: {}", s)),
        }
    }
}
