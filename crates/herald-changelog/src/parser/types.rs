//! Category configuration

use regex::{Regex, RegexBuilder};

use herald_core::config::{default_categories, CategoryRule, ChangelogConfig};
use herald_core::error::{ConfigError, Result};

/// Ordered commit type to changelog category mapping
///
/// Patterns match the whole type token, ignoring case. The first matching
/// rule wins.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    rules: Vec<(Regex, String)>,
}

impl CategoryConfig {
    /// Compile a list of rules
    pub fn from_rules(rules: &[CategoryRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                RegexBuilder::new(&format!("^(?:{})$", rule.pattern))
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (regex, rule.category.clone()))
                    .map_err(|e| ConfigError::InvalidValue {
                        field: format!("changelog.categories[{}].pattern", i),
                        message: e.to_string(),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Build from the changelog section of the configuration
    pub fn from_config(config: &ChangelogConfig) -> Result<Self> {
        Self::from_rules(&config.categories)
    }

    /// Category for a commit type token, `None` when no rule matches
    pub fn category_for(&self, commit_type: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(commit_type))
            .map(|(_, category)| category.as_str())
    }

    /// Category names in rule order, without duplicates
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, category) in &self.rules {
            if !names.contains(&category.as_str()) {
                names.push(category);
            }
        }
        names
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::from_rules(&default_categories()).expect("built-in category patterns are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let config = CategoryConfig::default();

        assert_eq!(config.category_for("feat"), Some("Added"));
        assert_eq!(config.category_for("FEATURE"), Some("Added"));
        assert_eq!(config.category_for("perf"), Some("Changed"));
        assert_eq!(config.category_for("bugfix"), Some("Fixed"));
        assert_eq!(config.category_for("sec"), Some("Security"));
        assert_eq!(config.category_for("docs"), None);
    }

    #[test]
    fn test_pattern_matches_whole_token() {
        let config = CategoryConfig::default();
        assert_eq!(config.category_for("prefix"), None);
        assert_eq!(config.category_for("feats"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let config = CategoryConfig::from_rules(&[
            CategoryRule::new("fix", "Hotfixes"),
            CategoryRule::new("fix|bugfix", "Fixed"),
        ])
        .unwrap();

        assert_eq!(config.category_for("fix"), Some("Hotfixes"));
        assert_eq!(config.category_for("bugfix"), Some("Fixed"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = CategoryConfig::from_rules(&[CategoryRule::new("feat(", "Added")]).unwrap_err();
        assert!(err.to_string().contains("changelog.categories[0].pattern"));
    }

    #[test]
    fn test_categories_in_rule_order() {
        let config = CategoryConfig::from_rules(&[
            CategoryRule::new("docs", "Documentation"),
            CategoryRule::new("feat", "Added"),
            CategoryRule::new("doc", "Documentation"),
        ])
        .unwrap();
        assert_eq!(config.categories(), vec!["Documentation", "Added"]);
    }
}
