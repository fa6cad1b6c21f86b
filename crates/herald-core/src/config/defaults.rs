//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "herald.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "herald.yaml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".herald.toml";

/// Header of a freshly created changelog
pub const DEFAULT_CHANGELOG_HEADER: &str = "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ALT_CONFIG_FILE,
        ".herald.yaml",
    ]
}

/// Generate default configuration TOML
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Herald Configuration

[versioning]
# semantic (1.2.3) or calendar (22.5.0)
scheme = "semantic"
calendar_format = "short-year"
tag_prefix = "v"

[git]
branch = "main"
require_clean = true

[changelog]
file = "CHANGELOG.md"
release_notes_file = ".release.md"
format = "markdown"
# compare_url = "https://github.com/my-org/my-project/compare"
# catch_all = "Other"
mark_breaking = true

[[changelog.categories]]
pattern = "feat|feature|add"
category = "Added"

[[changelog.categories]]
pattern = "change|refactor|perf"
category = "Changed"

[[changelog.categories]]
pattern = "deprecate"
category = "Deprecated"

[[changelog.categories]]
pattern = "remove"
category = "Removed"

[[changelog.categories]]
pattern = "fix|bugfix"
category = "Fixed"

[[changelog.categories]]
pattern = "security|sec"
category = "Security"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::default_categories;

    #[test]
    fn test_template_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.changelog.categories, default_categories());
        assert_eq!(config.versioning.tag_prefix, "v");
        assert!(config.changelog.compare_url.is_none());
    }

    #[test]
    fn test_default_config_toml_round_trips() {
        let content = default_config_toml();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.changelog.file, Config::default().changelog.file);
    }
}
