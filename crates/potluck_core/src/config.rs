//! Site configuration.

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::SiteError;

/// Configuration for one site.
///
/// Every key is optional in the file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, shown in the banner and feeds.
    #[serde(default = "default_title")]
    pub title: String,

    /// Site description.
    #[serde(default = "default_description")]
    pub description: String,

    /// Public URL the site is served from.
    #[serde(default = "default_url_root")]
    pub url_root: String,

    /// RSS channel category.
    #[serde(default = "default_category")]
    pub category: String,

    /// Directory holding the Markdown recipes.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory receiving the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Build cache file.
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Markdown introduction rendered under the recipe list of the index.
    #[serde(default = "default_index_markdown")]
    pub index_markdown: Option<PathBuf>,

    /// Recipes listed per index page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of recipes (cache and title index capacity).
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Maximum number of distinct tags.
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,

    /// Whether revision metadata is read from git history.
    #[serde(default = "default_git")]
    pub git: bool,

    /// Author recorded when no history names one.
    #[serde(default = "default_author")]
    pub default_author: String,

    /// Base directory for resolving relative paths.
    /// This is the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_title() -> String {
    "Based Cooking".to_string()
}

fn default_description() -> String {
    "Only Based cooking. No ads, no tracking, nothing but based cooking.".to_string()
}

fn default_url_root() -> String {
    "https://based.cooking/".to_string()
}

fn default_category() -> String {
    "Cooking".to_string()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./blog")
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("./.buildcache")
}

fn default_index_markdown() -> Option<PathBuf> {
    Some(PathBuf::from("./index.md"))
}

fn default_page_size() -> usize {
    50
}

fn default_max_items() -> usize {
    400
}

fn default_max_tags() -> usize {
    200
}

fn default_git() -> bool {
    true
}

fn default_author() -> String {
    "Anonymous".to_string()
}

impl SiteConfig {
    /// Configuration file names, in lookup order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".potluck.jsonc", ".potluck.json"];

    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            url_root: default_url_root(),
            category: default_category(),
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            cache_file: default_cache_file(),
            index_markdown: default_index_markdown(),
            page_size: default_page_size(),
            max_items: default_max_items(),
            max_tags: default_max_tags(),
            git: default_git(),
            default_author: default_author(),
            base_dir: None,
        }
    }

    /// Finds the first configuration file present in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Relative paths in the file resolve against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SiteError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SiteError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from JSON, comments and trailing commas allowed.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| SiteError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let config: Self = serde_json::from_value(value)
            .map_err(|e| SiteError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;

        Ok(config)
    }

    /// Checks limits that the type system does not.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.page_size == 0 {
            return Err(SiteError::config("page_size must be greater than zero"));
        }
        if self.max_items == 0 {
            return Err(SiteError::config("max_items must be greater than zero"));
        }
        if self.max_tags == 0 {
            return Err(SiteError::config("max_tags must be greater than zero"));
        }
        Ok(())
    }

    /// Resolves `path` against the configuration's base directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Resolved source directory.
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }

    /// Resolved output directory.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    /// Resolved cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.resolve(&self.cache_file)
    }

    /// Resolved index introduction, if configured.
    pub fn index_markdown_path(&self) -> Option<PathBuf> {
        self.index_markdown.as_deref().map(|path| self.resolve(path))
    }

    /// Renders the configuration as a commented JSONC document.
    pub fn to_jsonc(&self) -> Result<String, SiteError> {
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| SiteError::config(format!("Failed to serialize config: {}", e)))?;
        Ok(format!("// Potluck site configuration\n{}\n", body))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = SiteConfig::new();
        assert_eq!(config.source_dir, PathBuf::from("./src"));
        assert_eq!(config.output_dir, PathBuf::from("./blog"));
        assert_eq!(config.cache_file, PathBuf::from("./.buildcache"));
        assert_eq!(config.max_items, 400);
        assert_eq!(config.max_tags, 200);
        assert!(config.git);
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // smaller pages for the test site
            "title": "Test Kitchen",
            "page_size": 10,
            "git": false,
        }"#;

        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.title, "Test Kitchen");
        assert_eq!(config.page_size, 10);
        assert!(!config.git);
        assert_eq!(config.max_items, 400);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = SiteConfig::from_json("").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_index_markdown_can_be_disabled() {
        let config = SiteConfig::from_json(r#"{ "index_markdown": null }"#).unwrap();
        assert_eq!(config.index_markdown_path(), None);
    }

    #[rstest]
    #[case::unknown_key(r#"{ "sauce": "hot" }"#, "Invalid config")]
    #[case::type_mismatch(r#"{ "git": "yes" }"#, "Invalid config")]
    #[case::zero_page_size(r#"{ "page_size": 0 }"#, "page_size")]
    #[case::zero_tags(r#"{ "max_tags": 0 }"#, "max_tags")]
    #[case::broken_json(r#"{ "title": "#, "Invalid JSON")]
    fn test_config_errors(#[case] json: &str, #[case] expected: &str) {
        let err = SiteConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "Error message '{}' should contain '{}'",
            err,
            expected
        );
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".potluck.jsonc");
        fs::write(&path, r#"{ "source_dir": "recipes" }"#).unwrap();

        let config = SiteConfig::from_file(&path).unwrap();

        assert_eq!(config.source_path(), dir.path().join("recipes"));
        assert_eq!(config.output_path(), dir.path().join("./blog"));
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempdir().unwrap();
        assert_eq!(SiteConfig::discover(dir.path()), None);

        fs::write(dir.path().join(".potluck.json"), "{}").unwrap();
        fs::write(dir.path().join(".potluck.jsonc"), "{}").unwrap();

        assert_eq!(
            SiteConfig::discover(dir.path()),
            Some(dir.path().join(".potluck.jsonc"))
        );
    }

    #[test]
    fn test_to_jsonc_round_trips() {
        let config = SiteConfig::new();
        let text = config.to_jsonc().unwrap();

        assert!(text.starts_with("// "));
        assert_eq!(SiteConfig::from_json(&text).unwrap(), config);
    }
}
