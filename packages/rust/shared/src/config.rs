//! Application configuration for sitenav.
//!
//! User config lives at `~/.sitenav/sitenav.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitenavError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitenav.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitenav";

// ---------------------------------------------------------------------------
// Config structs (matching sitenav.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content graph connection.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Sidebar and breadcrumb behaviour.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Primary section navigation, in display order.
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            navigation: NavigationConfig::default(),
            sections: default_sections(),
        }
    }
}

/// `[graph]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// GraphQL endpoint of the content graph.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the single key (never store the key itself).
    #[serde(default = "default_single_key_env")]
    pub single_key_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            single_key_env: default_single_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://cg.optimizely.com/content/v2".into()
}
fn default_single_key_env() -> String {
    "OPTIMIZELY_GRAPH_SINGLE_KEY".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[navigation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// App-level locale the sidebar requests siblings in.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Collation used when a request carries no locale.
    #[serde(default = "default_collation_fallback")]
    pub collation_fallback: String,

    /// Levels to ascend from the current page to find its parent.
    #[serde(default = "default_sibling_depth")]
    pub sibling_depth: usize,

    /// Page-size ceiling for the sibling query.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Label of the breadcrumb root.
    #[serde(default = "default_home_label")]
    pub home_label: String,

    /// Sidebar title when no parent section is known.
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            collation_fallback: default_collation_fallback(),
            sibling_depth: default_sibling_depth(),
            page_limit: default_page_limit(),
            home_label: default_home_label(),
            fallback_title: default_fallback_title(),
        }
    }
}

fn default_locale() -> String {
    "en".into()
}
fn default_collation_fallback() -> String {
    "sv".into()
}
fn default_sibling_depth() -> usize {
    1
}
fn default_page_limit() -> u32 {
    100
}
fn default_home_label() -> String {
    "Hem".into()
}
fn default_fallback_title() -> String {
    "Innehåll".into()
}

/// `[[sections]]` entry — one item of the primary section navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Stable identifier (`home`, `knowledge`, ...).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Section root path.
    pub href: String,
}

impl SectionEntry {
    fn new(id: &str, label: &str, href: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
        }
    }
}

fn default_sections() -> Vec<SectionEntry> {
    vec![
        SectionEntry::new("home", "Hem", "/"),
        SectionEntry::new("knowledge", "Kunskap", "/kunskap"),
        SectionEntry::new("agreements", "Kollektivavtal", "/kollektivavtal"),
        SectionEntry::new("news", "Nyheter", "/nyheter"),
        SectionEntry::new("templates", "Mallar", "/mallar"),
        SectionEntry::new("guides", "Steg-för-steg", "/guider"),
        SectionEntry::new("courses", "Kurser", "/kurser"),
    ]
}

// ---------------------------------------------------------------------------
// Sibling config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime sibling-resolution settings — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct SiblingConfig {
    /// Page-size ceiling for the single sibling query.
    pub page_limit: u32,
    /// Collation used when the request has no locale.
    pub collation_fallback: String,
}

impl Default for SiblingConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            collation_fallback: default_collation_fallback(),
        }
    }
}

impl From<&AppConfig> for SiblingConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_limit: config.navigation.page_limit,
            collation_fallback: config.navigation.collation_fallback.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitenav/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SitenavError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitenav/sitenav.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SitenavError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SitenavError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SitenavError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SitenavError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SitenavError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the graph single key from the env var named in the config.
///
/// An unset or empty variable yields `None`: public content can be queried
/// without a key.
pub fn resolve_single_key(config: &AppConfig) -> Option<String> {
    match std::env::var(&config.graph.single_key_env) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("endpoint"));
        assert!(toml_str.contains("OPTIMIZELY_GRAPH_SINGLE_KEY"));
        assert!(toml_str.contains("Kollektivavtal"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.navigation.sibling_depth, 1);
        assert_eq!(parsed.navigation.collation_fallback, "sv");
        assert_eq!(parsed.sections.len(), 7);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[graph]
endpoint = "http://localhost:8080/graphql"

[navigation]
page_limit = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.graph.endpoint, "http://localhost:8080/graphql");
        assert_eq!(config.graph.timeout_secs, 10);
        assert_eq!(config.navigation.page_limit, 50);
        assert_eq!(config.navigation.home_label, "Hem");
        assert_eq!(config.sections[0].id, "home");
    }

    #[test]
    fn custom_sections_replace_defaults() {
        let toml_str = r#"
[[sections]]
id = "home"
label = "Home"
href = "/"

[[sections]]
id = "docs"
label = "Docs"
href = "/docs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.sections[1].href, "/docs");
    }

    #[test]
    fn sibling_config_from_app_config() {
        let app = AppConfig::default();
        let siblings = SiblingConfig::from(&app);
        assert_eq!(siblings.page_limit, 100);
        assert_eq!(siblings.collation_fallback, "sv");
    }

    #[test]
    fn single_key_absent() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.graph.single_key_env = "SITENAV_TEST_NONEXISTENT_KEY_12345".into();
        assert!(resolve_single_key(&config).is_none());
    }
}
