//! Run configuration.
//!
//! Handles loading, validating, and merging `brewdocs.toml`. The file is
//! optional and lives in the source directory next to the CSV tables; any key
//! it sets overrides the stock default, everything else keeps its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Every key is optional; the values below are the defaults.
//!
//! [input]
//! beers = "beers.csv"
//! breweries = "breweries.csv"
//! geocodes = "breweries_geocode.csv"
//! categories = "categories.csv"
//! styles = "styles.csv"
//! breweries_encoding = "windows-1252"   # Legacy export encoding
//! encoding = "utf-8"                    # All other tables
//!
//! [output]
//! section = "breweries"     # Top-level directory of the generated tree
//! extension = "md"          # Document file extension
//!
//! [slug]
//! lang = "en"               # Symbol substitutions: "en" or "de"
//!
//! [templates]
//! index = "templates/index.md.tera"      # Override the brewery template
//! element = "templates/element.md.tera"  # Override the beer template
//! ```
//!
//! Unknown keys fail the load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the source directory.
pub const CONFIG_FILE: &str = "brewdocs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read brewdocs.toml: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid brewdocs.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Languages with a symbol substitution table in [`crate::naming`].
pub const SLUG_LANGS: &[&str] = &["en", "de"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub slug: SlugConfig,
    pub templates: TemplatesConfig,
}

impl Config {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let files = [
            ("input.beers", &self.input.beers),
            ("input.breweries", &self.input.breweries),
            ("input.geocodes", &self.input.geocodes),
            ("input.categories", &self.input.categories),
            ("input.styles", &self.input.styles),
            ("output.section", &self.output.section),
        ];
        for (key, value) in files {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        let ext = &self.output.extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ConfigError::Validation(
                "output.extension must be a bare extension like \"md\"".into(),
            ));
        }
        for (key, label) in [
            ("input.encoding", &self.input.encoding),
            ("input.breweries_encoding", &self.input.breweries_encoding),
        ] {
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{key}: unknown encoding label \"{label}\""
                )));
            }
        }
        if !SLUG_LANGS.contains(&self.slug.lang.as_str()) {
            return Err(ConfigError::Validation(format!(
                "slug.lang must be one of {SLUG_LANGS:?}"
            )));
        }
        Ok(())
    }
}

/// Source table file names (relative to the source directory) and encodings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub beers: String,
    pub breweries: String,
    pub geocodes: String,
    pub categories: String,
    pub styles: String,
    /// Encoding label of the brewery table (any WHATWG label).
    pub breweries_encoding: String,
    /// Encoding label of every other table.
    pub encoding: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            beers: "beers.csv".into(),
            breweries: "breweries.csv".into(),
            geocodes: "breweries_geocode.csv".into(),
            categories: "categories.csv".into(),
            styles: "styles.csv".into(),
            breweries_encoding: "windows-1252".into(),
            encoding: "utf-8".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Top-level directory of the generated tree, below the output directory.
    pub section: String,
    /// Extension of every generated document, without the dot.
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            section: "breweries".into(),
            extension: "md".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlugConfig {
    pub lang: String,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self { lang: "en".into() }
    }
}

/// Optional template overrides, relative to the source directory.
/// `None` uses the built-in template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

// -----------------------------------------------------------------------------
// Loading
// -----------------------------------------------------------------------------

/// Stock defaults as a TOML table, the base every file is layered onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Layer `overlay` onto `base`. Tables merge per key, recursively; any other
/// overlay value replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                let value = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, value);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse `brewdocs.toml` in `dir` without applying defaults. `None` when the
/// directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Apply `overlay` (if any) to `base` and produce a validated [`Config`].
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let value = match overlay {
        Some(layer) => merge_toml(base, layer),
        None => base,
    };
    let config: Config = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Config for a run over `source`: stock defaults plus its `brewdocs.toml`.
pub fn load_config(source: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(source)?)
}

/// Annotated default `brewdocs.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# brewdocs configuration
# ======================
# Every setting is optional; delete the ones you keep at their default.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Place this file as brewdocs.toml next to the CSV tables.

# ---------------------------------------------------------------------------
# Input tables (paths relative to the source directory)
# ---------------------------------------------------------------------------
[input]
beers = "beers.csv"
breweries = "breweries.csv"
geocodes = "breweries_geocode.csv"
categories = "categories.csv"
styles = "styles.csv"

# The brewery export uses a legacy Western-European encoding.
# Any WHATWG label works ("latin1" and "iso-8859-1" map to windows-1252).
breweries_encoding = "windows-1252"

# Encoding of every other table.
encoding = "utf-8"

# ---------------------------------------------------------------------------
# Output tree
# ---------------------------------------------------------------------------
[output]
# Top-level directory created below --output.
section = "breweries"

# Extension of every generated document.
extension = "md"

# ---------------------------------------------------------------------------
# Slugs
# ---------------------------------------------------------------------------
[slug]
# Symbol substitutions applied before slugifying: "en" (& -> and)
# or "de" (& -> und, umlauts -> ae/oe/ue).
lang = "en"

# ---------------------------------------------------------------------------
# Templates (Tera syntax, paths relative to the source directory)
# ---------------------------------------------------------------------------
[templates]
# index = "templates/index.md.tera"
# element = "templates/element.md.tera"
"##
}
