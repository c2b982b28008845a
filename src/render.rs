//! Document rendering with Tera.
//!
//! The render step is a single contract: a template id plus an ordered mapping
//! of field name to string value goes in, document bytes come out. Nothing in
//! the pipeline knows what the templates look like.
//!
//! ## Built-in templates
//!
//! Both documents are a `---` front-matter block listing the fields in a fixed
//! order, a blank line, then the description as free-text body:
//!
//! ```text
//! ---
//! title: "Pale Ale"
//! url: /acme-brewing/pale-ale/
//! category: Ale
//! style: American Pale Ale
//! abv: 5.2
//! ibu: 0
//! srm: 0
//! upc: 0
//! ---
//!
//! A crisp, hoppy ale.
//! ```
//!
//! Every field is emitted even when empty. Templates supplied through
//! `[templates]` in `brewdocs.toml` may mark a field optional with
//! `{% if field %}…{% endif %}`.
//!
//! Autoescaping is off: documents are markdown, not HTML.

use crate::config::TemplatesConfig;
use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.md.tera");
const ELEMENT_TEMPLATE: &str = include_str!("../templates/element.md.tera");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{template} template: {}", error_chain(.source))]
    Template {
        template: &'static str,
        source: tera::Error,
    },
}

/// Tera reports the useful detail (line, missing variable) in nested sources.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// The two document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    /// Per-brewery container document (`_index`).
    Index,
    /// Per-beer element document.
    Element,
}

impl TemplateId {
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Index => "index",
            TemplateId::Element => "element",
        }
    }
}

/// Ordered field-name → value mapping handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(&'static str, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(n, _)| *n)
    }

    fn to_context(&self) -> Context {
        let mut context = Context::new();
        for (name, value) in &self.0 {
            context.insert(*name, value);
        }
        context
    }
}

/// Compiled templates for both document kinds.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Built-in templates, with any overrides from `templates` read relative
    /// to `source`.
    pub fn new(source: &Path, templates: &TemplatesConfig) -> Result<Self, RenderError> {
        let index = read_override(source, templates.index.as_deref())?;
        let element = read_override(source, templates.element.as_deref())?;
        Self::from_sources(
            index.as_deref().unwrap_or(INDEX_TEMPLATE),
            element.as_deref().unwrap_or(ELEMENT_TEMPLATE),
        )
    }

    /// Compile the given template sources. Syntax errors surface here.
    pub fn from_sources(index: &str, element: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for (id, body) in [(TemplateId::Index, index), (TemplateId::Element, element)] {
            tera.add_raw_template(id.name(), body)
                .map_err(|source| RenderError::Template {
                    template: id.name(),
                    source,
                })?;
        }
        Ok(Self { tera })
    }

    /// Render one document.
    pub fn render(&self, id: TemplateId, fields: &Fields) -> Result<Vec<u8>, RenderError> {
        self.tera
            .render(id.name(), &fields.to_context())
            .map(String::into_bytes)
            .map_err(|source| RenderError::Template {
                template: id.name(),
                source,
            })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_sources(INDEX_TEMPLATE, ELEMENT_TEMPLATE)
            .expect("built-in templates must compile")
    }
}

fn read_override(source: &Path, path: Option<&str>) -> Result<Option<String>, RenderError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let path = source.join(path);
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| RenderError::Io { path, source })
}
