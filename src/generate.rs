//! Document tree generation.
//!
//! Final stage of the pipeline. Joins every beer against the reference tables and
//! materializes the result as a directory per brewery:
//!
//! ```text
//! breweries/
//! ├── acme-brewing/
//! │   ├── _index.md        # Brewery document (written once)
//! │   ├── pale-ale.md      # One document per beer
//! │   ├── ipa.md
//! │   └── ipa-2.md         # Second beer whose name slugifies to "ipa"
//! └── zenith-ales/
//!     ├── _index.md
//!     └── stout.md
//! ```
//!
//! ## Write policies
//!
//! - **Brewery directory**: created with parents if absent; no-op otherwise.
//! - **Index document**: written only if absent. Later beers of the same brewery,
//!   and later runs, leave it alone.
//! - **Element document**: never overwritten. If the slug is taken the next
//!   [`Candidates`] name is tried until one is free.
//!
//! Every document is opened create-exclusive, so "already exists" comes from
//! the open itself and there is no gap between checking and creating.
//!
//! ## Failures
//!
//! A document that cannot be created or written is logged, recorded in the
//! [`Report`] and skipped; the run moves on to the next beer. A document whose
//! write fails part way is removed again, so a truncated `_index` is never
//! mistaken for a finished one. A template that fails to render aborts the run
//! with [`GenerateError::Render`]. Documents already completed stay on disk.

use crate::join::{Join, join};
use crate::naming::{Candidates, slug_or_id, strip_quotes};
use crate::render::{Fields, RenderError, Renderer, TemplateId};
use crate::types::{Beer, Brewery, Category, Dataset, Geocode, Style};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File stem of the per-brewery document.
pub const INDEX_STEM: &str = "_index";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("cannot clear {path}: {source}")]
    Clean { path: PathBuf, source: io::Error },
}

/// What happened to one output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocStatus {
    Written(PathBuf),
    /// Index document already present; left untouched.
    Exists(PathBuf),
    Failed { path: PathBuf, reason: String },
}

/// Result of materializing one matched beer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub brewery_slug: String,
    /// Final beer slug, including any `-N` disambiguator.
    pub beer_slug: String,
    /// Whether the beer slug needed a `-N` suffix.
    pub disambiguated: bool,
    pub created_dir: bool,
    pub index: DocStatus,
    pub element: DocStatus,
}

/// A document the run had to give up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub beers: usize,
    pub unmatched: usize,
    pub directories_created: usize,
    pub indexes_written: usize,
    pub indexes_existing: usize,
    pub elements_written: usize,
    /// Element documents that needed a `-N` suffix.
    pub disambiguated: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    fn record(&mut self, outcome: &Outcome) {
        if outcome.created_dir {
            self.directories_created += 1;
        }
        match &outcome.index {
            DocStatus::Written(_) => self.indexes_written += 1,
            DocStatus::Exists(_) => self.indexes_existing += 1,
            DocStatus::Failed { path, reason } => self.failures.push(Failure {
                path: path.clone(),
                reason: reason.clone(),
            }),
        }
        match &outcome.element {
            DocStatus::Written(_) => {
                self.elements_written += 1;
                if outcome.disambiguated {
                    self.disambiguated += 1;
                }
            }
            DocStatus::Exists(_) => {}
            DocStatus::Failed { path, reason } => self.failures.push(Failure {
                path: path.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Writes brewery and beer documents below one section directory.
pub struct Materializer<'a> {
    root: PathBuf,
    extension: String,
    lang: String,
    renderer: &'a Renderer,
}

impl<'a> Materializer<'a> {
    /// `root` is the section directory (`<output>/breweries`).
    pub fn new(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        lang: impl Into<String>,
        renderer: &'a Renderer,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            lang: lang.into(),
            renderer,
        }
    }

    /// Materialize one beer. Returns `None` for an unmatched join.
    pub fn materialize(&self, beer: &Beer, join: &Join) -> Result<Option<Outcome>, GenerateError> {
        if !join.is_matched() {
            tracing::debug!(beer = %beer.id, brewery_id = %beer.brewery_id, "no brewery, skipped");
            return Ok(None);
        }
        let brewery_slug = slug_or_id(&join.brewery.name, &join.brewery.id, &self.lang);
        let base_slug = slug_or_id(&beer.name, &beer.id, &self.lang);
        let dir = self.root.join(&brewery_slug);

        let created_dir = !dir.is_dir();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(path = %dir.display(), error = %e, "cannot create brewery directory");
            let reason = e.to_string();
            return Ok(Some(Outcome {
                index: DocStatus::Failed {
                    path: self.index_path(&dir),
                    reason: reason.clone(),
                },
                element: DocStatus::Failed {
                    path: self.doc_path(&dir, &base_slug),
                    reason,
                },
                brewery_slug,
                beer_slug: base_slug,
                disambiguated: false,
                created_dir: false,
            }));
        }
        if created_dir {
            tracing::debug!(path = %dir.display(), "created brewery directory");
        }

        let index = self.write_index(&dir, &brewery_slug, &join.brewery, &join.geocode)?;
        let (element, beer_slug) =
            self.write_element(&dir, &brewery_slug, &base_slug, beer, &join.category, &join.style)?;

        Ok(Some(Outcome {
            disambiguated: beer_slug != base_slug,
            brewery_slug,
            beer_slug,
            created_dir,
            index,
            element,
        }))
    }

    fn index_path(&self, dir: &Path) -> PathBuf {
        self.doc_path(dir, INDEX_STEM)
    }

    fn doc_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}.{}", self.extension))
    }

    fn write_index(
        &self,
        dir: &Path,
        brewery_slug: &str,
        brewery: &Brewery,
        geocode: &Geocode,
    ) -> Result<DocStatus, GenerateError> {
        let path = self.index_path(dir);
        let file = match create_exclusive(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(DocStatus::Exists(path));
            }
            Err(e) => return Ok(failed(path, e)),
        };
        let fields = index_fields(brewery, geocode, brewery_slug);
        self.emit(file, path, TemplateId::Index, &fields)
    }

    fn write_element(
        &self,
        dir: &Path,
        brewery_slug: &str,
        base_slug: &str,
        beer: &Beer,
        category: &Category,
        style: &Style,
    ) -> Result<(DocStatus, String), GenerateError> {
        for slug in Candidates::new(base_slug) {
            let path = self.doc_path(dir, &slug);
            match create_exclusive(&path) {
                Ok(file) => {
                    let fields = element_fields(beer, category, style, brewery_slug, &slug);
                    let status = self.emit(file, path, TemplateId::Element, &fields)?;
                    return Ok((status, slug));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "name taken, trying next");
                }
                Err(e) => return Ok((failed(path, e), slug)),
            }
        }
        unreachable!("candidate names are unbounded")
    }

    /// Render into a freshly created file. Render errors are fatal, write
    /// errors only fail this document.
    fn emit(
        &self,
        file: File,
        path: PathBuf,
        id: TemplateId,
        fields: &Fields,
    ) -> Result<DocStatus, GenerateError> {
        let bytes = match self.renderer.render(id, fields) {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(file);
                discard(&path);
                return Err(e.into());
            }
        };
        if let Err(e) = write_document(file, &path, &bytes) {
            return Ok(failed(path, e));
        }
        tracing::debug!(path = %path.display(), "written");
        Ok(DocStatus::Written(path))
    }
}

fn create_exclusive(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Write a freshly created document, removing it again if the write fails.
fn write_document(mut out: impl Write, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let result = out.write_all(bytes).and_then(|()| out.flush());
    if result.is_err() {
        drop(out);
        discard(path);
    }
    result
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "cannot remove incomplete document");
    }
}

fn failed(path: PathBuf, err: io::Error) -> DocStatus {
    tracing::warn!(path = %path.display(), error = %err, "cannot write document, skipped");
    DocStatus::Failed {
        path,
        reason: err.to_string(),
    }
}

/// Front matter of the per-brewery document.
pub fn index_fields(brewery: &Brewery, geocode: &Geocode, brewery_slug: &str) -> Fields {
    Fields::new()
        .with("title", &brewery.name)
        .with("url", format!("/{brewery_slug}/"))
        .with("latitude", &geocode.latitude)
        .with("longitude", &geocode.longitude)
        .with("address1", &brewery.address1)
        .with("address2", &brewery.address2)
        .with("city", &brewery.city)
        .with("state", &brewery.state)
        .with("postal_code", &brewery.postal_code)
        .with("country", &brewery.country)
        .with("phone", &brewery.phone)
        .with("website", &brewery.website)
        .with("description", &brewery.description)
}

/// Front matter of a beer document. `beer_slug` is the final, disambiguated slug.
pub fn element_fields(
    beer: &Beer,
    category: &Category,
    style: &Style,
    brewery_slug: &str,
    beer_slug: &str,
) -> Fields {
    Fields::new()
        .with("title", strip_quotes(&beer.name))
        .with("url", format!("/{brewery_slug}/{beer_slug}/"))
        .with("category", &category.name)
        .with("style", &style.name)
        .with("abv", &beer.abv)
        .with("ibu", &beer.ibu)
        .with("srm", &beer.srm)
        .with("upc", &beer.upc)
        .with("description", &beer.description)
}

/// Run the join and write every document, beers in file order.
pub fn generate(
    dataset: &Dataset,
    materializer: &Materializer<'_>,
) -> Result<Report, GenerateError> {
    let mut report = Report::default();
    for beer in &dataset.beers {
        report.beers += 1;
        let joined = join(beer, dataset);
        match materializer.materialize(beer, &joined)? {
            Some(outcome) => report.record(&outcome),
            None => report.unmatched += 1,
        }
    }
    tracing::info!(
        beers = report.beers,
        written = report.elements_written,
        unmatched = report.unmatched,
        failed = report.failures.len(),
        "generation finished"
    );
    Ok(report)
}

/// Number of documents with `extension` already under `root`.
pub fn existing_documents(root: &Path, extension: &str) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|x| x == extension))
        .count()
}

/// Remove the section directory so disambiguators start from a clean slate.
pub fn clean(root: &Path) -> Result<(), GenerateError> {
    match fs::remove_dir_all(root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(GenerateError::Clean {
            path: root.to_path_buf(),
            source,
        }),
    }
}
