//! # brewdocs
//!
//! Turns the five flat tables of the Open Beer Database into a tree of
//! front-matter documents ready for a static site generator: one directory per
//! brewery, an `_index` document describing the brewery, and one document per
//! beer.
//!
//! # Architecture: Load, Join, Materialize
//!
//! ```text
//! 1. Load      *.csv    →  Dataset           (five tables, file order kept)
//! 2. Join      Dataset  →  Join per beer     (first match wins)
//! 3. Generate  Join     →  breweries/<slug>/ (create-exclusive writes)
//! ```
//!
//! The run is a single sequential pass: beers are processed one at a time in
//! file order, and the only state shared between them is the read-only
//! dataset and the output tree itself.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Reads and decodes the CSV tables, validating headers |
//! | [`types`] | Record types and their column mapping |
//! | [`join`] | First-match join of a beer against the reference tables |
//! | [`naming`] | Slugs and `-N` collision candidates |
//! | [`render`] | Tera templates for the two document kinds |
//! | [`generate`] | Directory and document materialization, run report |
//! | [`config`] | `brewdocs.toml` loading, merging and validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## First occurrence in file order wins
//!
//! The source tables contain duplicate ids. Lookups are linear scans that stop
//! at the first match, so the result never depends on hashing or sorting and a
//! re-run over the same files always picks the same rows.
//!
//! ## Never overwrite
//!
//! Brewery documents are written once and then left alone; beer documents with
//! a name that is already taken get the next free `-N` suffix. Files left by an
//! earlier run therefore shift suffixes on the next one, which is why `build`
//! warns about a non-empty tree and offers `--clean`.

pub mod config;
pub mod generate;
pub mod join;
pub mod load;
pub mod naming;
pub mod output;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
