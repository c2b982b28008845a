//! Relation loading.
//!
//! Stage 1 of the pipeline. Reads the five CSV tables from the source directory
//! into a [`Dataset`], preserving file order; join semantics downstream depend
//! on it.
//!
//! ## Decoding
//!
//! Each file is read as raw bytes and decoded with the encoding configured for
//! its table before any row splitting. The Open Beer Database ships the brewery
//! table in windows-1252, so that table has its own setting. A UTF-8 byte order
//! mark is honoured whatever the configured encoding is.
//!
//! ## Header validation
//!
//! Rows are mapped to fields by header name, never by position. The header row
//! of every table is checked against [`Record::COLUMNS`] before the first row
//! is decoded: a missing column fails the load and names every absent column.
//! Extra columns are ignored.
//!
//! Any failure here is fatal for the run. Loading happens before anything is
//! written, so a failed load leaves the output tree untouched.

use crate::config::InputConfig;
use crate::types::{Beer, Brewery, Category, Dataset, Geocode, Record, Style};
use encoding_rs::Encoding;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unknown encoding label \"{0}\"")]
    UnknownEncoding(String),
    #[error("{path} is not valid {encoding}")]
    Encoding { path: PathBuf, encoding: String },
    #[error("malformed {table} table: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },
    #[error("{table} table is missing columns: {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },
}

/// Load all five tables from `source` as described by `input`.
pub fn load(source: &Path, input: &InputConfig) -> Result<Dataset, LoadError> {
    let dataset = Dataset {
        beers: read_table::<Beer>(&source.join(&input.beers), &input.encoding)?,
        breweries: read_table::<Brewery>(
            &source.join(&input.breweries),
            &input.breweries_encoding,
        )?,
        geocodes: read_table::<Geocode>(&source.join(&input.geocodes), &input.encoding)?,
        categories: read_table::<Category>(&source.join(&input.categories), &input.encoding)?,
        styles: read_table::<Style>(&source.join(&input.styles), &input.encoding)?,
    };
    tracing::debug!(
        beers = dataset.beers.len(),
        breweries = dataset.breweries.len(),
        geocodes = dataset.geocodes.len(),
        categories = dataset.categories.len(),
        styles = dataset.styles.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Read, decode and parse one table file.
pub fn read_table<R: Record>(path: &Path, encoding: &str) -> Result<Vec<R>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes, encoding).map_err(|err| match err {
        LoadError::Encoding { encoding, .. } => LoadError::Encoding {
            path: path.to_path_buf(),
            encoding,
        },
        other => other,
    })?;
    let rows = parse_table::<R>(&text)?;
    tracing::debug!(table = R::TABLE, rows = rows.len(), path = %path.display(), "table read");
    Ok(rows)
}

/// Decode raw file bytes with the encoding named by `label`.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, LoadError> {
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(LoadError::Encoding {
            path: PathBuf::new(),
            encoding: actual.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Parse decoded CSV text into records, validating the header row first.
pub fn parse_table<R: Record>(text: &str) -> Result<Vec<R>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        table: R::TABLE,
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_err)?;
    let missing: Vec<String> = R::COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            table: R::TABLE,
            columns: missing,
        });
    }

    reader
        .deserialize::<R>()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(csv_err)
}
