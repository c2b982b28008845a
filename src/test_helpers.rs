//! Shared test utilities for the brewdocs test suite.
//!
//! Provides record constructors, a [`DatasetFixture`] builder that can either
//! hand back an in-memory [`Dataset`] or write the five CSV tables to a
//! directory, and readers for the generated tree.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = TempDir::new().unwrap();
//! DatasetFixture::new()
//!     .brewery(brewery("10", "Acme Brewing"))
//!     .beer(beer("1", "10", "Pale Ale", "1", "1"))
//!     .write(src.path());
//!
//! // ... run the pipeline into `out` ...
//! let doc = read_doc(out.path(), "acme-brewing/pale-ale.md");
//! assert_eq!(front_matter(&doc, "title"), Some("\"Pale Ale\""));
//! ```

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::types::{Beer, Brewery, Category, Dataset, Geocode, Record, Style};

// =========================================================================
// Record constructors (only the fields that drive joins and slugs)
// =========================================================================

pub fn beer(id: &str, brewery_id: &str, name: &str, cat_id: &str, style_id: &str) -> Beer {
    Beer {
        id: id.into(),
        brewery_id: brewery_id.into(),
        name: name.into(),
        cat_id: cat_id.into(),
        style_id: style_id.into(),
        ..Beer::default()
    }
}

pub fn brewery(id: &str, name: &str) -> Brewery {
    Brewery {
        id: id.into(),
        name: name.into(),
        ..Brewery::default()
    }
}

pub fn geocode(id: &str, brewery_id: &str, latitude: &str, longitude: &str) -> Geocode {
    Geocode {
        id: id.into(),
        brewery_id: brewery_id.into(),
        latitude: latitude.into(),
        longitude: longitude.into(),
        accuracy: "ROOFTOP".into(),
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        ..Category::default()
    }
}

pub fn style(id: &str, cat_id: &str, name: &str) -> Style {
    Style {
        id: id.into(),
        cat_id: cat_id.into(),
        name: name.into(),
        ..Style::default()
    }
}

// =========================================================================
// Dataset fixture
// =========================================================================

/// Builder for a five-table dataset, kept in insertion order.
#[derive(Debug, Default)]
pub struct DatasetFixture {
    dataset: Dataset,
}

impl DatasetFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn beer(mut self, beer: Beer) -> Self {
        self.dataset.beers.push(beer);
        self
    }

    pub fn brewery(mut self, brewery: Brewery) -> Self {
        self.dataset.breweries.push(brewery);
        self
    }

    pub fn geocode(mut self, geocode: Geocode) -> Self {
        self.dataset.geocodes.push(geocode);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.dataset.categories.push(category);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.dataset.styles.push(style);
        self
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Write the tables under their default file names. The brewery table is
    /// encoded as windows-1252 like the real export.
    pub fn write(&self, dir: &Path) {
        let ds = &self.dataset;
        write_table::<Beer>(dir, "beers.csv", ds.beers.iter().map(beer_row), false);
        write_table::<Brewery>(dir, "breweries.csv", ds.breweries.iter().map(brewery_row), true);
        write_table::<Geocode>(
            dir,
            "breweries_geocode.csv",
            ds.geocodes.iter().map(geocode_row),
            false,
        );
        write_table::<Category>(
            dir,
            "categories.csv",
            ds.categories.iter().map(category_row),
            false,
        );
        write_table::<Style>(dir, "styles.csv", ds.styles.iter().map(style_row), false);
    }
}

fn write_table<R: Record>(
    dir: &Path,
    file: &str,
    rows: impl Iterator<Item = Vec<String>>,
    legacy: bool,
) {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(R::COLUMNS).unwrap();
    for row in rows {
        writer.write_record(&row).unwrap();
    }
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let bytes = if legacy {
        let (encoded, _, unmappable) = encoding_rs::WINDOWS_1252.encode(&text);
        assert!(!unmappable, "fixture text not representable in windows-1252");
        encoded.into_owned()
    } else {
        text.into_bytes()
    };
    fs::write(dir.join(file), bytes).unwrap();
}

fn beer_row(b: &Beer) -> Vec<String> {
    [
        &b.id, &b.brewery_id, &b.name, &b.cat_id, &b.style_id, &b.abv, &b.ibu, &b.srm, &b.upc,
        &b.filepath, &b.description, &b.last_modified,
    ]
    .map(String::clone)
    .to_vec()
}

fn brewery_row(b: &Brewery) -> Vec<String> {
    [
        &b.id, &b.name, &b.address1, &b.address2, &b.city, &b.state, &b.postal_code, &b.country,
        &b.phone, &b.website, &b.filepath, &b.description, &b.last_modified,
    ]
    .map(String::clone)
    .to_vec()
}

fn geocode_row(g: &Geocode) -> Vec<String> {
    [&g.id, &g.brewery_id, &g.latitude, &g.longitude, &g.accuracy]
        .map(String::clone)
        .to_vec()
}

fn category_row(c: &Category) -> Vec<String> {
    [&c.id, &c.name, &c.last_modified].map(String::clone).to_vec()
}

fn style_row(s: &Style) -> Vec<String> {
    [&s.id, &s.cat_id, &s.name, &s.last_modified]
        .map(String::clone)
        .to_vec()
}

// =========================================================================
// Output tree readers
// =========================================================================

/// Every file under `root`, as sorted `/`-separated relative paths.
pub fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Read a generated document. Panics with the tree listing if missing.
pub fn read_doc(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| {
        panic!("cannot read '{rel}': {e}. Tree: {:?}", tree(root))
    })
}

/// Value of a front-matter key, exactly as rendered (quotes included).
pub fn front_matter<'a>(doc: &'a str, key: &str) -> Option<&'a str> {
    doc.lines()
        .skip(1)
        .take_while(|line| *line != "---")
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.strip_prefix(' ').unwrap_or(v))
}

/// Free-text body after the front matter, trimmed.
pub fn body(doc: &str) -> &str {
    doc.splitn(3, "---\n").nth(2).unwrap_or("").trim()
}
