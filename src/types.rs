//! Record types for the five source tables.
//!
//! Every field is text. A missing value is the empty string, and a record whose
//! fields are all empty (`Default::default()`) is the "not found" result of a
//! join. Records are never mutated after load.
//!
//! Field names follow the domain; the `#[serde(rename)]` attributes map them to
//! the header names used by the Open Beer Database export, and [`Record::COLUMNS`]
//! lists those headers so the loader can validate a table before decoding rows.

use serde::Deserialize;

/// A table row type the loader knows how to decode.
pub trait Record: serde::de::DeserializeOwned {
    /// Human-readable table name used in diagnostics.
    const TABLE: &'static str;
    /// Header names that must all be present in the source file.
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Beer {
    pub id: String,
    pub brewery_id: String,
    pub name: String,
    pub cat_id: String,
    pub style_id: String,
    pub abv: String,
    pub ibu: String,
    pub srm: String,
    pub upc: String,
    pub filepath: String,
    #[serde(rename = "descript")]
    pub description: String,
    #[serde(rename = "last_mod")]
    pub last_modified: String,
}

impl Record for Beer {
    const TABLE: &'static str = "beers";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "brewery_id",
        "name",
        "cat_id",
        "style_id",
        "abv",
        "ibu",
        "srm",
        "upc",
        "filepath",
        "descript",
        "last_mod",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Brewery {
    pub id: String,
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "code")]
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub website: String,
    pub filepath: String,
    #[serde(rename = "descript")]
    pub description: String,
    #[serde(rename = "last_mod")]
    pub last_modified: String,
}

impl Record for Brewery {
    const TABLE: &'static str = "breweries";
    const COLUMNS: &'static [&'static str] = &[
        "id", "name", "address1", "address2", "city", "state", "code", "country", "phone",
        "website", "filepath", "descript", "last_mod",
    ];
}

/// Coordinates of a brewery. One per brewery by convention, not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Geocode {
    pub id: String,
    pub brewery_id: String,
    pub latitude: String,
    pub longitude: String,
    pub accuracy: String,
}

impl Record for Geocode {
    const TABLE: &'static str = "geocodes";
    const COLUMNS: &'static [&'static str] =
        &["id", "brewery_id", "latitude", "longitude", "accuracy"];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "cat_name")]
    pub name: String,
    #[serde(rename = "last_mod")]
    pub last_modified: String,
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["id", "cat_name", "last_mod"];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Style {
    pub id: String,
    pub cat_id: String,
    #[serde(rename = "style_name")]
    pub name: String,
    #[serde(rename = "last_mod")]
    pub last_modified: String,
}

impl Record for Style {
    const TABLE: &'static str = "styles";
    const COLUMNS: &'static [&'static str] = &["id", "cat_id", "style_name", "last_mod"];
}

/// All five tables, in file order, held for the whole run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub beers: Vec<Beer>,
    pub breweries: Vec<Brewery>,
    pub geocodes: Vec<Geocode>,
    pub categories: Vec<Category>,
    pub styles: Vec<Style>,
}
