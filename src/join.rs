//! First-match join of a beer against the reference tables.
//!
//! Every lookup is a linear scan in file order that stops at the first row
//! whose id matches, so duplicate ids in the source data always resolve to the
//! earliest row. Nothing is indexed: the reference tables are small and the
//! scan order *is* the tie-breaking policy.
//!
//! A lookup that finds nothing yields the zero-valued record. Callers gate on
//! [`Join::is_matched`] (a non-empty brewery name) rather than on a separate
//! "found" flag.

use crate::types::{Beer, Brewery, Category, Dataset, Geocode, Style};

/// Reference records resolved for one beer. Owned copies, fresh per beer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    pub brewery: Brewery,
    pub geocode: Geocode,
    pub category: Category,
    pub style: Style,
}

impl Join {
    /// Whether the beer resolved to a usable brewery.
    ///
    /// This is the only validity gate of the pipeline: a beer whose brewery is
    /// missing (or nameless) produces no output at all.
    pub fn is_matched(&self) -> bool {
        !self.brewery.name.is_empty()
    }
}

/// Resolve brewery, geocode, category and style for `beer`.
pub fn join(beer: &Beer, dataset: &Dataset) -> Join {
    let (brewery, geocode) =
        find_brewery(&beer.brewery_id, &dataset.breweries, &dataset.geocodes);
    Join {
        brewery,
        geocode,
        category: first_match(&dataset.categories, |c| c.id == beer.cat_id),
        style: first_match(&dataset.styles, |s| s.id == beer.style_id),
    }
}

/// Beers that resolve to no brewery, in file order. Used by `check`.
pub fn unmatched(dataset: &Dataset) -> Vec<&Beer> {
    dataset
        .beers
        .iter()
        .filter(|beer| !join(beer, dataset).is_matched())
        .collect()
}

/// Walk breweries in order, resolving each candidate's geocode before testing
/// the candidate itself.
///
/// A candidate without a geocode row keeps the geocode resolved for the
/// previous candidate; only the first candidate starts from the zero value.
/// When no brewery matches, the returned geocode is whatever the last
/// candidate left behind and is never read, since the join is unmatched.
fn find_brewery(
    brewery_id: &str,
    breweries: &[Brewery],
    geocodes: &[Geocode],
) -> (Brewery, Geocode) {
    let mut geocode: Option<&Geocode> = None;
    for candidate in breweries {
        if let Some(found) = geocodes.iter().find(|g| g.brewery_id == candidate.id) {
            geocode = Some(found);
        }
        if candidate.id == brewery_id {
            return (candidate.clone(), geocode.cloned().unwrap_or_default());
        }
    }
    (Brewery::default(), geocode.cloned().unwrap_or_default())
}

/// Earliest row satisfying `pred`, or the zero record.
fn first_match<T: Clone + Default>(rows: &[T], pred: impl Fn(&T) -> bool) -> T {
    rows.iter().find(|row| pred(row)).cloned().unwrap_or_default()
}
