//! Slugs and collision-free document names.
//!
//! Display names become path segments through [`slugify`]: language-specific
//! symbol substitutions first, then the `slug` crate (transliteration,
//! lowercasing, hyphen collapsing). Examples with `lang = "en"`:
//!
//! - `"Acme Brewing"` → `acme-brewing`
//! - `"Bière de Garde"` → `biere-de-garde`
//! - `"Stone & Wood"` → `stone-and-wood`
//! - `"Brasserie d'Épinal"` → `brasserie-depinal`
//! - `"  --IPA!!  "` → `ipa`
//!
//! ## Disambiguation
//!
//! Two beers of one brewery may slugify identically. [`Candidates`] yields the
//! names to try, in order:
//!
//! ```text
//! ipa → ipa-2 → ipa-3 → ipa-4 → …
//! ```
//!
//! The first retry appends `-2`; every later retry replaces the trailing digit
//! run with the next integer instead of appending again, so a slug that already
//! ends in digits (`ipa-1990`) becomes `ipa-1990-2`, `ipa-1990-3`.

/// Symbol substitutions applied before slugifying, per language.
fn substitutions(lang: &str) -> &'static [(&'static str, &'static str)] {
    match lang {
        "de" => &[
            ("'", ""),
            ("\u{2019}", ""),
            ("&", " und "),
            ("@", " an "),
            ("ä", "ae"),
            ("ö", "oe"),
            ("ü", "ue"),
            ("Ä", "Ae"),
            ("Ö", "Oe"),
            ("Ü", "Ue"),
            ("ß", "ss"),
        ],
        _ => &[("'", ""), ("\u{2019}", ""), ("&", " and "), ("@", " at ")],
    }
}

/// Lowercase, hyphen-delimited, URL-safe form of `name`.
///
/// Returns an empty string when `name` has no alphanumeric content.
pub fn slugify(name: &str, lang: &str) -> String {
    let mut text = name.to_string();
    for (from, to) in substitutions(lang) {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    slug::slugify(text)
}

/// Slug of `name`, falling back to the record id, then to `untitled`.
///
/// Keeps a nameless record from producing a file called `.md` or a brewery
/// directory that collapses into the section root.
pub fn slug_or_id(name: &str, id: &str, lang: &str) -> String {
    [name, id]
        .into_iter()
        .map(|s| slugify(s, lang))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

/// Strip double quotes from a title; the element template quotes it.
pub fn strip_quotes(title: &str) -> String {
    title.replace('"', "")
}

/// Candidate slugs for one document: the base slug, then `-2`, `-3`, ….
#[derive(Debug, Clone)]
pub struct Candidates {
    current: Option<String>,
    next: u32,
}

impl Candidates {
    pub fn new(base: &str) -> Self {
        Self {
            current: Some(base.to_string()),
            next: 1,
        }
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.current.take()?;
        let n = self.next;
        self.next += 1;
        let candidate = match n {
            1 => current,
            2 => format!("{current}-2"),
            _ => format!("{}{n}", current.trim_end_matches(|c: char| c.is_ascii_digit())),
        };
        self.current = Some(candidate.clone());
        Some(candidate)
    }
}
