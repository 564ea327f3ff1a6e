//! Cell name validation and normalization.
//!
//! A cell name starts with a letter or underscore, continues with letters,
//! digits or underscores, and is at least two characters long (`A1`, `_x`,
//! `total_2`). Names are normalized before they reach the store or the
//! dependency graph so that differently-cased spellings denote one cell.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn cell_name_re() -> &'static Regex {
    static CELL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    CELL_NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]+$").expect("cell name regex must compile")
    })
}

/// Returns true if `name` is a valid cell name.
pub fn is_valid_name(name: &str) -> bool {
    cell_name_re().is_match(name)
}

/// How names are brought into canonical form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    #[default]
    Upper,
    Lower,
    Preserve,
}

impl Normalization {
    pub fn apply(self, name: &str) -> String {
        match self {
            Normalization::Upper => name.to_ascii_uppercase(),
            Normalization::Lower => name.to_ascii_lowercase(),
            Normalization::Preserve => name.to_string(),
        }
    }
}
