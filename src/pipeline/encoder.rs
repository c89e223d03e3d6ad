//! Categorical encoders
//!
//! Two strategies, chosen when the encoder is built and dispatched with a
//! `match`:
//!
//! - [`CategoricalEncoding::LearnedIndex`]: vocabulary learned from the
//!   training values, sorted lexicographically and numbered from zero.
//!   Values outside the vocabulary are rejected.
//! - [`CategoricalEncoding::FixedMapping`]: a closed, hand-specified
//!   vocabulary matched case-insensitively (title case). Values outside the
//!   vocabulary fall back to code `0` and produce an [`EncodingWarning`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};

/// Code assigned to an unlisted value of a fixed mapping
pub const FIXED_MAPPING_FALLBACK: u32 = 0;

/// A fitted, immutable categorical encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoricalEncoding {
    /// Sorted distinct training values; a value's code is its index
    LearnedIndex { classes: Vec<String> },
    /// Title-cased label to code
    FixedMapping { mapping: BTreeMap<String, u32> },
}

/// Non-fatal signal raised while encoding
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingWarning {
    /// A fixed-mapping column saw an unlisted value and used the fallback code
    UnknownFixedCategory { column: String, value: String },
}

impl fmt::Display for EncodingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingWarning::UnknownFixedCategory { column, value } => write!(
                f,
                "unknown value '{}' for '{}', encoded as {}",
                value, column, FIXED_MAPPING_FALLBACK
            ),
        }
    }
}

/// Result of encoding one value
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub code: u32,
    pub warning: Option<EncodingWarning>,
}

impl CategoricalEncoding {
    /// Learn an index over the distinct values of one column.
    ///
    /// Values are trimmed; ties are broken lexicographically.
    pub fn fit_learned<S: AsRef<str>>(values: &[S]) -> Self {
        let classes: BTreeSet<String> = values
            .iter()
            .map(|v| v.as_ref().trim().to_string())
            .collect();
        CategoricalEncoding::LearnedIndex {
            classes: classes.into_iter().collect(),
        }
    }

    /// Record a hand-specified vocabulary. Keys are title-cased.
    pub fn fixed(entries: &[(&str, u32)]) -> Self {
        CategoricalEncoding::FixedMapping {
            mapping: entries
                .iter()
                .map(|(label, code)| (title_case(label), *code))
                .collect(),
        }
    }

    /// Encode one raw value for `column`.
    pub fn apply(&self, column: &str, raw: &str) -> PipelineResult<Encoded> {
        match self {
            CategoricalEncoding::LearnedIndex { classes } => {
                let value = raw.trim();
                classes
                    .binary_search_by(|c| c.as_str().cmp(value))
                    .map(|idx| Encoded {
                        code: idx as u32,
                        warning: None,
                    })
                    .map_err(|_| PipelineError::UnknownCategory {
                        column: column.to_string(),
                        value: raw.to_string(),
                    })
            }
            CategoricalEncoding::FixedMapping { mapping } => {
                match mapping.get(&title_case(raw)) {
                    Some(&code) => Ok(Encoded { code, warning: None }),
                    None => Ok(Encoded {
                        code: FIXED_MAPPING_FALLBACK,
                        warning: Some(EncodingWarning::UnknownFixedCategory {
                            column: column.to_string(),
                            value: raw.to_string(),
                        }),
                    }),
                }
            }
        }
    }

    /// Whether `raw` is part of the vocabulary, using the same
    /// normalization as [`apply`](Self::apply).
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            CategoricalEncoding::LearnedIndex { classes } => {
                classes.binary_search_by(|c| c.as_str().cmp(raw.trim())).is_ok()
            }
            CategoricalEncoding::FixedMapping { mapping } => mapping.contains_key(&title_case(raw)),
        }
    }

    /// Valid labels ordered by code
    pub fn options(&self) -> Vec<String> {
        match self {
            CategoricalEncoding::LearnedIndex { classes } => classes.clone(),
            CategoricalEncoding::FixedMapping { mapping } => {
                let mut entries: Vec<(&String, &u32)> = mapping.iter().collect();
                entries.sort_by_key(|(label, code)| (**code, (*label).clone()));
                entries.into_iter().map(|(label, _)| label.clone()).collect()
            }
        }
    }

    pub fn is_learned(&self) -> bool {
        matches!(self, CategoricalEncoding::LearnedIndex { .. })
    }
}

/// Trim, then upper-case the first letter of every word and lower-case the rest
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.trim().chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
