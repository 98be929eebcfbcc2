//! Structural limits for stored documents.
//!
//! Two limits apply to every document before it is written:
//!
//! - **Width**: no object may carry more than `max_keys_per_object` keys.
//! - **Depth**: complex values may not sit deeper than `max_nesting_level`.
//!
//! ## Depth Rules
//!
//! Only object membership consumes a nesting level. Elements of an array stay
//! at the array's own depth, so a root array of row objects keeps its rows at
//! depth 0 and a row's nested array of objects sits at depth 1:
//!
//! ```text
//! [                            depth 0 (root array)
//!   { "name": "Alpha",         depth 0 (row)
//!     "kpis": [                depth 1 (member of row)
//!       { "metric": "Rev" }    depth 1 (element of kpis)
//!     ] }
//! ]
//! ```

use crate::domain::errors::ValidationError;
use crate::domain::Document;
use serde::{Deserialize, Serialize};

/// Default maximum keys per object.
pub const DEFAULT_MAX_KEYS_PER_OBJECT: usize = 10;

/// Default maximum nesting level (0 is the root).
pub const DEFAULT_MAX_NESTING_LEVEL: usize = 1;

/// Structural limits, fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Maximum keys in any single object.
    pub max_keys_per_object: usize,
    /// Maximum depth of a complex value.
    pub max_nesting_level: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_keys_per_object: DEFAULT_MAX_KEYS_PER_OBJECT,
            max_nesting_level: DEFAULT_MAX_NESTING_LEVEL,
        }
    }
}

impl ValidationLimits {
    /// Default limits with a custom key count.
    pub fn with_max_keys(max_keys_per_object: usize) -> Self {
        Self {
            max_keys_per_object,
            ..Self::default()
        }
    }

    /// Check a document against the limits.
    ///
    /// Fails fast on the first violation found. Object iteration order decides
    /// which violation that is when several exist.
    pub fn validate(&self, document: &Document) -> Result<(), ValidationError> {
        let mut pending: Vec<(&Document, usize)> = vec![(document, 0)];

        while let Some((value, depth)) = pending.pop() {
            if depth > self.max_nesting_level {
                return Err(ValidationError::NestingTooDeep {
                    level: depth,
                    max: self.max_nesting_level,
                });
            }

            match value {
                Document::Object(map) => {
                    if map.len() > self.max_keys_per_object {
                        return Err(ValidationError::TooManyKeys {
                            count: map.len(),
                            limit: self.max_keys_per_object,
                        });
                    }
                    pending.extend(
                        map.values()
                            .filter(|v| is_complex(v))
                            .map(|v| (v, depth + 1)),
                    );
                }
                Document::Array(items) => {
                    pending.extend(items.iter().filter(|v| is_complex(v)).map(|v| (v, depth)));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Objects and arrays are complex; scalars and null are not.
pub fn is_complex(value: &Document) -> bool {
    matches!(value, Document::Object(_) | Document::Array(_))
}

/// Validate with the default limits.
pub fn validate(document: &Document) -> Result<(), ValidationError> {
    ValidationLimits::default().validate(document)
}
