//! Sequential identifier allocation.

use library_primitives::{MAX_SEQUENCE, PromptId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::PromptIndex;

/// Errors returned by [`next_id`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every three-digit sequence number under the prefix is taken.
    #[error("no identifiers left for prefix {prefix}, {last} is in use")]
    Exhausted {
        /// Uppercase prefix that ran out.
        prefix: String,
        /// Highest identifier found under the prefix.
        last: String,
    },
    /// The category cannot form an identifier prefix.
    #[error("category {category:?} cannot form an identifier prefix")]
    InvalidPrefix {
        /// Category as supplied.
        category: String,
    },
}

/// Suggests the next free identifier for `category`.
///
/// Takes the highest numeric suffix among ids starting with
/// `CATEGORY-` and adds one; an empty category starts at `001`. Ids under
/// the prefix whose suffix is not a number are skipped.
///
/// # Errors
///
/// Returns [`AllocationError::Exhausted`] once `999` is taken and
/// [`AllocationError::InvalidPrefix`] for categories that do not uppercase
/// to ASCII letters.
pub fn next_id(index: &PromptIndex, category: &str) -> Result<PromptId, AllocationError> {
    let prefix = category.to_uppercase();
    let lead = format!("{prefix}-");

    let highest = index
        .entries()
        .iter()
        .filter_map(|entry| entry.id.strip_prefix(&lead).map(|suffix| (&entry.id, suffix)))
        .filter_map(|(id, suffix)| match suffix.parse::<u32>() {
            Ok(sequence) => Some(sequence),
            Err(_) => {
                warn!(%id, "skipping identifier with non-numeric suffix");
                None
            }
        })
        .max()
        .unwrap_or(0);

    if highest >= MAX_SEQUENCE {
        return Err(AllocationError::Exhausted {
            prefix,
            last: format!("{lead}{highest:03}"),
        });
    }

    let id = PromptId::compose(&prefix, highest + 1)
        .map_err(|_| AllocationError::InvalidPrefix {
            category: category.to_owned(),
        })?;
    debug!(%id, "allocated identifier");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use library_primitives::IndexEntry;

    fn index(ids: &[&str]) -> PromptIndex {
        ids.iter()
            .map(|id| IndexEntry {
                id: (*id).to_owned(),
                ..IndexEntry::default()
            })
            .collect()
    }

    #[test]
    fn empty_category_starts_at_one() {
        let id = next_id(&index(&["DEV-001"]), "docs").unwrap();
        assert_eq!(id.as_str(), "DOCS-001");
    }

    #[test]
    fn increments_the_highest_suffix() {
        let id = next_id(&index(&["DEV-001", "DEV-007", "DEV-003"]), "dev").unwrap();
        assert_eq!(id.as_str(), "DEV-008");
    }

    #[test]
    fn prefix_match_requires_hyphen() {
        let id = next_id(&index(&["DEVOPS-004", "DEV-002"]), "dev").unwrap();
        assert_eq!(id.as_str(), "DEV-003");
    }

    #[test]
    fn malformed_suffixes_are_skipped() {
        let id = next_id(&index(&["META-00X", "META-002", "META-"]), "meta").unwrap();
        assert_eq!(id.as_str(), "META-003");
    }

    #[test]
    fn wide_suffixes_still_count() {
        let id = next_id(&index(&["SYS-0041"]), "system").unwrap();
        assert_eq!(id.as_str(), "SYSTEM-001");
        let id = next_id(&index(&["SYSTEM-0041"]), "system").unwrap();
        assert_eq!(id.as_str(), "SYSTEM-042");
    }

    #[test]
    fn fails_past_nine_hundred_ninety_nine() {
        let err = next_id(&index(&["DEV-998", "DEV-999"]), "dev").expect_err("exhausted");
        assert!(matches!(err, AllocationError::Exhausted { ref prefix, .. } if prefix == "DEV"));
    }

    #[test]
    fn rejects_categories_without_letters() {
        let err = next_id(&index(&[]), "42").expect_err("invalid prefix");
        assert!(matches!(err, AllocationError::InvalidPrefix { .. }));
    }
}
