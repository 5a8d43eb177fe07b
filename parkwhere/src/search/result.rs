//! Ranked search output.

use std::sync::Arc;

use crate::catalog::Facility;

/// A facility paired with its distance from the query center.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFacility {
    pub facility: Arc<Facility>,
    pub distance_meters: f64,
}

/// Distance-ordered search result.
///
/// Entries are non-decreasing by distance, with equal distances ordered by
/// facility id. The list is shared and never mutated after construction;
/// a new query always produces a new `RankedResult`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedResult {
    entries: Arc<Vec<RankedFacility>>,
}

impl RankedResult {
    /// The empty result published when there is nothing to search.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort `entries` and wrap them.
    pub(crate) fn from_unsorted(mut entries: Vec<RankedFacility>) -> Self {
        entries.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.facility.id.cmp(&b.facility.id))
        });
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedFacility> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[RankedFacility] {
        &self.entries
    }

    /// Facility ids in result order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.facility.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a RankedResult {
    type Item = &'a RankedFacility;
    type IntoIter = std::slice::Iter<'a, RankedFacility>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(id: &str, distance: f64) -> RankedFacility {
        RankedFacility {
            facility: Arc::new(Facility::new(id, "", 0.0, 0.0)),
            distance_meters: distance,
        }
    }

    #[test]
    fn test_sorted_by_distance_then_id() {
        let result = RankedResult::from_unsorted(vec![
            ranked("C", 200.0),
            ranked("B", 100.0),
            ranked("A", 100.0),
            ranked("D", 50.0),
        ]);
        assert_eq!(result.ids(), vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn test_empty() {
        let result = RankedResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result, RankedResult::from_unsorted(Vec::new()));
    }
}
