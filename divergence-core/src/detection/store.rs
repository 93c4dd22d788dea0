//! Append-only divergence store.

use crate::domain::{DivergenceRecord, DivergenceType};

/// Classified divergences in emission order.
///
/// There is no API to modify or remove a record; only the detector's full
/// reset clears the store.
#[derive(Debug, Clone, Default)]
pub struct DivergenceStore {
    records: Vec<DivergenceRecord>,
}

impl DivergenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: DivergenceRecord) {
        self.records.push(record);
    }

    /// Iterate over the records present now. Restartable: call again for a fresh pass.
    pub fn iter(&self) -> std::slice::Iter<'_, DivergenceRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[DivergenceRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DivergenceRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records appended after the first `n`.
    pub fn since(&self, n: usize) -> &[DivergenceRecord] {
        self.records.get(n..).unwrap_or(&[])
    }

    pub fn of_kind(&self, kind: DivergenceType) -> impl Iterator<Item = &DivergenceRecord> + '_ {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn count_of(&self, kind: DivergenceType) -> usize {
        self.of_kind(kind).count()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a DivergenceStore {
    type Item = &'a DivergenceRecord;
    type IntoIter = std::slice::Iter<'a, DivergenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Anchor;
    use crate::testutil::time_at;

    fn record(kind: DivergenceType, start: usize, end: usize) -> DivergenceRecord {
        let anchor = |index: usize| Anchor {
            index,
            time: time_at(index),
            price: index as f64,
        };
        DivergenceRecord::new(kind, anchor(start), anchor(end))
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = DivergenceStore::new();
        store.add(record(DivergenceType::RegularBearish, 1, 5));
        store.add(record(DivergenceType::RegularBullish, 3, 8));
        let ends: Vec<_> = store.iter().map(|r| r.end.index).collect();
        assert_eq!(ends, vec![5, 8]);
        assert_eq!(store.get(1).map(|r| r.kind), Some(DivergenceType::RegularBullish));
    }

    #[test]
    fn iteration_is_restartable() {
        let mut store = DivergenceStore::new();
        store.add(record(DivergenceType::HiddenBullish, 1, 4));
        store.add(record(DivergenceType::HiddenBearish, 2, 6));
        let first: Vec<_> = store.iter().cloned().collect();
        let second: Vec<_> = (&store).into_iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn since_returns_new_tail() {
        let mut store = DivergenceStore::new();
        store.add(record(DivergenceType::RegularBullish, 1, 4));
        let before = store.len();
        store.add(record(DivergenceType::RegularBearish, 2, 7));
        assert_eq!(store.since(before).len(), 1);
        assert_eq!(store.since(before)[0].kind, DivergenceType::RegularBearish);
        assert!(store.since(10).is_empty());
    }

    #[test]
    fn filters_by_kind() {
        let mut store = DivergenceStore::new();
        store.add(record(DivergenceType::RegularBullish, 1, 4));
        store.add(record(DivergenceType::RegularBearish, 2, 7));
        store.add(record(DivergenceType::RegularBullish, 4, 9));
        assert_eq!(store.count_of(DivergenceType::RegularBullish), 2);
        assert_eq!(store.count_of(DivergenceType::HiddenBearish), 0);
    }
}
