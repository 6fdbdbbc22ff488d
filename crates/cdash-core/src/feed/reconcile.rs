//! Feed reconciliation.
//!
//! Merges independently fetched collections into one display list: a stable
//! set-union keyed by item id, where the first occurrence wins both content
//! and position. Items without an id are never deduplicated.

use std::collections::HashSet;
use std::hash::Hash;

use super::FeedItem;

/// Merges feed collections in order, dropping later items whose id was already seen.
pub fn merge<I, C>(collections: I) -> Vec<FeedItem>
where
    I: IntoIterator<Item = C>,
    C: IntoIterator<Item = FeedItem>,
{
    merge_by_key(collections, |item: &FeedItem| {
        (!item.id.is_empty()).then(|| item.id.clone())
    })
}

/// Order-preserving union over `collections` keyed by `key`.
///
/// `key` returning `None` marks an item as always distinct. Runs in one pass
/// with a seen-set, so cost is linear in the total item count.
pub fn merge_by_key<T, K, I, C, F>(collections: I, mut key: F) -> Vec<T>
where
    K: Hash + Eq,
    I: IntoIterator<Item = C>,
    C: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<K>,
{
    let mut seen: HashSet<K> = HashSet::new();
    let mut merged = Vec::new();

    for collection in collections {
        for item in collection {
            match key(&item) {
                Some(k) => {
                    if seen.insert(k) {
                        merged.push(item);
                    }
                }
                None => merged.push(item),
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::hash::Hasher;

    use super::*;

    fn item(id: &str, title: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{id}"),
            source: "Reddit".to_string(),
            preview: None,
        }
    }

    fn ids(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_merge_empty_input() {
        let empty: Vec<Vec<FeedItem>> = Vec::new();
        assert!(merge(empty).is_empty());
    }

    #[test]
    fn test_merge_skips_empty_collections() {
        let merged = merge(vec![vec![], vec![item("1", "a")], vec![]]);
        assert_eq!(ids(&merged), ["1"]);
    }

    #[test]
    fn test_merge_disjoint_concatenates_in_order() {
        let a = vec![item("1", "a"), item("2", "b"), item("3", "c")];
        let b = vec![item("9", "x"), item("8", "y")];

        let merged = merge(vec![a.clone(), b.clone()]);

        assert_eq!(merged.len(), a.len() + b.len());
        assert_eq!(ids(&merged), ["1", "2", "3", "9", "8"]);
    }

    #[test]
    fn test_merge_first_occurrence_wins() {
        let merged = merge(vec![vec![item("1", "x")], vec![item("1", "y")]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "x");
    }

    #[test]
    fn test_merge_first_occurrence_keeps_position() {
        let merged = merge(vec![
            vec![item("1", "a"), item("2", "b")],
            vec![item("3", "c"), item("1", "dup"), item("2", "dup")],
            vec![item("4", "d"), item("3", "dup")],
        ]);
        assert_eq!(ids(&merged), ["1", "2", "3", "4"]);
        assert!(merged.iter().all(|i| i.title != "dup"));
    }

    #[test]
    fn test_merge_dedupes_within_one_collection() {
        let merged = merge(vec![vec![item("1", "a"), item("1", "b")]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "a");
    }

    #[test]
    fn test_merge_never_dedupes_empty_ids() {
        let merged = merge(vec![vec![item("", "a"), item("", "b")], vec![item("", "c")]]);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let inputs = vec![
            vec![item("1", "a"), item("2", "b"), item("", "n")],
            vec![item("2", "c"), item("3", "d"), item("", "n")],
        ];
        let once = merge(inputs);
        let twice = merge(vec![once.clone()]);
        assert_eq!(twice, once);
    }

    thread_local! {
        static EQ_CALLS: Cell<usize> = const { Cell::new(0) };
    }

    /// Key that counts equality comparisons.
    struct Counted(u64);

    impl PartialEq for Counted {
        fn eq(&self, other: &Self) -> bool {
            EQ_CALLS.with(|c| c.set(c.get() + 1));
            self.0 == other.0
        }
    }

    impl Eq for Counted {}

    impl Hash for Counted {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.0.hash(state);
        }
    }

    /// Comparisons performed merging `n` items split over 4 collections,
    /// half of them duplicates.
    fn comparisons_for(n: u64) -> usize {
        EQ_CALLS.with(|c| c.set(0));
        let collections: Vec<Vec<u64>> = (0..4)
            .map(|part| (0..n / 4).map(|i| (i * 4 + part) % (n / 2)).collect())
            .collect();
        let merged = merge_by_key(collections, |v: &u64| Some(Counted(*v)));
        assert_eq!(merged.len() as u64, n / 2);
        EQ_CALLS.with(Cell::get)
    }

    #[test]
    fn test_merge_comparisons_scale_linearly() {
        let small = comparisons_for(1_000);
        let large = comparisons_for(16_000);

        // A quadratic scan would grow ~256x here; a seen-set grows ~16x.
        assert!(
            large <= small.max(1) * 32,
            "comparisons grew from {small} to {large}"
        );
        assert!(large <= 16_000 * 2, "too many comparisons: {large}");
    }
}
