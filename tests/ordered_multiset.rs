use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use avl_multiset::ordered_multiset;
use avl_multiset::{Error, OrderedMultiset, Rank};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Values are drawn from a narrow range so that duplicates are common.
fn value_strategy() -> impl Strategy<Value = i64> {
    -200i64..200i64
}

/// Expands a counting model into the sorted sequence of occurrences.
fn occurrences(model: &BTreeMap<i64, usize>) -> Vec<i64> {
    model.iter().flat_map(|(&value, &count)| std::iter::repeat_n(value, count)).collect()
}

fn scenario() -> OrderedMultiset<i64> {
    [10, 20, 20, 30, 40, 50, 25, 20].into_iter().collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MultisetOp {
    Insert(i64),
    Remove(i64),
    Count(i64),
    Contains(i64),
    RankLessThan(i64),
    At(isize),
}

fn multiset_op_strategy() -> impl Strategy<Value = MultisetOp> {
    prop_oneof![
        6 => value_strategy().prop_map(MultisetOp::Insert),
        4 => value_strategy().prop_map(MultisetOp::Remove),
        2 => value_strategy().prop_map(MultisetOp::Count),
        1 => value_strategy().prop_map(MultisetOp::Contains),
        2 => value_strategy().prop_map(MultisetOp::RankLessThan),
        2 => (-3_000isize..3_000).prop_map(MultisetOp::At),
    ]
}

// ─── Model-based tests ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both an `OrderedMultiset` and a
    /// `BTreeMap` counting model and asserts identical results at every step.
    #[test]
    fn ops_match_counting_model(ops in proptest::collection::vec(multiset_op_strategy(), TEST_SIZE)) {
        let mut multiset: OrderedMultiset<i64> = OrderedMultiset::new();
        let mut model: BTreeMap<i64, usize> = BTreeMap::new();
        let mut len = 0usize;

        for op in &ops {
            match *op {
                MultisetOp::Insert(v) => {
                    multiset.insert(v);
                    *model.entry(v).or_default() += 1;
                    len += 1;
                }
                MultisetOp::Remove(v) => {
                    let expected = match model.get_mut(&v) {
                        Some(count) if *count > 1 => {
                            *count -= 1;
                            true
                        }
                        Some(_) => model.remove(&v).is_some(),
                        None => false,
                    };
                    if expected {
                        len -= 1;
                    }
                    prop_assert_eq!(multiset.remove(&v), expected, "remove({})", v);
                }
                MultisetOp::Count(v) => {
                    prop_assert_eq!(multiset.count(&v), model.get(&v).copied().unwrap_or(0), "count({})", v);
                }
                MultisetOp::Contains(v) => {
                    prop_assert_eq!(multiset.contains(&v), model.contains_key(&v), "contains({})", v);
                }
                MultisetOp::RankLessThan(v) => {
                    let expected: usize = model.range(..v).map(|(_, count)| count).sum();
                    prop_assert_eq!(multiset.rank_less_than(&v), expected, "rank_less_than({})", v);
                }
                MultisetOp::At(index) => {
                    let sorted = occurrences(&model);
                    let resolved = if index < 0 { sorted.len().checked_sub(index.unsigned_abs()) } else { Some(index.unsigned_abs()) };
                    let expected = match resolved.and_then(|i| sorted.get(i)) {
                        Some(value) => Ok(value),
                        None => Err(Error::IndexOutOfRange { index, len: sorted.len() }),
                    };
                    prop_assert_eq!(multiset.at(index), expected, "at({})", index);
                }
            }
            prop_assert_eq!(multiset.len(), len, "len mismatch after {:?}", op);
            prop_assert_eq!(multiset.is_empty(), len == 0, "is_empty mismatch after {:?}", op);
        }

        let items: Vec<_> = multiset.iter().copied().collect();
        prop_assert_eq!(items, occurrences(&model));
        let unique: Vec<_> = multiset.iter_unique().copied().collect();
        prop_assert_eq!(unique, model.keys().copied().collect::<Vec<_>>());
    }

    /// Iteration is sorted, matches `len`, and distinct values are strictly increasing.
    #[test]
    fn iteration_is_sorted(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let multiset: OrderedMultiset<i64> = values.iter().copied().collect();

        let items: Vec<_> = multiset.iter().copied().collect();
        prop_assert_eq!(items.len(), multiset.len());
        prop_assert_eq!(multiset.iter().len(), multiset.len());
        prop_assert!(items.windows(2).all(|w| w[0] <= w[1]), "iter() not sorted");

        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(&items, &expected);

        let unique: Vec<_> = multiset.iter_unique().copied().collect();
        prop_assert!(unique.windows(2).all(|w| w[0] < w[1]), "iter_unique() not strictly increasing");
        expected.dedup();
        prop_assert_eq!(&unique, &expected);
        prop_assert_eq!(multiset.iter_unique().len(), unique.len());

        let total: usize = multiset.counts().map(|(_, count)| count).sum();
        prop_assert_eq!(total, multiset.len());

        // A second traversal starts from the beginning again.
        prop_assert_eq!(multiset.iter().copied().collect::<Vec<_>>(), items);
    }

    /// `rank_less_than(at(i)) <= i < rank_less_than(at(i)) + count(at(i))` for every valid `i`.
    #[test]
    fn rank_and_select_are_inverse(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let multiset: OrderedMultiset<i64> = values.iter().copied().collect();
        let len = isize::try_from(multiset.len()).expect("fits in isize");

        for index in 0..len {
            let value = *multiset.at(index).expect("index in range");
            let rank = isize::try_from(multiset.rank_less_than(&value)).expect("fits in isize");
            let count = isize::try_from(multiset.count(&value)).expect("fits in isize");
            prop_assert!(rank <= index && index < rank + count, "at({}) = {}, rank {}, count {}", index, value, rank, count);

            prop_assert_eq!(multiset.at(index - len), Ok(&value), "negative index {}", index - len);
            prop_assert_eq!(multiset[Rank(index.unsigned_abs())], value);
        }

        prop_assert!(multiset.at(len).is_err());
        prop_assert!(multiset.at(-len - 1).is_err());
    }

    /// Inserting a value and then removing it once leaves the observed sequence unchanged.
    #[test]
    fn insert_then_remove_round_trips(
        values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE),
        extra in value_strategy(),
    ) {
        let mut multiset: OrderedMultiset<i64> = values.iter().copied().collect();
        let before: Vec<_> = multiset.iter().copied().collect();

        multiset.insert(extra);
        prop_assert!(multiset.remove(&extra));

        let after: Vec<_> = multiset.iter().copied().collect();
        prop_assert_eq!(before, after);
    }

    /// Draining every value, in any order, empties the multiset.
    #[test]
    fn removing_everything_empties(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let mut multiset: OrderedMultiset<i64> = values.iter().copied().collect();

        for value in values.iter().rev() {
            prop_assert!(multiset.remove(value));
        }

        prop_assert!(multiset.is_empty());
        prop_assert_eq!(multiset.iter().count(), 0);
        prop_assert!(multiset.first().is_none());
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_inserts() {
    let multiset = scenario();

    assert_eq!(multiset.len(), 8);
    assert_eq!(multiset.count(&20), 3);
    assert_eq!(multiset.at(0), Ok(&10));
    assert_eq!(multiset.at(-1), Ok(&50));
    assert_eq!(multiset.iter_unique().copied().collect::<Vec<_>>(), [10, 20, 25, 30, 40, 50]);
    assert_eq!(multiset.iter().copied().collect::<Vec<_>>(), [10, 20, 20, 20, 25, 30, 40, 50]);
}

#[test]
fn scenario_remove_once() {
    let mut multiset = scenario();

    assert!(multiset.remove(&20));
    assert_eq!(multiset.count(&20), 2);
    assert_eq!(multiset.len(), 7);
}

#[test]
fn scenario_remove_absent_is_a_no_op() {
    let mut multiset = scenario();
    let before = multiset.clone();

    assert!(!multiset.remove(&999));
    assert_eq!(multiset.len(), 8);
    assert_eq!(multiset, before);
    assert_eq!(multiset.counts().collect::<Vec<_>>(), before.counts().collect::<Vec<_>>());
}

#[test]
fn scenario_at_out_of_range() {
    let multiset = scenario();

    assert_eq!(
        multiset.at(8),
        Err(Error::IndexOutOfRange {
            index: 8,
            len: 8
        })
    );
    assert_eq!(multiset.at(-8), Ok(&10));
    assert!(multiset.at(-9).is_err());
    assert!(multiset.at(isize::MIN).is_err());
    assert!(multiset.at(isize::MAX).is_err());
}

#[test]
fn scenario_rank_less_than() {
    let multiset = OrderedMultiset::from([10, 20, 20, 20, 25, 30]);
    assert_eq!(multiset.rank_less_than(&25), 4);
}

#[test]
fn scenario_remove_sequence() {
    let mut multiset = scenario();

    for value in [20, 30, 10, 20, 20] {
        assert!(multiset.remove(&value));
    }

    assert_eq!(multiset.iter().copied().collect::<Vec<_>>(), [25, 40, 50]);
    assert!(!multiset.contains(&20));
    assert_eq!(multiset.count(&20), 0);
}

// ─── Surface ─────────────────────────────────────────────────────────────────

#[test]
fn empty_multiset() {
    let multiset: OrderedMultiset<i64> = OrderedMultiset::default();

    assert!(multiset.is_empty());
    assert_eq!(multiset.len(), 0);
    assert_eq!(multiset.at(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));
    assert_eq!(multiset.at(-1), Err(Error::IndexOutOfRange { index: -1, len: 0 }));
    assert_eq!(multiset.rank_less_than(&0), 0);
    assert!(multiset.get_by_rank(0).is_none());
    assert_eq!(multiset.structure().to_string(), "OrderedMultiset()");
    assert_eq!(format!("{multiset:?}"), "[]");
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_by_rank_out_of_bounds_panics() {
    let multiset = OrderedMultiset::from([1, 2, 3]);
    let _ = multiset[Rank(3)];
}

#[test]
fn borrowed_lookups() {
    let mut multiset: OrderedMultiset<String> = ["pear", "apple", "pear"].into_iter().map(String::from).collect();

    assert!(multiset.contains("apple"));
    assert_eq!(multiset.count("pear"), 2);
    assert_eq!(multiset.rank_less_than("pear"), 1);
    assert!(multiset.remove("pear"));
    assert_eq!(multiset.count("pear"), 1);
}

#[test]
fn first_last_and_clear() {
    let mut multiset = OrderedMultiset::from([5, 3, 9, 3]);

    assert_eq!(multiset.first(), Some(&3));
    assert_eq!(multiset.last(), Some(&9));

    multiset.clear();
    assert!(multiset.is_empty());
    assert!(multiset.first().is_none());

    multiset.insert(4);
    assert_eq!(multiset.iter().copied().collect::<Vec<_>>(), [4]);
}

#[test]
fn extend_by_reference() {
    let mut multiset: OrderedMultiset<i32> = OrderedMultiset::new();
    multiset.extend(&[3, 1, 3]);
    multiset.extend(vec![2]);

    let iter: ordered_multiset::Iter<'_, i32> = multiset.iter();
    assert_eq!(iter.copied().collect::<Vec<_>>(), [1, 2, 3, 3]);
}

#[test]
fn equal_multisets_hash_equally() {
    fn hash_of(multiset: &OrderedMultiset<i64>) -> u64 {
        let mut hasher = DefaultHasher::new();
        multiset.hash(&mut hasher);
        hasher.finish()
    }

    let a = OrderedMultiset::from([1, 2, 2]);
    let b = OrderedMultiset::from([2, 1, 2]);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn structure_shows_balanced_tree() {
    let multiset = OrderedMultiset::from([10, 20, 30, 40, 50, 25]);

    assert_eq!(
        multiset.structure().to_string(),
        "    10: 0 < 1 > 0\n  20: 1 < 1 > 1\n    25: 0 < 1 > 0\n30: 3 < 1 > 2\n  40: 0 < 1 > 1\n    50: 0 < 1 > 0\n"
    );
}
