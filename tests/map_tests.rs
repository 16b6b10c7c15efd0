//! Integration tests for Map and MultiMap.

use rbtree::collections::{Map, MultiMap};
use rbtree::error::DuplicateKey;
use rstest::rstest;

// =============================================================================
// Map
// =============================================================================

#[rstest]
fn test_map_lookup_by_key() {
    let map: Map<String, u32> = [("b".to_string(), 2), ("a".to_string(), 1)]
        .into_iter()
        .collect();
    assert_eq!(map.get(&"a".to_string()), Some(&1));
    assert_eq!(map.get(&"z".to_string()), None);
    assert!(map.contains_key(&"b".to_string()));
    assert_eq!(map.len(), 2);
}

#[rstest]
fn test_map_insert_keeps_existing_value() {
    let mut map: Map<u8, &str> = Map::new();
    let (first, inserted) = map.insert(1, "first");
    assert!(inserted);
    let (again, inserted) = map.insert(1, "second");
    assert!(!inserted);
    assert_eq!(first, again);
    assert_eq!(map.get(&1), Some(&"first"));
}

#[rstest]
fn test_map_try_insert_returns_pair_on_conflict() {
    let mut map: Map<u8, Vec<u8>> = Map::new();
    let original = map.try_insert(1, vec![1]).unwrap();
    match map.try_insert(1, vec![2, 2]) {
        Err(DuplicateKey { existing, data }) => {
            assert_eq!(existing, original);
            assert_eq!(data.into_parts(), (1, vec![2, 2]));
        }
        Ok(_) => panic!("duplicate accepted"),
    }
}

#[rstest]
fn test_map_get_mut_updates_in_place() {
    let mut map: Map<u8, Vec<u8>> = Map::new();
    map.insert(3, Vec::new());
    if let Some(values) = map.get_mut(&3) {
        values.push(9);
    }
    assert_eq!(map.get(&3), Some(&vec![9]));
    assert_eq!(map.get_mut(&4), None);
}

#[rstest]
fn test_map_value_access_through_positions() {
    let mut map: Map<i32, i32> = (0..8).map(|key| (key, 0)).collect();
    let mut position = map.begin();
    while position != map.end() {
        let key = *map.key(position).unwrap_or(&0);
        map.set_value(position, key * key);
        position = map.next(position);
    }
    let values: Vec<_> = map.values().copied().collect();
    assert_eq!(values, vec![0, 1, 4, 9, 16, 25, 36, 49]);
    assert!(map.verify().is_ok());
}

#[rstest]
fn test_map_insert_or_assign() {
    let mut map: Map<&str, i32> = Map::new();
    assert_eq!(map.insert_or_assign("x", 1).1, None);
    assert_eq!(map.insert_or_assign("x", 2).1, Some(1));
    assert_eq!(map.get(&"x"), Some(&2));
    assert_eq!(map.len(), 1);
}

#[rstest]
fn test_map_erase_and_bounds() {
    let mut map: Map<i32, char> = [(10, 'a'), (20, 'b'), (30, 'c')].into_iter().collect();
    assert_eq!(map.entry(map.lower_bound(&15)), Some((&20, &'b')));
    assert_eq!(map.entry(map.upper_bound(&20)), Some((&30, &'c')));
    assert_eq!(map.erase(&20), 1);
    assert_eq!(map.erase(&20), 0);
    assert_eq!(map.entry(map.lower_bound(&15)), Some((&30, &'c')));
}

#[rstest]
fn test_map_equality_and_clone() {
    let map: Map<i32, i32> = (0..5).map(|key| (key, -key)).collect();
    let copy = map.clone();
    assert_eq!(map, copy);
    let mut changed = copy.clone();
    changed.insert_or_assign(2, 100);
    assert_ne!(map, changed);
}

#[rstest]
fn test_map_range_iterates_pairs() {
    let map: Map<i32, i32> = (0..10).map(|key| (key, key * 2)).collect();
    let pairs: Vec<_> = map
        .range(map.find(&2), map.find(&5))
        .map(|(key, value)| (*key, *value))
        .collect();
    assert_eq!(pairs, vec![(2, 4), (3, 6), (4, 8)]);
}

// =============================================================================
// MultiMap
// =============================================================================

#[rstest]
fn test_multimap_keeps_every_pair() {
    let mut map: MultiMap<&str, u32> = MultiMap::new();
    map.insert("k", 1);
    map.insert("k", 2);
    map.insert("j", 0);
    assert_eq!(map.len(), 3);
    assert_eq!(map.count(&"k"), 2);
    let mut values: Vec<_> = map.get_all(&"k").copied().collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2]);
}

#[rstest]
fn test_multimap_erase_run() {
    let mut map: MultiMap<u8, u8> = [(1, 1), (2, 2), (1, 3), (3, 3), (1, 5)].into_iter().collect();
    assert_eq!(map.erase(&1), 3);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    assert!(map.verify().is_ok());
}

#[rstest]
fn test_multimap_value_mut_on_one_duplicate() {
    let mut map: MultiMap<u8, u8> = MultiMap::new();
    let (first, _) = map.insert(1, 10);
    let (second, _) = map.insert(1, 20);
    if let Some(value) = map.value_mut(first) {
        *value += 1;
    }
    assert_eq!(map.value(first), Some(&11));
    assert_eq!(map.value(second), Some(&20));
}

#[rstest]
fn test_multimap_debug_lists_pairs_in_order() {
    let map: MultiMap<u8, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
}
