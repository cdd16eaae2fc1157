//! Integration tests for the B+ tree: structural invariants, the
//! split/merge scenarios, persistence and a randomized stress run.

use std::collections::BTreeMap;

use arbor::buffer::BufferPoolManager;
use arbor::index::{page_type, InternalPageRef, LeafPageRef, PageType};
use arbor::{ArborError, BPlusTree, PageId};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

const LEAF_MAX: usize = 4;
const INTERNAL_MAX: usize = 4;

fn create_small_tree() -> (BPlusTree<u32, u64>, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let tree =
        BPlusTree::open_with_capacity(temp_file.path(), 16, LEAF_MAX, INTERNAL_MAX).unwrap();
    (tree, temp_file)
}

/// Walks the whole tree checking per-page size bounds, in-page key order
/// and uniform depth. Returns the subtree height.
fn check_node(
    bpm: &BufferPoolManager,
    page_id: PageId,
    is_root: bool,
    total_keys: &mut u64,
) -> usize {
    let children: Vec<PageId> = {
        let guard = bpm.read_page(page_id).unwrap();
        match page_type(guard.data()).unwrap() {
            PageType::Leaf => {
                let leaf = LeafPageRef::<u32, u64>::new(guard.data());
                let size = leaf.size();
                if is_root {
                    assert!(size >= 1, "root leaf {page_id} is empty");
                } else {
                    assert!(size >= LEAF_MAX / 2, "leaf {page_id} underflowed: {size}");
                }
                assert!(size <= LEAF_MAX, "leaf {page_id} overflowed: {size}");
                for i in 1..size {
                    assert!(leaf.key_at(i - 1) < leaf.key_at(i), "leaf {page_id} unsorted");
                }
                *total_keys += size as u64;
                return 1;
            }
            PageType::Internal => {
                let node = InternalPageRef::<u32>::new(guard.data());
                let size = node.size();
                if is_root {
                    assert!(size >= 2, "internal root {page_id} has {size} children");
                } else {
                    assert!(
                        size >= (INTERNAL_MAX + 1) / 2,
                        "internal {page_id} underflowed: {size}"
                    );
                }
                assert!(size <= INTERNAL_MAX, "internal {page_id} overflowed: {size}");
                for i in 2..size {
                    assert!(node.key_at(i - 1) < node.key_at(i), "internal {page_id} unsorted");
                }
                (0..size).map(|i| node.child_at(i)).collect()
            }
        }
    };

    let depths: Vec<usize> = children
        .iter()
        .map(|&child| check_node(bpm, child, false, total_keys))
        .collect();
    assert!(
        depths.windows(2).all(|w| w[0] == w[1]),
        "children of {page_id} have uneven depth"
    );
    depths[0] + 1
}

fn check_invariants(tree: &BPlusTree<u32, u64>) -> usize {
    let Some(root_id) = tree.root_page_id() else {
        assert!(tree.is_empty());
        return 0;
    };

    let mut total_keys = 0;
    let depth = check_node(tree.buffer_pool(), root_id, true, &mut total_keys);
    assert_eq!(total_keys, tree.len(), "leaf entries disagree with key count");

    // The leaf chain yields every key in strictly ascending order
    let mut previous: Option<u32> = None;
    let mut seen = 0u64;
    for entry in tree.iter().unwrap() {
        let (key, _) = entry.unwrap();
        if let Some(prev) = previous {
            assert!(key > prev, "leaf chain out of order at key {key}");
        }
        previous = Some(key);
        seen += 1;
    }
    assert_eq!(seen, tree.len());

    depth
}

#[test]
fn test_fifty_keys_build_multi_level_tree() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=50u32 {
        tree.insert(&key, &(key as u64 * 10)).unwrap();
    }

    let depth = check_invariants(&tree);
    assert!(depth >= 3, "50 keys at fan-out 4 must stack levels, got {depth}");

    // A full range scan yields exactly 1..=50 ascending
    let values = tree.get_range(&1, &50).unwrap();
    assert_eq!(values.len(), 50);
    for (i, value) in values.iter().enumerate() {
        assert_eq!(*value, (i as u64 + 1) * 10);
    }
}

#[test]
fn test_sequential_removal_keeps_invariants() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=20u32 {
        tree.insert(&key, &(key as u64)).unwrap();
    }
    check_invariants(&tree);

    for key in 1..=15u32 {
        tree.remove(&key).unwrap();
        check_invariants(&tree);
    }

    let remaining: Vec<u32> = tree
        .iter()
        .unwrap()
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(remaining, vec![16, 17, 18, 19, 20]);
}

#[test]
fn test_reverse_insertion_order() {
    let (mut tree, _temp) = create_small_tree();

    for key in (1..=30u32).rev() {
        tree.insert(&key, &(key as u64)).unwrap();
    }
    check_invariants(&tree);

    let keys: Vec<u32> = tree.iter().unwrap().map(|e| e.unwrap().0).collect();
    assert_eq!(keys, (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_single_key_lifecycle() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    {
        let mut tree: BPlusTree<u32, u64> =
            BPlusTree::open_with_capacity(&path, 16, LEAF_MAX, INTERNAL_MAX).unwrap();
        tree.insert(&42, &420).unwrap();
        assert!(!tree.is_empty());

        tree.remove(&42).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.root_page_id(), None);
        tree.close().unwrap();
    }

    // Emptiness survives a reopen
    let tree: BPlusTree<u32, u64> =
        BPlusTree::open_with_capacity(&path, 16, LEAF_MAX, INTERNAL_MAX).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.get(&42).unwrap(), None);
}

#[test]
fn test_close_and_reopen_round_trip() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    {
        let mut tree: BPlusTree<u32, u64> =
            BPlusTree::open_with_capacity(&path, 16, LEAF_MAX, INTERNAL_MAX).unwrap();
        for key in 1..=100u32 {
            tree.insert(&key, &(key as u64 * 7)).unwrap();
        }
        tree.close().unwrap();
    }

    let tree: BPlusTree<u32, u64> =
        BPlusTree::open_with_capacity(&path, 16, LEAF_MAX, INTERNAL_MAX).unwrap();
    assert_eq!(tree.len(), 100);
    check_invariants(&tree);
    for key in 1..=100u32 {
        assert_eq!(tree.get(&key).unwrap(), Some(key as u64 * 7), "key {key}");
    }
}

#[test]
fn test_lookup_is_idempotent() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=25u32 {
        tree.insert(&key, &(key as u64)).unwrap();
    }

    let root_before = tree.root_page_id();
    for _ in 0..3 {
        assert_eq!(tree.get(&13).unwrap(), Some(13));
        assert_eq!(tree.get(&99).unwrap(), None);
    }
    assert_eq!(tree.root_page_id(), root_before);
    check_invariants(&tree);
}

#[test]
fn test_duplicate_insert_leaves_tree_unchanged() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=10u32 {
        tree.insert(&key, &(key as u64 * 100)).unwrap();
    }

    assert!(matches!(
        tree.insert(&5, &0),
        Err(ArborError::DuplicateKey)
    ));
    assert_eq!(tree.len(), 10);
    assert_eq!(tree.get(&5).unwrap(), Some(500));
    check_invariants(&tree);
}

#[test]
fn test_remove_absent_leaves_tree_unchanged() {
    let (mut tree, _temp) = create_small_tree();

    for key in [2u32, 4, 6, 8] {
        tree.insert(&key, &(key as u64)).unwrap();
    }

    assert!(matches!(tree.remove(&5), Err(ArborError::KeyNotFound)));
    assert_eq!(tree.len(), 4);
    check_invariants(&tree);
}

#[test]
fn test_iter_from_starts_at_first_key_at_or_above() {
    let (mut tree, _temp) = create_small_tree();

    for key in (10..=100u32).step_by(10) {
        tree.insert(&key, &(key as u64)).unwrap();
    }

    let from_between: Vec<u32> = tree
        .iter_from(&35)
        .unwrap()
        .map(|e| e.unwrap().0)
        .collect();
    assert_eq!(from_between, vec![40, 50, 60, 70, 80, 90, 100]);

    let from_exact: Vec<u32> = tree.iter_from(&40).unwrap().map(|e| e.unwrap().0).collect();
    assert_eq!(from_exact, vec![40, 50, 60, 70, 80, 90, 100]);

    let past_end: Vec<u32> = tree.iter_from(&101).unwrap().map(|e| e.unwrap().0).collect();
    assert!(past_end.is_empty());
}

#[test]
fn test_range_bounds_are_inclusive() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=20u32 {
        tree.insert(&key, &(key as u64)).unwrap();
    }

    assert_eq!(tree.get_range(&5, &8).unwrap(), vec![5, 6, 7, 8]);
    assert_eq!(tree.get_range(&1, &1).unwrap(), vec![1]);
    assert_eq!(tree.get_range(&18, &30).unwrap(), vec![18, 19, 20]);
    assert!(tree.get_range(&9, &5).unwrap().is_empty());
}

#[test]
fn test_interleaved_growth_and_shrink() {
    let (mut tree, _temp) = create_small_tree();

    for key in 1..=200u32 {
        tree.insert(&key, &(key as u64)).unwrap();
    }
    check_invariants(&tree);

    // Thin out every other key, forcing redistribution and merges at
    // several levels
    for key in (1..=200u32).filter(|k| k % 2 == 0) {
        tree.remove(&key).unwrap();
    }
    check_invariants(&tree);
    assert_eq!(tree.len(), 100);

    for key in (1..=200u32).filter(|k| k % 2 == 1) {
        tree.remove(&key).unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root_page_id(), None);
}

#[test]
fn test_composite_byte_string_keys() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut tree: BPlusTree<([u8; 8], u32), u64> =
        BPlusTree::open_with_capacity(temp_file.path(), 16, 4, 4).unwrap();

    let users: [&[u8; 8]; 3] = [b"alice\0\0\0", b"bob\0\0\0\0\0", b"carol\0\0\0"];
    for (u, user) in users.iter().enumerate() {
        for index in 0..5u32 {
            tree.insert(&(**user, index), &((u as u64) * 100 + index as u64))
                .unwrap();
        }
    }

    assert_eq!(tree.len(), 15);
    assert_eq!(tree.get(&(*users[1], 3)).unwrap(), Some(103));

    // A per-user scan picks up exactly that user's entries, in index order
    let bobs = tree
        .get_range(&(*users[1], 0), &(*users[1], u32::MAX))
        .unwrap();
    assert_eq!(bobs, vec![100, 101, 102, 103, 104]);
}

#[test]
fn test_iterator_equality_tracks_position() {
    let (mut tree, _temp) = create_small_tree();
    for key in 1..=10u32 {
        tree.insert(&key, &(key as u64)).unwrap();
    }

    let a = tree.iter().unwrap();
    let b = tree.iter().unwrap();
    assert!(a == b);

    // Advancing moves the position out from under the others
    let mut c = tree.iter().unwrap();
    c.next_entry().unwrap();
    assert!(a != c);

    // Starting from the smallest key lands on the same position
    let d = tree.iter_from(&1).unwrap();
    assert!(a == d);

    // Exhausted iterators compare equal regardless of path taken
    let mut e = tree.iter().unwrap();
    while e.next_entry().unwrap().is_some() {}
    let mut f = tree.iter_from(&8).unwrap();
    while f.next_entry().unwrap().is_some() {}
    assert!(e == f);
}

#[test]
fn test_random_ops_match_btreemap() {
    let (mut tree, _temp) = create_small_tree();
    let mut model: BTreeMap<u32, u64> = BTreeMap::new();
    let mut rng = StdRng::seed_from_u64(0xA5B0_57E3);

    for op in 0..2000 {
        let key = rng.gen_range(0..500u32);
        match rng.gen_range(0..3) {
            0 => {
                let value = rng.gen::<u64>();
                let expected = model.insert(key, value);
                match expected {
                    None => tree.insert(&key, &value).unwrap(),
                    Some(old) => {
                        // Key already present; both sides keep the old value
                        assert!(matches!(
                            tree.insert(&key, &value),
                            Err(ArborError::DuplicateKey)
                        ));
                        model.insert(key, old);
                    }
                }
            }
            1 => match model.remove(&key) {
                Some(_) => tree.remove(&key).unwrap(),
                None => {
                    assert!(matches!(tree.remove(&key), Err(ArborError::KeyNotFound)));
                }
            },
            _ => {
                assert_eq!(tree.get(&key).unwrap(), model.get(&key).copied(), "key {key}");
            }
        }

        if op % 250 == 249 {
            check_invariants(&tree);
        }
    }

    check_invariants(&tree);
    assert_eq!(tree.len(), model.len() as u64);

    let tree_entries: Vec<(u32, u64)> = tree
        .iter()
        .unwrap()
        .map(|entry| entry.unwrap())
        .collect();
    let model_entries: Vec<(u32, u64)> = model.into_iter().collect();
    assert_eq!(tree_entries, model_entries);
}
