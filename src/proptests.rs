use super::*;

use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Add(Vec<u8>, u32),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    Clear,
    Compact,
}

// a tiny alphabet and short chains so that chains share prefixes often
fn chain_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 1..5)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => (chain_strategy(), any::<u32>()).prop_map(|(keys, value)| Op::Add(keys, value)),
        3 => chain_strategy().prop_map(Op::Remove),
        4 => chain_strategy().prop_map(Op::Get),
        1 => Just(Op::Clear),
        1 => Just(Op::Compact),
    ];
    prop::collection::vec(op, 0..200)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_flat_map(ops in ops_strategy()) {
        let mut tree: KeyChainTree<u8, u32> = KeyChainTree::new();
        let mut model: HashMap<Vec<u8>, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(keys, value) => {
                    let old_tree = tree.add(keys.iter().copied(), value).unwrap();
                    let old_model = model.insert(keys, value);
                    prop_assert_eq!(old_tree, old_model);
                }
                Op::Remove(keys) => {
                    let old_tree = tree.remove(&keys).unwrap();
                    let old_model = model.get(&keys).copied();
                    // every chain that has `keys` as a prefix goes away with it
                    model.retain(|stored, _| !stored.starts_with(&keys));
                    prop_assert_eq!(old_tree, old_model);
                }
                Op::Get(keys) => {
                    let got_tree = tree.try_get(&keys).unwrap().copied();
                    let got_model = model.get(&keys).copied();
                    prop_assert_eq!(got_tree, got_model);
                }
                Op::Clear => {
                    tree.clear();
                    model.clear();
                    prop_assert_eq!(tree.node_count(), 0);
                }
                Op::Compact => {
                    tree.compact();
                }
            }

            prop_assert_eq!(tree.len(), model.len());
        }

        for (keys, value) in &model {
            prop_assert_eq!(tree.try_get(keys).unwrap(), Some(value));
        }
    }

    #[test]
    fn prop_compact_leaves_only_useful_nodes(
        chains in prop::collection::vec(chain_strategy(), 1..50),
        removed in prop::collection::vec(chain_strategy(), 0..50),
    ) {
        let mut tree: KeyChainTree<u8, usize> = KeyChainTree::new();

        for (i, keys) in chains.iter().enumerate() {
            tree.add(keys.iter().copied(), i).unwrap();
        }
        for keys in &removed {
            tree.remove(keys).unwrap();
        }

        let before: Vec<_> = chains
            .iter()
            .map(|keys| tree.try_get(keys).unwrap().copied())
            .collect();

        tree.compact();

        let after: Vec<_> = chains
            .iter()
            .map(|keys| tree.try_get(keys).unwrap().copied())
            .collect();
        prop_assert_eq!(before, after);

        // every remaining node lies on the path of a surviving chain
        let mut paths: std::collections::HashSet<&[u8]> = std::collections::HashSet::new();
        for keys in &chains {
            if tree.contains(keys).unwrap() {
                paths.extend((1..=keys.len()).map(|n| &keys[..n]));
            }
        }
        prop_assert_eq!(tree.node_count(), paths.len());
    }
}
