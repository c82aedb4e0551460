use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

/// Checks BST order, cached heights, AVL balance and the live count.
pub(crate) fn validate_tree<K: Ord + fmt::Debug>(t: &AvlTree<K>) {
    fn walk<'a, K: Ord + fmt::Debug>(node: Option<&'a Node<K>>, keys: &mut Vec<&'a K>) -> u32 {
        let Some(n) = node else {
            return 0;
        };
        let lh = walk(n.left(), keys);
        keys.push(n.key());
        let rh = walk(n.right(), keys);
        assert_eq!(
            n.height(),
            1 + lh.max(rh),
            "stale cached height at {:?}",
            n.key()
        );
        assert!(
            (i64::from(lh) - i64::from(rh)).abs() <= 1,
            "unbalanced at {:?}: left {lh}, right {rh}",
            n.key()
        );
        n.height()
    }

    let mut keys = Vec::new();
    let h = walk(t.root(), &mut keys);
    assert_eq!(h, t.height());
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "in-order keys must be strictly increasing: {keys:?}"
    );
    assert_eq!(keys.len(), t.len(), "reachable node count must match len");
}

/// Checks the step log left behind by one call against what the call did.
fn validate_steps(t: &AvlTree<i16>, op: &Op<i16>, changed: bool, len_before: usize) {
    let steps = t.steps();
    let last = steps.last().expect("every call records a completion step");
    assert_eq!(last.snapshot(), &t.snapshot(), "last step must mirror the live tree");
    assert_eq!(
        steps.iter().filter(|s| s.kind().is_completion()).count(),
        1,
        "exactly one completion step"
    );

    let live_keys: Vec<i16> = t.iter().copied().collect();

    match (op, changed) {
        (Op::Insert(_), false) => {
            assert_eq!(steps.len(), 1);
            assert_eq!(last.kind(), &StepKind::InsertionComplete);
        }
        (Op::Delete(_), false) => {
            assert_eq!(steps.len(), 1);
            assert_eq!(last.kind(), &StepKind::DeletionComplete);
        }
        (Op::Insert(key), true) => {
            assert_eq!(steps[0].kind(), &StepKind::NodeCreated(*key));
            assert_eq!(last.kind(), &StepKind::InsertionComplete);
            let rotations = steps.iter().filter(|s| s.kind().is_rotation()).count();
            assert!(rotations <= 2, "insert rebalances at most once");
            // Rotations never disturb key order.
            for step in steps {
                let keys: Vec<i16> = step.snapshot().keys().into_iter().copied().collect();
                assert_eq!(keys, live_keys);
            }
        }
        (Op::Delete(key), true) => {
            assert_eq!(last.kind(), &StepKind::DeletionComplete);
            let removal = match steps[0].kind() {
                StepKind::ValueReplaced { removed, promoted } => {
                    assert_eq!(removed, key);
                    assert!(promoted > key);
                    assert_eq!(steps[0].snapshot().len(), len_before);
                    assert_eq!(steps[1].kind(), &StepKind::NodeRemoved(*promoted));
                    1
                }
                StepKind::NodeRemoved(removed) => {
                    assert_eq!(removed, key);
                    0
                }
                other => panic!("unexpected first delete step: {other:?}"),
            };
            for step in &steps[removal..] {
                let keys: Vec<i16> = step.snapshot().keys().into_iter().copied().collect();
                assert_eq!(keys, live_keys);
            }
        }
    }
}

#[derive(Arbitrary, Clone, Debug)]
enum TestOp {
    Insert(#[proptest(strategy = "-64i16..64")] i16),
    Delete(#[proptest(strategy = "-64i16..64")] i16),
}

impl From<TestOp> for Op<i16> {
    fn from(op: TestOp) -> Self {
        match op {
            TestOp::Insert(k) => Op::Insert(k),
            TestOp::Delete(k) => Op::Delete(k),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(ops in prop::collection::vec(any::<TestOp>(), 0..=400)) {
        let mut t: AvlTree<i16> = AvlTree::new();
        let mut m: BTreeSet<i16> = BTreeSet::new();

        for op in ops {
            let op: Op<i16> = op.into();
            let len_before = t.len();
            let changed = match &op {
                Op::Insert(k) => {
                    let changed = t.insert(*k);
                    prop_assert_eq!(changed, m.insert(*k));
                    changed
                }
                Op::Delete(k) => {
                    let changed = t.delete(k);
                    prop_assert_eq!(changed, m.remove(k));
                    changed
                }
            };
            prop_assert_eq!(t.len(), m.len());
            validate_tree(&t);
            validate_steps(&t, &op, changed, len_before);
        }

        let got: Vec<i16> = t.iter().copied().collect();
        let expected: Vec<i16> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_recorded_steps_are_frozen(
        first in prop::collection::vec(any::<TestOp>(), 1..=50),
        later in prop::collection::vec(any::<TestOp>(), 1..=50),
    ) {
        let mut t: AvlTree<i16> = AvlTree::new();
        for op in first {
            t.apply(op.into());
        }
        let held = t.steps().to_vec();
        let rendered: Vec<String> = held.iter().map(|s| s.to_string()).collect();

        for op in later {
            t.apply(op.into());
        }

        let again: Vec<String> = held.iter().map(|s| s.to_string()).collect();
        prop_assert_eq!(rendered, again);
    }
}

/// Calls `f` once per ordering of `items`, permuting a scratch copy in place
/// by swapping each remaining element into the next position.
fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn permute<T: Clone>(scratch: &mut [T], fixed: usize, f: &mut impl FnMut(Vec<T>)) {
        if fixed == scratch.len() {
            f(scratch.to_vec());
            return;
        }
        for pick in fixed..scratch.len() {
            scratch.swap(fixed, pick);
            permute(scratch, fixed + 1, f);
            scratch.swap(fixed, pick);
        }
    }

    let mut scratch = items.to_vec();
    permute(&mut scratch, 0, &mut f);
}

#[test]
fn permutations_cover_every_ordering_once() {
    let mut seen = BTreeSet::new();
    let mut calls = 0;
    for_each_permutation(&[1, 2, 3, 4], |perm| {
        calls += 1;
        seen.insert(perm);
    });
    assert_eq!(calls, 24);
    assert_eq!(seen.len(), 24);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<i16> = vec![1, 2, 3, 4, 5, 6, 7];

    for_each_permutation(&keys, |perm| {
        let mut t: AvlTree<i16> = AvlTree::new();
        for k in perm {
            let before = t.len();
            assert!(t.insert(k));
            validate_tree(&t);
            validate_steps(&t, &Op::Insert(k), true, before);
        }
        // The sparsest AVL tree of height 4 has exactly 7 nodes.
        assert!(t.height() <= 4);
        assert_eq!(t.iter().copied().collect::<Vec<_>>(), keys);
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    let keys: Vec<i16> = vec![10, 20, 30, 40, 50, 60];

    for_each_permutation(&keys, |perm| {
        let mut t: AvlTree<i16> = keys.iter().copied().collect();
        for k in perm {
            let before = t.len();
            assert!(t.delete(&k));
            assert!(!t.contains(&k));
            validate_tree(&t);
            validate_steps(&t, &Op::Delete(k), true, before);
        }
        assert!(t.is_empty());
        assert!(t.root().is_none());
    });
}
