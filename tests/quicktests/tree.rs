use balanced_bst::{Order, Tree, TreeError};

use std::collections::BTreeSet;

use crate::{init_logging, Op};

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same values in both.
fn do_ops<T>(ops: &[Op<T>], mut bst: Tree<T>, set: &mut BTreeSet<T>) -> Tree<T>
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                bst.insert(x.clone()).unwrap();
                set.insert(x.clone());
            }
            Op::Delete(x) => {
                bst.delete(x).unwrap();
                set.remove(x);
            }
            Op::Rebalance => bst.rebalance(),
        }
    }

    bst
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    init_logging();
    let mut set = BTreeSet::new();

    let tree = do_ops(&ops, Tree::new(), &mut set);
    tree.in_order().eq(set.iter()) && set.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn build_sorts_and_dedups(xs: Vec<i32>) -> bool {
    let tree = Tree::build(xs.clone()).unwrap();
    let values: Vec<_> = tree.in_order().copied().collect();

    values.windows(2).all(|w| w[0] < w[1])
        && values.len() == xs.iter().collect::<BTreeSet<_>>().len()
        && tree.is_balanced()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    xs.iter().all(|x| tree.find(x).map(|n| n.data()) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = Tree::build(xs.clone()).unwrap();
    let added: BTreeSet<_> = xs.into_iter().collect();
    let nots: BTreeSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn deleting_missing_values_changes_nothing(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::build(xs.clone()).unwrap();
    let before: Vec<_> = tree.level_order().copied().collect();

    for delete in deletes.iter().filter(|d| !xs.contains(d)) {
        if tree.delete(delete) != Ok(None) {
            return false;
        }
    }

    tree.level_order().copied().collect::<Vec<_>>() == before
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::build(xs.clone()).unwrap();
    for delete in &deletes {
        tree.delete(delete).unwrap();
    }

    let still_present: Vec<_> = xs.iter().filter(|x| !deletes.contains(x)).collect();

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn rebalance_keeps_values(ops: Vec<Op<i8>>) -> bool {
    let mut set = BTreeSet::new();
    let mut tree = do_ops(&ops, Tree::new(), &mut set);

    let before: Vec<_> = tree.in_order().copied().collect();
    tree.rebalance();

    tree.is_balanced()
        && tree.in_order().copied().collect::<Vec<_>>() == before
        && tree.len() == set.len()
}

#[quickcheck]
fn root_has_depth_zero(xs: Vec<i8>) -> bool {
    let tree = Tree::build(xs).unwrap();

    tree.root().map_or(true, |root| tree.depth(root) == Ok(0))
}

#[quickcheck]
fn foreign_nodes_have_no_depth(xs: Vec<i8>) -> bool {
    let tree = Tree::build(xs).unwrap();
    let copy = tree.clone();

    copy.nodes(Order::Level)
        .all(|n| tree.depth(n) == Err(TreeError::InvalidReference))
}

#[quickcheck]
fn visit_matches_iterators(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in xs {
        tree.insert(x).unwrap();
    }

    [Order::Level, Order::Pre, Order::In, Order::Post]
        .into_iter()
        .all(|order| {
            let mut visited = Vec::new();
            tree.visit(order, |n| visited.push(*n.data()));
            visited == tree.nodes(order).map(|n| *n.data()).collect::<Vec<_>>()
        })
}
