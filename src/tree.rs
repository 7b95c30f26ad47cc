//! A Binary Search Tree of unique values that is built balanced and can be
//! rebuilt balanced on demand.
//!
//! Inserts and deletes are the textbook unbalanced operations. A run of
//! ascending inserts leaves a chain behind, which [`Tree::is_balanced`]
//! reports and [`Tree::rebalance`] repairs.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::Tree;
//!
//! let mut tree = Tree::build([1]).unwrap();
//! tree.insert(2).unwrap();
//! tree.insert(3).unwrap();
//!
//! // 1 -> 2 -> 3, all to the right.
//! assert_eq!(tree.height(), 2);
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//!
//! assert_eq!(tree.height(), 1);
//! assert!(tree.is_balanced());
//! assert_eq!(tree.root().map(|n| *n.data()), Some(2));
//! ```

use std::cmp::Ordering;
use std::{fmt, mem, ptr};

use tracing::{debug, trace};

use crate::error::{Result, TreeError};
use crate::traverse::{IntoIter, Nodes, Order, Values};

pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// A single value in a [`Tree`] and the subtrees hanging off of it.
///
/// Callers only ever see shared references to nodes, so a node can be used
/// to navigate the tree but never to rewrite it.
pub struct Node<T> {
    pub(crate) data: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    fn leaf(data: T) -> Box<Self> {
        Box::new(Self {
            data,
            left: None,
            right: None,
        })
    }

    /// The value stored in this node.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The root of the left subtree, if any. Every value in it is smaller
    /// than [`data`][Node::data].
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of the right subtree, if any. Every value in it is larger
    /// than [`data`][Node::data].
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The number of edges on the longest path from this node down to a leaf.
    /// A leaf has a height of 0.
    pub fn height(&self) -> isize {
        measure(Some(self), |_, _| true).unwrap_or(-1)
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    // Only the children's values, so formatting never walks a whole subtree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("data", &self.data)
            .field("left", &self.left().map(Node::data))
            .field("right", &self.right().map(Node::data))
            .finish()
    }
}

/// Computes subtree heights bottom up, handing each node's left and right
/// subtree heights to `accept`. Returns the height of `root`, or `None` as
/// soon as `accept` rejects a node.
fn measure<T>(
    root: Option<&Node<T>>,
    mut accept: impl FnMut(isize, isize) -> bool,
) -> Option<isize> {
    // In post order both subtrees of a node are finished right before the
    // node itself, so their heights are the top two entries: right, then left.
    let mut heights = Vec::new();
    for node in Nodes::new(root, Order::Post) {
        let right = if node.right.is_some() { heights.pop()? } else { -1 };
        let left = if node.left.is_some() { heights.pop()? } else { -1 };
        if !accept(left, right) {
            return None;
        }
        heights.push(1 + left.max(right));
    }
    Some(heights.pop().unwrap_or(-1))
}

fn compare<T: PartialOrd>(value: &T, data: &T) -> Result<Ordering> {
    value.partial_cmp(data).ok_or(TreeError::Incomparable)
}

/// A Binary Search Tree holding unique values.
///
/// For every node, all values in its left subtree are smaller and all values
/// in its right subtree are larger than its own.
pub struct Tree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let mut tree = Self {
            root: None,
            len: self.len,
        };
        if let Some(root) = self.root() {
            // Pairs each source node with its already allocated copy, whose
            // children are still to be filled in.
            let copy = tree.root.insert(Node::leaf(root.data.clone()));
            let mut stack = vec![(root, &mut **copy)];
            while let Some((source, copy)) = stack.pop() {
                let Node { left, right, .. } = copy;
                if let Some(source) = source.left() {
                    stack.push((source, &mut **left.insert(Node::leaf(source.data.clone()))));
                }
                if let Some(source) = source.right() {
                    stack.push((source, &mut **right.insert(Node::leaf(source.data.clone()))));
                }
            }
        }
        tree
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.in_order()).finish()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        // Detach children before dropping each node so a long chain doesn't
        // drop recursively.
        let mut stack: Vec<_> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Builds a balanced tree from any collection of values. Duplicates are
    /// dropped and the rest are sorted, then the middle value becomes the root
    /// and each half is built the same way below it.
    ///
    /// Fails with [`TreeError::Incomparable`] if two values can't be ordered,
    /// like when the input contains `f64::NAN`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::{Tree, TreeError};
    ///
    /// let tree = Tree::build([5, 3, 8, 1, 4, 7, 9]).unwrap();
    /// assert_eq!(tree.root().map(|n| *n.data()), Some(5));
    ///
    /// let tree = Tree::build([2.5, 0.5, 2.5]).unwrap();
    /// assert_eq!(tree.len(), 2);
    ///
    /// assert_eq!(Tree::build([1.0, f64::NAN]).unwrap_err(), TreeError::Incomparable);
    /// ```
    pub fn build<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: PartialOrd,
    {
        let mut values: Vec<T> = values.into_iter().collect();

        // Anything that can't be ordered against itself can't be ordered at
        // all. Checking first keeps the sort below from seeing it.
        if values.iter().any(|v| v.partial_cmp(v).is_none()) {
            return Err(TreeError::Incomparable);
        }
        let mut incomparable = false;
        values.sort_by(|a, b| {
            a.partial_cmp(b).unwrap_or_else(|| {
                incomparable = true;
                Ordering::Equal
            })
        });
        // The sort never compares some pairs, so neighbours that can't be
        // ordered have to be caught here.
        let ordered = |w: &[T]| {
            matches!(
                w[0].partial_cmp(&w[1]),
                Some(Ordering::Less | Ordering::Equal)
            )
        };
        if incomparable || !values.windows(2).all(ordered) {
            return Err(TreeError::Incomparable);
        }
        values.dedup();

        Ok(Self::from_sorted(values))
    }

    /// Builds a balanced tree from values that are already sorted and unique.
    fn from_sorted(values: Vec<T>) -> Self {
        let len = values.len();
        let tree = Self {
            root: Self::build_balanced(len, &mut values.into_iter()),
            len,
        };
        debug!(len, height = tree.height(), "built balanced tree");

        if cfg!(debug_assertions) {
            assert!(tree.is_balanced());
        }
        tree
    }

    /// Builds a subtree from the next `count` values of `values`.
    ///
    /// Picking `(start + end) / 2` as the root of `start..=end` leaves
    /// `(count - 1) / 2` values on its left, so the values can be pulled in
    /// order instead of indexed.
    fn build_balanced<I>(count: usize, values: &mut I) -> Link<T>
    where
        I: Iterator<Item = T>,
    {
        if count == 0 {
            return None;
        }
        let left_count = (count - 1) / 2;
        let left = Self::build_balanced(left_count, values);
        let data = values.next()?;
        let right = Self::build_balanced(count - 1 - left_count, values);

        Some(Box::new(Node { data, left, right }))
    }

    /// The root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// The number of values in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `value` as a new leaf. Returns `false`, leaving the tree
    /// untouched, if the value is already present.
    ///
    /// The tree is not rebalanced afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(1), Ok(true));
    /// assert_eq!(tree.insert(1), Ok(false));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool>
    where
        T: PartialOrd,
    {
        // Directions taken on the way down, kept for the debug check below.
        let mut path = Vec::new();
        let mut link = &mut self.root;
        while let Some(node) = link {
            let ordering = compare(&value, &node.data)?;
            if cfg!(debug_assertions) {
                path.push(ordering);
            }
            link = match ordering {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    trace!(inserted = false, "insert");
                    return Ok(false);
                }
            };
        }
        *link = Some(Node::leaf(value));
        self.len += 1;

        if cfg!(debug_assertions) {
            self.assert_ordered_at(&path);
        }
        trace!(inserted = true, len = self.len, "insert");
        Ok(true)
    }

    /// Asserts that the node reached by following `path` from the root orders
    /// correctly against both of its children.
    fn assert_ordered_at(&self, path: &[Ordering])
    where
        T: PartialOrd,
    {
        let Some(mut node) = self.root() else {
            return;
        };
        // Stop at the parent of the node the path ends on.
        for step in path.iter().take(path.len().saturating_sub(1)) {
            let next = match step {
                Ordering::Less => node.left(),
                _ => node.right(),
            };
            let Some(next) = next else {
                return;
            };
            node = next;
        }
        if let Some(left) = node.left() {
            assert!(left.data < node.data);
        }
        if let Some(right) = node.right() {
            assert!(right.data > node.data);
        }
    }

    /// Removes `value` from the tree and returns it. Deleting a value that
    /// isn't in the tree does nothing and returns `Ok(None)`.
    ///
    /// A node with two children takes the smallest value of its right subtree
    /// and that value's node is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::Tree;
    ///
    /// let mut tree = Tree::build([5, 3, 8, 1, 4, 7, 9]).unwrap();
    ///
    /// assert_eq!(tree.delete(&5), Ok(Some(5)));
    /// assert_eq!(tree.root().map(|n| *n.data()), Some(7));
    /// assert_eq!(tree.delete(&5), Ok(None));
    /// ```
    pub fn delete(&mut self, value: &T) -> Result<Option<T>>
    where
        T: PartialOrd,
    {
        let mut link = &mut self.root;
        loop {
            let ordering = match link.as_deref() {
                Some(node) => compare(value, &node.data)?,
                None => {
                    trace!(deleted = false, "delete");
                    return Ok(None);
                }
            };
            if ordering == Ordering::Equal {
                break;
            }
            // Always `Some`, as matched above. The mutable borrow is only taken
            // once the node is known not to be the target, since a borrow made
            // before the `break` would still hold `link` after the loop.
            let Some(node) = link else {
                return Ok(None);
            };
            link = match ordering {
                Ordering::Less => &mut node.left,
                _ => &mut node.right,
            };
        }

        let removed = Self::unlink(link);
        if removed.is_some() {
            self.len -= 1;
        }
        trace!(deleted = removed.is_some(), len = self.len, "delete");
        Ok(removed)
    }

    /// Removes the node in `link` and returns its value.
    fn unlink(link: &mut Link<T>) -> Option<T> {
        let node = link.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            let successor = Self::take_min(&mut node.right)?;
            return Some(mem::replace(&mut node.data, successor));
        }

        let Node { data, left, right } = *link.take()?;
        *link = left.or(right);
        Some(data)
    }

    /// Unlinks the smallest node under `link`, splicing in its right subtree.
    fn take_min(link: &mut Link<T>) -> Option<T> {
        let mut link = link;
        loop {
            match link.as_deref() {
                Some(node) if node.left.is_some() => {}
                Some(_) => break,
                None => return None,
            }
            // Always `Some`; borrowed mutably only after the `break` check,
            // like in `delete`.
            let Some(node) = link else {
                return None;
            };
            link = &mut node.left;
        }

        let Node { data, right, .. } = *link.take()?;
        *link = right;
        Some(data)
    }

    /// Finds the node holding `value`. Values that can't be compared with
    /// the tree's values are never found.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::Tree;
    ///
    /// let tree = Tree::build([1, 2, 3]).unwrap();
    ///
    /// assert_eq!(tree.find(&3).map(|n| *n.data()), Some(3));
    /// assert!(tree.find(&42).is_none());
    /// ```
    pub fn find(&self, value: &T) -> Option<&Node<T>>
    where
        T: PartialOrd,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match value.partial_cmp(&node.data)? {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Whether `value` is in the tree.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialOrd,
    {
        self.find(value).is_some()
    }

    /// The smallest value in the tree.
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(&node.data)
    }

    /// The largest value in the tree.
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(right) = node.right() {
            node = right;
        }
        Some(&node.data)
    }

    /// Iterates over the nodes of the tree in the given order.
    pub fn nodes(&self, order: Order) -> Nodes<'_, T> {
        Nodes::new(self.root(), order)
    }

    /// Calls `visit` on every node of the tree in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::{Order, Tree};
    ///
    /// let tree = Tree::build([1, 2, 3]).unwrap();
    ///
    /// let mut leaves = Vec::new();
    /// tree.visit(Order::Level, |node| {
    ///     if node.is_leaf() {
    ///         leaves.push(*node.data());
    ///     }
    /// });
    ///
    /// assert_eq!(leaves, [1, 3]);
    /// ```
    pub fn visit(&self, order: Order, visit: impl FnMut(&Node<T>)) {
        self.nodes(order).for_each(visit);
    }

    /// Values in breadth first order, level by level from the root.
    pub fn level_order(&self) -> Values<'_, T> {
        Values::new(self.root(), Order::Level)
    }

    /// Values with each node before its left and then right subtree.
    pub fn pre_order(&self) -> Values<'_, T> {
        Values::new(self.root(), Order::Pre)
    }

    /// Values in ascending order.
    pub fn in_order(&self) -> Values<'_, T> {
        Values::new(self.root(), Order::In)
    }

    /// Values with each node after its left and then right subtree.
    pub fn post_order(&self) -> Values<'_, T> {
        Values::new(self.root(), Order::Post)
    }

    /// The number of edges on the longest path from the root to a leaf. An
    /// empty tree has a height of -1 and a lone root a height of 0.
    pub fn height(&self) -> isize {
        measure(self.root(), |_, _| true).unwrap_or(-1)
    }

    /// The number of edges between the root and `node`.
    ///
    /// The search follows `node`'s value down from the root and only accepts
    /// the node itself, so a node from another tree (even one holding an equal
    /// value) fails with [`TreeError::InvalidReference`].
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::{Tree, TreeError};
    ///
    /// let tree = Tree::build([1, 2, 3]).unwrap();
    /// let other = tree.clone();
    ///
    /// let three = tree.find(&3).unwrap();
    /// assert_eq!(tree.depth(three), Ok(1));
    ///
    /// let foreign = other.find(&3).unwrap();
    /// assert_eq!(tree.depth(foreign), Err(TreeError::InvalidReference));
    /// ```
    pub fn depth(&self, node: &Node<T>) -> Result<usize>
    where
        T: PartialOrd,
    {
        let mut current = self.root();
        let mut depth = 0;
        while let Some(candidate) = current {
            if ptr::eq(candidate, node) {
                return Ok(depth);
            }
            current = match node.data.partial_cmp(&candidate.data) {
                Some(Ordering::Less) => candidate.left(),
                Some(Ordering::Greater) => candidate.right(),
                Some(Ordering::Equal) | None => break,
            };
            depth += 1;
        }
        Err(TreeError::InvalidReference)
    }

    /// The number of edges between the root and the node holding `value`.
    pub fn depth_of(&self, value: &T) -> Option<usize>
    where
        T: PartialOrd,
    {
        let mut current = self.root();
        let mut depth = 0;
        while let Some(node) = current {
            current = match value.partial_cmp(&node.data)? {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(depth),
            };
            depth += 1;
        }
        None
    }

    /// Whether the heights of the left and right subtrees of every node differ
    /// by at most one. Empty trees are balanced.
    pub fn is_balanced(&self) -> bool {
        measure(self.root(), |left, right| left.abs_diff(right) <= 1).is_some()
    }

    /// Rebuilds the tree from its values so it is balanced again.
    ///
    /// The old nodes are consumed in order and their values moved into a new
    /// tree built the same way [`Tree::build`] builds one.
    pub fn rebalance(&mut self) {
        // `from_sorted` logs the height afterwards.
        debug!(len = self.len, height = self.height(), "rebalancing tree");
        let values: Vec<T> = IntoIter::new(self.root.take()).collect();
        *self = Self::from_sorted(values);
    }
}

impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut values: Vec<T> = iter.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self::from_sorted(values)
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(self.root.take())
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Values<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}
