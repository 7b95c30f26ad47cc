//! Traversals over a [`Tree`][crate::tree::Tree].
//!
//! Every order is available two ways: as a lazy iterator (over values or over
//! nodes) and as a visitor callback through
//! [`Tree::visit`][crate::tree::Tree::visit]. Iterators borrow the tree, so a
//! fresh call restarts the traversal from the root.
//!
//! None of these recurse. A tree grown by ascending inserts is a chain as
//! tall as it is long, so each iterator keeps its own stack (or queue).

use std::collections::VecDeque;

use crate::tree::{Link, Node};

/// The order in which a traversal visits nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Breadth first: the root, then each level left to right.
    Level,
    /// A node, then its left subtree, then its right subtree.
    Pre,
    /// The left subtree, then the node, then the right subtree. Yields values
    /// in ascending order.
    In,
    /// The left subtree, then the right subtree, then the node.
    Post,
}

enum Pending<'a, T> {
    Level(VecDeque<&'a Node<T>>),
    Pre(Vec<&'a Node<T>>),
    In {
        stack: Vec<&'a Node<T>>,
        next: Option<&'a Node<T>>,
    },
    // The flag marks nodes whose children have already been pushed.
    Post(Vec<(&'a Node<T>, bool)>),
}

/// An iterator over the nodes of a tree in a given [`Order`].
pub struct Nodes<'a, T> {
    pending: Pending<'a, T>,
}

impl<'a, T> Nodes<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>, order: Order) -> Self {
        let pending = match order {
            Order::Level => Pending::Level(root.into_iter().collect()),
            Order::Pre => Pending::Pre(root.into_iter().collect()),
            Order::In => Pending::In {
                stack: Vec::new(),
                next: root,
            },
            Order::Post => Pending::Post(root.into_iter().map(|n| (n, false)).collect()),
        };
        Self { pending }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.pending {
            Pending::Level(queue) => {
                let node = queue.pop_front()?;
                queue.extend(node.left());
                queue.extend(node.right());
                Some(node)
            }
            Pending::Pre(stack) => {
                let node = stack.pop()?;
                // Right first so the left subtree is popped first.
                stack.extend(node.right());
                stack.extend(node.left());
                Some(node)
            }
            Pending::In { stack, next } => {
                while let Some(node) = next.take() {
                    stack.push(node);
                    *next = node.left();
                }
                let node = stack.pop()?;
                *next = node.right();
                Some(node)
            }
            Pending::Post(stack) => loop {
                let (node, expanded) = stack.pop()?;
                if expanded {
                    return Some(node);
                }
                stack.push((node, true));
                stack.extend(node.right().map(|n| (n, false)));
                stack.extend(node.left().map(|n| (n, false)));
            },
        }
    }
}

/// An iterator over the values of a tree in a given [`Order`].
///
/// # Examples
///
/// ```
/// use balanced_bst::Tree;
///
/// let tree: Tree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
///
/// assert_eq!(tree.level_order().copied().collect::<Vec<_>>(), [5, 3, 8, 1, 4, 7, 9]);
/// assert_eq!(tree.pre_order().copied().collect::<Vec<_>>(), [5, 3, 1, 4, 8, 7, 9]);
/// assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
/// assert_eq!(tree.post_order().copied().collect::<Vec<_>>(), [1, 4, 3, 7, 9, 8, 5]);
/// ```
pub struct Values<'a, T>(Nodes<'a, T>);

impl<'a, T> Values<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>, order: Order) -> Self {
        Self(Nodes::new(root, order))
    }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Node::data)
    }
}

/// An owning iterator that takes a tree apart, yielding its values in
/// ascending order.
pub struct IntoIter<T> {
    // Nodes whose left subtree has already been taken.
    stack: Vec<Box<Node<T>>>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Link<T>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let Node { data, right, .. } = *node;
        self.push_left_spine(right);
        Some(data)
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Unlinks the remaining nodes one at a time instead of letting `Box`
        // drop whole right subtrees recursively.
        while self.next().is_some() {}
    }
}
