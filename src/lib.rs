//! A Binary Search Tree (BST) over unique values that can be rebuilt into a
//! balanced shape on demand.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores one value and
//! will sometimes have child `Node`s. The most important invariants of a BST
//! are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)` (where `height` is the
//! longest path from the root `Node` to a leaf `Node`). This tree does not
//! rotate on every insert. Instead it is *built* balanced: construction sorts
//! and de-duplicates its input and repeatedly picks the middle value as the
//! subtree root. Inserts and deletes afterwards are plain BST operations that
//! can skew the tree, and [`Tree::rebalance`][tree::Tree::rebalance] rebuilds
//! it from its sorted contents.
//!
//! ```
//! use balanced_bst::Tree;
//!
//! let mut tree: Tree<i32> = [5, 3, 8, 1, 4, 7, 9, 3].into_iter().collect();
//! assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
//! assert!(tree.is_balanced());
//!
//! for x in 10..15 {
//!     tree.insert(x).unwrap();
//! }
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//! assert!(tree.is_balanced());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod traverse;
pub mod tree;

pub use error::{Result, TreeError};
pub use traverse::Order;
pub use tree::{Node, Tree};
