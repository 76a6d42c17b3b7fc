//! Mutable undirected trees and their centroid decomposition.
//!
//! The [`domain`] layer holds the algorithmic core: an arena-backed
//! [`Graph`](domain::Graph), the centroid finder and the decomposition
//! engine with its lazy event stream. [`application`], [`config`] and
//! [`cli`] wrap it into the `centroid` command line tool.
//!
//! ```
//! use centroid::domain::{decompose, Graph};
//!
//! let mut tree: Graph<&str, ()> = Graph::new();
//! let a = tree.add_node("a");
//! let b = tree.add_node("b");
//! let c = tree.add_node("c");
//! tree.add_edge((), a, b).unwrap();
//! tree.add_edge((), b, c).unwrap();
//!
//! let decomposition = decompose(&tree).unwrap();
//! let root = decomposition.tree.root().unwrap();
//! assert_eq!(decomposition.tree.graph().get_node(root).unwrap().data, "b");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
