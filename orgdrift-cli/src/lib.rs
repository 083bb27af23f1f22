//! Dependency graphs and drift reports for platform metadata inventories
//!
//! - [`graph::build_graph`] turns schema objects and their relationship
//!   references into a graph with a deterministic, cycle-tolerant order
//! - [`diff::diff`] compares two inventories into added, removed and
//!   modified entities per category
//!
//! Both are pure functions over [`inventory::Inventory`] values.

pub mod cli;
pub mod compare;
pub mod config;
pub mod diff;
pub mod graph;
pub mod inventory;
pub mod store;

pub use compare::compare_snapshots;
pub use diff::{DiffOptions, DiffResult, diff, diff_with_options};
pub use graph::{Graph, build_graph};
pub use inventory::Inventory;
