//! # Tree Module
//!
//! The tree module turns a declarative route tree into the flat set of
//! leaf records the registrar hands to the matcher.
//!
//! ## Overview
//!
//! Flattening is a recursive walk. At every level a chain accumulates the
//! branch so far - name segments, path segments, guards, view steps - by
//! copying the parent's chain and appending the node's own fields. A node
//! with children recurses; a terminal node snapshots its chain into one
//! [`LeafRecord`].
//!
//! ## Grouping fan-out
//!
//! A grouping node declares `k` alternative parents sharing one child
//! subtree. Each alternative is flattened independently with the shared
//! subtree injected as its children, so a subtree producing `m` terminals
//! yields `k × m` leaf records without duplicating its authoring. Each
//! alternative walks its own chain copy; alternatives never contaminate
//! each other.
//!
//! ## Derived keys
//!
//! A leaf's registration name is the `.`-join of its accumulated name
//! segments; its path is the `/`-join of its path segments with repeated
//! slashes collapsed to one. The name doubles as the result-cache key, so
//! duplicate names across leaves are last-registration-wins (logged at
//! WARN by the registrar).

pub(crate) mod chain;
mod flatten;

pub use flatten::{flatten, ConfigError, LeafRecord};
