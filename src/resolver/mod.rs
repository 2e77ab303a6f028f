//! # Resolver Module
//!
//! The resolver turns a matched leaf's ordered view-step chain into one
//! composed nested view, and memoizes the result per leaf so repeated
//! activations of the same route never repeat an asynchronous load.
//!
//! ## Composition order
//!
//! Steps accumulate root-to-leaf, and the composed tree nests the same
//! way: for `steps = [A, B, C]` the result is `A( B( C() ) )` - `C`
//! (closest to the terminal node) innermost, `A` (outermost ancestor) as
//! the root. An empty chain resolves to `None`, which the dispatcher
//! treats as "no view to render", not an error.
//!
//! ## Caching
//!
//! Resolved trees are cached by leaf name. A cache hit returns the stored
//! `Rc` unchanged - the dispatcher re-wraps the root with the current
//! navigation's location instead of re-deriving the tree. Failed
//! resolutions are never cached, so a later activation retries the
//! loader. The cache can be disabled wholesale at construction for
//! iterative development; entries are dropped when the owning route set
//! is replaced.

mod core;

pub use core::{ResolutionError, ViewNode, ViewResolver};
