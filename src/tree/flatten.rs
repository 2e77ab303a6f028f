//! Recursive tree walk emitting one leaf record per reachable terminal.

use super::chain::{Chain, GuardVec, StepVec};
use crate::route::{Route, RouteDef};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Collapses slash runs left over from joining path segments.
#[allow(clippy::expect_used)]
static SLASH_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new("/{2,}").expect("slash-collapse pattern is valid"));

/// Static authoring mistake discovered while flattening a route tree.
///
/// Configuration errors halt setup before anything is registered with the
/// matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A terminal node defines neither a view source nor a guard, so
    /// activating it could never produce anything.
    ViewlessLeaf {
        /// Accumulated dotted name path of the offending node
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ViewlessLeaf { name } => {
                write!(
                    f,
                    "terminal route '{}' defines neither a view, a view loader, nor a guard",
                    name
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One reachable terminal of a flattened route tree.
///
/// Carries everything the registrar needs: the dotted registration name
/// (also the cache key), the normalized path pattern, and the branch's
/// accumulated guard and view-step chains in root-to-leaf order.
pub struct LeafRecord<V> {
    /// Dotted registration name (`.`-join of the branch's name segments)
    pub name: String,
    /// Normalized path pattern (`/`-join with slash runs collapsed)
    pub path: String,
    pub(crate) guards: GuardVec,
    pub(crate) view_steps: StepVec<V>,
}

impl<V> LeafRecord<V> {
    fn from_chain(chain: Chain<V>) -> Self {
        Self {
            name: chain.names.join("."),
            path: normalize_path(&chain.path_segments),
            guards: chain.guards,
            view_steps: chain.view_steps,
        }
    }

    /// Number of guards accumulated root-to-leaf.
    #[must_use]
    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    /// Number of view steps accumulated root-to-leaf.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.view_steps.len()
    }
}

impl<V> fmt::Debug for LeafRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafRecord")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("guards", &self.guards.len())
            .field("view_steps", &self.view_steps.len())
            .finish()
    }
}

/// Join path segments and collapse the slash runs joining produces
/// (e.g. `["/admin", "books"]` → `/admin/books`, not `/admin//books`).
fn normalize_path(segments: &[String]) -> String {
    let joined = segments.join("/");
    SLASH_RUNS.replace_all(&joined, "/").into_owned()
}

/// Flatten a route tree into leaf records, in traversal order.
///
/// Exactly one record is emitted per reachable terminal node. Author
/// order is preserved so registration order - and therefore the matcher's
/// first-registered, first-matched precedence - is deterministic given
/// the input tree.
///
/// # Errors
///
/// Returns [`ConfigError::ViewlessLeaf`] for a terminal node with neither
/// a view source nor a guard. Flattening is all-or-nothing: on error no
/// partial leaf set is returned.
pub fn flatten<V: Clone>(routes: &[RouteDef<V>]) -> Result<Vec<LeafRecord<V>>, ConfigError> {
    let mut leaves = Vec::new();
    flatten_into(routes, None, &mut leaves)?;
    debug!(leaf_count = leaves.len(), "route tree flattened");
    Ok(leaves)
}

fn flatten_into<V: Clone>(
    routes: &[RouteDef<V>],
    parent: Option<&Chain<V>>,
    out: &mut Vec<LeafRecord<V>>,
) -> Result<(), ConfigError> {
    for def in routes {
        match def {
            RouteDef::Route(node) => flatten_node(node, &node.children, parent, out)?,
            RouteDef::Group(group) => {
                // Fan-out: every alternative independently proceeds
                // through the shared subtree, on its own chain copy. The
                // shared subtree replaces any children the alternative
                // carries itself.
                for alternative in &group.routes {
                    flatten_node(alternative, &group.children, parent, out)?;
                }
            }
        }
    }
    Ok(())
}

fn flatten_node<V: Clone>(
    node: &Route<V>,
    children: &[RouteDef<V>],
    parent: Option<&Chain<V>>,
    out: &mut Vec<LeafRecord<V>>,
) -> Result<(), ConfigError> {
    let chain = Chain::accumulate(node, parent);
    if !children.is_empty() {
        return flatten_into(children, Some(&chain), out);
    }
    // Terminal. A guard-only leaf is legal (it resolves to no view); a
    // leaf with neither is an authoring mistake.
    if node.view.is_none() && node.guard.is_none() {
        return Err(ConfigError::ViewlessLeaf {
            name: chain.dotted_name(),
        });
    }
    let leaf = LeafRecord::from_chain(chain);
    debug!(
        route = %leaf.name,
        path = %leaf.path,
        guards = leaf.guards.len(),
        steps = leaf.view_steps.len(),
        "leaf emitted"
    );
    out.push(leaf);
    Ok(())
}
