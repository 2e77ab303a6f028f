//! Route definition types and the consuming builder.

use crate::matcher::{GuardError, MatchedRoute, UpdateState};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Pre-activation hook attached to a route node.
///
/// Receives the matched route plus the matcher's `replace` and `push`
/// handles; may request a redirect through either. Runs root-to-leaf as
/// part of the leaf's composed guard chain.
pub type Guard = Rc<
    dyn Fn(MatchedRoute, UpdateState, UpdateState) -> LocalBoxFuture<'static, Result<(), GuardError>>,
>;

/// Deferred view loader: invoked on first resolution of the owning leaf,
/// yields the view handle directly.
pub type ViewLoader<V> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<V, LoadError>>>;

/// Failure produced by a deferred view loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    /// Create a loader failure with a human-readable reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view loader failed: {}", self.message)
    }
}

impl std::error::Error for LoadError {}

/// Where a node's view comes from.
///
/// A node carries at most one source; the builder setters overwrite each
/// other, so `view` XOR `load_view` holds by construction.
#[derive(Clone)]
pub enum ViewSource<V> {
    /// Resolves immediately to the captured handle
    View(V),
    /// Invokes the loader and awaits the handle
    Loader(ViewLoader<V>),
}

impl<V> fmt::Debug for ViewSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSource::View(_) => f.write_str("ViewSource::View"),
            ViewSource::Loader(_) => f.write_str("ViewSource::Loader"),
        }
    }
}

/// One node of a route tree: either a leaf-capable route or a grouping
/// node fanning a shared subtree out under multiple alternatives.
pub enum RouteDef<V> {
    /// Leaf-capable node
    Route(Route<V>),
    /// Grouping node (fan-out point)
    Group(RouteGroup<V>),
}

impl<V> From<Route<V>> for RouteDef<V> {
    fn from(route: Route<V>) -> Self {
        RouteDef::Route(route)
    }
}

impl<V> From<RouteGroup<V>> for RouteDef<V> {
    fn from(group: RouteGroup<V>) -> Self {
        RouteDef::Group(group)
    }
}

/// A leaf-capable route node.
///
/// Every field is optional at this level; validity of a *terminal* node
/// (it must carry a view source or a guard) is checked once, at flatten
/// time, where the full dotted name path is known for the error message.
pub struct Route<V> {
    pub(crate) name: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) guard: Option<Guard>,
    pub(crate) view: Option<ViewSource<V>>,
    pub(crate) children: Vec<RouteDef<V>>,
}

impl<V> Default for Route<V> {
    fn default() -> Self {
        Self {
            name: None,
            path: None,
            guard: None,
            view: None,
            children: Vec::new(),
        }
    }
}

impl<V> Route<V> {
    /// Start an empty route node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node's name segment (one dotted-name component).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the node's path segment, in matcher syntax
    /// (e.g. `books/{id:[0-9]+}`).
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach a pre-activation guard. The hook may be synchronous (return
    /// `futures::future::ready(..)`) or await freely.
    #[must_use]
    pub fn guard<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(MatchedRoute, UpdateState, UpdateState) -> Fut + 'static,
        Fut: Future<Output = Result<(), GuardError>> + 'static,
    {
        self.guard = Some(Rc::new(move |matched, replace, push| {
            hook(matched, replace, push).boxed_local()
        }));
        self
    }

    /// Supply the node's view handle directly. Overwrites a previously
    /// set loader.
    #[must_use]
    pub fn view(mut self, view: V) -> Self {
        self.view = Some(ViewSource::View(view));
        self
    }

    /// Supply the node's view through a deferred loader, invoked on the
    /// first activation of any leaf under this node. Overwrites a
    /// previously set view handle.
    #[must_use]
    pub fn load_view<F, Fut>(mut self, loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<V, LoadError>> + 'static,
    {
        self.view = Some(ViewSource::Loader(Rc::new(move || loader().boxed_local())));
        self
    }

    /// Nest child routes under this node. A node with children is never
    /// terminal; its name/path/guard/view are inherited by every leaf
    /// beneath it.
    #[must_use]
    pub fn children(mut self, children: Vec<RouteDef<V>>) -> Self {
        self.children = children;
        self
    }
}

/// A grouping node: every route in `routes` is an alternative parent for
/// the same shared child subtree.
///
/// The shared subtree replaces any children an alternative carries of its
/// own.
pub struct RouteGroup<V> {
    pub(crate) routes: Vec<Route<V>>,
    pub(crate) children: Vec<RouteDef<V>>,
}

impl<V> RouteGroup<V> {
    /// Create a grouping node from its alternative parents.
    #[must_use]
    pub fn new(routes: Vec<Route<V>>) -> Self {
        Self {
            routes,
            children: Vec::new(),
        }
    }

    /// Attach the child subtree shared by every alternative.
    #[must_use]
    pub fn children(mut self, children: Vec<RouteDef<V>>) -> Self {
        self.children = children;
        self
    }
}
