//! View chain resolution and the per-leaf result cache.

use crate::location::Location;
use crate::route::{LoadError, ViewSource};
use crate::tree::LeafRecord;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Failure while resolving a leaf's view chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// A deferred loader failed somewhere in the chain.
    Load {
        /// Dotted name of the route being resolved
        route: String,
        /// The loader's failure
        source: LoadError,
    },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Load { route, source } => {
                write!(f, "failed to resolve view chain for route '{}': {}", route, source)
            }
        }
    }
}

impl std::error::Error for ResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolutionError::Load { source, .. } => Some(source),
        }
    }
}

/// One node of a composed view tree: a resolved view handle, the location
/// it was composed for, and the wrapped successor.
///
/// Nodes are shared behind `Rc` and immutable once built; refreshing the
/// root's location for a new activation produces a new root sharing the
/// cached `child` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode<V> {
    /// The resolved view handle for this level
    pub view: V,
    /// Navigation this node was composed (or re-wrapped) for
    pub location: Location,
    /// The next-inner view, `None` at the innermost level
    pub child: Option<Rc<ViewNode<V>>>,
}

impl<V: Clone> ViewNode<V> {
    /// A copy of this node carrying `location`, sharing the child chain.
    #[must_use]
    pub fn with_location(&self, location: Location) -> Self {
        Self {
            view: self.view.clone(),
            location,
            child: self.child.clone(),
        }
    }

    /// Depth of the composed tree from this node down.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = self.child.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.child.as_deref();
        }
        depth
    }
}

/// Resolves view-step chains and memoizes the result per leaf name.
///
/// Single-threaded by design: the cache is a `RefCell` map that is never
/// borrowed across an await point, which preserves "resolve at most once
/// per leaf until invalidated" without locks.
pub struct ViewResolver<V> {
    cache: RefCell<HashMap<String, Rc<ViewNode<V>>>>,
    cache_enabled: bool,
}

impl<V: Clone + 'static> ViewResolver<V> {
    /// Create a resolver. With `cache_enabled = false` the cache is
    /// neither read nor written (iterative-development bypass).
    #[must_use]
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            cache: RefCell::new(HashMap::new()),
            cache_enabled,
        }
    }

    /// Resolve `leaf`'s view chain for `location`.
    ///
    /// Returns the cached tree unchanged on a hit (object identity
    /// preserved); otherwise resolves the chain, stores the result, and
    /// returns it. An empty chain resolves to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::Load`] when any loader in the chain fails. The
    /// error is not cached; a later activation retries from scratch.
    pub async fn resolve(
        &self,
        leaf: &LeafRecord<V>,
        location: &Location,
    ) -> Result<Option<Rc<ViewNode<V>>>, ResolutionError> {
        if self.cache_enabled {
            let hit = self.cache.borrow().get(&leaf.name).map(Rc::clone);
            if let Some(root) = hit {
                debug!(route = %leaf.name, "view chain served from cache");
                return Ok(Some(root));
            }
        }
        let resolved = resolve_steps(&leaf.view_steps, location)
            .await
            .map_err(|source| ResolutionError::Load {
                route: leaf.name.clone(),
                source,
            })?;
        if self.cache_enabled {
            if let Some(root) = &resolved {
                debug!(route = %leaf.name, depth = root.depth(), "view chain cached");
                self.cache
                    .borrow_mut()
                    .insert(leaf.name.clone(), Rc::clone(root));
            }
        }
        Ok(resolved)
    }

    /// Whether a resolved tree is currently cached for `name`.
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    /// Drop every cached tree (route-set replacement).
    pub fn clear(&self) {
        let mut cache = self.cache.borrow_mut();
        if !cache.is_empty() {
            debug!(entries = cache.len(), "result cache cleared");
        }
        cache.clear();
    }
}

/// Pure recursive composition over a head/tail view of the step slice:
/// resolve the head (awaiting a loader if needed), resolve the remainder,
/// wrap the remainder under the head.
fn resolve_steps<'a, V: Clone + 'static>(
    steps: &'a [ViewSource<V>],
    location: &'a Location,
) -> LocalBoxFuture<'a, Result<Option<Rc<ViewNode<V>>>, LoadError>> {
    async move {
        let Some((head, tail)) = steps.split_first() else {
            return Ok(None);
        };
        let view = match head {
            ViewSource::View(view) => view.clone(),
            ViewSource::Loader(loader) => loader().await?,
        };
        let child = resolve_steps(tail, location).await?;
        Ok(Some(Rc::new(ViewNode {
            view,
            location: location.clone(),
            child,
        })))
    }
    .boxed_local()
}
