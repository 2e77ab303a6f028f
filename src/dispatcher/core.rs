//! Activation dispatch and the owning `ViewRouter` lifecycle type.

use crate::location::{Location, ParamMap};
use crate::matcher::{Matcher, MatcherError};
use crate::registrar;
use crate::resolver::{ResolutionError, ViewNode, ViewResolver};
use crate::route::RouteDef;
use crate::tree::{flatten, ConfigError, LeafRecord};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Callback handed the composed view tree (or `None` when the matched
/// branch produced no view) and the settled navigation's location.
pub type RenderCallback<V> = Rc<dyn Fn(Option<Rc<ViewNode<V>>>, Location)>;

/// Callback surfacing per-activation resolution failures to the owner.
pub type ErrorCallback = Rc<dyn Fn(&ResolutionError)>;

/// Lifecycle phase of a [`ViewRouter`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    /// Constructed, nothing mounted yet
    Uninitialized,
    /// Route set flattened and registered, matcher init in flight
    Initializing,
    /// The render callback has fired at least once
    Ready,
    /// Matcher torn down; no further callbacks accepted
    Destroyed,
}

/// Owner-level configuration.
///
/// `cache_enabled` is the explicit development-mode bypass for the result
/// cache: with it off, every activation re-resolves its view chain
/// (deferred loaders run again), which is what you want while iterating
/// on views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRouterConfig {
    /// Reuse resolved view chains across repeated activations (default: true)
    pub cache_enabled: bool,
}

impl Default for ViewRouterConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

/// Setup failure reported by [`ViewRouter::mount`] and
/// [`ViewRouter::replace_routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// The route tree failed flatten-time validation; nothing was
    /// registered.
    Config(ConfigError),
    /// The matcher failed to initialize.
    Matcher(MatcherError),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::Config(err) => write!(f, "invalid route configuration: {}", err),
            MountError::Matcher(err) => write!(f, "matcher initialization failed: {}", err),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MountError::Config(err) => Some(err),
            MountError::Matcher(err) => Some(err),
        }
    }
}

impl From<ConfigError> for MountError {
    fn from(err: ConfigError) -> Self {
        MountError::Config(err)
    }
}

impl From<MatcherError> for MountError {
    fn from(err: MatcherError) -> Self {
        MountError::Matcher(err)
    }
}

/// Drives one activation from matcher callback to render callback.
///
/// Shared (behind `Rc`) by every registration of the owning route set, so
/// all leaves resolve through one cache and one lifecycle gate.
pub struct ActivationDispatcher<V> {
    resolver: ViewResolver<V>,
    render: RenderCallback<V>,
    on_error: RefCell<Option<ErrorCallback>>,
    phase: Cell<RouterPhase>,
    /// Generation of the most recently started activation; completions
    /// carrying an older generation are discarded.
    generation: Cell<u64>,
}

impl<V: Clone + 'static> ActivationDispatcher<V> {
    /// Create a dispatcher around a render callback.
    #[must_use]
    pub fn new(render: RenderCallback<V>, config: &ViewRouterConfig) -> Self {
        Self {
            resolver: ViewResolver::new(config.cache_enabled),
            render,
            on_error: RefCell::new(None),
            phase: Cell::new(RouterPhase::Uninitialized),
            generation: Cell::new(0),
        }
    }

    /// Activate `leaf` for a settled navigation.
    ///
    /// Resolves the view chain (cache-checked), re-attaches `location` to
    /// the composed root so the rendered root always reflects the current
    /// navigation's params and query, and fires the render callback. On
    /// resolution failure the error callback fires instead and the
    /// previous rendered state stays in place.
    pub async fn activate(&self, leaf: &LeafRecord<V>, location: Location) {
        if self.phase.get() == RouterPhase::Destroyed {
            debug!(route = %location.name, "activation after destroy ignored");
            return;
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        debug!(route = %location.name, generation, "activation started");

        match self.resolver.resolve(leaf, &location).await {
            Ok(resolved) => {
                if self.generation.get() != generation {
                    debug!(
                        route = %location.name,
                        generation,
                        "stale activation discarded"
                    );
                    return;
                }
                if self.phase.get() == RouterPhase::Destroyed {
                    return;
                }
                let tree =
                    resolved.map(|root| Rc::new(root.with_location(location.clone())));
                self.phase.set(RouterPhase::Ready);
                (self.render)(tree, location);
            }
            Err(err) => {
                warn!(
                    route = %location.name,
                    error = %err,
                    "view resolution failed; previous rendered state kept"
                );
                if let Some(on_error) = self.on_error.borrow().as_ref() {
                    on_error(&err);
                }
            }
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RouterPhase {
        self.phase.get()
    }

    pub(crate) fn set_phase(&self, phase: RouterPhase) {
        self.phase.set(phase);
    }

    pub(crate) fn set_error_callback(&self, on_error: ErrorCallback) {
        *self.on_error.borrow_mut() = Some(on_error);
    }

    pub(crate) fn clear_cache(&self) {
        self.resolver.clear();
    }

    /// Whether a resolved tree is cached for `name` (diagnostics).
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.resolver.is_cached(name)
    }
}

/// The owning lifecycle type: mounts route sets against a matcher and
/// fires the render callback on every settled navigation.
///
/// The matcher is taken by value; swapping matchers means constructing a
/// new `ViewRouter`, which also starts with a cold result cache.
pub struct ViewRouter<V, M> {
    matcher: Rc<RefCell<M>>,
    dispatcher: Rc<ActivationDispatcher<V>>,
}

impl<V, M> ViewRouter<V, M>
where
    V: Clone + 'static,
    M: Matcher,
{
    /// Create a router around a matcher and a render callback.
    #[must_use]
    pub fn new(
        matcher: M,
        render: impl Fn(Option<Rc<ViewNode<V>>>, Location) + 'static,
        config: ViewRouterConfig,
    ) -> Self {
        Self {
            matcher: Rc::new(RefCell::new(matcher)),
            dispatcher: Rc::new(ActivationDispatcher::new(Rc::new(render), &config)),
        }
    }

    /// Install a callback for per-activation resolution failures. Without
    /// one, failures are logged at WARN and otherwise dropped.
    #[must_use]
    pub fn with_error_callback(self, on_error: impl Fn(&ResolutionError) + 'static) -> Self {
        self.dispatcher.set_error_callback(Rc::new(on_error));
        self
    }

    /// Flatten `routes`, register every leaf with the matcher, and
    /// initialize the matcher.
    ///
    /// # Errors
    ///
    /// [`MountError::Config`] when the tree fails validation (nothing is
    /// registered), [`MountError::Matcher`] when matcher init fails.
    pub async fn mount(&self, routes: &[RouteDef<V>]) -> Result<(), MountError> {
        self.dispatcher.set_phase(RouterPhase::Initializing);
        let leaves = flatten(routes)?;
        info!(leaf_count = leaves.len(), "mounting route set");
        self.register_leaves(leaves);
        let init = self.matcher.borrow_mut().init();
        init.await?;
        Ok(())
    }

    /// Replace the mounted route set: tear down prior registrations,
    /// drop every cached view chain, register the new set, re-init.
    ///
    /// # Errors
    ///
    /// Same as [`ViewRouter::mount`].
    pub async fn replace_routes(&self, routes: &[RouteDef<V>]) -> Result<(), MountError> {
        self.dispatcher.set_phase(RouterPhase::Initializing);
        self.matcher.borrow_mut().destroy();
        self.dispatcher.clear_cache();
        let leaves = flatten(routes)?;
        info!(leaf_count = leaves.len(), "replacing route set");
        self.register_leaves(leaves);
        let init = self.matcher.borrow_mut().init();
        init.await?;
        Ok(())
    }

    fn register_leaves(&self, leaves: Vec<LeafRecord<V>>) {
        let mut matcher = self.matcher.borrow_mut();
        registrar::register(leaves, &mut *matcher, &self.dispatcher);
    }

    /// Navigate to `name`, pushing a history entry.
    ///
    /// # Errors
    ///
    /// Forwards the matcher's failure (unknown name, guard rejection).
    pub async fn push(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> Result<(), MatcherError> {
        let nav = self.matcher.borrow().push_state(name, params, query);
        nav.await
    }

    /// Navigate to `name`, replacing the current history entry.
    ///
    /// # Errors
    ///
    /// Forwards the matcher's failure (unknown name, guard rejection).
    pub async fn replace(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> Result<(), MatcherError> {
        let nav = self.matcher.borrow().replace_state(name, params, query);
        nav.await
    }

    /// Settles when the most recent in-flight navigation settles.
    ///
    /// # Errors
    ///
    /// Forwards the matcher's failure.
    pub async fn pending(&self) -> Result<(), MatcherError> {
        let pending = self.matcher.borrow().pending();
        pending.await
    }

    /// Tear down: destroy the matcher's registrations and stop accepting
    /// activation callbacks.
    pub fn destroy(&self) {
        info!("view router destroyed");
        self.matcher.borrow_mut().destroy();
        self.dispatcher.set_phase(RouterPhase::Destroyed);
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RouterPhase {
        self.dispatcher.phase()
    }

    /// Whether a resolved view chain is cached for `name` (diagnostics).
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.dispatcher.is_cached(name)
    }
}
