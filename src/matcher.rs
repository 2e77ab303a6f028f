//! # Matcher Module
//!
//! The matcher is the external path/name matching and history-backed
//! navigation engine this crate registers routes against. It is consumed
//! behind the [`Matcher`] trait: the crate hands it one
//! [`RouteRegistration`] per flattened leaf and the matcher calls back on
//! navigation, first through the registration's pre-navigation hook (the
//! composed guard chain) and then, once the navigation settles, through
//! the activation callback.
//!
//! ## Path syntax
//!
//! Paths are slash-separated segments; parameter segments are written as
//! `{param_name:regex_pattern}` (e.g. `/books/{id:[0-9]+}`). Repeated
//! slashes produced by flattening are collapsed before registration, so a
//! matcher never sees a doubled `//`.
//!
//! ## Guard protocol
//!
//! A guard receives the [`MatchedRoute`] plus two [`UpdateState`] handles,
//! `replace` and `push`. Calling either requests a navigation other than
//! the one in progress. Requesting a redirect does **not** abort the rest
//! of the guard chain - later guards still run - but the eventual
//! activation reflects whichever navigation state is current when the
//! matcher next dispatches. A guard that returns [`GuardError`] aborts the
//! chain; the matcher decides whether the navigation proceeds.
//!
//! ## Lifecycle
//!
//! `add_route` may be called any number of times before `init`. After
//! `destroy`, a matcher must accept a fresh round of `add_route` calls
//! followed by another `init` (route-set replacement relies on this).

use crate::location::ParamMap;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

/// What the matcher hands a guard when a navigation matches a registration.
#[derive(Debug, Clone, Default)]
pub struct MatchedRoute {
    /// Dotted name of the matched registration
    pub name: String,
    /// Registered path pattern the navigation matched
    pub path: String,
    /// Path parameters extracted from the URL
    pub params: ParamMap,
    /// Query string parameters
    pub query: ParamMap,
}

/// Handle a guard uses to request a different navigation (`replace` or
/// `push` semantics are the matcher's).
pub type UpdateState = Rc<dyn Fn(&str, ParamMap, ParamMap)>;

/// Pre-navigation hook registered per leaf: the composed guard chain.
pub type BeforeHook =
    Rc<dyn Fn(MatchedRoute, UpdateState, UpdateState) -> LocalBoxFuture<'static, Result<(), GuardError>>>;

/// Callback fired by the matcher once a navigation settles on a route.
///
/// Arguments are `(name, params, query)` of the settled navigation.
pub type ActivationCallback =
    Rc<dyn Fn(String, ParamMap, ParamMap) -> LocalBoxFuture<'static, ()>>;

/// One flattened leaf, ready to be handed to the matcher.
#[derive(Clone)]
pub struct RouteRegistration {
    /// Dotted registration name (also the activation and cache key)
    pub name: String,
    /// Normalized slash-joined path pattern
    pub path: String,
    /// Composed guard chain, absent when the leaf accumulated no guards
    pub on_before: Option<BeforeHook>,
    /// Activation callback driving view resolution and rendering
    pub callback: ActivationCallback,
}

impl fmt::Debug for RouteRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistration")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("on_before", &self.on_before.is_some())
            .finish()
    }
}

/// External path/name matcher and navigation engine.
///
/// All future-returning methods hand back `'static` boxed futures, so an
/// implementation must not borrow `self` into the future (the usual shape
/// is an inner `Rc<RefCell<..>>` state the futures capture). This keeps
/// callers free to drop their borrow of the matcher before awaiting,
/// which matters because a navigation may re-enter the owner (a guard
/// requesting a redirect, an activation firing the render callback).
pub trait Matcher {
    /// Register one route. Chainable; registration order determines
    /// path-matching precedence (first registered, first matched).
    fn add_route(&mut self, registration: RouteRegistration) -> &mut Self;

    /// Start dispatching navigations (typically: attach to history and
    /// dispatch the current URL).
    fn init(&mut self) -> LocalBoxFuture<'static, Result<(), MatcherError>>;

    /// Tear down all registrations. The matcher must accept re-population
    /// afterwards.
    fn destroy(&mut self);

    /// Navigate to `name`, pushing a history entry.
    fn push_state(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> LocalBoxFuture<'static, Result<(), MatcherError>>;

    /// Navigate to `name`, replacing the current history entry.
    fn replace_state(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> LocalBoxFuture<'static, Result<(), MatcherError>>;

    /// Settles when the most recent in-flight navigation settles.
    fn pending(&self) -> LocalBoxFuture<'static, Result<(), MatcherError>>;
}

/// Failure raised by a guard to reject the navigation in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardError {
    message: String,
}

impl GuardError {
    /// Create a guard rejection with a human-readable reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guard rejected navigation: {}", self.message)
    }
}

impl std::error::Error for GuardError {}

/// Failure at the matcher boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    /// No registration carries the requested name
    UnknownRoute {
        /// The name that failed to resolve
        name: String,
    },
    /// A navigation primitive was called before `init` or after `destroy`
    NotReady,
    /// A guard aborted the navigation
    GuardRejected {
        /// Name of the route whose guard chain rejected
        name: String,
        /// The guard's stated reason
        reason: String,
    },
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherError::UnknownRoute { name } => {
                write!(f, "no route registered under name '{}'", name)
            }
            MatcherError::NotReady => {
                write!(f, "matcher is not initialized (or already destroyed)")
            }
            MatcherError::GuardRejected { name, reason } => {
                write!(f, "navigation to '{}' rejected by guard: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for MatcherError {}
