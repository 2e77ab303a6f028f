//! Shared test helpers: an in-memory matcher double and a tracing guard.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use routetree::{
    Location, MatchedRoute, Matcher, MatcherError, ParamMap, RouteRegistration, UpdateState,
    ViewNode,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Installs a thread-local fmt subscriber for the duration of a test.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self { _guard: guard }
    }
}

#[derive(Default)]
struct StubState {
    routes: Vec<RouteRegistration>,
    initialized: bool,
    destroyed: bool,
    initial: Option<(String, ParamMap, ParamMap)>,
    /// Redirect requested by a guard during the current navigation.
    requested: Option<(String, ParamMap, ParamMap)>,
    navigations: Vec<String>,
}

/// In-memory stand-in for the external matcher: dispatches by registered
/// name (no URL parsing), honors last-registration-wins on duplicate
/// names, runs the pre-navigation hook, and follows guard redirects the
/// way a history-backed matcher would (later guards in the chain still
/// ran; the settled navigation is the redirect target).
pub struct StubMatcher {
    inner: Rc<RefCell<StubState>>,
}

impl StubMatcher {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StubState::default())),
        }
    }

    /// Navigation dispatched automatically by `init`, the way a real
    /// matcher dispatches the current URL.
    pub fn with_initial(self, name: &str, params: ParamMap, query: ParamMap) -> Self {
        self.inner.borrow_mut().initial = Some((name.to_string(), params, query));
        self
    }

    /// Inspection handle that stays valid after the matcher is moved
    /// into a `ViewRouter`.
    pub fn handle(&self) -> StubHandle {
        StubHandle {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for StubMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Inspection handle over a [`StubMatcher`]'s recorded state.
pub struct StubHandle {
    inner: Rc<RefCell<StubState>>,
}

impl StubHandle {
    pub fn registered_names(&self) -> Vec<String> {
        self.inner.borrow().routes.iter().map(|r| r.name.clone()).collect()
    }

    pub fn registered_paths(&self) -> Vec<String> {
        self.inner.borrow().routes.iter().map(|r| r.path.clone()).collect()
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.inner
            .borrow()
            .routes
            .iter()
            .rev()
            .find(|r| r.name == name)
            .is_some_and(|r| r.on_before.is_some())
    }

    /// Names of every navigation that settled, in order.
    pub fn settled(&self) -> Vec<String> {
        self.inner.borrow().navigations.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }
}

fn navigate(
    inner: Rc<RefCell<StubState>>,
    name: String,
    params: ParamMap,
    query: ParamMap,
) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
    async move {
        let route = {
            let state = inner.borrow();
            if !state.initialized || state.destroyed {
                return Err(MatcherError::NotReady);
            }
            // Last registration wins on duplicate names.
            state.routes.iter().rev().find(|r| r.name == name).cloned()
        };
        let Some(route) = route else {
            return Err(MatcherError::UnknownRoute { name });
        };

        if let Some(hook) = &route.on_before {
            inner.borrow_mut().requested = None;
            let capture = Rc::clone(&inner);
            let replace: UpdateState = Rc::new(move |next, p, q| {
                capture.borrow_mut().requested = Some((next.to_string(), p, q));
            });
            let capture = Rc::clone(&inner);
            let push: UpdateState = Rc::new(move |next, p, q| {
                capture.borrow_mut().requested = Some((next.to_string(), p, q));
            });
            let matched = MatchedRoute {
                name: name.clone(),
                path: route.path.clone(),
                params: params.clone(),
                query: query.clone(),
            };
            hook(matched, replace, push)
                .await
                .map_err(|err| MatcherError::GuardRejected {
                    name: name.clone(),
                    reason: err.to_string(),
                })?;
            // A guard asked for a different navigation; the original one
            // never settles.
            if let Some((next, p, q)) = inner.borrow_mut().requested.take() {
                return navigate(inner, next, p, q).await;
            }
        }

        inner.borrow_mut().navigations.push(name.clone());
        (route.callback)(name, params, query).await;
        Ok(())
    }
    .boxed_local()
}

impl Matcher for StubMatcher {
    fn add_route(&mut self, registration: RouteRegistration) -> &mut Self {
        self.inner.borrow_mut().routes.push(registration);
        self
    }

    fn init(&mut self) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
        let inner = Rc::clone(&self.inner);
        async move {
            {
                let mut state = inner.borrow_mut();
                state.initialized = true;
                state.destroyed = false;
            }
            let initial = inner.borrow().initial.clone();
            if let Some((name, params, query)) = initial {
                navigate(inner, name, params, query).await?;
            }
            Ok(())
        }
        .boxed_local()
    }

    fn destroy(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.routes.clear();
        state.destroyed = true;
        state.initialized = false;
    }

    fn push_state(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
        navigate(Rc::clone(&self.inner), name.to_string(), params, query)
    }

    fn replace_state(
        &self,
        name: &str,
        params: ParamMap,
        query: ParamMap,
    ) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
        navigate(Rc::clone(&self.inner), name.to_string(), params, query)
    }

    fn pending(&self) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
        // Stub navigations settle before their future resolves, so there
        // is never an in-flight navigation to wait on.
        futures::future::ok(()).boxed_local()
    }
}

/// Flatten a composed view tree into its view handles, root first.
pub fn chain_views(root: &Rc<ViewNode<&'static str>>) -> Vec<&'static str> {
    let mut views = vec![root.view];
    let mut node = root.child.clone();
    while let Some(n) = node {
        views.push(n.view);
        node = n.child.clone();
    }
    views
}

/// Render-callback capture: `(view chain, location)` per invocation.
pub type Rendered = Rc<RefCell<Vec<(Vec<&'static str>, Location)>>>;

pub fn render_capture() -> (
    Rendered,
    impl Fn(Option<Rc<ViewNode<&'static str>>>, Location) + 'static,
) {
    let rendered: Rendered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&rendered);
    let render = move |tree: Option<Rc<ViewNode<&'static str>>>, location: Location| {
        let views = tree.as_ref().map(chain_views).unwrap_or_default();
        sink.borrow_mut().push((views, location));
    };
    (rendered, render)
}

/// Build a one-entry param map.
pub fn params(key: &str, value: &str) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert(key.to_string(), value.to_string());
    map
}
