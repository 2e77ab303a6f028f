//! Minimal end-to-end walkthrough: a nested route tree with a lazy-loaded
//! section and a redirecting guard, driven against a tiny in-memory
//! matcher.
//!
//! Run with: `cargo run --example nested_app`

use anyhow::Context;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use routetree::{
    MatchedRoute, Matcher, MatcherError, ParamMap, Route, RouteDef, RouteRegistration,
    UpdateState, ViewRouter, ViewRouterConfig,
};
use std::cell::RefCell;
use std::rc::Rc;

/// The application's view handle: just a tag the "renderer" prints.
type View = &'static str;

#[derive(Default)]
struct MemoryState {
    routes: Vec<RouteRegistration>,
    ready: bool,
    redirect: Option<(String, ParamMap, ParamMap)>,
}

/// Name-keyed matcher: no URL parsing, but the full registration, guard,
/// and redirect protocol of a history-backed engine.
#[derive(Default)]
struct MemoryMatcher {
    inner: Rc<RefCell<MemoryState>>,
}

fn navigate(
    inner: Rc<RefCell<MemoryState>>,
    name: String,
    params: ParamMap,
    query: ParamMap,
) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
    async move {
        let route = {
            let state = inner.borrow();
            if !state.ready {
                return Err(MatcherError::NotReady);
            }
            state.routes.iter().rev().find(|r| r.name == name).cloned()
        };
        let Some(route) = route else {
            return Err(MatcherError::UnknownRoute { name });
        };
        if let Some(hook) = &route.on_before {
            let capture = Rc::clone(&inner);
            let replace: UpdateState = Rc::new(move |next, p, q| {
                capture.borrow_mut().redirect = Some((next.to_string(), p, q));
            });
            let matched = MatchedRoute {
                name: name.clone(),
                path: route.path.clone(),
                params: params.clone(),
                query: query.clone(),
            };
            hook(matched, Rc::clone(&replace), replace)
                .await
                .map_err(|err| MatcherError::GuardRejected {
                    name: name.clone(),
                    reason: err.to_string(),
                })?;
            if let Some((next, p, q)) = inner.borrow_mut().redirect.take() {
                return navigate(inner, next, p, q).await;
            }
        }
        (route.callback)(name, params, query).await;
        Ok(())
    }
    .boxed_local()
}

impl Matcher for MemoryMatcher {
    fn add_route(&mut self, registration: RouteRegistration) -> &mut Self {
        self.inner.borrow_mut().routes.push(registration);
        self
    }

    fn init(&mut self) -> LocalBoxFuture<'static, Result<(), MatcherError>> {
        let inner = Rc::clone(&self.inner);
        async move {
            inner.borrow_mut().ready = true;
            Ok(())
        }
        .boxed_local()
    }

    fn destroy(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.routes.clear();
        state.ready = false;
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
        futures::future::ok(()).boxed_local()
    }
}

fn routes() -> Vec<RouteDef<View>> {
    vec![
        Route::new().name("home").path("/").view("Home").into(),
        Route::new()
            .name("admin")
            .path("/admin")
            .view("AdminShell")
            .children(vec![
                Route::new()
                    .name("books")
                    .path("books/{id:[0-9]+}")
                    // Stand-in for a code-split chunk fetch.
                    .load_view(|| async { Ok("BookDetail") })
                    .into(),
                Route::new()
                    .name("legacyReports")
                    .path("reports-old")
                    .guard(|matched, replace, _push| async move {
                        replace("admin.reports", matched.params.clone(), ParamMap::new());
                        Ok(())
                    })
                    .view("LegacyReports")
                    .into(),
                Route::new().name("reports").path("reports").view("Reports").into(),
            ])
            .into(),
    ]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let render = |tree, location: routetree::Location| {
        let mut chain = Vec::new();
        let mut node: Option<Rc<routetree::ViewNode<View>>> = tree;
        while let Some(n) = node {
            chain.push(n.view);
            node = n.child.clone();
        }
        if chain.is_empty() {
            println!("[render] {} -> (no view)", location.name);
        } else {
            println!("[render] {} -> {}", location.name, chain.join(" > "));
        }
    };

    let router = ViewRouter::new(MemoryMatcher::default(), render, ViewRouterConfig::default());
    block_on(async {
        router.mount(&routes()).await.context("mount route tree")?;

        router
            .push("home", ParamMap::new(), ParamMap::new())
            .await
            .context("navigate home")?;

        let mut params = ParamMap::new();
        params.insert("id".to_string(), "42".to_string());
        // First visit runs the deferred loader; the second is served from
        // the result cache.
        router.push("admin.books", params.clone(), ParamMap::new()).await?;
        router.push("admin.books", params, ParamMap::new()).await?;

        // The guard redirects to admin.reports before anything renders.
        router
            .push("admin.legacyReports", ParamMap::new(), ParamMap::new())
            .await?;

        Ok::<_, anyhow::Error>(())
    })?;

    router.destroy();
    Ok(())
}
