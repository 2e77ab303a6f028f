//! End-to-end navigation scenarios
//!
//! # Test Coverage
//!
//! Drives the full chain - matcher navigation, composed guards, view
//! chain resolution, result cache, render callback - through the public
//! `ViewRouter` API and the in-memory matcher double:
//!
//! - Simple activation renders the leaf's composed tree and location
//! - Guard redirects settle on the redirect target, carrying params
//! - Nested trees compose ancestor views around the leaf view
//! - Deferred loaders run once per leaf; later activations hit the cache
//! - Failed resolutions keep the previously rendered state
//! - Guard-only branches render "no view"

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{params, render_capture, StubMatcher, TestTracing};
use futures::executor::block_on;
use futures::future;
use routetree::{
    GuardError, LoadError, Location, ParamMap, ResolutionError, Route, RouteDef, ViewRouter,
    ViewRouterConfig,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type V = &'static str;

#[test]
fn test_home_activation_renders_once_with_location() {
    let _tracing = TestTracing::init();
    let routes: Vec<RouteDef<V>> =
        vec![Route::new().name("home").path("/").view("Home").into()];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("home", ParamMap::new(), ParamMap::new())).expect("navigate");

    let calls = rendered.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ["Home"]);
    assert_eq!(
        calls[0].1,
        Location::new("home", ParamMap::new(), ParamMap::new())
    );
}

#[test]
fn test_guard_redirect_settles_on_target_with_params() {
    let routes: Vec<RouteDef<V>> = vec![
        Route::new()
            .name("books")
            .path("/books/{id:[0-9]+}")
            .guard(|matched, replace, _push| async move {
                replace("newBooks", matched.params.clone(), ParamMap::new());
                Ok(())
            })
            .view("OldBooks")
            .into(),
        Route::new()
            .name("newBooks")
            .path("/new-books/{id:[0-9]+}")
            .view("NewBooks")
            .into(),
    ];
    let matcher = StubMatcher::new();
    let handle = matcher.handle();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("books", params("id", "100"), ParamMap::new())).expect("navigate");

    let calls = rendered.borrow();
    assert_eq!(calls.len(), 1, "only the redirect target renders");
    assert_eq!(calls[0].0, ["NewBooks"]);
    assert_eq!(
        calls[0].1,
        Location::new("newBooks", params("id", "100"), ParamMap::new())
    );
    assert_eq!(handle.settled(), ["newBooks"]);
}

#[test]
fn test_later_guards_run_after_a_redirect_request() {
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let outer = Rc::clone(&order);
    let inner = Rc::clone(&order);
    let routes: Vec<RouteDef<V>> = vec![
        Route::new()
            .name("gated")
            .path("/gated")
            .guard(move |_, replace, _| {
                let order = Rc::clone(&outer);
                async move {
                    order.borrow_mut().push("redirecting-guard");
                    replace("target", ParamMap::new(), ParamMap::new());
                    Ok(())
                }
            })
            .view("GatedShell")
            .children(vec![Route::new()
                .name("inner")
                .path("inner")
                .guard(move |_, _, _| {
                    let order = Rc::clone(&inner);
                    async move {
                        order.borrow_mut().push("leaf-guard");
                        Ok(())
                    }
                })
                .view("Inner")
                .into()])
            .into(),
        Route::new().name("target").path("/target").view("Target").into(),
    ];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("gated.inner", ParamMap::new(), ParamMap::new())).expect("navigate");

    // The redirect request did not abort the chain, and the activation
    // reflects the redirected navigation.
    assert_eq!(*order.borrow(), ["redirecting-guard", "leaf-guard"]);
    let calls = rendered.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ["Target"]);
}

#[test]
fn test_guard_rejection_propagates_and_nothing_renders() {
    let routes: Vec<RouteDef<V>> = vec![Route::new()
        .name("private")
        .path("/private")
        .guard(|_, _, _| future::ready(Err(GuardError::new("not signed in"))))
        .view("Private")
        .into()];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    let err = block_on(router.push("private", ParamMap::new(), ParamMap::new()))
        .expect_err("guard rejects");
    assert!(matches!(
        err,
        routetree::MatcherError::GuardRejected { .. }
    ));
    assert!(rendered.borrow().is_empty());
}

#[test]
fn test_nested_tree_composes_ancestor_views_around_leaf() {
    let routes: Vec<RouteDef<V>> = vec![Route::new()
        .name("admin")
        .path("/admin")
        .view("AppWrapper")
        .children(vec![Route::new()
            .name("books")
            .path("books")
            .view("Book")
            .into()])
        .into()];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("admin.books", ParamMap::new(), ParamMap::new())).expect("navigate");

    let calls = rendered.borrow();
    assert_eq!(calls[0].0, ["AppWrapper", "Book"]);
}

#[test]
fn test_deferred_loader_runs_once_across_activations() {
    let loads = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&loads);
    let routes: Vec<RouteDef<V>> = vec![Route::new()
        .name("reports")
        .path("/reports")
        .load_view(move || {
            counter.set(counter.get() + 1);
            future::ready(Ok("Reports"))
        })
        .into()];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("reports", ParamMap::new(), ParamMap::new())).expect("first");
    block_on(router.push("reports", ParamMap::new(), ParamMap::new())).expect("second");

    assert_eq!(loads.get(), 1, "second activation must hit the cache");
    let calls = rendered.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, ["Reports"]);
    assert_eq!(calls[1].0, ["Reports"]);
}

#[test]
fn test_cache_bypass_config_reloads_per_activation() {
    let loads = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&loads);
    let routes: Vec<RouteDef<V>> = vec![Route::new()
        .name("reports")
        .path("/reports")
        .load_view(move || {
            counter.set(counter.get() + 1);
            future::ready(Ok("Reports"))
        })
        .into()];
    let matcher = StubMatcher::new();
    let (_rendered, render) = render_capture();
    let router = ViewRouter::new(
        matcher,
        render,
        ViewRouterConfig {
            cache_enabled: false,
        },
    );
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("reports", ParamMap::new(), ParamMap::new())).expect("first");
    block_on(router.push("reports", ParamMap::new(), ParamMap::new())).expect("second");

    assert_eq!(loads.get(), 2);
}

#[test]
fn test_failed_resolution_keeps_previous_rendered_state() {
    let routes: Vec<RouteDef<V>> = vec![
        Route::new().name("home").path("/").view("Home").into(),
        Route::new()
            .name("broken")
            .path("/broken")
            .load_view(|| future::ready(Err(LoadError::new("chunk fetch failed"))))
            .into(),
    ];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let errors: Rc<RefCell<Vec<ResolutionError>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default())
        .with_error_callback(move |err| sink.borrow_mut().push(err.clone()));
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("home", ParamMap::new(), ParamMap::new())).expect("home");
    block_on(router.push("broken", ParamMap::new(), ParamMap::new())).expect("navigation settles");

    let calls = rendered.borrow();
    assert_eq!(calls.len(), 1, "failed activation must not render");
    assert_eq!(calls[0].0, ["Home"]);
    assert_eq!(errors.borrow().len(), 1);
    // Sibling leaves are unaffected afterwards.
    drop(calls);
    block_on(router.push("home", ParamMap::new(), ParamMap::new())).expect("home again");
    assert_eq!(rendered.borrow().len(), 2);
}

#[test]
fn test_guard_only_branch_renders_no_view() {
    let done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&done);
    let routes: Vec<RouteDef<V>> = vec![Route::new()
        .name("logout")
        .path("/logout")
        .guard(move |_, _, _| {
            flag.set(true);
            future::ready(Ok(()))
        })
        .into()];
    let matcher = StubMatcher::new();
    let (rendered, render) = render_capture();
    let router = ViewRouter::new(matcher, render, ViewRouterConfig::default());
    block_on(router.mount(&routes)).expect("mount");

    block_on(router.push("logout", ParamMap::new(), ParamMap::new())).expect("navigate");

    assert!(done.get(), "guard ran");
    let calls = rendered.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.is_empty(), "no composed view for a guard-only branch");
    assert_eq!(calls[0].1.name, "logout");
}

#[test]
fn test_location_serializes_for_logging() {
    let location = Location::new("admin.books", params("id", "100"), params("tab", "reviews"));
    let value = serde_json::to_value(&location).expect("serialize");
    assert_eq!(value["name"], "admin.books");
    assert_eq!(value["params"]["id"], "100");
    assert_eq!(value["query"]["tab"], "reviews");
}
