//! # routetree
//!
//! **routetree** resolves a declarative, possibly-nested route
//! configuration into a flat set of routable leaf registrations against a
//! pluggable path/name matcher and, at match time, composes each matched
//! leaf's inherited chain of guards and view-producing steps into one
//! nested view, memoized per leaf across repeated activations.
//!
//! ## Overview
//!
//! The library is organized into several key modules:
//!
//! - **[`route`]** - The authoring model: nested route definitions,
//!   grouping nodes, guards, and eager/deferred view sources
//! - **[`tree`]** - Chain accumulation and tree flattening into leaf
//!   records (dotted names, normalized paths, inherited chains)
//! - **[`registrar`]** - Guard-chain composition and leaf registration
//!   with the matcher
//! - **[`resolver`]** - View-chain resolution and the per-leaf result
//!   cache
//! - **[`dispatcher`]** - Activation dispatch, the render callback, and
//!   the owning [`ViewRouter`] lifecycle
//! - **[`matcher`]** - The trait boundary to the external path/name
//!   matcher and navigation engine
//! - **[`location`]** - The `{name, params, query}` value describing a
//!   settled navigation
//!
//! ## Architecture
//!
//! Route tree → flattener → leaf records → registrar → matcher
//! registrations. Navigation → matcher → composed guard chain (may
//! redirect) → activation dispatcher → view chain resolver
//! (cache-checked) → render callback.
//!
//! The concurrency model is single-threaded and cooperative: futures are
//! `LocalBoxFuture`, shared handles are `Rc`, and the only suspension
//! points are guard execution and deferred view loading. Bring your own
//! executor; the crate never spawns.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routetree::{Route, RouteDef, ViewRouter, ViewRouterConfig};
//!
//! let routes: Vec<RouteDef<MyView>> = vec![
//!     Route::new().name("home").path("/").view(MyView::Home).into(),
//!     Route::new()
//!         .name("admin")
//!         .path("/admin")
//!         .view(MyView::AdminShell)
//!         .children(vec![
//!             Route::new()
//!                 .name("books")
//!                 .path("books/{id:[0-9]+}")
//!                 .load_view(|| async { Ok(load_books_chunk().await?) })
//!                 .into(),
//!         ])
//!         .into(),
//! ];
//!
//! let router = ViewRouter::new(my_matcher, render, ViewRouterConfig::default());
//! router.mount(&routes).await?;
//! router.push("admin.books", params, Default::default()).await?;
//! ```
//!
//! Activating `admin.books` renders `AdminShell( Book )` - the root step
//! wraps all descendants - and a second activation of the same leaf
//! reuses the cached composition without re-running the loader.

pub mod dispatcher;
pub mod location;
pub mod matcher;
pub mod registrar;
pub mod resolver;
pub mod route;
pub mod tree;

pub use dispatcher::{
    ActivationDispatcher, ErrorCallback, MountError, RenderCallback, RouterPhase, ViewRouter,
    ViewRouterConfig,
};
pub use location::{Location, ParamMap};
pub use matcher::{
    ActivationCallback, BeforeHook, GuardError, MatchedRoute, Matcher, MatcherError,
    RouteRegistration, UpdateState,
};
pub use resolver::{ResolutionError, ViewNode, ViewResolver};
pub use route::{Guard, LoadError, Route, RouteDef, RouteGroup, ViewLoader, ViewSource};
pub use tree::{flatten, ConfigError, LeafRecord};
