//! # Route Module
//!
//! The route module defines the authoring model: the declarative,
//! possibly-nested route configuration a caller hands to the flattener.
//!
//! ## Overview
//!
//! A route tree is a `Vec<RouteDef<V>>` where `V` is the caller's view
//! handle type (whatever the rendering runtime treats as "a
//! view-producing reference"). Two node shapes exist:
//!
//! - [`Route`] - a leaf-capable node carrying an optional name segment,
//!   path segment, guard, view source, and children.
//! - [`RouteGroup`] - a grouping node declaring multiple alternative
//!   parents that all share one child subtree. Flattening fans the shared
//!   subtree out under every alternative.
//!
//! ## View sources
//!
//! A node supplies at most one view source: either a direct handle
//! ([`Route::view`]) or a deferred loader ([`Route::load_view`]) invoked
//! on first activation. Loaders yield the view handle directly - there is
//! no module-wrapper unwrapping; a loader that has to adapt a foreign
//! shape does so itself.
//!
//! ## Example
//!
//! ```rust
//! use routetree::{Route, RouteDef};
//!
//! let routes: Vec<RouteDef<&'static str>> = vec![
//!     Route::new().name("home").path("/").view("Home").into(),
//!     Route::new()
//!         .name("admin")
//!         .path("/admin")
//!         .view("AdminShell")
//!         .children(vec![
//!             Route::new().name("books").path("books/{id:[0-9]+}").view("Book").into(),
//!         ])
//!         .into(),
//! ];
//! # let _ = routes;
//! ```

mod core;

pub use core::{Guard, LoadError, Route, RouteDef, RouteGroup, ViewLoader, ViewSource};
