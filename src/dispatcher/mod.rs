//! # Dispatcher Module
//!
//! The dispatcher module drives activations and owns the route-set
//! lifecycle.
//!
//! ## Overview
//!
//! Two types live here:
//!
//! - [`ActivationDispatcher`] - receives `(name, params, query)` from the
//!   matcher's activation callback, resolves the matched leaf's view
//!   chain through the shared [`ViewResolver`](crate::resolver::ViewResolver),
//!   re-attaches the current navigation's location to the composed root,
//!   and invokes the render callback. A resolution failure goes to the
//!   error callback instead; the previously rendered state stays in place.
//! - [`ViewRouter`] - the owner: takes the matcher and the render
//!   callback at construction, mounts a route set (flatten → register →
//!   matcher init), replaces route sets, proxies navigation, and tears
//!   down.
//!
//! ## Lifecycle
//!
//! Per owner instance:
//!
//! ```text
//! Uninitialized → Initializing → Ready → Destroyed
//!                      ↑           |
//!                      └───────────┘  (route-set replacement)
//! ```
//!
//! `Initializing` covers flatten/register/matcher-init; `Ready` is entered
//! when the render callback first fires; `Destroyed` tears the matcher
//! down and rejects any late activation callbacks.
//!
//! ## Overlapping navigations
//!
//! In-flight resolutions are not cancelled when a newer navigation
//! starts; instead each activation carries a generation number, and a
//! completion that lost the race is discarded without rendering, so the
//! render callback never goes backwards.

mod core;

pub use core::{
    ActivationDispatcher, ErrorCallback, MountError, RenderCallback, RouterPhase, ViewRouter,
    ViewRouterConfig,
};
