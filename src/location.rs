//! # Location Module
//!
//! The location value describes one settled navigation: the matched route
//! name plus the path and query parameters the matcher extracted for it.
//! A fresh `Location` is built for every activation and handed by value to
//! the render callback, so a rendered tree always carries the navigation
//! it was composed for.

use serde::Serialize;
use std::collections::HashMap;

/// String-keyed parameter map extracted by the matcher.
///
/// Keys are unique; insertion order is irrelevant.
pub type ParamMap = HashMap<String, String>;

/// One settled navigation as seen by the render callback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Dotted route name the matcher settled on (e.g. `admin.books`)
    pub name: String,
    /// Path parameters extracted from the URL (e.g. `{id}` → `{"id": "123"}`)
    pub params: ParamMap,
    /// Query string parameters
    pub query: ParamMap,
}

impl Location {
    /// Build a location for a settled navigation.
    #[must_use]
    pub fn new(name: impl Into<String>, params: ParamMap, query: ParamMap) -> Self {
        Self {
            name: name.into(),
            params,
            query,
        }
    }
}
