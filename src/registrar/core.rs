//! Guard composition and matcher registration.

use crate::dispatcher::ActivationDispatcher;
use crate::location::Location;
use crate::matcher::{ActivationCallback, BeforeHook, Matcher, RouteRegistration};
use crate::route::Guard;
use crate::tree::LeafRecord;
use futures::FutureExt;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

/// Derive the composed guard for one leaf: a hook that executes the
/// accumulated guards sequentially, awaiting each, in root-to-leaf order.
///
/// Returns `None` for a leaf with no guards, so guardless routes register
/// without a pre-navigation hook at all.
#[must_use]
pub fn compose_guard(guards: &[Guard]) -> Option<BeforeHook> {
    if guards.is_empty() {
        return None;
    }
    let guards = guards.to_vec();
    Some(Rc::new(move |matched, replace, push| {
        let guards = guards.clone();
        async move {
            for guard in guards.iter() {
                guard(matched.clone(), Rc::clone(&replace), Rc::clone(&push)).await?;
            }
            Ok(())
        }
        .boxed_local()
    }))
}

/// Register every leaf with the matcher, in traversal order.
///
/// Each registration's activation callback closes over its leaf and the
/// shared dispatcher; when the matcher settles a navigation on the leaf,
/// the callback builds the location and drives resolution and rendering.
pub fn register<V, M>(
    leaves: Vec<LeafRecord<V>>,
    matcher: &mut M,
    dispatcher: &Rc<ActivationDispatcher<V>>,
) where
    V: Clone + 'static,
    M: Matcher + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::with_capacity(leaves.len());
    for leaf in leaves {
        if !seen.insert(leaf.name.clone()) {
            warn!(
                route = %leaf.name,
                "duplicate route name; the last registration wins on activation"
            );
        }
        let name = leaf.name.clone();
        let path = leaf.path.clone();
        let on_before = compose_guard(&leaf.guards);
        let callback = activation_callback(Rc::new(leaf), Rc::clone(dispatcher));
        matcher.add_route(RouteRegistration {
            name: name.clone(),
            path: path.clone(),
            on_before,
            callback,
        });
        debug!(route = %name, path = %path, "route registered");
    }
}

fn activation_callback<V: Clone + 'static>(
    leaf: Rc<LeafRecord<V>>,
    dispatcher: Rc<ActivationDispatcher<V>>,
) -> ActivationCallback {
    Rc::new(move |name, params, query| {
        let leaf = Rc::clone(&leaf);
        let dispatcher = Rc::clone(&dispatcher);
        async move {
            dispatcher
                .activate(&leaf, Location::new(name, params, query))
                .await;
        }
        .boxed_local()
    })
}
