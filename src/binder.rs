//! Associations between open editing surfaces and remote webtasks.
//!
//! The binder is a cache over collaborator-owned surfaces, never a source
//! of truth — the remote service is always authoritative. Bindings are
//! recorded only after a confirmed remote operation and replaced, never
//! duplicated, when a surface is rebound.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::remote::WebtaskSummary;

/// Identity of an open editing surface, as reported by the collaborator.
pub type SurfaceId = String;

/// Process-wide map from surface id to the webtask it represents.
#[derive(Debug, Default)]
pub struct ResourceBinder {
    bindings: Mutex<HashMap<SurfaceId, WebtaskSummary>>,
}

impl ResourceBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or replace the association for a surface.
    pub fn bind(&self, surface: &str, webtask: WebtaskSummary) {
        let mut bindings = self.bindings.lock().expect("binder lock poisoned");
        bindings.insert(surface.to_string(), webtask);
    }

    /// The webtask bound to a surface, if any.
    ///
    /// Absence means "no known remote resource for this surface" — a new
    /// or unassociated surface, not an error.
    pub fn resolve(&self, surface: &str) -> Option<WebtaskSummary> {
        let bindings = self.bindings.lock().expect("binder lock poisoned");
        bindings.get(surface).cloned()
    }

    /// Drop the binding when the collaborator signals surface closure.
    pub fn forget(&self, surface: &str) {
        let mut bindings = self.bindings.lock().expect("binder lock poisoned");
        bindings.remove(surface);
    }

    /// Find a surface already bound to the given webtask token.
    pub fn surface_for_token(&self, token: &str) -> Option<SurfaceId> {
        let bindings = self.bindings.lock().expect("binder lock poisoned");
        bindings
            .iter()
            .find(|(_, wt)| wt.token == token)
            .map(|(surface, _)| surface.clone())
    }
}
