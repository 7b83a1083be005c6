//! Fixed dispatch table from `(action, method)` to a handler.
//!
//! The set of callable handlers is enumerated up front. Unknown pairs are
//! rejected by lookup before anything is invoked.

use std::collections::HashMap;

use crate::{params::Action, record::LeadKind};

/// Handler selected by the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Store a new lead of the given kind.
    PutLead(LeadKind),
}

/// Immutable routing table, built once at startup.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    routes: HashMap<(Action, String), Handler>,
}

impl DispatchTable {
    /// Table with every lead kind registered under `put`.
    pub fn standard() -> Self {
        Self::from_routes(
            LeadKind::ALL.into_iter().map(|kind| (Action::Put, kind.method(), Handler::PutLead(kind))),
        )
    }

    /// Builds a table from explicit routes.
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = (Action, &'a str, Handler)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(action, method, handler)| ((action, method.to_string()), handler))
            .collect();

        Self { routes }
    }

    /// Selects the handler for `(action, method)`.
    ///
    /// Method names match exactly.
    pub fn route(&self, action: Action, method: &str) -> Option<Handler> {
        self.routes.get(&(action, method.to_string())).copied()
    }

    /// Every registered `(action, method)` pair, sorted.
    pub fn routes(&self) -> Vec<(Action, &str)> {
        let mut pairs: Vec<_> =
            self.routes.keys().map(|(action, method)| (*action, method.as_str())).collect();
        pairs.sort_by(|a, b| (a.0.as_str(), a.1).cmp(&(b.0.as_str(), b.1)));
        pairs
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}
