// ---------------------------------------------------------------------------
// state.rs — Application state shared by every handler
// ---------------------------------------------------------------------------

use std::sync::Arc;

use mockable::Clock;

use crate::dispatch::Dispatcher;
use crate::effects::Effects;
use crate::registry::builtin::default_registry;
use crate::registry::Registry;

/// Name and version reported by `initialize` and `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Central application state. Clone-friendly — everything inside is an Arc
/// or a small value; the registry is never mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub dispatcher: Dispatcher,
    pub effects: Effects,
    pub server_info: ServerInfo,
}

impl AppState {
    /// State serving the built-in calculator and weather tools.
    pub fn new(effects: Effects) -> Self {
        let registry = default_registry(&effects);
        Self::with_registry(registry, effects)
    }

    pub fn with_registry(registry: Registry, effects: Effects) -> Self {
        let registry = Arc::new(registry);
        tracing::info!(
            "AppState initialised — {} tools: {:?}",
            registry.tools().len(),
            registry.tools().iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
        );
        Self {
            dispatcher: Dispatcher::new(registry.clone()),
            registry,
            effects,
            server_info: ServerInfo::default(),
        }
    }

    /// Opaque correlation token handed out by `initialize`: unix millis plus
    /// a random base36 suffix. Never stored or validated.
    pub fn new_session_id(&self) -> String {
        format!(
            "session_{}_{}",
            self.effects.clock.utc().timestamp_millis(),
            self.effects.random.token(9)
        )
    }
}
