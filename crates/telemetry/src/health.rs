//! Component health aggregation.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Component health state.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    configured: AtomicBool,
    healthy: AtomicBool,
    message: parking_lot::RwLock<Option<String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            configured: AtomicBool::new(false),
            healthy: AtomicBool::new(false),
            message: parking_lot::RwLock::new(None),
        }
    }

    /// Marks the component's credentials as present.
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::Relaxed);
    }

    pub fn set_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
        *self.message.write() = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
    }

    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Relaxed)
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }
}

/// Per-component line in the health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub configured: bool,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Global health registry: the LLM backend and the messaging provider.
pub struct HealthRegistry {
    pub llm: ComponentHealth,
    pub provider: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            llm: ComponentHealth::new("llm"),
            provider: ComponentHealth::new("provider"),
        }
    }

    pub fn report(&self) -> Vec<ComponentHealthReport> {
        [&self.llm, &self.provider]
            .into_iter()
            .map(|component| ComponentHealthReport {
                name: component.name().to_string(),
                configured: component.is_configured(),
                healthy: component.is_healthy(),
                message: component.message(),
            })
            .collect()
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: HealthRegistry = HealthRegistry::new();

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
