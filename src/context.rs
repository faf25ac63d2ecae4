/// Application context and dependency injection
use crate::{
    clock::{Clock, SystemClock},
    config::RegistryConfig,
    error::RegistryResult,
    notify::{Notifier, TracingNotifier},
    registry::CreatorRegistry,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<RegistryConfig>,
    pub registry: Arc<CreatorRegistry>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a context on an explicit clock
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> RegistryResult<Self> {
        // Validate configuration
        config.validate()?;

        let registry = Arc::new(CreatorRegistry::with_clock(config.registry.clone(), clock));

        Ok(Self {
            config: Arc::new(config),
            registry,
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Replace the confirmation sink
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = RegistryConfig::default();
        config.registry.operator = String::new();
        assert!(matches!(AppContext::new(config), Err(RegistryError::Validation(_))));
    }

    #[test]
    fn test_registry_uses_configured_operator() {
        let mut config = RegistryConfig::default();
        config.registry.operator = "rights-desk".to_string();
        let ctx = AppContext::new(config).unwrap();
        assert_eq!(ctx.registry.operator(), "rights-desk");
    }
}
