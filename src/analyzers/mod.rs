//! Built-in analyzers, one per resource kind.

mod ingress;
mod pod;
mod pvc;
mod service;

pub use ingress::IngressAnalyzer;
pub use pod::PodAnalyzer;
pub use pvc::PvcAnalyzer;
pub use service::ServiceAnalyzer;

use crate::analysis::AnalyzerRegistry;
use crate::error::ConfigError;
use std::sync::Arc;

/// Register every built-in analyzer. Registration order here fixes the
/// default report aggregation order.
pub fn register_builtins(registry: &mut AnalyzerRegistry) -> Result<(), ConfigError> {
    registry.register(Arc::new(PodAnalyzer))?;
    registry.register(Arc::new(ServiceAnalyzer))?;
    registry.register(Arc::new(IngressAnalyzer))?;
    registry.register(Arc::new(PvcAnalyzer))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_in_stable_order() {
        let mut registry = AnalyzerRegistry::new();
        register_builtins(&mut registry).unwrap();
        assert_eq!(
            registry.names(),
            vec!["Pod", "Service", "Ingress", "PersistentVolumeClaim"]
        );
    }

    #[test]
    fn builtins_cannot_register_twice() {
        let mut registry = AnalyzerRegistry::new();
        register_builtins(&mut registry).unwrap();
        assert!(register_builtins(&mut registry).is_err());
    }
}
