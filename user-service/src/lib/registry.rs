use std::any::type_name;
use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Wiring errors. Both are fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Cannot register an absent service instance")]
    NullArgument,

    #[error("No service registered for type {0}")]
    ServiceNotFound(&'static str),
}

/// Process-scoped map from a service type to its single shared instance.
///
/// Built once in `main` and passed explicitly to whatever needs to resolve
/// services. Registering the same type again replaces the earlier instance.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its concrete type.
    ///
    /// # Errors
    /// * `NullArgument` - `instance` is `None`
    pub fn register<T>(&mut self, instance: Option<Arc<T>>) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
    {
        let instance = instance.ok_or(RegistryError::NullArgument)?;

        if self.services.insert(TypeId::of::<T>(), instance).is_some() {
            tracing::debug!(service = type_name::<T>(), "Service registration replaced");
        }

        Ok(())
    }

    /// Look up the instance registered for `T`.
    ///
    /// # Errors
    /// * `ServiceNotFound` - Nothing was registered for `T`
    pub fn get_service<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        self.services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
            .ok_or(RegistryError::ServiceNotFound(type_name::<T>()))
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Any + Send + Sync,
    {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.services.len())
            .finish()
    }
}
