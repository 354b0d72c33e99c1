//! Models and the registry boundary
//!
//! A `Model` is a point-in-time view of one device or platform object:
//! an address plus an attribute map. The live registry is owned by the
//! platform's device layer and reached through the [`ModelStore`] trait;
//! conditions and actions treat it as read-only and re-query it on every
//! event rather than caching snapshots.

use std::collections::HashMap;
use std::fmt;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Address of a model on the platform (e.g. `"dev:therm-1"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address
    pub fn new(address: impl Into<String>) -> Self {
        Address(address.into())
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address(s)
    }
}

/// A point-in-time view of one model: address plus attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// The model's platform address
    pub address: Address,

    /// Current attribute values
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Model {
    /// Create a model with no attributes
    pub fn new(address: impl Into<Address>) -> Self {
        Model {
            address: address.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Get a raw attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get an attribute deserialized into a concrete type
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Read access to the models visible to a rule
///
/// Implemented by the platform's device/model registry. `models` returns a
/// snapshot; the underlying registry may change between consecutive calls.
pub trait ModelStore: Send + Sync {
    /// Snapshot of every model currently visible
    fn models(&self) -> Vec<Model>;

    /// Snapshot of one model by address
    fn model(&self, address: &Address) -> Option<Model>;
}

/// A concurrent in-memory model store
///
/// Stands in for the platform registry in embedded deployments and tests.
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    models: DashMap<Address, Model>,
}

impl InMemoryModelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a model, returning the previous entry if any
    pub fn put(&self, model: Model) -> Option<Model> {
        self.models.insert(model.address.clone(), model)
    }

    /// Remove a model by address
    pub fn remove(&self, address: &Address) -> Option<Model> {
        self.models.remove(address).map(|(_, model)| model)
    }

    /// Update one attribute of a stored model, returning the old value
    pub fn set_attribute(
        &self,
        address: &Address,
        key: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.models
            .get_mut(address)
            .and_then(|mut entry| entry.attributes.insert(key.into(), value))
    }
}

impl ModelStore for InMemoryModelStore {
    fn models(&self) -> Vec<Model> {
        self.models.iter().map(|entry| entry.value().clone()).collect()
    }

    fn model(&self, address: &Address) -> Option<Model> {
        self.models.get(address).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_attributes() {
        let model = Model::new("dev:therm-1")
            .with_attribute("temperature", json!(21.5))
            .with_attribute("mode", json!("heat"));

        assert_eq!(model.get_attribute("mode"), Some(&json!("heat")));
        assert_eq!(model.attribute::<f64>("temperature"), Some(21.5));
        assert_eq!(model.get_attribute("humidity"), None);
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryModelStore::new();
        store.put(Model::new("dev:a").with_attribute("power", json!("ON")));
        store.put(Model::new("dev:b"));

        assert_eq!(store.models().len(), 2);
        let a = store.model(&Address::new("dev:a")).unwrap();
        assert_eq!(a.get_attribute("power"), Some(&json!("ON")));

        store.set_attribute(&Address::new("dev:a"), "power", json!("OFF"));
        let a = store.model(&Address::new("dev:a")).unwrap();
        assert_eq!(a.get_attribute("power"), Some(&json!("OFF")));

        store.remove(&Address::new("dev:b"));
        assert!(store.model(&Address::new("dev:b")).is_none());
    }

    #[test]
    fn test_snapshot_does_not_track_store() {
        let store = InMemoryModelStore::new();
        store.put(Model::new("dev:a").with_attribute("power", json!("ON")));

        let snapshot = store.models();
        store.set_attribute(&Address::new("dev:a"), "power", json!("OFF"));

        // The earlier snapshot is unaffected; callers re-query per event.
        assert_eq!(snapshot[0].get_attribute("power"), Some(&json!("ON")));
    }
}
