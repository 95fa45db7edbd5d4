//! Engine and Provider trait definitions
//!
//! [`Engine`] is what a component declares resources into. [`Provider`] is
//! what an engine calls to actually create a resource. Keeping both behind
//! traits lets components be declared and previewed without any cloud SDK,
//! and lets the provider be mocked for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::resource::{FileAsset, RegisteredResource, ResourceDeclaration, ResourceOptions, ResourceType, Urn};

/// Output fields reported by a provider after creating a resource
pub type ProviderOutputs = serde_json::Map<String, Value>;

/// Registry that components declare their resources into
pub trait Engine {
    /// Stack the declarations belong to
    fn stack(&self) -> &str;

    /// Register a composite component and return its URN
    fn register_component(
        &mut self,
        type_token: &str,
        name: &str,
        options: ResourceOptions,
    ) -> Result<Urn>;

    /// Register a child resource and return a handle to its deferred outputs
    fn register_resource(&mut self, declaration: ResourceDeclaration)
        -> Result<RegisteredResource>;
}

/// A fully resolved request to create one resource
///
/// Every output input has been awaited; file assets are still paths and are
/// read by the provider.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// URN of the resource being created
    pub urn: Urn,

    /// Resource type
    pub resource_type: ResourceType,

    /// Logical name
    pub name: String,

    /// Resolved plain properties
    pub properties: serde_json::Map<String, Value>,

    /// File asset properties
    pub assets: BTreeMap<String, FileAsset>,
}

impl CreateRequest {
    /// Get a property value
    pub fn property(&self, key: &str) -> Result<&Value> {
        self.properties
            .get(key)
            .ok_or_else(|| Error::General(format!("{}: missing property '{key}'", self.urn)))
    }

    /// Get a string property
    pub fn str_property(&self, key: &str) -> Result<&str> {
        self.property(key)?
            .as_str()
            .ok_or_else(|| Error::General(format!("{}: property '{key}' is not a string", self.urn)))
    }

    /// Get a boolean property, `false` when absent
    pub fn bool_property(&self, key: &str) -> bool {
        self.properties
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Get a file asset property
    pub fn asset(&self, key: &str) -> Result<&FileAsset> {
        self.assets
            .get(key)
            .ok_or_else(|| Error::General(format!("{}: missing asset '{key}'", self.urn)))
    }
}

/// Cloud provider that creates declared resources
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create a resource and report its output fields
    async fn create(&self, request: &CreateRequest) -> Result<ProviderOutputs>;
}
