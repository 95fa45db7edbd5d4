//! Resource declarations
//!
//! A declaration is the desired state of one cloud resource: its type, a
//! logical name, a property bag, and ordering options. Declarations are
//! handed to an [`Engine`](crate::Engine); nothing here talks to a provider.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::output::Output;

/// Cloud resource types the static website component declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Storage bucket
    #[serde(rename = "aws:s3/bucketV2:BucketV2")]
    Bucket,

    /// Bucket-scoped object ownership setting
    #[serde(rename = "aws:s3/bucketOwnershipControls:BucketOwnershipControls")]
    OwnershipControls,

    /// Bucket-scoped public access block setting
    #[serde(rename = "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock")]
    PublicAccessBlock,

    /// Static website hosting configuration
    #[serde(rename = "aws:s3/bucketWebsiteConfigurationV2:BucketWebsiteConfigurationV2")]
    WebsiteConfiguration,

    /// A single uploaded object
    #[serde(rename = "aws:s3/bucketObject:BucketObject")]
    BucketObject,
}

impl ResourceType {
    /// Fully qualified type token
    pub const fn token(self) -> &'static str {
        match self {
            Self::Bucket => "aws:s3/bucketV2:BucketV2",
            Self::OwnershipControls => "aws:s3/bucketOwnershipControls:BucketOwnershipControls",
            Self::PublicAccessBlock => "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock",
            Self::WebsiteConfiguration => {
                "aws:s3/bucketWebsiteConfigurationV2:BucketWebsiteConfigurationV2"
            }
            Self::BucketObject => "aws:s3/bucketObject:BucketObject",
        }
    }

    /// Short name used in tables
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Bucket => "bucket",
            Self::OwnershipControls => "ownership-controls",
            Self::PublicAccessBlock => "public-access-block",
            Self::WebsiteConfiguration => "website",
            Self::BucketObject => "object",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Unique resource name within a deployment.
///
/// Format: `urn:sw:<stack>::<type token>::<logical name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Build a URN from its parts
    pub fn new(stack: &str, type_token: &str, name: &str) -> Self {
        Self(format!("urn:sw:{stack}::{type_token}::{name}"))
    }

    /// The full URN string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The logical name (last segment)
    pub fn name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local file whose contents are read only when the resource is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAsset {
    path: PathBuf,
}

impl FileAsset {
    /// Reference a local file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the referenced file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file, if it can be inspected
    pub fn size(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Read the file contents
    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// A single entry in a resource's property bag
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Plain value known at declaration time
    Value(Value),

    /// Value produced by another resource
    Output(Output<Value>),

    /// Local file contents
    Asset(FileAsset),
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<FileAsset> for PropertyValue {
    fn from(asset: FileAsset) -> Self {
        Self::Asset(asset)
    }
}

impl From<Output<String>> for PropertyValue {
    fn from(output: Output<String>) -> Self {
        Self::Output(output.map(Value::String))
    }
}

impl From<Output<Value>> for PropertyValue {
    fn from(output: Output<Value>) -> Self {
        Self::Output(output)
    }
}

/// Property bag of a declaration, ordered by key
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Ordering and ownership options for a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Component this resource belongs to
    pub parent: Option<Urn>,

    /// Resources that must be applied before this one
    pub depends_on: Vec<Urn>,
}

impl ResourceOptions {
    /// Set the parent component
    pub fn parent(mut self, parent: Urn) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add explicit dependencies
    pub fn depends_on(mut self, urns: impl IntoIterator<Item = Urn>) -> Self {
        self.depends_on.extend(urns);
        self
    }
}

/// Desired state of one resource
#[derive(Debug, Clone)]
pub struct ResourceDeclaration {
    /// Resource type
    pub resource_type: ResourceType,

    /// Logical name, unique per type within a stack
    pub name: String,

    /// Input properties
    pub properties: PropertyMap,

    /// Ordering options
    pub options: ResourceOptions,
}

impl ResourceDeclaration {
    /// Start a declaration with no properties
    pub fn new(resource_type: ResourceType, name: impl Into<String>) -> Self {
        Self {
            resource_type,
            name: name.into(),
            properties: PropertyMap::new(),
            options: ResourceOptions::default(),
        }
    }

    /// Set an input property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set ordering options
    pub fn options(mut self, options: ResourceOptions) -> Self {
        self.options = options;
        self
    }
}

/// Handle to a declared resource
#[derive(Debug, Clone)]
pub struct RegisteredResource {
    /// Assigned URN
    pub urn: Urn,

    outputs: Output<serde_json::Map<String, Value>>,
}

impl RegisteredResource {
    /// Pair a URN with the deferred provider outputs of the resource
    pub fn new(urn: Urn, outputs: Output<serde_json::Map<String, Value>>) -> Self {
        Self { urn, outputs }
    }

    /// Deferred value of a single provider output field
    pub fn output(&self, key: &str) -> Output<Value> {
        let field = key.to_string();
        self.outputs
            .and_then(move |outputs| outputs.get(&field).cloned())
            .with_label(format!("{}.{key}", self.urn.name()))
    }

    /// Deferred value of a string output field
    pub fn output_string(&self, key: &str) -> Output<String> {
        let label = format!("{}.{key}", self.urn.name());
        self.output(key)
            .and_then(|value| value.as_str().map(String::from))
            .with_label(label)
    }
}
