//! sw-core: Core library for declaring a static website
//!
//! This crate provides everything needed to declare and preview a public
//! S3 static website, including:
//! - Configuration management
//! - Deferred resource outputs
//! - Resource declarations and the Engine / Provider traits
//! - An in-memory deployment engine
//! - The StaticWebsite component
//!
//! This crate is designed to be independent of any specific cloud SDK,
//! so components can be previewed and tested without credentials.

pub mod config;
pub mod deployment;
pub mod error;
pub mod files;
pub mod output;
pub mod provider;
pub mod resource;
pub mod traits;
pub mod website;

pub use config::{Config, ConfigManager};
pub use deployment::{
    AppliedResource, ApplyEvent, ApplyPhase, ApplySummary, Deployment, Plan, PlannedStep,
};
pub use error::{Error, Result};
pub use files::{SelectedFile, content_type_for, select_files};
pub use output::{Output, Resolver};
pub use provider::{ProviderConfig, RetryConfig};
pub use resource::{
    FileAsset, PropertyValue, RegisteredResource, ResourceDeclaration, ResourceOptions,
    ResourceType, Urn,
};
pub use traits::{CreateRequest, Engine, Provider, ProviderOutputs};
pub use website::{StaticWebsite, StaticWebsiteArgs};
