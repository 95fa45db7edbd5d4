//! sw-s3: S3 resource provider for static website deployments
//!
//! This crate provides the implementation of the Provider trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
pub mod naming;

pub use client::S3Provider;
