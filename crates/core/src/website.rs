//! Static website component
//!
//! Declares a publicly readable bucket configured for website hosting, and
//! one public-read object per file selected from a local directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::Result;
use crate::files::{content_type_for, select_files};
use crate::output::Output;
use crate::resource::{FileAsset, ResourceDeclaration, ResourceOptions, ResourceType, Urn};
use crate::traits::Engine;

/// Type token of the component itself
pub const COMPONENT_TYPE: &str = "static-website-provider:index:StaticWebsiteComponent";

/// Bucket logical name when none is configured
pub const DEFAULT_BUCKET_NAME: &str = "static-website";

/// Index document served for directory requests
pub const INDEX_DOCUMENT: &str = "index.html";

/// Object ownership required for objects to carry their own ACL
pub const OBJECT_OWNERSHIP: &str = "ObjectWriter";

/// Canned ACL applied to every uploaded object
pub const PUBLIC_READ: &str = "public-read";

/// Arguments of the static website component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticWebsiteArgs {
    /// Logical name of the bucket
    #[serde(default, alias = "bucketName", skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    /// Glob patterns, relative to the static directory, of files to deploy
    #[serde(default, alias = "includedFiles", skip_serializing_if = "Option::is_none")]
    pub included_files: Option<Vec<String>>,

    /// Root directory of the website
    #[serde(alias = "staticDirectory")]
    pub static_directory: PathBuf,
}

impl StaticWebsiteArgs {
    /// Arguments for a directory, everything else defaulted
    pub fn new(static_directory: impl Into<PathBuf>) -> Self {
        Self {
            static_directory: static_directory.into(),
            ..Default::default()
        }
    }

    /// Logical name of the bucket, falling back to the default
    pub fn bucket_name(&self) -> &str {
        self.bucket_name.as_deref().unwrap_or(DEFAULT_BUCKET_NAME)
    }
}

/// A declared static website
///
/// Both outputs are `None` only when the component was declared without
/// arguments.
#[derive(Debug, Clone)]
pub struct StaticWebsite {
    /// Component URN
    pub urn: Urn,

    /// `http://` URL of the hosted website
    pub url: Option<Output<String>>,

    /// Provider-assigned bucket id
    pub bucket: Option<Output<String>>,
}

impl StaticWebsite {
    /// Declare the component and all of its resources into `engine`.
    pub fn new<E>(engine: &mut E, name: &str, args: Option<&StaticWebsiteArgs>) -> Result<Self>
    where
        E: Engine + ?Sized,
    {
        let urn = engine.register_component(COMPONENT_TYPE, name, ResourceOptions::default())?;

        let Some(args) = args else {
            warn!(component = name, "declared without arguments; no resources created");
            return Ok(Self {
                urn,
                url: None,
                bucket: None,
            });
        };

        let child = ResourceOptions::default().parent(urn.clone());

        let bucket = engine.register_resource(
            ResourceDeclaration::new(ResourceType::Bucket, args.bucket_name())
                .options(child.clone()),
        )?;
        let bucket_id = bucket.output_string("id");

        let ownership_controls = engine.register_resource(
            ResourceDeclaration::new(ResourceType::OwnershipControls, "ownership-controls")
                .property("bucket", bucket_id.clone())
                .property("rule", json!({ "objectOwnership": OBJECT_OWNERSHIP }))
                .options(child.clone()),
        )?;

        let public_access_block = engine.register_resource(
            ResourceDeclaration::new(ResourceType::PublicAccessBlock, "public-access-block")
                .property("bucket", bucket_id.clone())
                .property("blockPublicAcls", false)
                .options(child.clone()),
        )?;

        let website = engine.register_resource(
            ResourceDeclaration::new(ResourceType::WebsiteConfiguration, "website")
                .property("bucket", bucket_id.clone())
                .property("indexDocument", json!({ "suffix": INDEX_DOCUMENT }))
                .options(child.clone()),
        )?;

        // Objects can only be public-read once all three settings are in place
        let prerequisites = [
            public_access_block.urn.clone(),
            ownership_controls.urn.clone(),
            website.urn.clone(),
        ];

        let files = select_files(&args.static_directory, args.included_files.as_deref())?;
        for file in files {
            let content_type = content_type_for(&file.key);
            debug!(file = %file.key, content_type = %content_type, "declaring object");

            engine.register_resource(
                ResourceDeclaration::new(ResourceType::BucketObject, file.key.as_str())
                    .property("bucket", bucket_id.clone())
                    .property("key", file.key.as_str())
                    .property("source", FileAsset::new(file.path))
                    .property("contentType", content_type)
                    .property("acl", PUBLIC_READ)
                    .options(child.clone().depends_on(prerequisites.iter().cloned())),
            )?;
        }

        let url = website
            .output_string("websiteEndpoint")
            .map(|endpoint| format!("http://{endpoint}"));

        Ok(Self {
            urn,
            url: Some(url),
            bucket: Some(bucket_id),
        })
    }
}
