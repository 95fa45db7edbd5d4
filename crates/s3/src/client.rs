//! S3 provider implementation
//!
//! Wraps aws-sdk-s3 and implements the Provider trait from sw-core.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, IndexDocument, ObjectCannedAcl,
    ObjectOwnership, OwnershipControls, OwnershipControlsRule, PublicAccessBlockConfiguration,
    WebsiteConfiguration,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use serde_json::{Value, json};
use tracing::debug;

use sw_core::{CreateRequest, Error, Provider, ProviderConfig, ProviderOutputs, ResourceType, Result};

use crate::naming;

/// Region that rejects an explicit location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// S3 provider
#[derive(Debug)]
pub struct S3Provider {
    inner: aws_sdk_s3::Client,
    region: String,
    autoname: bool,
}

impl S3Provider {
    /// Create a new S3 provider from connection settings
    ///
    /// Anything left unset is taken from the ambient AWS configuration
    /// (environment variables, shared config and credentials files).
    pub async fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some((access_key, secret_key)) = config.static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "swc-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let retry = config.retry_config();
        loader = loader.retry_config(
            aws_smithy_types::retry::RetryConfig::standard()
                .with_max_attempts(retry.max_attempts)
                .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
                .with_max_backoff(Duration::from_millis(retry.max_backoff_ms)),
        );

        let sdk_config = loader.load().await;
        let region = sdk_config.region().map(|r| r.to_string()).ok_or_else(|| {
            Error::Config("No region configured; set provider.region or AWS_REGION".into())
        })?;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::from_client(
            aws_sdk_s3::Client::from_conf(s3_config),
            region,
            config.autoname,
        ))
    }

    /// Wrap an already configured client
    ///
    /// `region` decides the location constraint and the website endpoint;
    /// it is not read back from the client.
    pub fn from_client(client: aws_sdk_s3::Client, region: impl Into<String>, autoname: bool) -> Self {
        Self {
            inner: client,
            region: region.into(),
            autoname,
        }
    }

    /// Region resources are created in
    pub fn region(&self) -> &str {
        &self.region
    }

    async fn create_bucket(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        let bucket = if self.autoname {
            naming::autoname(&request.name)
        } else {
            request.name.clone()
        };

        let mut call = self.inner.create_bucket().bucket(&bucket);
        if self.region != DEFAULT_REGION {
            call = call.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }
        call.send()
            .await
            .map_err(|e| sdk_error(&format!("create bucket {bucket}"), e))?;

        debug!(bucket = %bucket, region = %self.region, "bucket created");
        Ok(outputs([
            ("id", json!(bucket)),
            ("bucket", json!(bucket)),
            ("arn", json!(naming::bucket_arn(&bucket))),
            ("region", json!(self.region)),
        ]))
    }

    async fn put_ownership_controls(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        let bucket = request.str_property("bucket")?;
        let ownership = request
            .property("rule")?
            .get("objectOwnership")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::General(format!("{}: missing rule.objectOwnership", request.urn)))?;

        let rule = OwnershipControlsRule::builder()
            .object_ownership(ObjectOwnership::from(ownership))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;
        let controls = OwnershipControls::builder()
            .rules(rule)
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        self.inner
            .put_bucket_ownership_controls()
            .bucket(bucket)
            .ownership_controls(controls)
            .send()
            .await
            .map_err(|e| sdk_error(&format!("put ownership controls on {bucket}"), e))?;

        Ok(outputs([
            ("id", json!(bucket)),
            ("bucket", json!(bucket)),
        ]))
    }

    async fn put_public_access_block(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        let bucket = request.str_property("bucket")?;

        // Unset flags are sent as false
        let block = PublicAccessBlockConfiguration::builder()
            .block_public_acls(request.bool_property("blockPublicAcls"))
            .block_public_policy(request.bool_property("blockPublicPolicy"))
            .ignore_public_acls(request.bool_property("ignorePublicAcls"))
            .restrict_public_buckets(request.bool_property("restrictPublicBuckets"))
            .build();

        self.inner
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(block)
            .send()
            .await
            .map_err(|e| sdk_error(&format!("put public access block on {bucket}"), e))?;

        Ok(outputs([
            ("id", json!(bucket)),
            ("bucket", json!(bucket)),
        ]))
    }

    async fn put_website(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        let bucket = request.str_property("bucket")?;
        let suffix = request
            .property("indexDocument")?
            .get("suffix")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::General(format!("{}: missing indexDocument.suffix", request.urn)))?;

        let index = IndexDocument::builder()
            .suffix(suffix)
            .build()
            .map_err(|e| Error::General(e.to_string()))?;
        let website = WebsiteConfiguration::builder().index_document(index).build();

        self.inner
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(website)
            .send()
            .await
            .map_err(|e| sdk_error(&format!("put website configuration on {bucket}"), e))?;

        Ok(outputs([
            ("id", json!(bucket)),
            ("bucket", json!(bucket)),
            ("websiteDomain", json!(naming::website_domain(&self.region))),
            (
                "websiteEndpoint",
                json!(naming::website_endpoint(bucket, &self.region)),
            ),
        ]))
    }

    async fn put_object(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        let bucket = request.str_property("bucket")?;
        let key = request.str_property("key")?;
        let source = request.asset("source")?;

        // Read failures of local files surface here, at apply time
        let data = source.read().await?;
        let size = data.len();

        let mut call = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Ok(content_type) = request.str_property("contentType") {
            call = call.content_type(content_type);
        }
        if let Ok(acl) = request.str_property("acl") {
            call = call.acl(ObjectCannedAcl::from(acl));
        }

        let response = call
            .send()
            .await
            .map_err(|e| sdk_error(&format!("upload {key} to {bucket}"), e))?;

        debug!(bucket = %bucket, key = %key, size, "object uploaded");
        let mut result = outputs([
            ("id", json!(key)),
            ("key", json!(key)),
            ("bucket", json!(bucket)),
        ]);
        if let Some(etag) = response.e_tag() {
            result.insert("etag".into(), json!(etag.trim_matches('"')));
        }
        Ok(result)
    }
}

#[async_trait]
impl Provider for S3Provider {
    async fn create(&self, request: &CreateRequest) -> Result<ProviderOutputs> {
        match request.resource_type {
            ResourceType::Bucket => self.create_bucket(request).await,
            ResourceType::OwnershipControls => self.put_ownership_controls(request).await,
            ResourceType::PublicAccessBlock => self.put_public_access_block(request).await,
            ResourceType::WebsiteConfiguration => self.put_website(request).await,
            ResourceType::BucketObject => self.put_object(request).await,
        }
    }
}

fn outputs<const N: usize>(fields: [(&str, Value); N]) -> ProviderOutputs {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Convert an SDK error into a core error, keyed on the S3 error code
fn sdk_error<E>(context: &str, err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    classify(context, err.code(), &message)
}

fn classify(context: &str, code: Option<&str>, message: &str) -> Error {
    let detail = match code {
        Some(code) => format!("{context}: {code}: {message}"),
        None => format!("{context}: {message}"),
    };

    match code {
        Some(
            "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
            | "AllAccessDisabled",
        ) => Error::Auth(detail),
        Some(
            "BucketAlreadyExists"
            | "BucketAlreadyOwnedByYou"
            | "OperationAborted"
            | "AccessControlListNotSupported",
        ) => Error::Conflict(detail),
        Some("NoSuchBucket" | "NotFound") => Error::NotFound(detail),
        Some("InvalidBucketName" | "IllegalLocationConstraintException") => Error::Config(detail),
        _ => Error::Network(detail),
    }
}
