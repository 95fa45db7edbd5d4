//! In-memory deployment engine
//!
//! [`Deployment`] records declarations in registration order and can either
//! render them as a [`Plan`] or apply them one by one through a
//! [`Provider`]. Registration order is always a valid dependency order,
//! since a dependency must be registered before anything can refer to it.
//!
//! There is no state file and no diffing: apply only ever creates.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::output::{Output, Resolver};
use crate::resource::{
    PropertyValue, RegisteredResource, ResourceDeclaration, ResourceOptions, ResourceType, Urn,
};
use crate::traits::{CreateRequest, Engine, Provider, ProviderOutputs};

/// A declared composite component
#[derive(Debug, Clone, Serialize)]
pub struct PlannedComponent {
    /// Component URN
    pub urn: Urn,

    /// Component type token
    #[serde(rename = "type")]
    pub type_token: String,

    /// Logical name
    pub name: String,
}

/// One resource the deployment would create
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    /// Resource URN
    pub urn: Urn,

    /// Resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Logical name
    pub name: String,

    /// Owning component
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Urn>,

    /// Explicit dependencies
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Urn>,

    /// Input properties; unknown outputs are rendered as `<label>`
    pub properties: serde_json::Map<String, Value>,

    /// Size of the file asset, if the resource has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Everything a deployment would create, in apply order
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Stack name
    pub stack: String,

    /// Declared components
    pub components: Vec<PlannedComponent>,

    /// Declared resources
    pub steps: Vec<PlannedStep>,
}

impl Plan {
    /// Number of steps of the given type
    pub fn count(&self, resource_type: ResourceType) -> usize {
        self.steps
            .iter()
            .filter(|s| s.resource_type == resource_type)
            .count()
    }

    /// Find a step by logical name and type
    pub fn step(&self, resource_type: ResourceType, name: &str) -> Option<&PlannedStep> {
        self.steps
            .iter()
            .find(|s| s.resource_type == resource_type && s.name == name)
    }
}

/// Progress of a single apply step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    /// Provider call is about to start
    Creating,
    /// Provider call succeeded
    Created,
}

/// Notification sent to the apply observer
#[derive(Debug, Clone)]
pub struct ApplyEvent {
    /// Resource URN
    pub urn: Urn,
    /// Resource type
    pub resource_type: ResourceType,
    /// Zero-based step index
    pub index: usize,
    /// Total number of steps
    pub total: usize,
    /// Step phase
    pub phase: ApplyPhase,
}

/// A resource created during apply
#[derive(Debug, Clone, Serialize)]
pub struct AppliedResource {
    /// Resource URN
    pub urn: Urn,
    /// Resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Provider outputs
    pub outputs: ProviderOutputs,
}

/// Result of a successful apply
#[derive(Debug, Clone, Serialize)]
pub struct ApplySummary {
    /// Stack name
    pub stack: String,
    /// When the first provider call started
    pub started_at: jiff::Timestamp,
    /// When the last provider call finished
    pub finished_at: jiff::Timestamp,
    /// Created resources, in apply order
    pub resources: Vec<AppliedResource>,
}

#[derive(Debug)]
struct PendingStep {
    urn: Urn,
    declaration: ResourceDeclaration,
    resolver: Resolver<ProviderOutputs>,
}

impl PendingStep {
    fn plan(&self) -> PlannedStep {
        let mut properties = serde_json::Map::new();
        let mut size_bytes = None;

        for (key, value) in &self.declaration.properties {
            let rendered = match value {
                PropertyValue::Value(v) => v.clone(),
                PropertyValue::Output(output) => output
                    .peek()
                    .unwrap_or_else(|| Value::String(format!("<{}>", output.label()))),
                PropertyValue::Asset(asset) => {
                    size_bytes = size_bytes.or(asset.size());
                    Value::String(asset.path().display().to_string())
                }
            };
            properties.insert(key.clone(), rendered);
        }

        PlannedStep {
            urn: self.urn.clone(),
            resource_type: self.declaration.resource_type,
            name: self.declaration.name.clone(),
            parent: self.declaration.options.parent.clone(),
            depends_on: self.declaration.options.depends_on.clone(),
            properties,
            size_bytes,
        }
    }

    async fn resolve(&self) -> Result<CreateRequest> {
        let mut properties = serde_json::Map::new();
        let mut assets = BTreeMap::new();

        for (key, value) in &self.declaration.properties {
            match value {
                PropertyValue::Value(v) => {
                    properties.insert(key.clone(), v.clone());
                }
                PropertyValue::Output(output) => {
                    let resolved = output.get().await.ok_or_else(|| {
                        Error::General(format!(
                            "{}: input '{key}' depends on unknown value <{}>",
                            self.urn,
                            output.label()
                        ))
                    })?;
                    properties.insert(key.clone(), resolved);
                }
                PropertyValue::Asset(asset) => {
                    assets.insert(key.clone(), asset.clone());
                }
            }
        }

        Ok(CreateRequest {
            urn: self.urn.clone(),
            resource_type: self.declaration.resource_type,
            name: self.declaration.name.clone(),
            properties,
            assets,
        })
    }
}

/// Deployment of one stack, built up by declaring resources into it
#[derive(Debug)]
pub struct Deployment {
    stack: String,
    components: Vec<PlannedComponent>,
    steps: Vec<PendingStep>,
    urns: HashSet<Urn>,
}

impl Deployment {
    /// Create an empty deployment for a stack
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            components: Vec::new(),
            steps: Vec::new(),
            urns: HashSet::new(),
        }
    }

    /// Number of declared resources, components excluded
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no resources have been declared
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the current declarations
    pub fn plan(&self) -> Plan {
        Plan {
            stack: self.stack.clone(),
            components: self.components.clone(),
            steps: self.steps.iter().map(PendingStep::plan).collect(),
        }
    }

    /// Render the declarations without applying them
    ///
    /// Consumes the deployment, so every pending output becomes unknown.
    pub fn preview(self) -> Plan {
        self.plan()
    }

    /// Create every declared resource through `provider`, in order
    ///
    /// Stops at the first failure and returns that error unchanged; the
    /// failing resource and all later ones keep unknown outputs.
    pub async fn apply<P, F>(self, provider: &P, mut observer: F) -> Result<ApplySummary>
    where
        P: Provider + ?Sized,
        F: FnMut(&ApplyEvent),
    {
        let total = self.steps.len();
        let started_at = jiff::Timestamp::now();
        let mut resources = Vec::with_capacity(total);

        for (index, step) in self.steps.into_iter().enumerate() {
            let mut event = ApplyEvent {
                urn: step.urn.clone(),
                resource_type: step.declaration.resource_type,
                index,
                total,
                phase: ApplyPhase::Creating,
            };
            observer(&event);

            let request = step.resolve().await?;
            let outputs = provider.create(&request).await?;
            info!(urn = %step.urn, "created");

            step.resolver.resolve(outputs.clone());
            resources.push(AppliedResource {
                urn: step.urn,
                resource_type: step.declaration.resource_type,
                outputs,
            });

            event.phase = ApplyPhase::Created;
            observer(&event);
        }

        Ok(ApplySummary {
            stack: self.stack,
            started_at,
            finished_at: jiff::Timestamp::now(),
            resources,
        })
    }

    fn check_references(&self, urn: &Urn, options: &ResourceOptions) -> Result<()> {
        if self.urns.contains(urn) {
            return Err(Error::Conflict(format!("Duplicate resource: {urn}")));
        }
        for reference in options.parent.iter().chain(&options.depends_on) {
            if !self.urns.contains(reference) {
                return Err(Error::NotFound(format!(
                    "{urn} refers to undeclared resource {reference}"
                )));
            }
        }
        Ok(())
    }
}

impl Engine for Deployment {
    fn stack(&self) -> &str {
        &self.stack
    }

    fn register_component(
        &mut self,
        type_token: &str,
        name: &str,
        options: ResourceOptions,
    ) -> Result<Urn> {
        let urn = Urn::new(&self.stack, type_token, name);
        self.check_references(&urn, &options)?;
        debug!(urn = %urn, "registered component");

        self.urns.insert(urn.clone());
        self.components.push(PlannedComponent {
            urn: urn.clone(),
            type_token: type_token.to_string(),
            name: name.to_string(),
        });
        Ok(urn)
    }

    fn register_resource(
        &mut self,
        declaration: ResourceDeclaration,
    ) -> Result<RegisteredResource> {
        let urn = Urn::new(&self.stack, declaration.resource_type.token(), &declaration.name);
        self.check_references(&urn, &declaration.options)?;
        debug!(urn = %urn, depends_on = declaration.options.depends_on.len(), "registered resource");

        let (resolver, outputs) = Output::pending(declaration.name.clone());
        self.urns.insert(urn.clone());
        self.steps.push(PendingStep {
            urn: urn.clone(),
            declaration,
            resolver,
        });
        Ok(RegisteredResource::new(urn, outputs))
    }
}
