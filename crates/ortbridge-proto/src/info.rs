use std::collections::{HashMap, HashSet};

use ortbridge_core::FeatureDescriptor;
use tracing::debug;

use crate::descriptor::ModelDescriptor;
use crate::factory::DescriptorFactory;
use crate::onnx::{GraphProto, ValueInfoProto};

/// Read-only metadata view of a model, computed once from its descriptor.
///
/// String fields default to empty and the version to zero when the source
/// leaves them unset.
#[derive(Clone, Debug, Default)]
pub struct ModelInfo {
    author: String,
    name: String,
    domain: String,
    description: String,
    version: i64,
    metadata: HashMap<String, String>,
    inputs: Vec<FeatureDescriptor>,
    outputs: Vec<FeatureDescriptor>,
}

impl ModelInfo {
    pub fn from_descriptor(descriptor: &ModelDescriptor) -> Self {
        let proto = descriptor.proto();

        let metadata: HashMap<String, String> = proto
            .metadata_props
            .iter()
            .map(|prop| (prop.key.clone(), prop.value.clone()))
            .collect();

        let factory = DescriptorFactory::new(&metadata);
        let (inputs, outputs) = match proto.graph.as_ref() {
            Some(graph) => (
                factory.create_descriptors(graph, &inputs_without_initializers(graph)),
                factory.create_descriptors(graph, &declared_outputs(graph)),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let name = proto
            .graph
            .as_ref()
            .map(|graph| graph.name.clone())
            .unwrap_or_default();

        debug!(
            model = %name,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "extracted model info"
        );

        Self {
            author: proto.producer_name.clone(),
            name,
            domain: proto.domain.clone(),
            description: proto.doc_string.clone(),
            version: proto.model_version,
            metadata,
            inputs,
            outputs,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn inputs(&self) -> &[FeatureDescriptor] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[FeatureDescriptor] {
        &self.outputs
    }
}

/// Graph inputs that have a name and a type and are not initializers.
/// An input listed among the initializers is a weight, not a feature.
fn inputs_without_initializers(graph: &GraphProto) -> Vec<&ValueInfoProto> {
    let initializers: HashSet<&str> = graph
        .initializer
        .iter()
        .map(|init| init.name.as_str())
        .collect();

    graph
        .input
        .iter()
        .filter(|input| !input.name.is_empty() && input.r#type.is_some())
        .filter(|input| !initializers.contains(input.name.as_str()))
        .collect()
}

/// Graph outputs that have both a name and a declared type.
fn declared_outputs(graph: &GraphProto) -> Vec<&ValueInfoProto> {
    graph
        .output
        .iter()
        .filter(|output| !output.name.is_empty() && output.r#type.is_some())
        .collect()
}
