mod common;

use anyhow::Result;
use bytes::Bytes;
use common::*;
use ortbridge_core::{ElementType, FeatureDescriptor};
use ortbridge_proto::onnx::{tensor_proto, GraphProto, ModelProto};
use ortbridge_proto::{ModelDescriptor, ModelInfo};
use prost::Message;

fn descriptor_for(model: &ModelProto) -> Result<ModelDescriptor> {
    Ok(ModelDescriptor::from_bytes(Bytes::from(
        model.encode_to_vec(),
    ))?)
}

#[test]
fn metadata_fields_are_extracted_verbatim() -> Result<()> {
    let mut model = minimal_model();
    model.producer_name = "an author".to_string();
    model.domain = "com.example.models".to_string();
    model.model_version = 7;
    model.doc_string = "a description".to_string();
    model.metadata_props = vec![metadata_entry("key1", "v1")];

    let info = ModelInfo::from_descriptor(&descriptor_for(&model)?);
    assert_eq!(info.author(), "an author");
    assert_eq!(info.domain(), "com.example.models");
    assert_eq!(info.name(), "minimal");
    assert_eq!(info.description(), "a description");
    assert_eq!(info.version(), 7);
    assert_eq!(info.metadata().len(), 1);
    assert_eq!(info.metadata()["key1"], "v1");
    Ok(())
}

#[test]
fn absent_fields_default_to_empty_and_zero() -> Result<()> {
    let model = ModelProto {
        ir_version: 8,
        graph: Some(GraphProto::default()),
        ..Default::default()
    };
    let info = ModelInfo::from_descriptor(&descriptor_for(&model)?);
    assert_eq!(info.author(), "");
    assert_eq!(info.domain(), "");
    assert_eq!(info.name(), "");
    assert_eq!(info.description(), "");
    assert_eq!(info.version(), 0);
    assert!(info.metadata().is_empty());
    assert!(info.inputs().is_empty());
    assert!(info.outputs().is_empty());
    Ok(())
}

#[test]
fn initializer_inputs_are_not_features() -> Result<()> {
    let mut model = minimal_model();
    let graph = model.graph.as_mut().unwrap();
    graph.input.push(tensor_value_info(
        "weight",
        tensor_proto::DataType::Float,
        &[3, 3],
    ));
    graph
        .initializer
        .push(initializer("weight", tensor_proto::DataType::Float));

    let info = ModelInfo::from_descriptor(&descriptor_for(&model)?);
    let names: Vec<&str> = info.inputs().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["x"]);
    Ok(())
}

#[test]
fn outputs_without_a_type_are_excluded() -> Result<()> {
    let mut model = minimal_model();
    let graph = model.graph.as_mut().unwrap();
    graph.output.push(untyped_value_info("untyped"));

    let info = ModelInfo::from_descriptor(&descriptor_for(&model)?);
    let names: Vec<&str> = info.outputs().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["y"]);
    Ok(())
}

#[test]
fn feature_descriptors_carry_element_types() -> Result<()> {
    let mut model = minimal_model();
    let graph = model.graph.as_mut().unwrap();
    graph.input.push(tensor_value_info(
        "ids",
        tensor_proto::DataType::Int64,
        &[1],
    ));

    let info = ModelInfo::from_descriptor(&descriptor_for(&model)?);
    assert_eq!(info.inputs().len(), 2);
    let FeatureDescriptor::Tensor { element_type, .. } = &info.inputs()[1] else {
        panic!("expected tensor descriptor");
    };
    assert_eq!(*element_type, ElementType::I64);
    Ok(())
}

#[test]
fn file_round_trip_preserves_the_model() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("minimal.onnx");
    let encoded = minimal_model().encode_to_vec();
    std::fs::write(&path, &encoded)?;

    let descriptor = ModelDescriptor::from_file(&path)?;
    let info = ModelInfo::from_descriptor(&descriptor);
    assert_eq!(info.name(), "minimal");
    assert_eq!(descriptor.detach(), Bytes::from(encoded));
    Ok(())
}
