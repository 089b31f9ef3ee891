use anyhow::{Context, Result};
use bytes::Bytes;
use ortbridge_core::{Error, Shape, TensorValue};
use ortbridge_ort::{builder_for_device, RunConfig, SessionOptions};
use ortbridge_proto::onnx::{
    tensor_proto, tensor_shape_proto, type_proto, GraphProto, ModelProto, NodeProto,
    OperatorSetIdProto, TensorShapeProto, TypeProto, ValueInfoProto,
};
use ortbridge_proto::ModelDescriptor;
use prost::Message;

fn value_info(name: &str, dims: &[i64]) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: tensor_proto::DataType::Float as i32,
                shape: Some(TensorShapeProto {
                    dim: dims
                        .iter()
                        .map(|d| tensor_shape_proto::Dimension {
                            value: Some(tensor_shape_proto::dimension::Value::DimValue(*d)),
                            ..Default::default()
                        })
                        .collect(),
                }),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A one-node f32 identity model synthesized in-process; no fixture files.
fn identity_descriptor() -> Result<ModelDescriptor> {
    let model = ModelProto {
        ir_version: 8,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(GraphProto {
            name: "identity".to_string(),
            node: vec![NodeProto {
                name: "copy".to_string(),
                op_type: "Identity".to_string(),
                input: vec!["x".to_string()],
                output: vec!["y".to_string()],
                ..Default::default()
            }],
            input: vec![value_info("x", &[1, 3])],
            output: vec![value_info("y", &[1, 3])],
            ..Default::default()
        }),
        ..Default::default()
    };
    ModelDescriptor::from_bytes(Bytes::from(model.encode_to_vec()))
        .context("identity model should decode")
}

#[test]
fn identity_round_trip_on_cpu() -> Result<()> {
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.load_model(identity_descriptor()?)?;
    assert!(session.is_loaded());

    let data = [1.0f32, 2.0, 3.0];
    let mut binding = session.create_binding();
    binding.bind_input("x", TensorValue::from_f32(Shape::from_slice(&[1, 3]), &data));
    binding.bind_output("y", None);

    session.run(&mut binding, &RunConfig::default())?;

    let outputs = binding.outputs();
    assert_eq!(outputs.len(), 1);
    let (name, slot) = &outputs[0];
    assert_eq!(name, "y");
    let value = slot.as_ref().context("output slot should be filled")?;
    assert_eq!(value.shape, Shape::from_slice(&[1, 3]));
    let floats: Vec<f32> = value
        .data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    assert_eq!(floats, data);
    Ok(())
}

#[test]
fn load_is_callable_at_most_once() -> Result<()> {
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.load_model(identity_descriptor()?)?;

    let err = session.load_model(identity_descriptor()?).unwrap_err();
    assert!(matches!(err, Error::AlreadyLoaded));
    Ok(())
}

#[test]
fn running_before_load_is_rejected() {
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    let mut binding = session.create_binding();
    let err = session.run(&mut binding, &RunConfig::default()).unwrap_err();
    assert!(matches!(err, Error::NotLoaded));
}

#[test]
fn binding_a_slot_the_model_lacks_fails_at_run() -> Result<()> {
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.load_model(identity_descriptor()?)?;

    let mut binding = session.create_binding();
    binding.bind_input(
        "x",
        TensorValue::from_f32(Shape::from_slice(&[1, 3]), &[0.0; 3]),
    );
    binding.bind_output("no_such_output", None);

    let err = session.run(&mut binding, &RunConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownSlot { name } if name == "no_such_output"));
    Ok(())
}

#[test]
fn profiling_toggle_respects_the_load_state() -> Result<()> {
    let dir = std::env::temp_dir();
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.start_profiling(&dir)?;

    let err = session.end_profiling().unwrap_err();
    assert!(matches!(err, Error::NotLoaded));

    session.load_model(identity_descriptor()?)?;
    let err = session.start_profiling(&dir).unwrap_err();
    assert!(matches!(err, Error::AlreadyLoaded));

    let trace = session.end_profiling()?;
    assert!(trace.as_os_str().len() > 0);
    Ok(())
}

#[test]
fn copy_across_devices_is_explicitly_unsupported() {
    let session = builder_for_device(None).create_session(SessionOptions::default());
    let value = TensorValue::from_f32(Shape::from_slice(&[1]), &[0.0]);
    let err = session.copy_input_across_devices("x", &value).unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)));
}

#[test]
fn graph_transformer_registration_only_applies_before_load() -> Result<()> {
    use ortbridge_core::{GraphTransformerRegistry, OptimizationLevel, TransformerRegistration};

    struct BasicOnly;
    impl GraphTransformerRegistry for BasicOnly {
        fn register(&self, registration: &mut TransformerRegistration) {
            registration.optimization_level = OptimizationLevel::Basic;
        }
    }

    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.register_graph_transformers(&BasicOnly)?;
    session.load_model(identity_descriptor()?)?;

    let err = session.register_graph_transformers(&BasicOnly).unwrap_err();
    assert!(matches!(err, Error::AlreadyLoaded));
    Ok(())
}

#[test]
fn custom_registry_registration_is_a_noop_for_none() -> Result<()> {
    let mut session = builder_for_device(None).create_session(SessionOptions::default());
    session.register_custom_registries(None)?;
    session.register_custom_registries(Some(&[]))?;

    // Still pending, so loading works afterwards.
    session.load_model(identity_descriptor()?)?;
    session.register_custom_registries(None)?;
    Ok(())
}
