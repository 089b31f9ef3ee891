#![allow(dead_code)]

use ortbridge_proto::onnx::{
    tensor_proto, tensor_shape_proto, type_proto, GraphProto, ModelProto, NodeProto,
    StringStringEntryProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
};

pub fn tensor_value_info(name: &str, data_type: tensor_proto::DataType, dims: &[i64]) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: data_type as i32,
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

pub fn untyped_value_info(name: &str) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn initializer(name: &str, data_type: tensor_proto::DataType) -> TensorProto {
    TensorProto {
        name: name.to_string(),
        data_type: data_type as i32,
        ..Default::default()
    }
}

pub fn cast_node(name: &str, domain: &str, to: tensor_proto::DataType) -> NodeProto {
    NodeProto {
        name: name.to_string(),
        op_type: "Cast".to_string(),
        domain: domain.to_string(),
        input: vec!["x".to_string()],
        output: vec![format!("{name}_out")],
        attribute: vec![ortbridge_proto::onnx::AttributeProto {
            name: "to".to_string(),
            i: to as i64,
            r#type: ortbridge_proto::onnx::attribute_proto::AttributeType::Int as i32,
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn metadata_entry(key: &str, value: &str) -> StringStringEntryProto {
    StringStringEntryProto {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// A minimal f32 identity-style model: one input, one output, no nodes.
pub fn minimal_model() -> ModelProto {
    ModelProto {
        ir_version: 8,
        graph: Some(GraphProto {
            name: "minimal".to_string(),
            input: vec![tensor_value_info("x", tensor_proto::DataType::Float, &[1, 3])],
            output: vec![tensor_value_info("y", tensor_proto::DataType::Float, &[1, 3])],
            ..Default::default()
        }),
        ..Default::default()
    }
}
