use std::collections::HashMap;

use ortbridge_core::{Dimension, ElementType, FeatureDescriptor, TensorShape};

use crate::onnx::{
    tensor_proto, tensor_shape_proto, type_proto, GraphProto, TensorShapeProto, TypeProto,
    ValueInfoProto,
};
use crate::schema;

/// Metadata key a model uses to declare that its 4-D tensors carry images.
pub const IMAGE_PIXEL_FORMAT_KEY: &str = "Image.BitmapPixelFormat";

/// Map an ONNX tensor data-type code to an [`ElementType`].
pub fn element_type_from_code(code: i32) -> ElementType {
    use tensor_proto::DataType;
    match DataType::try_from(code) {
        Ok(DataType::Float) => ElementType::F32,
        Ok(DataType::Float16) => ElementType::F16,
        Ok(DataType::Double) => ElementType::F64,
        Ok(DataType::Int8) => ElementType::I8,
        Ok(DataType::Int16) => ElementType::I16,
        Ok(DataType::Int32) => ElementType::I32,
        Ok(DataType::Int64) => ElementType::I64,
        Ok(DataType::Uint8) => ElementType::U8,
        Ok(DataType::Uint16) => ElementType::U16,
        Ok(DataType::Uint32) => ElementType::U32,
        Ok(DataType::Uint64) => ElementType::U64,
        Ok(DataType::Bool) => ElementType::Bool,
        Ok(DataType::String) => ElementType::String,
        _ => ElementType::Undefined,
    }
}

/// Builds typed feature descriptors from `ValueInfoProto`s, parameterized by
/// the model's extracted metadata mapping.
pub struct DescriptorFactory<'a> {
    metadata: &'a HashMap<String, String>,
}

impl<'a> DescriptorFactory<'a> {
    pub fn new(metadata: &'a HashMap<String, String>) -> Self {
        Self { metadata }
    }

    pub fn create_descriptors(
        &self,
        graph: &GraphProto,
        values: &[&ValueInfoProto],
    ) -> Vec<FeatureDescriptor> {
        values
            .iter()
            .filter_map(|vi| self.from_value_info(graph, vi))
            .collect()
    }

    fn from_value_info(&self, graph: &GraphProto, vi: &ValueInfoProto) -> Option<FeatureDescriptor> {
        let ty = vi.r#type.as_ref()?;
        self.from_type(graph, &vi.name, ty)
    }

    fn from_type(
        &self,
        graph: &GraphProto,
        name: &str,
        ty: &TypeProto,
    ) -> Option<FeatureDescriptor> {
        match ty.value.as_ref()? {
            type_proto::Value::TensorType(tensor) => {
                let mut element_type = element_type_from_code(tensor.elem_type);
                if element_type == ElementType::Undefined {
                    if let Some(inferred) = infer_from_producer(graph, name) {
                        element_type = inferred;
                    }
                }
                let shape = parse_shape(tensor.shape.as_ref());
                Some(self.promote_image(name, element_type, shape))
            }
            type_proto::Value::MapType(map) => {
                let key_type = element_type_from_code(map.key_type);
                let value_type = map
                    .value_type
                    .as_deref()
                    .and_then(|vt| match vt.value.as_ref() {
                        Some(type_proto::Value::TensorType(t)) => {
                            Some(element_type_from_code(t.elem_type))
                        }
                        _ => None,
                    })
                    .unwrap_or(ElementType::Undefined);
                Some(FeatureDescriptor::Map {
                    name: name.to_string(),
                    key_type,
                    value_type,
                })
            }
            type_proto::Value::SequenceType(sequence) => {
                let inner = sequence.elem_type.as_deref()?;
                let element = self.from_type(graph, name, inner)?;
                Some(FeatureDescriptor::Sequence {
                    name: name.to_string(),
                    element: Box::new(element),
                })
            }
        }
    }

    /// A 4-D float/fp16/u8 tensor in a model that declares a bitmap pixel
    /// format is an image feature.
    fn promote_image(
        &self,
        name: &str,
        element_type: ElementType,
        shape: TensorShape,
    ) -> FeatureDescriptor {
        let image_like = matches!(
            element_type,
            ElementType::F32 | ElementType::F16 | ElementType::U8
        );
        if image_like && shape.rank() == 4 {
            if let Some(format) = self.metadata.get(IMAGE_PIXEL_FORMAT_KEY) {
                return FeatureDescriptor::Image {
                    name: name.to_string(),
                    element_type,
                    shape,
                    pixel_format_hint: format.clone(),
                };
            }
        }
        FeatureDescriptor::Tensor {
            name: name.to_string(),
            element_type,
            shape,
        }
    }
}

fn parse_shape(shape: Option<&TensorShapeProto>) -> TensorShape {
    let Some(shape) = shape else {
        return TensorShape::default();
    };
    TensorShape(
        shape
            .dim
            .iter()
            .map(|dim| match &dim.value {
                Some(tensor_shape_proto::dimension::Value::DimValue(v)) => Dimension::Fixed(*v),
                Some(tensor_shape_proto::dimension::Value::DimParam(p)) => {
                    Dimension::Named(p.clone())
                }
                None => Dimension::Free,
            })
            .collect(),
    )
}

/// When a value carries no element-type annotation, ask the schema-inference
/// overrides about the node that produces it.
fn infer_from_producer(graph: &GraphProto, name: &str) -> Option<ElementType> {
    let producer = graph
        .node
        .iter()
        .find(|node| node.output.iter().any(|out| out == name))?;
    schema::inferred_output_type(producer)
}
