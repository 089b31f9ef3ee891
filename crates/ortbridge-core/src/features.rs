use crate::types::{ElementType, TensorShape};

/// Typed description of a named model input or output.
///
/// Derived once from the model descriptor and immutable afterward.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureDescriptor {
    Tensor {
        name: String,
        element_type: ElementType,
        shape: TensorShape,
    },
    /// A 4-D tensor the model's metadata declares to carry image data.
    Image {
        name: String,
        element_type: ElementType,
        shape: TensorShape,
        pixel_format_hint: String,
    },
    Map {
        name: String,
        key_type: ElementType,
        value_type: ElementType,
    },
    Sequence {
        name: String,
        element: Box<FeatureDescriptor>,
    },
}

impl FeatureDescriptor {
    pub fn name(&self) -> &str {
        match self {
            FeatureDescriptor::Tensor { name, .. }
            | FeatureDescriptor::Image { name, .. }
            | FeatureDescriptor::Map { name, .. }
            | FeatureDescriptor::Sequence { name, .. } => name,
        }
    }

    /// Whether this feature is half-precision typed (tensor or image).
    pub fn is_fp16(&self) -> bool {
        matches!(
            self,
            FeatureDescriptor::Tensor {
                element_type: ElementType::F16,
                ..
            } | FeatureDescriptor::Image {
                element_type: ElementType::F16,
                ..
            }
        )
    }
}
