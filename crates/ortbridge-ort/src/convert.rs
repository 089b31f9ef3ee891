//! Marshaling between adapter tensor values and engine values, plus the
//! stateless tensor-type classification lookups.

use bytes::Bytes;
use ort::value::TensorElementType;
use ort::value::{DynValue, ValueRef, ValueType};
use ortbridge_core::{ElementType, Error, Result, Shape, TensorValue};

pub fn element_type_from_ort(ty: TensorElementType) -> ElementType {
    match ty {
        TensorElementType::Float32 => ElementType::F32,
        TensorElementType::Float16 => ElementType::F16,
        TensorElementType::Float64 => ElementType::F64,
        TensorElementType::Int8 => ElementType::I8,
        TensorElementType::Int16 => ElementType::I16,
        TensorElementType::Int32 => ElementType::I32,
        TensorElementType::Int64 => ElementType::I64,
        TensorElementType::Uint8 => ElementType::U8,
        TensorElementType::Uint16 => ElementType::U16,
        TensorElementType::Uint32 => ElementType::U32,
        TensorElementType::Uint64 => ElementType::U64,
        TensorElementType::Bool => ElementType::Bool,
        TensorElementType::String => ElementType::String,
        _ => ElementType::Undefined,
    }
}

/// Tensor element type of a value, or `Undefined` for non-tensors.
pub fn element_type_of(value_type: &ValueType) -> ElementType {
    match value_type {
        ValueType::Tensor { ty, .. } => element_type_from_ort(*ty),
        _ => ElementType::Undefined,
    }
}

/// Key/value element types of a map value.
///
/// The engine supports a closed set of map types; anything else classifies
/// as `(Undefined, Undefined)`.
pub fn map_element_types(value_type: &ValueType) -> (ElementType, ElementType) {
    let undefined = (ElementType::Undefined, ElementType::Undefined);
    let ValueType::Map { key, value } = value_type else {
        return undefined;
    };
    let pair = (element_type_from_ort(*key), element_type_from_ort(*value));
    match pair {
        (
            ElementType::String | ElementType::I64,
            ElementType::String | ElementType::I64 | ElementType::F32 | ElementType::F64,
        ) => pair,
        _ => undefined,
    }
}

/// Key/value element types of a sequence-of-maps value; closed set
/// {(String, F32), (I64, F32)}, `(Undefined, Undefined)` otherwise.
pub fn sequence_map_element_types(value_type: &ValueType) -> (ElementType, ElementType) {
    let undefined = (ElementType::Undefined, ElementType::Undefined);
    let ValueType::Sequence(inner) = value_type else {
        return undefined;
    };
    match map_element_types(inner) {
        pair @ ((ElementType::String | ElementType::I64), ElementType::F32) => pair,
        _ => undefined,
    }
}

pub fn to_ort_value(tensor: &TensorValue) -> Result<DynValue> {
    let shape: Vec<usize> = tensor.shape.0.iter().copied().collect();
    let expected_bytes = tensor
        .element_type
        .byte_size()
        .map(|size| size * tensor.shape.numel());
    if let Some(expected) = expected_bytes {
        if tensor.data.len() != expected {
            return Err(Error::engine(format!(
                "input byte size mismatch: got {}, expected {expected}",
                tensor.data.len()
            )));
        }
    }

    let value = match tensor.element_type {
        ElementType::F32 => {
            let data = bytes_to_f32(&tensor.data)?;
            ort::value::Tensor::from_array((shape, data))
                .map_err(Error::engine)?
                .into_dyn()
        }
        ElementType::I64 => {
            let data = bytes_to_i64(&tensor.data)?;
            ort::value::Tensor::from_array((shape, data))
                .map_err(Error::engine)?
                .into_dyn()
        }
        ElementType::I32 => {
            let data = bytes_to_i32(&tensor.data)?;
            ort::value::Tensor::from_array((shape, data))
                .map_err(Error::engine)?
                .into_dyn()
        }
        ElementType::U8 => {
            let data = tensor.data.to_vec();
            ort::value::Tensor::from_array((shape, data))
                .map_err(Error::engine)?
                .into_dyn()
        }
        ty => {
            return Err(Error::UnsupportedElementType {
                context: "input marshaling",
                ty,
            })
        }
    };

    Ok(value)
}

pub fn from_ort_value(value: &ValueRef<'_>) -> Result<TensorValue> {
    let ValueType::Tensor { ty, shape, .. } = value.dtype() else {
        return Err(Error::UnsupportedElementType {
            context: "output marshaling",
            ty: ElementType::Undefined,
        });
    };

    let dims: Vec<usize> = shape.iter().map(|d| *d as usize).collect();
    let out_shape = Shape::from_slice(&dims);

    match *ty {
        TensorElementType::Float32 => {
            let array = value.try_extract_array::<f32>().map_err(Error::engine)?;
            let slice = array
                .as_slice()
                .ok_or_else(|| Error::engine("non-contiguous output tensor"))?;
            Ok(TensorValue::new(
                ElementType::F32,
                out_shape,
                bytes_from_slice(slice),
            ))
        }
        TensorElementType::Int64 => {
            let array = value.try_extract_array::<i64>().map_err(Error::engine)?;
            let slice = array
                .as_slice()
                .ok_or_else(|| Error::engine("non-contiguous output tensor"))?;
            Ok(TensorValue::new(
                ElementType::I64,
                out_shape,
                bytes_from_slice(slice),
            ))
        }
        TensorElementType::Int32 => {
            let array = value.try_extract_array::<i32>().map_err(Error::engine)?;
            let slice = array
                .as_slice()
                .ok_or_else(|| Error::engine("non-contiguous output tensor"))?;
            Ok(TensorValue::new(
                ElementType::I32,
                out_shape,
                bytes_from_slice(slice),
            ))
        }
        TensorElementType::Uint8 => {
            let array = value.try_extract_array::<u8>().map_err(Error::engine)?;
            let slice = array
                .as_slice()
                .ok_or_else(|| Error::engine("non-contiguous output tensor"))?;
            Ok(TensorValue::new(
                ElementType::U8,
                out_shape,
                Bytes::copy_from_slice(slice),
            ))
        }
        ty => Err(Error::UnsupportedElementType {
            context: "output marshaling",
            ty: element_type_from_ort(ty),
        }),
    }
}

fn bytes_to_f32(bytes: &Bytes) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::engine("f32 input has invalid byte length"));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn bytes_to_i64(bytes: &Bytes) -> Result<Vec<i64>> {
    if bytes.len() % 8 != 0 {
        return Err(Error::engine("i64 input has invalid byte length"));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .collect())
}

fn bytes_to_i32(bytes: &Bytes) -> Result<Vec<i32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::engine("i32 input has invalid byte length"));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn bytes_from_slice<T>(slice: &[T]) -> Bytes {
    let byte_len = std::mem::size_of_val(slice);
    let ptr = slice.as_ptr().cast::<u8>();
    let bytes = unsafe { std::slice::from_raw_parts(ptr, byte_len) };
    Bytes::copy_from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_classification_accepts_the_closed_set() {
        let ty = ValueType::Map {
            key: TensorElementType::String,
            value: TensorElementType::Float32,
        };
        assert_eq!(
            map_element_types(&ty),
            (ElementType::String, ElementType::F32)
        );

        let ty = ValueType::Map {
            key: TensorElementType::Int64,
            value: TensorElementType::Int64,
        };
        assert_eq!(map_element_types(&ty), (ElementType::I64, ElementType::I64));
    }

    #[test]
    fn map_classification_defaults_to_undefined() {
        let ty = ValueType::Map {
            key: TensorElementType::Float32,
            value: TensorElementType::Float32,
        };
        assert_eq!(
            map_element_types(&ty),
            (ElementType::Undefined, ElementType::Undefined)
        );

        let ty = ValueType::Sequence(Box::new(ValueType::Map {
            key: TensorElementType::String,
            value: TensorElementType::Float32,
        }));
        assert_eq!(
            map_element_types(&ty),
            (ElementType::Undefined, ElementType::Undefined)
        );
        // Non-tensor values have no tensor element type either.
        assert_eq!(element_type_of(&ty), ElementType::Undefined);
    }

    #[test]
    fn sequence_classification_accepts_maps_to_f32_only() {
        let ty = ValueType::Sequence(Box::new(ValueType::Map {
            key: TensorElementType::Int64,
            value: TensorElementType::Float32,
        }));
        assert_eq!(
            sequence_map_element_types(&ty),
            (ElementType::I64, ElementType::F32)
        );

        let ty = ValueType::Sequence(Box::new(ValueType::Map {
            key: TensorElementType::Int64,
            value: TensorElementType::Float64,
        }));
        assert_eq!(
            sequence_map_element_types(&ty),
            (ElementType::Undefined, ElementType::Undefined)
        );
    }

    #[test]
    fn input_marshaling_validates_byte_lengths() {
        let bad = TensorValue::new(
            ElementType::F32,
            Shape::from_slice(&[2]),
            Bytes::from_static(&[0u8; 3]),
        );
        assert!(to_ort_value(&bad).is_err());

        let fp16 = TensorValue::new(
            ElementType::F16,
            Shape::from_slice(&[2]),
            Bytes::from_static(&[0u8; 4]),
        );
        assert!(matches!(
            to_ort_value(&fp16),
            Err(Error::UnsupportedElementType { .. })
        ));
    }
}
