//! Schema-inference overrides.
//!
//! Some operator schemas leave output element types unannotated in exported
//! models. The overrides registered here let the descriptor factory resolve
//! those values from the producing node instead of reporting `Undefined`.
//! Installation is gated to run exactly once per process no matter how many
//! threads race on it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use ortbridge_core::ElementType;

use crate::factory::element_type_from_code;
use crate::onnx::NodeProto;

type TypeInferencer = fn(&NodeProto) -> Option<ElementType>;

static OVERRIDES: OnceLock<HashMap<&'static str, TypeInferencer>> = OnceLock::new();
static INSTALL_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Installs the built-in override set. Safe to call from any number of
/// threads concurrently; the installation itself runs exactly once.
pub fn override_schema_inference_functions() {
    let _ = OVERRIDES.get_or_init(|| {
        INSTALL_COUNT.fetch_add(1, Ordering::SeqCst);
        let mut table: HashMap<&'static str, TypeInferencer> = HashMap::new();
        table.insert("Cast", infer_cast);
        table.insert("Constant", infer_constant);
        table.insert("ConstantOfShape", infer_constant_of_shape);
        table
    });
}

/// Output element type for `node` per the installed overrides, or `None` when
/// no override applies (or none were installed).
pub fn inferred_output_type(node: &NodeProto) -> Option<ElementType> {
    let table = OVERRIDES.get()?;
    let inferencer = table.get(node.op_type.as_str())?;
    inferencer(node)
}

/// `Cast` output type is its `to` attribute. Only the default operator domain
/// carries this schema.
fn infer_cast(node: &NodeProto) -> Option<ElementType> {
    if !node.domain.is_empty() {
        return None;
    }
    node.attribute
        .iter()
        .find(|attr| attr.name == "to")
        .map(|attr| element_type_from_code(attr.i as i32))
}

fn infer_constant(node: &NodeProto) -> Option<ElementType> {
    node.attribute
        .iter()
        .find(|attr| attr.name == "value")
        .and_then(|attr| attr.t.as_ref())
        .map(|tensor| element_type_from_code(tensor.data_type))
}

/// `ConstantOfShape` defaults to f32 when no `value` tensor is given.
fn infer_constant_of_shape(node: &NodeProto) -> Option<ElementType> {
    Some(infer_constant(node).unwrap_or(ElementType::F32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onnx::{tensor_proto, AttributeProto};

    #[test]
    fn concurrent_installation_runs_once() {
        let threads: Vec<_> = (0..16)
            .map(|_| std::thread::spawn(override_schema_inference_functions))
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }
        override_schema_inference_functions();
        assert_eq!(INSTALL_COUNT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cast_override_reads_the_to_attribute() {
        override_schema_inference_functions();
        let node = NodeProto {
            op_type: "Cast".into(),
            attribute: vec![AttributeProto {
                name: "to".into(),
                i: tensor_proto::DataType::Float16 as i64,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(inferred_output_type(&node), Some(ElementType::F16));

        let mut custom = node.clone();
        custom.domain = "com.example".into();
        assert_eq!(inferred_output_type(&custom), None);
    }

    #[test]
    fn unknown_ops_have_no_override() {
        override_schema_inference_functions();
        let node = NodeProto {
            op_type: "Relu".into(),
            ..Default::default()
        };
        assert_eq!(inferred_output_type(&node), None);
    }
}
