use ortbridge_core::{Error, Result};
use tracing::debug;

use crate::descriptor::ModelDescriptor;
use crate::info::ModelInfo;
use crate::onnx::tensor_proto;

/// Rejects half-precision models on devices that lack fp16 support.
///
/// A model contains no fp16 work when all of the following hold: no fp16
/// inputs, no default-domain `Cast` to fp16, no fp16 initializers, and no
/// fp16 outputs. The four scans are independent and each failure names the
/// offending element. With `is_float16_supported` the check passes
/// unconditionally.
pub fn ensure_device_compatibility(
    info: &ModelInfo,
    descriptor: &ModelDescriptor,
    is_float16_supported: bool,
) -> Result<()> {
    if is_float16_supported {
        return Ok(());
    }

    for feature in info.inputs() {
        if feature.is_fp16() {
            return Err(fp16_unsupported(feature.name(), "a 16-bit float input"));
        }
    }

    if let Some(graph) = descriptor.proto().graph.as_ref() {
        for node in &graph.node {
            if node.op_type != "Cast" || !node.domain.is_empty() {
                continue;
            }
            for attribute in &node.attribute {
                if attribute.name == "to"
                    && attribute.i == tensor_proto::DataType::Float16 as i64
                {
                    return Err(fp16_unsupported(&node.name, "a 16-bit float Cast op"));
                }
            }
        }

        for initializer in &graph.initializer {
            if initializer.data_type == tensor_proto::DataType::Float16 as i32 {
                return Err(fp16_unsupported(
                    &initializer.name,
                    "a 16-bit float initializer",
                ));
            }
        }
    }

    for feature in info.outputs() {
        if feature.is_fp16() {
            return Err(fp16_unsupported(feature.name(), "a 16-bit float output"));
        }
    }

    debug!(model = %info.name(), "model carries no fp16 work");
    Ok(())
}

fn fp16_unsupported(element: &str, what: &str) -> Error {
    Error::UnsupportedOnDevice {
        element: element.to_string(),
        detail: format!("the model contains {what}, but the current device does not support 16-bit float"),
    }
}
