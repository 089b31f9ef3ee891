//! ONNX model descriptors for ortbridge.
//!
//! This crate owns the serialized-model side of the adapter: a
//! hand-maintained subset of the ONNX protobuf schema, the
//! [`ModelDescriptor`] loader (file, reader, or duplicate), the
//! [`ModelInfo`] metadata extractor with its feature-descriptor factory,
//! schema-inference overrides, and the fp16 device-capability check.
//!
//! ```no_run
//! use ortbridge_proto::{ModelDescriptor, ModelInfo};
//!
//! # fn main() -> ortbridge_core::Result<()> {
//! let descriptor = ModelDescriptor::from_file("model.onnx")?;
//! let info = ModelInfo::from_descriptor(&descriptor);
//! println!("{} by {}", info.name(), info.author());
//! # Ok(())
//! # }
//! ```

pub mod compat;
pub mod descriptor;
pub mod factory;
pub mod info;
pub mod onnx;
pub mod schema;

pub use compat::ensure_device_compatibility;
pub use descriptor::ModelDescriptor;
pub use factory::{element_type_from_code, DescriptorFactory, IMAGE_PIXEL_FORMAT_KEY};
pub use info::ModelInfo;
pub use schema::override_schema_inference_functions;
