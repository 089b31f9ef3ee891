//! ONNX Runtime facade for ortbridge.
//!
//! Wraps the engine behind the adapter surface the higher-level API calls:
//! load-once sessions ([`OrtSession`]), named-slot I/O bindings
//! ([`Binding`]), CPU/DirectML session builders with a device-selecting
//! factory, execution-provider memory utilities, and tensor-type
//! classification. Inference itself, kernels, and graph optimization live in
//! the engine; this crate only forwards.
//!
//! ```no_run
//! use ortbridge_core::{Shape, TensorValue};
//! use ortbridge_ort::{builder_for_device, RunConfig, SessionOptions};
//! use ortbridge_proto::ModelDescriptor;
//!
//! # fn main() -> ortbridge_core::Result<()> {
//! let descriptor = ModelDescriptor::from_file("model.onnx")?;
//! let mut session = builder_for_device(None).create_session(SessionOptions::default());
//! session.load_model(descriptor)?;
//!
//! let mut binding = session.create_binding();
//! binding.bind_input("x", TensorValue::from_f32(Shape::from_slice(&[1, 3]), &[1.0, 2.0, 3.0]));
//! binding.bind_output("y", None);
//! session.run(&mut binding, &RunConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod builder;
pub mod convert;
pub mod environment;
pub mod provider;
pub mod session;

pub use binding::Binding;
pub use builder::{
    builder_for_device, CpuSessionBuilder, DmlDevice, DmlSessionBuilder, OperatorLibrary,
    SessionBuilder, SessionOptions,
};
pub use convert::{element_type_of, map_element_types, sequence_map_element_types};
pub use provider::{
    provider_allocator, provider_memory_info, CpuExecutionProvider, DmlExecutionProvider,
};
pub use session::{OrtSession, RunConfig};
