use std::path::PathBuf;
use std::sync::Arc;

use ortbridge_core::{Device, OptimizationLevel};

use crate::provider::{CpuExecutionProvider, DmlExecutionProvider};
use crate::session::OrtSession;

/// Handle for a custom-operator library to register with a session before
/// load.
#[derive(Clone, Debug)]
pub struct OperatorLibrary {
    pub path: String,
}

/// Options accumulated before a model is committed into the engine.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub optimization_level: OptimizationLevel,
    pub intra_threads: Option<usize>,
    pub profiling_path: Option<PathBuf>,
    pub operator_libraries: Vec<OperatorLibrary>,
    /// Symbolic dimension pins applied before load ("batch" -> 1, ...).
    pub dimension_overrides: Vec<(String, i64)>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            optimization_level: OptimizationLevel::All,
            intra_threads: None,
            profiling_path: None,
            operator_libraries: Vec::new(),
            dimension_overrides: Vec::new(),
        }
    }
}

/// Constructs sessions for one device kind.
pub trait SessionBuilder: Send + Sync {
    fn device(&self) -> Device;

    /// A new, unloaded session for this builder's device.
    fn create_session(&self, options: SessionOptions) -> OrtSession;
}

pub struct CpuSessionBuilder;

impl SessionBuilder for CpuSessionBuilder {
    fn device(&self) -> Device {
        Device::Cpu
    }

    fn create_session(&self, options: SessionOptions) -> OrtSession {
        OrtSession::pending(Device::Cpu, options, Arc::new(CpuExecutionProvider))
    }
}

pub struct DmlSessionBuilder {
    device_id: u32,
}

impl DmlSessionBuilder {
    pub fn new(device_id: u32) -> Self {
        Self { device_id }
    }
}

impl SessionBuilder for DmlSessionBuilder {
    fn device(&self) -> Device {
        Device::DirectML {
            device_id: self.device_id,
        }
    }

    fn create_session(&self, options: SessionOptions) -> OrtSession {
        OrtSession::pending(
            self.device(),
            options,
            Arc::new(DmlExecutionProvider::new(self.device_id)),
        )
    }
}

/// A GPU adapter handed in by the caller. The D3D device and command queue
/// stay caller-owned; the engine binds the adapter by id.
#[derive(Clone, Copy, Debug)]
pub struct DmlDevice {
    pub device_id: u32,
}

/// Device presence is the sole selector: a GPU device means the DirectML
/// builder, none means CPU. No fallback or negotiation.
pub fn builder_for_device(device: Option<DmlDevice>) -> Box<dyn SessionBuilder> {
    match device {
        Some(device) => Box::new(DmlSessionBuilder::new(device.device_id)),
        None => Box::new(CpuSessionBuilder),
    }
}
