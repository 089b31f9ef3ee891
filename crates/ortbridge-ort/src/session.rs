use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::{RunOptions, Session, SessionInputValue};
use ortbridge_core::{
    Device, Error, ExecutionProvider, GraphTransformerRegistry, OptimizationLevel, Result,
    TensorValue, TransformerRegistration,
};
use ortbridge_proto::ModelDescriptor;
use tracing::{debug, info};

use crate::binding::Binding;
use crate::builder::{OperatorLibrary, SessionOptions};
use crate::convert;
use crate::environment;
use crate::provider::provider_allocator;

/// Per-run options. The tag labels the run in trace output.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    pub tag: Option<String>,
}

enum EngineState {
    Pending { options: SessionOptions },
    Loaded { session: Session },
}

/// A session facade over one engine session.
///
/// Created unloaded by a session builder; [`load_model`](Self::load_model)
/// commits a detached model descriptor into the engine exactly once. The
/// call contract is single-threaded per session: no internal locking, no
/// background work.
pub struct OrtSession {
    device: Device,
    provider: Arc<dyn ExecutionProvider>,
    state: EngineState,
}

impl OrtSession {
    pub(crate) fn pending(
        device: Device,
        options: SessionOptions,
        provider: Arc<dyn ExecutionProvider>,
    ) -> Self {
        Self {
            device,
            provider,
            state: EngineState::Pending { options },
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn provider(&self) -> &dyn ExecutionProvider {
        self.provider.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, EngineState::Loaded { .. })
    }

    /// Consumes `descriptor` and commits its serialized model into the
    /// engine. Callable at most once per session.
    pub fn load_model(&mut self, descriptor: ModelDescriptor) -> Result<()> {
        let EngineState::Pending { options } = &self.state else {
            return Err(Error::AlreadyLoaded);
        };
        let options = options.clone();

        environment::ensure_initialized();
        let model_bytes = descriptor.detach();

        let mut builder = Session::builder()
            .map_err(Error::engine)?
            .with_optimization_level(optimization_level(options.optimization_level))
            .map_err(Error::engine)?;

        if let Some(threads) = options.intra_threads {
            builder = builder.with_intra_threads(threads).map_err(Error::engine)?;
        }
        for (name, value) in &options.dimension_overrides {
            builder = builder
                .with_dimension_override(name.as_str(), *value)
                .map_err(Error::engine)?;
        }
        if let Some(path) = &options.profiling_path {
            builder = builder
                .with_profiling(path)
                .map_err(Error::engine)?;
        }
        for library in &options.operator_libraries {
            builder = builder
                .with_operator_library(&library.path)
                .map_err(Error::engine)?;
        }
        builder = self.configure_device(builder)?;

        let session = builder
            .commit_from_memory(&model_bytes)
            .map_err(Error::engine)?;

        info!(device = %self.device, bytes = model_bytes.len(), "model loaded");
        self.state = EngineState::Loaded { session };
        Ok(())
    }

    fn configure_device(
        &self,
        builder: ort::session::builder::SessionBuilder,
    ) -> Result<ort::session::builder::SessionBuilder> {
        match self.device {
            Device::Cpu => Ok(builder),
            Device::DirectML { device_id } => configure_directml(builder, device_id),
        }
    }

    /// New I/O binding for this session.
    pub fn create_binding(&self) -> Binding {
        Binding::new()
    }

    /// Executes the bound inputs synchronously and refreshes the binding's
    /// output slots. Engine failures pass through unchanged in meaning.
    pub fn run(&mut self, binding: &mut Binding, config: &RunConfig) -> Result<()> {
        let EngineState::Loaded { session } = &mut self.state else {
            return Err(Error::NotLoaded);
        };

        debug!(tag = config.tag.as_deref().unwrap_or(""), "session run");

        let mut ort_inputs: Vec<(String, SessionInputValue<'_>)> =
            Vec::with_capacity(binding.bound_inputs().len());
        for (name, value) in binding.bound_inputs() {
            let ort_value = convert::to_ort_value(value)?;
            ort_inputs.push((name.clone(), SessionInputValue::from(ort_value)));
        }

        let run_options = RunOptions::new().map_err(Error::engine)?;
        let outputs = session
            .run_with_options(ort_inputs, &run_options)
            .map_err(Error::engine)?;

        let mut produced: HashMap<&str, TensorValue> = HashMap::new();
        for (name, value) in outputs.iter() {
            produced.insert(name, convert::from_ort_value(&value)?);
        }
        binding.fill_outputs(produced)
    }

    /// Enables profiling capture. Profiling is a builder-time engine option,
    /// so this is only valid before [`load_model`](Self::load_model).
    pub fn start_profiling(&mut self, directory: &Path) -> Result<()> {
        match &mut self.state {
            EngineState::Pending { options } => {
                options.profiling_path = Some(directory.join("ortbridge_profile"));
                Ok(())
            }
            EngineState::Loaded { .. } => Err(Error::AlreadyLoaded),
        }
    }

    /// Ends profiling capture and returns the trace path.
    pub fn end_profiling(&mut self) -> Result<PathBuf> {
        match &mut self.state {
            EngineState::Loaded { session } => session
                .end_profiling()
                .map(PathBuf::from)
                .map_err(Error::engine),
            EngineState::Pending { .. } => Err(Error::NotLoaded),
        }
    }

    /// Queues custom-operator libraries for registration at load time.
    /// Explicit no-op when `libraries` is `None` or empty.
    pub fn register_custom_registries(
        &mut self,
        libraries: Option<&[OperatorLibrary]>,
    ) -> Result<()> {
        let Some(libraries) = libraries else {
            return Ok(());
        };
        if libraries.is_empty() {
            return Ok(());
        }
        match &mut self.state {
            EngineState::Pending { options } => {
                options.operator_libraries.extend(libraries.iter().cloned());
                Ok(())
            }
            EngineState::Loaded { .. } => Err(Error::AlreadyLoaded),
        }
    }

    /// Delegates transformer selection to the collaborator and folds the
    /// result into the pending options.
    pub fn register_graph_transformers(
        &mut self,
        registry: &dyn GraphTransformerRegistry,
    ) -> Result<()> {
        match &mut self.state {
            EngineState::Pending { options } => {
                let mut registration = TransformerRegistration {
                    optimization_level: options.optimization_level,
                    dimension_overrides: std::mem::take(&mut options.dimension_overrides),
                };
                registry.register(&mut registration);
                options.optimization_level = registration.optimization_level;
                options.dimension_overrides = registration.dimension_overrides;
                Ok(())
            }
            EngineState::Loaded { .. } => Err(Error::AlreadyLoaded),
        }
    }

    /// Allocator adapter borrowed from this session's execution provider.
    pub fn allocator(&self) -> Result<ort::memory::Allocator> {
        match &self.state {
            EngineState::Loaded { session } => provider_allocator(session, self.provider.as_ref()),
            EngineState::Pending { .. } => Err(Error::NotLoaded),
        }
    }

    pub fn flush_context(&self) {
        self.provider.flush_context();
    }

    pub fn trim_upload_heap(&self) {
        self.provider.trim_upload_heap();
    }

    pub fn release_completed_references(&self) {
        self.provider.release_completed_references();
    }

    /// Cross-device input staging is explicitly unsupported.
    pub fn copy_input_across_devices(
        &self,
        _input_name: &str,
        _value: &TensorValue,
    ) -> Result<TensorValue> {
        Err(Error::NotImplemented("cross-device input staging"))
    }
}

fn optimization_level(level: OptimizationLevel) -> GraphOptimizationLevel {
    match level {
        OptimizationLevel::Disabled => GraphOptimizationLevel::Disable,
        OptimizationLevel::Basic => GraphOptimizationLevel::Level1,
        OptimizationLevel::Extended => GraphOptimizationLevel::Level2,
        OptimizationLevel::All => GraphOptimizationLevel::Level3,
    }
}

#[cfg(feature = "directml")]
fn configure_directml(
    builder: ort::session::builder::SessionBuilder,
    device_id: u32,
) -> Result<ort::session::builder::SessionBuilder> {
    use ort::execution_providers::DirectMLExecutionProvider;

    let ep = DirectMLExecutionProvider::default()
        .with_device_id(device_id as i32)
        .build();
    // DirectML requires sequential execution and no memory pattern.
    builder
        .with_memory_pattern(false)
        .map_err(Error::engine)?
        .with_parallel_execution(false)
        .map_err(Error::engine)?
        .with_execution_providers([ep])
        .map_err(Error::engine)
}

#[cfg(not(feature = "directml"))]
fn configure_directml(
    builder: ort::session::builder::SessionBuilder,
    device_id: u32,
) -> Result<ort::session::builder::SessionBuilder> {
    let _ = (builder, device_id);
    Err(Error::engine(
        "DirectML requested but ortbridge-ort was built without the `directml` feature",
    ))
}
