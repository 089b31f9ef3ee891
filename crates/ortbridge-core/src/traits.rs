use crate::types::Device;

/// Graph-optimization level requested from the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    Disabled,
    Basic,
    Extended,
    #[default]
    All,
}

/// Mutable registration state handed to a [`GraphTransformerRegistry`]
/// collaborator at load time.
#[derive(Clone, Debug, Default)]
pub struct TransformerRegistration {
    pub optimization_level: OptimizationLevel,
    /// Symbolic dimension pins ("batch" -> 1, ...) applied before load.
    pub dimension_overrides: Vec<(String, i64)>,
}

/// Collaborator that decides which graph transformers a session enables.
/// The session facade only delegates; it never inspects the registration.
pub trait GraphTransformerRegistry: Send + Sync {
    fn register(&self, registration: &mut TransformerRegistration);
}

/// Kind of allocator backing a memory location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocatorKind {
    Device,
    Arena,
}

/// Kind of memory a location refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryKind {
    #[default]
    Default,
    CpuInput,
    CpuOutput,
}

/// Where an allocator places its memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryLocation {
    pub device: Device,
    pub allocator: AllocatorKind,
    pub memory: MemoryKind,
}

/// Borrowed view of the execution provider backing a session.
///
/// The provider owns no memory pools; device ids and allocators are borrowed
/// from the engine for the scope of each call. The three maintenance hooks
/// forward to the device runtime where it surfaces an equivalent and are
/// documented no-ops otherwise.
pub trait ExecutionProvider: Send + Sync {
    fn device(&self) -> Device;

    /// Memory-location descriptor for the provider's default allocator.
    fn memory_location(&self) -> MemoryLocation;

    /// Flush pending device work.
    fn flush_context(&self);

    /// Shrink the upload heap after a burst of tensor uploads.
    fn trim_upload_heap(&self);

    /// Release engine references whose device work has completed.
    fn release_completed_references(&self);
}
