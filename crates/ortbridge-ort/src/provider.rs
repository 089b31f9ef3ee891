use ort::memory::{AllocationDevice, Allocator, AllocatorType, MemoryInfo, MemoryType};
use ortbridge_core::{
    AllocatorKind, Device, Error, ExecutionProvider, MemoryKind, MemoryLocation, Result,
};
use tracing::debug;

/// CPU execution provider. There is no device queue, so the maintenance
/// hooks have nothing to do.
pub struct CpuExecutionProvider;

impl ExecutionProvider for CpuExecutionProvider {
    fn device(&self) -> Device {
        Device::Cpu
    }

    fn memory_location(&self) -> MemoryLocation {
        MemoryLocation {
            device: Device::Cpu,
            allocator: AllocatorKind::Arena,
            memory: MemoryKind::Default,
        }
    }

    fn flush_context(&self) {}

    fn trim_upload_heap(&self) {}

    fn release_completed_references(&self) {}
}

/// DirectML execution provider bound to one adapter by device id. The D3D
/// device and command queue stay owned by the caller; the engine binds the
/// adapter internally.
pub struct DmlExecutionProvider {
    device_id: u32,
}

impl DmlExecutionProvider {
    pub fn new(device_id: u32) -> Self {
        Self { device_id }
    }
}

impl ExecutionProvider for DmlExecutionProvider {
    fn device(&self) -> Device {
        Device::DirectML {
            device_id: self.device_id,
        }
    }

    fn memory_location(&self) -> MemoryLocation {
        MemoryLocation {
            device: Device::DirectML {
                device_id: self.device_id,
            },
            allocator: AllocatorKind::Device,
            memory: MemoryKind::Default,
        }
    }

    // The engine binding drives the DML command queue itself and exposes no
    // heap controls; the hooks record the request and return.
    fn flush_context(&self) {
        debug!(device_id = self.device_id, "flush_context");
    }

    fn trim_upload_heap(&self) {
        debug!(device_id = self.device_id, "trim_upload_heap");
    }

    fn release_completed_references(&self) {
        debug!(device_id = self.device_id, "release_completed_references");
    }
}

/// Memory-location descriptor for the provider's default allocator.
pub fn provider_memory_info(provider: &dyn ExecutionProvider) -> Result<MemoryInfo> {
    let location = provider.memory_location();
    let (device, device_id) = match location.device {
        Device::Cpu => (AllocationDevice::CPU, 0),
        Device::DirectML { device_id } => (AllocationDevice::DIRECTML, device_id as i32),
    };
    let allocator = match location.allocator {
        AllocatorKind::Device => AllocatorType::Device,
        AllocatorKind::Arena => AllocatorType::Arena,
    };
    let memory = match location.memory {
        MemoryKind::Default => MemoryType::Default,
        MemoryKind::CpuInput => MemoryType::CPUInput,
        MemoryKind::CpuOutput => MemoryType::CPUOutput,
    };
    MemoryInfo::new(device, device_id, allocator, memory).map_err(Error::engine)
}

/// Allocator adapter borrowed from the provider's default allocator. The
/// adapter owns no memory pools; exhaustion surfaces as an engine error.
pub fn provider_allocator(
    session: &ort::session::Session,
    provider: &dyn ExecutionProvider,
) -> Result<Allocator> {
    let memory_info = provider_memory_info(provider)?;
    Allocator::new(session, memory_info).map_err(Error::engine)
}
