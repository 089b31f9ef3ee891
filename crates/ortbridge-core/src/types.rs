use bytes::Bytes;
use smallvec::SmallVec;

/// Execution device backing a session. Device presence is the sole
/// session-builder selector: a GPU device means DirectML, none means CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    DirectML { device_id: u32 },
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::DirectML { device_id } => write!(f, "dml:{device_id}"),
        }
    }
}

/// Tensor element types exchanged across the adapter boundary.
///
/// `Undefined` is the classification default for anything outside the
/// supported set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    F16,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    String,
    #[default]
    Undefined,
}

impl ElementType {
    /// Size of one element in bytes. `None` for `String` and `Undefined`.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            ElementType::F32 | ElementType::I32 | ElementType::U32 => Some(4),
            ElementType::F16 | ElementType::I16 | ElementType::U16 => Some(2),
            ElementType::F64 | ElementType::I64 | ElementType::U64 => Some(8),
            ElementType::I8 | ElementType::U8 | ElementType::Bool => Some(1),
            ElementType::String | ElementType::Undefined => None,
        }
    }
}

/// One dimension of a declared tensor shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    /// Concrete extent.
    Fixed(i64),
    /// Symbolic extent ("batch", "seq_len", ...).
    Named(String),
    /// Dynamic extent with no annotation at all.
    Free,
}

/// Declared shape of a model input or output; may mix fixed and symbolic
/// dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TensorShape(pub Vec<Dimension>);

impl TensorShape {
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// All-fixed extents, or `None` if any dimension is dynamic.
    pub fn fixed_dims(&self) -> Option<Vec<i64>> {
        self.0
            .iter()
            .map(|d| match d {
                Dimension::Fixed(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

/// Concrete runtime shape of a materialized tensor value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>().max(1)
    }
}

/// A CPU-resident tensor value crossing the adapter boundary: element type,
/// concrete shape, and little-endian packed bytes.
#[derive(Clone, Debug)]
pub struct TensorValue {
    pub element_type: ElementType,
    pub shape: Shape,
    pub data: Bytes,
}

impl TensorValue {
    pub fn new(element_type: ElementType, shape: Shape, data: Bytes) -> Self {
        Self {
            element_type,
            shape,
            data,
        }
    }

    pub fn from_f32(shape: Shape, values: &[f32]) -> Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::F32, shape, Bytes::from(data))
    }

    pub fn from_i64(shape: Shape, values: &[i64]) -> Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::I64, shape, Bytes::from(data))
    }

    /// Zero-filled value of the given type and shape, for priming inputs.
    pub fn zeroed(element_type: ElementType, shape: Shape) -> Option<Self> {
        let byte_len = element_type.byte_size()? * shape.numel();
        Some(Self::new(
            element_type,
            shape,
            Bytes::from(vec![0u8; byte_len]),
        ))
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}
