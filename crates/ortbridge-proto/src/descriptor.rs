use std::fs;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use ortbridge_core::{Error, Result};
use prost::Message;
use tracing::debug;

use crate::onnx::ModelProto;

/// A parsed, exclusively-owned model definition.
///
/// Holds both the original serialized bytes and the decoded proto. The bytes
/// are what [`detach`](Self::detach) hands to the session loader — the engine
/// must always receive the caller's exact model, never a re-encode of the
/// decoded subset. The decoded proto serves metadata extraction and the
/// device-capability walk.
#[derive(Clone)]
pub struct ModelDescriptor {
    bytes: Bytes,
    proto: ModelProto,
}

impl ModelDescriptor {
    /// Decodes a descriptor from serialized model bytes.
    pub fn from_bytes(bytes: Bytes) -> Result<Self> {
        let proto = ModelProto::decode(bytes.clone())?;
        Ok(Self { bytes, proto })
    }

    /// Opens `path` read-only and parses it. A missing path is reported as
    /// [`Error::NotFound`]; bytes that do not decode as [`Error::Parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(Error::Io(err)),
        };
        debug!(path = %path.display(), len = bytes.len(), "read model file");
        Self::from_bytes(Bytes::from(bytes))
    }

    /// Parses a descriptor from an abstract sequential byte reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(Bytes::from(bytes))
    }

    /// Borrow of the decoded structure.
    pub fn proto(&self) -> &ModelProto {
        &self.proto
    }

    /// Serialized size of the model.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Consumes the descriptor and transfers ownership of the serialized
    /// model to the session loader. The move invalidates the descriptor for
    /// any further use.
    pub fn detach(self) -> Bytes {
        self.bytes
    }
}

impl std::fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("byte_len", &self.bytes.len())
            .field("ir_version", &self.proto.ir_version)
            .finish()
    }
}
