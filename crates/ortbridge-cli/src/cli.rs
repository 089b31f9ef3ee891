use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ortbridge", version, about = "ONNX model inspection and session driver")]
pub struct Cli {
    /// Log level (RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a model's metadata and feature descriptors
    Inspect {
        /// Path to the ONNX model file
        model: String,
    },

    /// Check a model against a device's fp16 capability
    Check {
        /// Path to the ONNX model file
        model: String,

        /// Whether the target device supports 16-bit float
        #[arg(long, default_value_t = false)]
        fp16_supported: bool,
    },

    /// Load a model into a session and run it once with zero-filled inputs
    Run {
        /// Path to the ONNX model file
        model: String,

        /// Device to run on (cpu or dml:N)
        #[arg(long, default_value = "cpu")]
        device: String,
    },
}
