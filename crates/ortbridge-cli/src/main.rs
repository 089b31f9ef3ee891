mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use ortbridge_core::{Dimension, FeatureDescriptor, Shape, TensorValue};
use ortbridge_ort::{builder_for_device, DmlDevice, RunConfig, SessionOptions};
use ortbridge_proto::{
    ensure_device_compatibility, override_schema_inference_functions, ModelDescriptor, ModelInfo,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    std::env::set_var("RUST_LOG", &cli.log);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    override_schema_inference_functions();

    match cli.command {
        Command::Inspect { model } => inspect(&model),
        Command::Check {
            model,
            fp16_supported,
        } => check(&model, fp16_supported),
        Command::Run { model, device } => run(&model, &device),
    }
}

fn inspect(model_path: &str) -> Result<()> {
    let descriptor = ModelDescriptor::from_file(model_path)?;
    let info = ModelInfo::from_descriptor(&descriptor);

    println!("name:        {}", info.name());
    println!("author:      {}", info.author());
    println!("domain:      {}", info.domain());
    println!("description: {}", info.description());
    println!("version:     {}", info.version());

    if !info.metadata().is_empty() {
        println!("metadata:");
        let mut entries: Vec<_> = info.metadata().iter().collect();
        entries.sort();
        for (key, value) in entries {
            println!("  {key} = {value}");
        }
    }

    println!("inputs:");
    for feature in info.inputs() {
        println!("  {}", describe(feature));
    }
    println!("outputs:");
    for feature in info.outputs() {
        println!("  {}", describe(feature));
    }
    Ok(())
}

fn check(model_path: &str, fp16_supported: bool) -> Result<()> {
    let descriptor = ModelDescriptor::from_file(model_path)?;
    let info = ModelInfo::from_descriptor(&descriptor);

    ensure_device_compatibility(&info, &descriptor, fp16_supported)
        .context("model is not compatible with the target device")?;
    println!("ok: {} is compatible", info.name());
    Ok(())
}

fn run(model_path: &str, device: &str) -> Result<()> {
    let descriptor = ModelDescriptor::from_file(model_path)?;
    let info = ModelInfo::from_descriptor(&descriptor);
    let device = parse_device(device)?;
    tracing::info!(model = model_path, device = ?device, "loading model");

    let mut session = builder_for_device(device).create_session(SessionOptions::default());
    let mut binding = session.create_binding();

    for feature in info.inputs() {
        let (FeatureDescriptor::Tensor {
            name,
            element_type,
            shape,
        }
        | FeatureDescriptor::Image {
            name,
            element_type,
            shape,
            ..
        }) = feature
        else {
            bail!("input `{}` is not a tensor; priming is unsupported", feature.name());
        };

        // Symbolic dimensions are pinned to 1 for the probe run.
        let dims: Vec<usize> = shape
            .0
            .iter()
            .map(|d| match d {
                Dimension::Fixed(v) => usize::try_from(*v).unwrap_or(1),
                _ => 1,
            })
            .collect();
        let value = TensorValue::zeroed(*element_type, Shape::from_slice(&dims))
            .with_context(|| format!("input `{name}` has an unsized element type"))?;
        binding.bind_input(name.clone(), value);
    }
    for feature in info.outputs() {
        binding.bind_output(feature.name().to_string(), None);
    }

    session.load_model(descriptor)?;

    let started = std::time::Instant::now();
    session.run(&mut binding, &RunConfig::default())?;
    let elapsed = started.elapsed();

    println!("ran {} in {elapsed:?}", info.name());
    for (name, slot) in binding.outputs() {
        match slot {
            Some(value) => println!(
                "  {name}: {:?} {:?} ({} bytes)",
                value.element_type,
                value.shape.0.as_slice(),
                value.byte_len()
            ),
            None => println!("  {name}: <empty>"),
        }
    }
    Ok(())
}

fn describe(feature: &FeatureDescriptor) -> String {
    match feature {
        FeatureDescriptor::Tensor {
            name,
            element_type,
            shape,
        } => format!("{name}: tensor {element_type:?} {}", describe_shape(shape)),
        FeatureDescriptor::Image {
            name,
            element_type,
            shape,
            pixel_format_hint,
        } => format!(
            "{name}: image {element_type:?} {} ({pixel_format_hint})",
            describe_shape(shape)
        ),
        FeatureDescriptor::Map {
            name,
            key_type,
            value_type,
        } => format!("{name}: map {key_type:?} -> {value_type:?}"),
        FeatureDescriptor::Sequence { name, element } => {
            format!("{name}: sequence of [{}]", describe(element))
        }
    }
}

fn describe_shape(shape: &ortbridge_core::TensorShape) -> String {
    let dims: Vec<String> = shape
        .0
        .iter()
        .map(|d| match d {
            Dimension::Fixed(v) => v.to_string(),
            Dimension::Named(n) => n.clone(),
            Dimension::Free => "?".to_string(),
        })
        .collect();
    format!("[{}]", dims.join(", "))
}

fn parse_device(raw: &str) -> Result<Option<DmlDevice>> {
    if raw.eq_ignore_ascii_case("cpu") {
        return Ok(None);
    }

    if let Some(rest) = raw.strip_prefix("dml:") {
        let device_id: u32 = rest.parse().context("invalid dml device id")?;
        return Ok(Some(DmlDevice { device_id }));
    }

    bail!("unsupported device: {raw} (expected cpu or dml:N)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_strings_parse() {
        assert!(parse_device("cpu").unwrap().is_none());
        assert!(parse_device("CPU").unwrap().is_none());
        assert_eq!(parse_device("dml:1").unwrap().unwrap().device_id, 1);
        assert!(parse_device("cuda:0").is_err());
    }
}
