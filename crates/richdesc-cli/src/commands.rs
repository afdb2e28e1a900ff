// SPDX-License-Identifier: AGPL-3.0-or-later
//! Subcommand implementations

use anyhow::{bail, Context, Result};
use richdesc_core::{ConvertConfig, ConverterRegistry, Description, TextFormat};
use std::io::{Read, Write};
use std::path::Path;

/// Options of the `convert` subcommand after argument parsing
#[derive(Debug, Default)]
pub struct ConvertOptions<'a> {
    pub input: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub from: Option<TextFormat>,
    pub to: Option<TextFormat>,
    pub config: Option<&'a Path>,
    pub strict: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ConvertConfig::default()),
    }
}

/// Read a file, or stdin for `None` and `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn format_of(path: Option<&Path>) -> Option<TextFormat> {
    path.and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .and_then(TextFormat::from_extension)
}

/// Convert with the lenient contract unless `strict` is set
pub fn convert(
    input: &str,
    from: TextFormat,
    to: TextFormat,
    config: &ConvertConfig,
    strict: bool,
) -> Result<String> {
    let registry = ConverterRegistry::with_defaults();
    if from != to && registry.get(from, to).is_none() {
        bail!("cannot convert {} to {}", from.label(), to.label());
    }
    if input.trim().is_empty() {
        return Ok(String::new());
    }

    match registry.convert(input, from, to, config) {
        Ok(output) => Ok(output),
        Err(e) if strict => {
            Err(e).context(format!("{} to {} conversion failed", from.label(), to.label()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "conversion failed, writing descriptor");
            Ok(e.describe())
        }
    }
}

pub fn run_convert(options: ConvertOptions<'_>, stdout: &mut impl Write) -> Result<()> {
    let from = options
        .from
        .or_else(|| format_of(options.input))
        .context("cannot infer the source format, pass --from")?;
    let to = options
        .to
        .or_else(|| format_of(options.output))
        .context("cannot infer the target format, pass --to")?;
    let config = load_config(options.config)?;

    let input = read_input(options.input)?;
    tracing::debug!(from = %from, to = %to, bytes = input.len(), "converting");
    let output = convert(&input, from, to, &config, options.strict)?;

    match options.output {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => stdout
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

pub fn run_describe(
    input: Option<&Path>,
    config: Option<&Path>,
    stdout: &mut impl Write,
) -> Result<()> {
    let config = load_config(config)?;
    let html = read_input(input)?;
    let description = Description::from_html(Some(&html), &config);

    serde_json::to_writer_pretty(&mut *stdout, &description).context("failed to write JSON")?;
    writeln!(stdout)?;
    Ok(())
}

pub fn run_formats(stdout: &mut impl Write) -> Result<()> {
    for (from, to) in ConverterRegistry::with_defaults().directions() {
        writeln!(stdout, "{} -> {}\t(.{} -> .{})", from.label(), to.label(), from, to)?;
    }
    Ok(())
}
