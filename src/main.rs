mod config;

use anyhow::{Context as _, bail};
use clap::Parser as _;
use config::{Config, Model};
use gemini_schemas::schemas::gemini::{
    GeminiContent, GeminiRequest, GenerationConfig, SafetySetting, SystemInstruction,
};
use gemini_schemas::schemas::keys::{ResetSelectedKeysRequest, VerifySelectedKeysRequest};
use gemini_schemas::{NameStyle, Schema, Validator};
use serde_json::Value;
use std::io::Read as _;
use tracing::{error, info, instrument};

#[instrument]
pub fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the normalized documents
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse().validate()?;
    info!("Validating with config: {:?}", config);

    let validator = Validator::new(config.defaults);
    let mut failures = 0;
    for (label, text) in read_inputs(&config)? {
        match normalize(&validator, config.model, config.style, &text) {
            Ok(value) => {
                let rendered = if config.pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                println!("{rendered}");
            }
            Err(e) => {
                error!(input = %label, "{e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} document(s) failed validation");
    }
    Ok(())
}

fn read_inputs(config: &Config) -> anyhow::Result<Vec<(String, String)>> {
    if config.inputs.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(vec![("<stdin>".to_owned(), text)]);
    }

    config
        .inputs
        .iter()
        .map(|path| -> anyhow::Result<(String, String)> {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            Ok((path.display().to_string(), text))
        })
        .collect()
}

fn normalize(
    validator: &Validator,
    model: Model,
    style: NameStyle,
    text: &str,
) -> anyhow::Result<Value> {
    match model {
        Model::Request => render::<GeminiRequest>(validator, style, text),
        Model::GenerationConfig => render::<GenerationConfig>(validator, style, text),
        Model::SafetySetting => render::<SafetySetting>(validator, style, text),
        Model::SystemInstruction => render::<SystemInstruction>(validator, style, text),
        Model::Content => render::<GeminiContent>(validator, style, text),
        Model::ResetKeys => render::<ResetSelectedKeysRequest>(validator, style, text),
        Model::VerifyKeys => render::<VerifySelectedKeysRequest>(validator, style, text),
    }
}

fn render<T: Schema>(validator: &Validator, style: NameStyle, text: &str) -> anyhow::Result<Value> {
    let record: T = validator.from_str(text)?;
    Ok(record.to_value(style)?)
}
