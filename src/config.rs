//! Command-line configuration for the validation tool
//!
//! This module defines the arguments accepted by the `gemini-schemas` binary.
use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use gemini_schemas::{GenerationDefaults, NameStyle};
use std::path::PathBuf;

/// The record type an input document is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// A full generateContent request body.
    Request,
    GenerationConfig,
    SafetySetting,
    SystemInstruction,
    Content,
    ResetKeys,
    VerifyKeys,
}

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Validate and normalize Gemini proxy request bodies", long_about = None)]
pub struct Config {
    /// Which schema to validate the input against.
    #[arg(short = 'm', long, value_enum, default_value_t = Model::Request)]
    pub model: Model,

    /// Field naming used for the normalized output.
    #[arg(short = 's', long, value_enum, default_value_t = NameStyle::Canonical)]
    pub style: NameStyle,

    /// Pretty-print the normalized output.
    #[arg(short = 'p', long, default_value_t = false)]
    pub pretty: bool,

    #[command(flatten)]
    pub defaults: GenerationDefaults,

    /// JSON documents to validate. Standard input is read when none are given.
    pub inputs: Vec<PathBuf>,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if let Some(missing) = self.inputs.iter().find(|path| !path.exists()) {
            return Err(anyhow!(
                "Input file '{}' does not exist",
                missing.display()
            ));
        }
        Ok(self)
    }
}
