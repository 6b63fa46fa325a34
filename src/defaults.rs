//! Default sampling parameters applied to `generationConfig`
//!
//! These are deployment configuration, not part of the wire schema: a proxy
//! operator picks them once at startup (flags or environment) and every
//! request that omits the field gets them.

use clap::Args;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_TOP_K: i32 = 40;

/// Values filled into `temperature`, `topP` and `topK` when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Args)]
pub struct GenerationDefaults {
    /// Sampling temperature used when a request does not set one.
    #[arg(
        long = "default-temperature",
        env = "DEFAULT_TEMPERATURE",
        default_value_t = DEFAULT_TEMPERATURE
    )]
    pub temperature: f64,

    /// Nucleus sampling probability used when a request does not set one.
    #[arg(long = "default-top-p", env = "DEFAULT_TOP_P", default_value_t = DEFAULT_TOP_P)]
    pub top_p: f64,

    /// Top-k sampling size used when a request does not set one.
    #[arg(long = "default-top-k", env = "DEFAULT_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: i32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        defaults: GenerationDefaults,
    }

    /// What clap resolves for `name` when no flag is passed: the environment wins over
    /// the built-in value.
    fn env_or<T: std::str::FromStr>(name: &str, builtin: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(builtin)
    }

    fn expected_without_flags() -> GenerationDefaults {
        GenerationDefaults {
            temperature: env_or("DEFAULT_TEMPERATURE", DEFAULT_TEMPERATURE),
            top_p: env_or("DEFAULT_TOP_P", DEFAULT_TOP_P),
            top_k: env_or("DEFAULT_TOP_K", DEFAULT_TOP_K),
        }
    }

    #[test]
    fn test_flags_fall_back_to_builtin_values() {
        let cli = Cli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.defaults, expected_without_flags());
    }

    #[test]
    fn test_flags_take_precedence_over_environment() {
        let cli = Cli::try_parse_from([
            "test",
            "--default-temperature",
            "0.7",
            "--default-top-p",
            "0.9",
            "--default-top-k",
            "40",
        ])
        .unwrap();
        assert_eq!(cli.defaults, GenerationDefaults::default());
    }

    #[test]
    fn test_flags_override_builtin_values() {
        let cli = Cli::try_parse_from([
            "test",
            "--default-temperature",
            "1.2",
            "--default-top-k",
            "8",
        ])
        .unwrap();
        assert_eq!(cli.defaults.temperature, 1.2);
        assert_eq!(cli.defaults.top_p, env_or("DEFAULT_TOP_P", DEFAULT_TOP_P));
        assert_eq!(cli.defaults.top_k, 8);
    }
}
