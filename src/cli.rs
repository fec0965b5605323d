use crate::config::{ColorChoice, RegistryConfig};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// chanlog demo - emits a short traced workload through namespaced channels
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Namespace of the demo logger
    #[clap(short = 'n', long, default_value = crate::defaults::DEMO_NAMESPACE)]
    pub namespace: String,

    /// Extra enable/skip patterns (e.g. "other:*,-chanlog:demo:trace"); overrides DEBUG
    #[clap(short = 'f', long)]
    pub filter: Option<String>,

    /// When to color output; overrides DEBUG_COLORS
    #[clap(long, value_enum)]
    pub colors: Option<ColorChoice>,

    /// Where formatted lines go
    #[clap(short = 's', long, value_enum, default_value_t = SinkKind::Console)]
    pub sink: SinkKind,

    /// Number of workload iterations
    #[clap(short = 'i', long, default_value_t = crate::defaults::DEMO_ITERATIONS)]
    pub iterations: usize,

    /// Verbose output of the crate's own diagnostics
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Destinations selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum SinkKind {
    /// One line per call on stdout
    #[clap(name = "console")]
    Console,

    /// Forward lines to the tracing subscriber
    #[clap(name = "tracing")]
    Tracing,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Console => write!(f, "console"),
            SinkKind::Tracing => write!(f, "tracing"),
        }
    }
}

impl Args {
    /// Registry settings: the environment first, then command-line overrides.
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        self.registry_config_from(RegistryConfig::from_env()?)
    }

    /// Apply command-line overrides on top of `base`.
    pub fn registry_config_from(&self, base: RegistryConfig) -> Result<RegistryConfig> {
        if let Some(filter) = &self.filter {
            if filter.trim().is_empty() {
                anyhow::bail!("Filter cannot be empty");
            }
        }
        Ok(RegistryConfig {
            filter: self.filter.clone().or(base.filter),
            colors: self.colors.unwrap_or(base.colors),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chanlog"]).unwrap();
        assert_eq!(args.namespace, "chanlog:demo");
        assert_eq!(args.sink, SinkKind::Console);
        assert_eq!(args.iterations, 3);
        assert_eq!(args.filter, None);
        assert_eq!(args.colors, None);
    }

    #[test]
    fn test_parse_options() {
        let args = Args::try_parse_from([
            "chanlog", "-n", "svc", "--colors", "never", "--sink", "tracing", "-i", "1",
        ])
        .unwrap();
        assert_eq!(args.namespace, "svc");
        assert_eq!(args.colors, Some(ColorChoice::Never));
        assert_eq!(args.sink, SinkKind::Tracing);
        assert_eq!(args.iterations, 1);
    }

    #[test]
    fn test_rejects_unknown_sink() {
        assert!(Args::try_parse_from(["chanlog", "--sink", "file"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_environment() {
        let args = Args::try_parse_from(["chanlog", "-f", "x:*", "--colors", "always"]).unwrap();
        let base = RegistryConfig {
            filter: Some("env:*".to_string()),
            colors: ColorChoice::Never,
        };
        let config = args.registry_config_from(base).unwrap();
        assert_eq!(config.filter.as_deref(), Some("x:*"));
        assert_eq!(config.colors, ColorChoice::Always);
    }

    #[test]
    fn test_environment_kept_without_overrides() {
        let args = Args::try_parse_from(["chanlog"]).unwrap();
        let base = RegistryConfig {
            filter: Some("env:*".to_string()),
            colors: ColorChoice::Never,
        };
        assert_eq!(args.registry_config_from(base.clone()).unwrap(), base);
    }

    #[test]
    fn test_blank_filter_rejected() {
        let args = Args::try_parse_from(["chanlog", "-f", " "]).unwrap();
        assert!(args.registry_config_from(RegistryConfig::default()).is_err());
    }

    #[test]
    fn test_sink_kind_display() {
        assert_eq!(SinkKind::Console.to_string(), "console");
        assert_eq!(SinkKind::Tracing.to_string(), "tracing");
    }
}
