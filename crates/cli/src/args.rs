//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Turn a description or a screenshot into a Tailwind-styled HTML page.
#[derive(Debug, Parser)]
#[command(name = "uiforge", version, about)]
pub struct Args {
    /// What to build, or a question about the assistant.
    #[arg(long, short = 'r')]
    pub request: String,

    /// Screenshot or mock-up: an http(s) URL, a data URI, or a local image file.
    #[arg(long, short = 'i', value_name = "URL|PATH")]
    pub image: Option<String>,

    /// HTML from a previous run to refine.
    #[arg(long, value_name = "FILE")]
    pub current_code: Option<PathBuf>,

    /// TOML pipeline configuration. Built-in defaults apply when omitted.
    #[arg(long, short = 'c', env = "UIFORGE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Model for every node without its own override.
    #[arg(long, env = "UIFORGE_MODEL")]
    pub model: Option<String>,

    /// Abandon the run after this many seconds.
    #[arg(
        long,
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = OutputMode::Json)]
    pub output: OutputMode,

    #[arg(long, value_enum, env = "UIFORGE_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// What is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// The full run record as JSON.
    Json,
    /// Only the generated HTML; empty for non-coding requests.
    Code,
    /// Only the conversational reply.
    Reply,
}

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_invocation_uses_defaults() {
        let args = Args::try_parse_from(["uiforge", "--request", "build a navbar"]).unwrap();
        assert_eq!(args.request, "build a navbar");
        assert_eq!(args.timeout_secs, 300);
        assert_eq!(args.output, OutputMode::Json);
        assert!(args.image.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Args::try_parse_from(["uiforge", "-r", "x", "--timeout-secs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_mode_parses() {
        let args = Args::try_parse_from([
            "uiforge",
            "-r",
            "x",
            "--output",
            "code",
            "--image",
            "shot.png",
        ])
        .unwrap();
        assert_eq!(args.output, OutputMode::Code);
        assert_eq!(args.image.as_deref(), Some("shot.png"));
    }

    #[test]
    fn request_is_required() {
        assert!(Args::try_parse_from(["uiforge"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
