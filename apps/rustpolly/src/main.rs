//! RustPolly CLI - synthesize text to an audio file.
//!
//! # Usage
//!
//! ```text
//! rustpolly <output.mp3> "<text to synthesize>"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCESS_KEY_ID` | *(required)* | Access key |
//! | `AWS_SECRET_ACCESS_KEY` | *(required)* | Secret key |
//! | `AWS_SESSION_TOKEN` | *(unset)* | Session token for temporary credentials |
//! | `AWS_DEFAULT_REGION` | `us-east-1` | Target region |
//! | `POLLY_HOST` | *(regional endpoint)* | Endpoint host override |
//! | `POLLY_VOICE_ID` | `Amy` | Voice to synthesize with |
//! | `POLLY_OUTPUT_FORMAT` | `mp3` | Audio output format |
//! | `POLLY_ENGINE` | *(unset)* | Synthesis engine (e.g. `neural`) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rustpolly_core::{SpeechClient, SpeechConfig, SynthesizeSpeech};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Build the synthesis parameters from the `POLLY_*` environment variables.
fn params_from_env(text: &str) -> SynthesizeSpeech {
    let voice = env_or("POLLY_VOICE_ID", "Amy");
    let format = env_or("POLLY_OUTPUT_FORMAT", "mp3");

    let builder = SynthesizeSpeech::builder()
        .output_format(format)
        .voice_id(voice)
        .text(text);

    match std::env::var("POLLY_ENGINE").ok().filter(|e| !e.is_empty()) {
        Some(engine) => builder.engine(engine).build(),
        None => builder.build(),
    }
}

/// Read an environment variable with a fallback for unset or empty values.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn main() -> Result<()> {
    init_tracing(&log_level())?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("usage: {} <output-file> \"<text>\"", args[0]);
    }
    let output_path = &args[1];
    let text = &args[2];

    let config = SpeechConfig::from_env();
    let client = SpeechClient::new(config).context("invalid configuration")?;
    let params = params_from_env(text);

    info!(
        output = %output_path,
        voice = %params.voice_id,
        format = %params.output_format,
        "synthesizing speech"
    );

    let file = File::create(output_path)
        .with_context(|| format!("failed to create output file: {output_path}"))?;
    let mut sink = BufWriter::new(file);

    let status = client
        .synthesize(&params, &mut sink)
        .context("synthesis failed")?;
    sink.flush().context("failed to flush output file")?;

    if status != 200 {
        bail!("service returned HTTP status {status}; see {output_path} for the error document");
    }

    info!(status, "done");
    Ok(())
}
