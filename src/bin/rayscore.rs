#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use rayscore::synthetic::{
    synthetic_banks, synthetic_packet, with_reflections, with_session_seconds, write_content_root,
    SyntheticProfile,
};
use rayscore::{
    render_report_markdown, score_assessment, Dimension, DepthScorer, KeywordDepthScorer,
    PipelineOutput, ReportOptions, ResponsePacket, ScoringConfig, ScoringContext,
};

#[derive(Parser)]
#[command(name = "rayscore", version, about = "Leadership-capacity assessment scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one response packet against a content root
    Score {
        /// Directory holding the item banks (and optional catalog/config)
        #[arg(long)]
        content: PathBuf,
        #[arg(long)]
        packet: PathBuf,
        /// Output JSON path
        #[arg(long)]
        out: PathBuf,
        /// Pilot median completion time; enables the relative speed checks
        #[arg(long)]
        pilot_median_seconds: Option<f64>,
        /// Config JSON overriding any config.json in the content root
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write a markdown report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Render a markdown report from a saved output
    Report {
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        subfacets: bool,
        #[arg(long)]
        all_edge_cases: bool,
    },
    /// Print the structural hash of a saved output
    Fingerprint {
        #[arg(long)]
        output: PathBuf,
    },
    /// Score the depth of one reflection (0-3, or null when empty)
    Reflect {
        #[arg(long, group = "input")]
        text: Option<String>,
        #[arg(long, group = "input")]
        file: Option<PathBuf>,
    },
    /// Write a synthetic content root and a matching packet
    Synth {
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, value_enum, default_value = "signature")]
        profile: CliProfile,
        /// Session length stamped on the packet
        #[arg(long, default_value_t = 1200)]
        duration_seconds: i64,
    },
    /// Print the default configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliProfile {
    Uniform,
    GroundingSuppressed,
    Signature,
}

impl From<CliProfile> for SyntheticProfile {
    fn from(p: CliProfile) -> Self {
        match p {
            CliProfile::Uniform => SyntheticProfile::Uniform(2.0),
            CliProfile::GroundingSuppressed => SyntheticProfile::GroundingSuppressed,
            CliProfile::Signature => SyntheticProfile::Resourced {
                top: [Dimension::R2, Dimension::R6],
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_writer(io::stderr).with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            content,
            packet,
            out,
            pilot_median_seconds,
            config,
            report,
        } => {
            let config = config.map(ScoringConfig::from_json_path).transpose()?;
            let ctx = ScoringContext::load_dir_with(&content, config)?;
            let packet = ResponsePacket::from_json_path(&packet)?;
            let output = score_assessment(&ctx, &packet, pilot_median_seconds)?;
            std::fs::write(&out, output.to_json_pretty()?)?;
            if let Some(path) = report {
                let markdown = render_report_markdown(&output, &ReportOptions::default());
                std::fs::write(path, markdown)?;
            }
            println!("{}", output.fingerprint());
        }
        Commands::Report {
            output,
            out,
            subfacets,
            all_edge_cases,
        } => {
            let output = PipelineOutput::from_json_path(&output)?;
            let opts = ReportOptions {
                include_subfacets: subfacets,
                include_clear_edge_cases: all_edge_cases,
                ..ReportOptions::default()
            };
            std::fs::write(out, render_report_markdown(&output, &opts))?;
        }
        Commands::Fingerprint { output } => {
            let output = PipelineOutput::from_json_path(&output)?;
            println!("{}", output.fingerprint());
        }
        Commands::Reflect { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => return Err("one of --text or --file is required".into()),
            };
            match KeywordDepthScorer.score(&text) {
                Some(depth) => println!("{depth}"),
                None => println!("null"),
            }
        }
        Commands::Synth {
            out_dir,
            profile,
            duration_seconds,
        } => {
            let banks = synthetic_banks();
            write_content_root(&out_dir, &banks)?;
            let mut packet = synthetic_packet("synthetic-run", &banks, profile.into());
            if !matches!(profile, CliProfile::Uniform) {
                packet = with_reflections(packet, &banks.reflection_prompts);
            }
            let packet = with_session_seconds(packet, duration_seconds);
            let packet_path = out_dir.join("packet.json");
            write_json(&packet_path, &packet)?;
            eprintln!("[synth] content root and packet written to {}", out_dir.display());
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&ScoringConfig::default())?);
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), io::Error> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    std::fs::write(path, json)
}
