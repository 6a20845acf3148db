//! Traffic Inspector - CLI Entry Point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use traffic_inspector::api::commands::{self, ReplayOptions};
use traffic_inspector::constants::{self, APP_NAME, APP_VERSION};
use traffic_inspector::InspectorConfig;

#[derive(Parser, Debug)]
#[command(name = "traffic-inspector", version, about = "Response body feature extraction and weak labeling")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Replay a HAR capture through the pipeline and export the samples")]
    Replay {
        #[arg(value_name = "HAR")]
        har: PathBuf,
        /// Export directory [default: INSPECTOR_EXPORT_DIR or the download dir]
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        no_export: bool,
        /// Directory with model.onnx and scaler.json
        #[arg(long, env = "INSPECTOR_MODEL_DIR")]
        model_dir: Option<PathBuf>,
        /// Expected SHA-256 of model.onnx
        #[arg(long)]
        model_sha256: Option<String>,
        #[arg(long)]
        threshold: Option<f32>,
        #[arg(long)]
        no_ml: bool,
        #[arg(long)]
        no_alert: bool,
    },
    #[command(about = "Print the features and weak label of one file")]
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Replay {
            har,
            out,
            no_export,
            model_dir,
            model_sha256,
            threshold,
            no_ml,
            no_alert,
        } => {
            log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

            let mut config = InspectorConfig::from_env();
            if let Some(t) = threshold {
                config.threshold = t;
            }
            if model_dir.is_some() {
                config.model_dir = model_dir;
            }
            if no_ml {
                config.ml_enabled = false;
            }
            if no_alert {
                config.page_alert_enabled = false;
            }

            let out_dir = if no_export { None } else { Some(out.unwrap_or_else(constants::get_export_dir)) };
            let options = ReplayOptions {
                har_path: har.clone(),
                out_dir,
                model_checksum: model_sha256,
            };

            let summary = commands::replay_har(config, options)
                .await
                .with_context(|| format!("replay of {} failed", har.display()))?;

            println!("{}", summary.status);
            println!();
            println!("HAR entries: {}", summary.entries);
            println!("Scored: {} (alerts: {})", summary.scored, summary.alerts);
            if let Some(engine) = &summary.engine {
                println!(
                    "Engine: {} | loaded: {} | inferences: {} | avg latency: {:.2} ms",
                    engine.model_name, engine.model_loaded, engine.inference_count, engine.avg_latency_ms
                );
            }
            if let Some(path) = summary.export_path {
                println!("Exported: {}", path.display());
            }
        }
        Command::Inspect { file, json } => {
            let report = commands::inspect_file(&file)
                .with_context(|| format!("cannot inspect {}", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Source: {}", report.source);
                for (name, value) in report.layout.feature_names.iter().zip(report.features.as_slice()) {
                    println!("  {:<18} {:.4}", name, value);
                }
                println!("Label: {} ({})", report.classification.label.as_u8(), report.classification.label);
                println!("Rule hits: {}", report.classification.rule_hits);
            }
        }
    }
    Ok(())
}
