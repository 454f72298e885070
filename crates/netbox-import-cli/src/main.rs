//! netbox-import CLI - transform a NetBox dump into Nautobot records.

use clap::{Parser, Subcommand};
use netbox_import::progress::{JsonProgress, LogProgress};
use netbox_import::target::{JsonLinesSink, NullSink};
use netbox_import::{
    logging, Config, ImportError, ImportResult, ModelRegistry, NetboxVersion, Orchestrator,
    ProgressReporter, RecordSink, SourceDataset,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "netbox-import")]
#[command(about = "Transform a NetBox data dump into Nautobot records")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Print progress updates as JSON lines to stderr
    #[arg(long)]
    progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a NetBox dump
    Run {
        /// Override the NetBox dump path
        #[arg(long)]
        source: Option<PathBuf>,

        /// Override the NetBox version of the dump
        #[arg(long)]
        netbox_version: Option<String>,

        /// Override the JSON-lines output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Dry run: resolve every record but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration and the structure of the dump
    Validate {
        /// Override the NetBox dump path
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// List the models in load order
    Models,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), ImportError> {
    let cli = Cli::parse();

    logging::init(&cli.verbosity, &cli.log_format)?;

    match cli.command {
        Commands::Models => print_models(cli.output_json),

        Commands::Validate { ref source } => {
            let mut config = read_config(&cli)?;
            if let Some(path) = source {
                config.source.path = path.clone();
            }
            config.validate()?;

            let dataset = SourceDataset::load(&config.source.path)?;
            let counts = dataset.label_counts();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("Validation completed successfully");
                println!("  Records: {}", dataset.len());
                for (label, count) in &counts {
                    println!("  {:<40} {}", label, count);
                }
            }
            Ok(())
        }

        Commands::Run {
            ref source,
            ref netbox_version,
            ref output,
            dry_run,
        } => {
            let mut config = read_config(&cli)?;

            // Apply overrides
            if let Some(path) = source {
                config.source.path = path.clone();
            }
            if let Some(version) = netbox_version {
                config.source.netbox_version = version.clone();
            }
            if let Some(path) = output {
                config.output.path = Some(path.clone());
            }
            config.import.dry_run |= dry_run;
            config.import.progress |= cli.progress;
            config.validate()?;

            let result = import(&config)?;

            if let Some(path) = &config.output.summary_path {
                std::fs::write(path, result.to_json()?)?;
                info!("Wrote run summary to {:?}", path);
            }

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                print_summary(&result, config.import.dry_run);
            }
            Ok(())
        }
    }
}

/// The configuration file if one was given, defaults otherwise.
fn read_config(cli: &Cli) -> Result<Config, ImportError> {
    match &cli.config {
        Some(path) => {
            let config = Config::read(path)?;
            info!("Loaded configuration from {:?}", path);
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn import(config: &Config) -> Result<ImportResult, ImportError> {
    let version: NetboxVersion = config.source.netbox_version.parse()?;
    let dataset = SourceDataset::load(&config.source.path)?;

    let progress: Box<dyn ProgressReporter> = if config.import.progress {
        Box::new(JsonProgress::stderr())
    } else {
        Box::new(LogProgress::new())
    };

    let mut sink: Box<dyn RecordSink> = if config.import.dry_run {
        Box::new(NullSink::new())
    } else {
        let path = config.output.path.as_ref().ok_or_else(|| {
            ImportError::Config("output.path is required unless import.dry_run is set".into())
        })?;
        Box::new(JsonLinesSink::create(path)?)
    };

    Orchestrator::new(ModelRegistry::with_builtins())
        .with_progress(progress)
        .with_netbox_version(version)
        .run(dataset, sink.as_mut())
}

fn print_summary(result: &ImportResult, dry_run: bool) {
    let status_msg = if dry_run { "Dry run completed!" } else { "Import completed!" };
    println!("\n{}", status_msg);
    println!("  Run ID: {}", result.run_id);
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!("  Records read: {}", result.records_read);
    println!("  Records loaded: {}", result.stats.total_loaded());
    println!("  Records written: {}", result.stats.sunk);
    if result.stats.synthesized > 0 {
        println!("  Records synthesized: {}", result.stats.synthesized);
    }
    if result.stats.rejected > 0 {
        println!("  Records rejected: {}", result.stats.rejected);
    }
    if result.stats.field_errors > 0 {
        println!("  Unresolved references: {}", result.stats.field_errors);
    }
    for (model, fields) in &result.unsupported_fields {
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        println!("  Unsupported {} fields: {}", model, fields.join(", "));
    }
}

fn print_models(output_json: bool) -> Result<(), ImportError> {
    let registry = ModelRegistry::with_builtins();
    let mut rows = Vec::new();
    for name in registry.load_order() {
        let schema = registry
            .get(name)
            .ok_or_else(|| ImportError::Registry(format!("model '{}' is not registered", name)))?;
        rows.push((
            schema.name,
            netbox_import::orchestrator::source_label(schema),
            schema.label,
            if schema.is_pass_through() { "pass-through" } else { "owned" },
        ));
    }

    if output_json {
        let json: Vec<_> = rows
            .iter()
            .map(|(name, source, target, ownership)| {
                serde_json::json!({
                    "name": name,
                    "source_label": source,
                    "target_label": target,
                    "ownership": ownership,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for (name, source, target, ownership) in rows {
            println!("{:<20} {:<32} {:<32} {}", name, source, target, ownership);
        }
    }
    Ok(())
}
