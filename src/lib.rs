// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod freshness;
pub mod fs;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod scan;
pub mod types;
pub mod watch;

pub use orchestrator::{create, Orchestrator, OrchestratorBuilder};

use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::BuildConfig;
use crate::errors::Result;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the orchestrator (startup builds, runtime, pipelines)
/// - the optional file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    debug!(config = %args.config, "configuration loaded");

    let mut builder = create(cfg);
    if args.once {
        builder = builder.watch(false);
    }
    let orchestrator = builder.build();

    if args.print_names {
        println!("{}", orchestrator.script_artifact_name());
        println!("{}", orchestrator.style_artifact_name());
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&orchestrator);
        return Ok(());
    }

    info!(
        script = orchestrator.script_artifact_name(),
        style = orchestrator.style_artifact_name(),
        watch = orchestrator.watches(),
        "starting assetpipe"
    );

    orchestrator
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!("Ctrl+C received; shutting down");
        })
        .await
}

/// Print the effective configuration, artifact names and startup decisions.
fn print_dry_run(orchestrator: &Orchestrator) {
    let cfg: &BuildConfig = orchestrator.config();

    println!("assetpipe dry-run");
    println!("  name = {}", cfg.name);
    println!("  output_dir = {}", cfg.output_dir.display());
    println!("  debug = {}", cfg.debug);
    println!("  compile_mode = {}", cfg.compile_mode.token());
    println!("  warning_level = {}", cfg.warning_level.token());
    println!("  pretty_print = {}", cfg.pretty_print);
    println!("  hash = {}", cfg.hash);
    println!("  source_map = {}", cfg.source_map);
    println!("  watch = {}", orchestrator.watches());
    println!();

    println!("sources:");
    for (label, roots) in [
        ("scripts", &cfg.roots.scripts),
        ("externs", &cfg.roots.externs),
        ("styles", &cfg.roots.styles),
    ] {
        println!("  {label}: {:?}", roots);
    }
    println!();

    println!("artifacts:");
    println!("  script: {}", orchestrator.script_artifact_name());
    println!("  style: {}", orchestrator.style_artifact_name());
    if cfg.source_map {
        println!("  source map: {}", orchestrator.artifacts().source_map_artifact_name());
    }
    println!();

    println!("startup:");
    for (kind, decision) in orchestrator.startup_decisions() {
        let verdict = if decision.needs_compile() { "build" } else { "skip" };
        println!("  {kind}: {verdict} ({decision:?})");
    }

    debug!("dry-run complete (no execution)");
}
