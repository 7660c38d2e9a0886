use crate::analysis::{PivotTable, analyze_division_runs, analyze_table_runs};
use crate::cli::commands::{AnalyzeCommands, Cli, Commands};
use crate::config::AgentConfig;
use crate::experiment::{
    DivisionExperiment, DivisionSweep, ExperimentContext, SweepReport, TableExperiment,
    TableSweep, run_division_experiment, run_table_experiment,
};
use crate::providers::{Provider, create_provider};
use crate::Config;
use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Writes the default configuration to `path`, or to `~/.emogames/config.toml`.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    if config_path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            config_path.display()
        );
    }
    let config = Config {
        config_path: config_path.clone(),
        ..Config::default()
    };
    config.save()?;
    Ok(config_path)
}

/// The explicit `--config` file, or the default one (created when missing).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load_or_init(),
    }
}

fn provider_for(config: &Config, needed: bool) -> Option<Arc<dyn Provider>> {
    needed.then(|| create_provider(&config.provider))
}

fn has_llm_seat(agents: [&AgentConfig; 2]) -> bool {
    agents.iter().any(|a| a.as_llm().is_some())
}

fn render_sweep_report(report: &SweepReport) -> String {
    let mut out = String::new();
    if report.dry_run {
        let _ = writeln!(out, "Planned {} configurations:", report.planned);
        for label in &report.completed {
            let _ = writeln!(out, "  - {label}");
        }
        return out;
    }
    let _ = writeln!(
        out,
        "Finished {} of {} configurations",
        report.completed.len(),
        report.planned
    );
    for (label, error) in &report.failed {
        let _ = writeln!(out, "  failed: {label}: {error}");
    }
    out
}

fn finish_sweep(report: &SweepReport) -> Result<()> {
    print!("{}", render_sweep_report(report));
    if !report.failed.is_empty() {
        bail!(
            "{} of {} configurations failed",
            report.failed.len(),
            report.planned
        );
    }
    Ok(())
}

fn write_pivot(pivot: &PivotTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, pivot.render_csv())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "pivot table written");
    Ok(())
}

/// `results.csv` -> `results_responder.csv`, next to it.
fn responder_output(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "division".into());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".into());
    path.with_file_name(format!("{stem}_responder.{ext}"))
}

fn print_pivot(title: &str, pivot: &PivotTable) {
    println!("{title}");
    if pivot.is_empty() {
        println!("  (no complete runs)");
    } else {
        print!("{}", pivot.render_text());
    }
}

async fn run_table(config: &Config, sweep: bool, dry_run: bool) -> Result<()> {
    if sweep {
        let ctx = ExperimentContext::from_config(config, provider_for(config, !dry_run));
        let report = TableSweep::new(config).run(&ctx, dry_run).await;
        return finish_sweep(&report);
    }

    let experiment = TableExperiment::from_config(config);
    let needs_llm = has_llm_seat([&experiment.agent1, &experiment.agent2]);
    let ctx = ExperimentContext::from_config(config, provider_for(config, needs_llm));
    let report = run_table_experiment(&experiment, &ctx).await?;

    println!("Run {} written to {}", report.run, report.run_dir.display());
    println!(
        "Rounds played: {}, skipped: {}",
        report.summary.completed_rounds, report.summary.skipped_rounds
    );
    for (side, moves) in &report.statistics.decision_stats {
        let counts: Vec<String> = moves.iter().map(|(m, n)| format!("{m}={n}")).collect();
        println!("  {side}: {}", counts.join(", "));
    }
    Ok(())
}

async fn run_division(config: &Config, sweep: bool, dry_run: bool) -> Result<()> {
    if sweep {
        let ctx = ExperimentContext::from_config(config, provider_for(config, !dry_run));
        let report = DivisionSweep::new(config).run(&ctx, dry_run).await;
        return finish_sweep(&report);
    }

    let experiment = DivisionExperiment::from_config(config);
    let needs_llm = has_llm_seat([&experiment.agent1, &experiment.agent2]);
    let ctx = ExperimentContext::from_config(config, provider_for(config, needs_llm));
    let report = run_division_experiment(&experiment, &ctx).await?;

    println!("Run {} written to {}", report.run, report.run_dir.display());
    match report.outcome.split {
        Some(split) => println!("Proposal: keep {}, give {}", split.keep, split.give),
        None => println!(
            "Proposal could not be parsed: {}",
            report.outcome.proposer_decision
        ),
    }
    if let Some(accepted) = report.outcome.accepted {
        println!("Responder {}", if accepted { "accepted" } else { "rejected" });
    }
    Ok(())
}

fn run_analyze(config: &Config, command: AnalyzeCommands) -> Result<()> {
    match command {
        AnalyzeCommands::Table {
            log_root,
            prefix,
            cooperative_move,
            output,
        } => {
            let coop = cooperative_move.unwrap_or(config.naming.move1);
            let analysis = analyze_table_runs(&log_root, &prefix, coop)?;
            info!(runs = analysis.runs.len(), "table runs analyzed");
            print_pivot("Cooperation rate (%) of agent 1", &analysis.pivot);
            if let Some(path) = output {
                write_pivot(&analysis.pivot, &path)?;
            }
            Ok(())
        }
        AnalyzeCommands::Division { log_root, output } => {
            let analysis = analyze_division_runs(&log_root)?;
            info!(runs = analysis.runs.len(), "division runs analyzed");
            print_pivot("Kept share (%) of LLM proposers", &analysis.proposer);
            println!();
            print_pivot("Accept rate (%) of LLM responders", &analysis.responder);
            if let Some(path) = output {
                write_pivot(&analysis.proposer, &path)?;
                write_pivot(&analysis.responder, &responder_output(&path))?;
            }
            Ok(())
        }
    }
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let path = init_config(cli.config.as_deref(), force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        Commands::Table { sweep, dry_run } => run_table(&config, sweep, dry_run).await,
        Commands::Division { sweep, dry_run } => run_division(&config, sweep, dry_run).await,
        Commands::Analyze { analyze_command } => run_analyze(&config, analyze_command),
    }
}
