use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use procmap_core::{
    ArtifactResult, ConfigManager, EdgeObservation, GraphConfig, IdStrategy, InsightConfig,
    InsightRecord, LoggingConfig, ReferenceContext,
};
use procmap_graph::{NodeRole, ProcessMap, ProcessMapBuilder};
use procmap_insight::{
    coverage_percentage, format_percentage, summarize_artifacts, total_affected_cases,
    ArtifactSummary, InsightRanker,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "procmap")]
#[command(about = "Process-map construction and insight ranking for event logs", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty, table)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Configuration file (defaults to ./procmap.toml when present)
    #[arg(short, long, global = true, env = "PROCMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a process map from a JSON list of edge observations
    Map {
        /// File with `[{sourceEvent, targetEvent, occurrence}]`
        file: PathBuf,

        /// Label of the synthetic start activity
        #[arg(long)]
        start_label: Option<String>,

        /// Label of the synthetic end activity
        #[arg(long)]
        end_label: Option<String>,

        /// Use `n0, n1, ...` ids instead of whitespace-stripped labels
        #[arg(long)]
        surrogate_ids: bool,

        /// Fail on id collisions and negative occurrences
        #[arg(long)]
        strict: bool,

        /// Emit the renderer element list instead of the model (json output)
        #[arg(long)]
        elements: bool,
    },

    /// Filter and rank a JSON list of insights
    Insights {
        /// File with `[{effectSize, casesWithin, ...}]`
        file: PathBuf,

        /// Size of the reference case population
        #[arg(short, long, conflicts_with = "context")]
        num_traces: Option<i64>,

        /// Event-log statistics file with `numTraces`
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Summarize artifacts against the case population
    Artifacts {
        /// File with `[{name, numAffectedCases, conditions, ...}]`
        file: PathBuf,

        /// Size of the reference case population
        #[arg(short, long)]
        num_traces: i64,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Tabled)]
struct NodeRow {
    id: String,
    label: String,
    role: NodeRole,
}

#[derive(Tabled)]
struct EdgeRow {
    source: String,
    target: String,
    weight: i64,
}

#[derive(Tabled)]
struct InsightRow {
    rank: usize,
    effect_size: f64,
    cases_within: u64,
    details: String,
}

#[derive(Tabled)]
struct ArtifactRow {
    name: String,
    affected: u64,
    coverage: String,
}

/// Artifact overview plus the share of the population they cover together.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactReport {
    artifacts: Vec<ArtifactSummary>,
    total_affected_cases: u64,
    num_traces: i64,
    coverage: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&manager.config().logging, cli.verbose);
    manager.log_summary();

    match cli.command {
        Commands::Map {
            file,
            start_label,
            end_label,
            surrogate_ids,
            strict,
            elements,
        } => {
            let graph =
                graph_config(&manager.config().graph, start_label, end_label, surrogate_ids)?;
            let map = run_map(&graph, &file, strict)?;
            print_map(&map, cli.output, elements)
        }
        Commands::Insights {
            file,
            num_traces,
            context,
        } => {
            let context = resolve_context(num_traces, context.as_deref())?;
            let ranked = run_insights(&manager.config().insights, &file, context.as_ref())?;
            print_insights(&ranked, cli.output)
        }
        Commands::Artifacts { file, num_traces } => {
            let report = run_artifacts(&file, num_traces)?;
            print_artifacts(&report, cli.output)
        }
        Commands::Config => {
            let config = manager.config();
            match cli.output {
                OutputFormat::Json => print_json(config),
                _ => {
                    if let Some(path) = manager.config_path() {
                        println!("{} {}", "Config file:".bold(), path.display());
                    }
                    println!("{:#?}", config);
                    Ok(())
                }
            }
        }
    }
}

/// Apply command-line overrides to the configured graph options.
fn graph_config(
    base: &GraphConfig,
    start_label: Option<String>,
    end_label: Option<String>,
    surrogate_ids: bool,
) -> Result<GraphConfig> {
    let mut graph = base.clone();
    if let Some(label) = start_label {
        graph.start_label = label;
    }
    if let Some(label) = end_label {
        graph.end_label = label;
    }
    if surrogate_ids {
        graph.id_strategy = IdStrategy::Surrogate;
    }
    graph.validate().context("invalid sentinel labels")?;
    Ok(graph)
}

fn run_map(graph: &GraphConfig, file: &Path, strict: bool) -> Result<ProcessMap> {
    let builder = ProcessMapBuilder::from_config(graph);
    let edges: Vec<EdgeObservation> = read_json(file)?;
    let map = if strict {
        builder.try_build(&edges)?
    } else {
        builder.build(&edges)
    };

    if !map.is_empty() && map.nodes_with_role(NodeRole::Start).next().is_none() {
        warn!(start_label = %graph.start_label, "no activity matches the start label");
    }
    Ok(map)
}

/// `--num-traces` wins over a `--context` statistics file.
fn resolve_context(
    num_traces: Option<i64>,
    context: Option<&Path>,
) -> Result<Option<ReferenceContext>> {
    match (num_traces, context) {
        (Some(n), _) => Ok(Some(ReferenceContext::new(n))),
        (None, Some(path)) => Ok(Some(read_json::<ReferenceContext>(path)?)),
        (None, None) => {
            warn!("no reference context given, insights are left unranked");
            Ok(None)
        }
    }
}

fn run_insights(
    config: &InsightConfig,
    file: &Path,
    context: Option<&ReferenceContext>,
) -> Result<Vec<InsightRecord>> {
    let insights: Vec<InsightRecord> = read_json(file)?;
    Ok(InsightRanker::from_config(config).rank(insights, context)?)
}

fn run_artifacts(file: &Path, num_traces: i64) -> Result<ArtifactReport> {
    let artifacts: Vec<ArtifactResult> = read_json(file)?;
    let context = ReferenceContext::new(num_traces);
    let summaries = summarize_artifacts(&artifacts, &context)?;
    let total = total_affected_cases(&artifacts);

    Ok(ArtifactReport {
        coverage: coverage_percentage(total, &context)?,
        artifacts: summaries,
        total_affected_cases: total,
        num_traces,
    })
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_map(map: &ProcessMap, output: OutputFormat, elements: bool) -> Result<()> {
    match output {
        OutputFormat::Json if elements => print_json(&map.to_elements()),
        OutputFormat::Json => print_json(map),
        OutputFormat::Table => {
            let nodes: Vec<NodeRow> = map
                .nodes
                .iter()
                .map(|n| NodeRow {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    role: n.role,
                })
                .collect();
            let edges: Vec<EdgeRow> = map
                .edges
                .iter()
                .map(|e| EdgeRow {
                    source: e.source_id.clone(),
                    target: e.target_id.clone(),
                    weight: e.weight,
                })
                .collect();
            println!("{}", Table::new(nodes));
            println!("{}", Table::new(edges));
            print_diagnostics(map);
            Ok(())
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} nodes, {} edges",
                "Process map:".bold(),
                map.nodes.len(),
                map.edges.len()
            );
            for node in &map.nodes {
                let label = match node.role {
                    NodeRole::Start => node.label.green().bold(),
                    NodeRole::End => node.label.red().bold(),
                    NodeRole::Regular => node.label.normal(),
                };
                println!("  {} {}", label, format!("[{}]", node.id).dimmed());
            }
            for edge in &map.edges {
                println!(
                    "  {} -> {} {}",
                    edge.source_id,
                    edge.target_id,
                    format!("({})", edge.weight).cyan()
                );
            }
            print_diagnostics(map);
            Ok(())
        }
    }
}

fn print_diagnostics(map: &ProcessMap) {
    for diagnostic in &map.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
}

fn print_insights(insights: &[InsightRecord], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(insights),
        OutputFormat::Table => {
            let rows: Vec<InsightRow> = insights
                .iter()
                .enumerate()
                .map(|(i, insight)| InsightRow {
                    rank: i + 1,
                    effect_size: insight.effect_size,
                    cases_within: insight.cases_within,
                    details: serde_json::Value::Object(insight.details.clone()).to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
            Ok(())
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Insights:".bold(), insights.len());
            for (i, insight) in insights.iter().enumerate() {
                let effect = format!("{:+.3}", insight.effect_size);
                let effect = if insight.effect_size < 0.0 {
                    effect.red()
                } else {
                    effect.green()
                };
                println!(
                    "  {:>3}. {} cases={} {}",
                    i + 1,
                    effect,
                    insight.cases_within,
                    serde_json::Value::Object(insight.details.clone())
                        .to_string()
                        .dimmed()
                );
            }
            Ok(())
        }
    }
}

fn print_artifacts(report: &ArtifactReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let rows: Vec<ArtifactRow> = report
                .artifacts
                .iter()
                .map(|s| ArtifactRow {
                    name: s.name.clone(),
                    affected: s.num_affected_cases,
                    coverage: s.coverage_label(),
                })
                .collect();
            println!("{}", Table::new(rows));
            println!("total affected cases: {}", report.total_affected_cases);
            Ok(())
        }
        OutputFormat::Pretty => {
            for s in &report.artifacts {
                println!(
                    "  {:<40} {:>8} {:>5}",
                    s.name,
                    s.num_affected_cases,
                    s.coverage_label().cyan()
                );
            }
            println!(
                "{} {} of {} cases ({})",
                "Total:".bold(),
                report.total_affected_cases,
                report.num_traces,
                format_percentage(report.coverage)
            );
            Ok(())
        }
    }
}
