//! Interactome CLI: assemble PPI graphs and run annotations against them

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use interactome::algo::shortest_path;
use interactome::annotation::{
    annotate, AssociationTable, DrugTargets, ProximitySummary, DEFAULT_TARGET_THRES,
};
use interactome::persistence;
use interactome::subgraph::{extract_ego_subgraph, CorrelationWeights, EgoQuery, GeneProfiles};
use interactome::{assemble, AssemblyConfig, SourceKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "interactome", version, about = "Protein-protein interaction network toolkit")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum SourceArg {
    All,
    String,
    Biogrid,
    Omnipath,
}

impl SourceArg {
    fn kinds(self) -> Vec<SourceKind> {
        match self {
            SourceArg::All => SourceKind::ALL.to_vec(),
            SourceArg::String => vec![SourceKind::String],
            SourceArg::Biogrid => vec![SourceKind::Biogrid],
            SourceArg::Omnipath => vec![SourceKind::Omnipath],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build source graphs from raw files and save them
    Assemble {
        /// YAML configuration; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Which source to build
        #[arg(long, value_enum, default_value = "all")]
        source: SourceArg,
    },
    /// Show size and connectivity of a saved graph
    Summary {
        graph: PathBuf,
    },
    /// Shortest path between two genes
    Path {
        graph: PathBuf,
        from: String,
        to: String,
    },
    /// Annotate drug-gene associations with PPI distance
    Annotate {
        #[arg(long)]
        graph: PathBuf,

        /// Association table (CSV, or TSV by extension)
        #[arg(long)]
        associations: PathBuf,

        /// DRUG_ID / TARGET table
        #[arg(long)]
        targets: PathBuf,

        /// Distances from here on share one category
        #[arg(long, default_value_t = DEFAULT_TARGET_THRES)]
        target_thres: u32,

        /// FDR cutoff for the significant counts
        #[arg(long, default_value_t = 0.1)]
        fdr: f64,

        #[arg(long)]
        output: PathBuf,
    },
    /// Extract a correlation-weighted neighborhood of a gene
    Ego {
        #[arg(long)]
        graph: PathBuf,

        #[arg(long)]
        seed: String,

        #[arg(long, default_value_t = 1)]
        hops: u32,

        /// Minimum absolute edge weight
        #[arg(long, default_value_t = 0.3)]
        threshold: f64,

        /// Genes removed before expansion
        #[arg(long, num_args = 1..)]
        exclude: Vec<String>,

        /// Keep vertices without remaining edges
        #[arg(long)]
        keep_isolated: bool,

        /// Long-format source/target/weight table
        #[arg(long, conflicts_with = "profiles", required_unless_present = "profiles")]
        weights: Option<PathBuf>,

        /// Gene x sample matrix; weights are Pearson correlations
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Write the subgraph as JSON here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assemble { config, source } => {
            run_assemble(config.as_deref(), source, &cli.format)
        }
        Commands::Summary { graph } => run_summary(&graph, &cli.format),
        Commands::Path { graph, from, to } => run_path(&graph, &from, &to, &cli.format),
        Commands::Annotate {
            graph,
            associations,
            targets,
            target_thres,
            fdr,
            output,
        } => run_annotate(
            &graph,
            &associations,
            &targets,
            target_thres,
            fdr,
            &output,
            &cli.format,
        ),
        Commands::Ego {
            graph,
            seed,
            hops,
            threshold,
            exclude,
            keep_isolated,
            weights,
            profiles,
            output,
        } => {
            let query = EgoQuery::new(seed)
                .hops(hops)
                .weight_threshold(threshold)
                .exclude(exclude)
                .keep_isolated(keep_isolated);
            run_ego(
                &graph,
                query,
                weights.as_deref(),
                profiles.as_deref(),
                output.as_deref(),
                &cli.format,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_graph(path: &Path) -> Result<interactome::InteractionGraph> {
    persistence::load(path).with_context(|| format!("loading graph {}", path.display()))
}

fn run_assemble(config: Option<&Path>, source: SourceArg, format: &OutputFormat) -> Result<()> {
    let config = match config {
        Some(path) => AssemblyConfig::load(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => AssemblyConfig::default(),
    };

    let reports = assemble(&config, &source.kinds());
    let failed = reports.iter().filter(|r| r.result.is_err()).count();

    match format {
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| match &r.result {
                    Ok(summary) => serde_json::json!({
                        "source": r.kind.name(),
                        "output": r.output.display().to_string(),
                        "summary": summary,
                    }),
                    Err(e) => serde_json::json!({
                        "source": r.kind.name(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Source", "Vertices", "Edges", "Components", "Output / Error"]);
            for r in &reports {
                match &r.result {
                    Ok(s) => table.add_row(vec![
                        r.kind.name().to_string(),
                        s.vertex_count.to_string(),
                        s.edge_count.to_string(),
                        s.component_count.to_string(),
                        r.output.display().to_string(),
                    ]),
                    Err(e) => table.add_row(vec![
                        r.kind.name().to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        e.to_string(),
                    ]),
                };
            }
            println!("{}", table);
        }
    }

    if failed > 0 {
        bail!("{} of {} source(s) failed", failed, reports.len());
    }
    Ok(())
}

fn run_summary(path: &Path, format: &OutputFormat) -> Result<()> {
    let graph = load_graph(path)?;
    let summary = graph.summary();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Property", "Value"]);
            table.add_row(vec!["Directed".to_string(), summary.directed.to_string()]);
            table.add_row(vec!["Vertices".to_string(), summary.vertex_count.to_string()]);
            table.add_row(vec!["Edges".to_string(), summary.edge_count.to_string()]);
            table.add_row(vec![
                "Attributes".to_string(),
                summary.attribute_columns.join(", "),
            ]);
            table.add_row(vec![
                "Components".to_string(),
                summary.component_count.to_string(),
            ]);
            table.add_row(vec![
                "Largest component".to_string(),
                summary.largest_component.to_string(),
            ]);
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_path(path: &Path, from: &str, to: &str, format: &OutputFormat) -> Result<()> {
    let graph = load_graph(path)?;
    let genes = shortest_path(&graph, from, to);

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "from": from, "to": to, "path": genes })
        ),
        OutputFormat::Table => match genes {
            Some(genes) => println!("{} ({} hops)", genes.join(" -> "), genes.len() - 1),
            None => println!("(no path)"),
        },
    }
    Ok(())
}

fn run_annotate(
    graph: &Path,
    associations: &Path,
    targets: &Path,
    target_thres: u32,
    fdr: f64,
    output: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let graph = load_graph(graph)?;
    let table = AssociationTable::from_path(associations)
        .with_context(|| format!("reading associations {}", associations.display()))?;
    let targets = DrugTargets::from_path(targets)
        .with_context(|| format!("reading drug targets {}", targets.display()))?;

    let annotations = annotate(table.rows(), &graph, &targets, target_thres);
    table
        .write_annotated_path(output, &annotations)
        .with_context(|| format!("writing {}", output.display()))?;

    let summary = ProximitySummary::from_annotations(table.rows(), &annotations, fdr);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            let mut counts = Table::new();
            counts.set_header(vec![
                "PPI".to_string(),
                "All".to_string(),
                format!("FDR < {}", fdr),
            ]);
            for (category, count) in &summary.all {
                counts.add_row(vec![
                    category.to_string(),
                    count.to_string(),
                    summary.significant_count(*category).to_string(),
                ]);
            }
            println!("{}", counts);
        }
    }
    Ok(())
}

fn run_ego(
    graph: &Path,
    query: EgoQuery,
    weights: Option<&Path>,
    profiles: Option<&Path>,
    output: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let graph = load_graph(graph)?;
    let weights = match (weights, profiles) {
        (Some(path), _) => CorrelationWeights::from_path(path)
            .with_context(|| format!("reading weights {}", path.display()))?,
        (None, Some(path)) => {
            let profiles = GeneProfiles::from_path(path)
                .with_context(|| format!("reading profiles {}", path.display()))?;
            CorrelationWeights::from_profiles(&profiles, &graph)
        }
        (None, None) => bail!("either --weights or --profiles is required"),
    };

    let ego = extract_ego_subgraph(&graph, &weights, &query);

    if let Some(path) = output {
        std::fs::write(path, ego.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => {
            if output.is_none() {
                println!("{}", ego.to_json()?);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Source", "Target", "Weight"]);
            for edge in &ego.edges {
                table.add_row(vec![
                    edge.source.clone(),
                    edge.target.clone(),
                    format!("{:.3}", edge.weight),
                ]);
            }
            println!("{}", table);
            println!(
                "{:?}: {} vertices, {} edges",
                ego.status,
                ego.vertex_count(),
                ego.edge_count()
            );
        }
    }
    Ok(())
}
