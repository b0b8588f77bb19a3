mod builder;
mod cleanup;
mod input;
mod period;
mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lemma_types::{EdgeType, Network};

use builder::NetworkBuilder;
use store::LemmaStore;

#[derive(Parser)]
#[command(
    name = "lemma_networks",
    about = "Egyptological lemma network builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build lemma networks from parsed dictionary files → lemma_networks.json
    Build {
        /// Directory holding the egyptian*/demotic*/coptic* lemma JSON files
        #[arg(long, default_value = ".")]
        input: PathBuf,
        /// Output artifact path
        #[arg(long, default_value = "lemma_networks.json")]
        output: PathBuf,
    },
    /// List networks containing a given word form
    Query {
        /// The form to look for, e.g. "ḫꜣj" or "ϧⲉ"
        form: String,
        /// Artifact produced by a previous build
        #[arg(long, default_value = "lemma_networks.json")]
        artifact: PathBuf,
    },
    /// Print the chronological period inventory
    Periods,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Build { input, output }) => run_build(&input, &output),
        Some(Command::Query { form, artifact }) => run_query(&form, &artifact),
        Some(Command::Periods) => run_periods(),
        // Default: build from the current directory
        None => run_build(Path::new("."), Path::new("lemma_networks.json")),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  ARTIFACT FILE HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn write_json<T: serde::Serialize>(path: &Path, data: &T) {
    let json = serde_json::to_string_pretty(data).expect("JSON serialization failed");
    std::fs::write(path, &json).unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
    eprintln!("  {} ({} bytes)", path.display(), json.len());
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let json = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", path.display());
        eprintln!("Run `lemma_networks build` first to generate the artifact.");
        std::process::exit(1);
    });
    serde_json::from_str(&json).unwrap_or_else(|e| {
        eprintln!("Cannot parse {}: {e}", path.display());
        eprintln!("The JSON may be from an older format. Re-run the build.");
        std::process::exit(1);
    })
}

// ═══════════════════════════════════════════════════════════════════════
//  BUILD MODE: load stores, build all networks, clean up, serialize
// ═══════════════════════════════════════════════════════════════════════

fn run_build(input: &Path, output: &Path) {
    eprintln!("═══════════════════════════════════════════════════");
    eprintln!(" LEMMA NETWORK CONSTRUCTION");
    eprintln!("═══════════════════════════════════════════════════");

    eprintln!("\n── Phase 1: loading lemma stores ──");
    let files = LemmaStore::discover(input);
    let store = LemmaStore::load(&files);
    let (egy, dem, cop) = store.counts();
    eprintln!("  Egyptian entries: {egy}");
    eprintln!("  Demotic entries:  {dem}");
    eprintln!("  Coptic entries:   {cop}");

    eprintln!("\n── Phase 2: building networks ──");
    let mut builder = NetworkBuilder::new(&store);
    let mut networks = builder.build_all();
    eprintln!("  networks built: {}", networks.len());
    eprintln!(
        "  skipped etymologies (no definitions): {}",
        builder.stats.skipped_etymologies
    );
    eprintln!(
        "  malformed alternative forms dropped:  {}",
        builder.stats.malformed_forms
    );
    eprintln!(
        "  placeholder nodes (no store entry):   {}",
        builder.stats.placeholder_nodes
    );

    eprintln!("\n── Phase 3: removing redundant descent edges ──");
    let cleanup_stats = cleanup::remove_redundant_descends(&mut networks);
    eprintln!(
        "  removed {} edge(s) across {} network(s)",
        cleanup_stats.removed_edges, cleanup_stats.networks_touched
    );

    #[cfg(debug_assertions)]
    for net in &networks {
        if let Err(e) = net.validate() {
            panic!("invalid network after build: {e}");
        }
    }

    eprintln!("\n── Phase 4: writing artifact ──");
    write_json(output, &networks);

    print_summary(&networks);
}

fn print_summary(networks: &[Network]) {
    let total_nodes: usize = networks.iter().map(|n| n.nodes.len()).sum();
    let total_edges: usize = networks.iter().map(|n| n.edges.len()).sum();

    let mut by_language: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_edge_type: BTreeMap<&'static str, usize> = BTreeMap::new();
    for net in networks {
        for node in &net.nodes {
            *by_language.entry(node.language.name()).or_default() += 1;
        }
        for edge in &net.edges {
            let name = match edge.edge_type {
                EdgeType::Evolves => "EVOLVES",
                EdgeType::Descends => "DESCENDS",
                EdgeType::Variant => "VARIANT",
                EdgeType::Derived => "DERIVED",
                EdgeType::Component => "COMPONENT",
                EdgeType::Borrowed => "BORROWED",
                EdgeType::Inherited => "INHERITED",
            };
            *by_edge_type.entry(name).or_default() += 1;
        }
    }

    eprintln!("\n── Summary ──");
    eprintln!("  networks: {}", networks.len());
    eprintln!("  nodes:    {total_nodes}");
    eprintln!("  edges:    {total_edges}");
    if !networks.is_empty() {
        eprintln!(
            "  avg nodes per network: {:.1}",
            total_nodes as f64 / networks.len() as f64
        );
    }
    eprintln!("  nodes by language:");
    for (name, count) in &by_language {
        eprintln!("    {name:<14} {count}");
    }
    eprintln!("  edges by type:");
    for (name, count) in &by_edge_type {
        eprintln!("    {name:<14} {count}");
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  QUERY MODE: read the artifact, return networks containing a form
// ═══════════════════════════════════════════════════════════════════════

fn run_query(form: &str, artifact: &Path) {
    let networks: Vec<Network> = read_json(artifact);

    let matching: Vec<&Network> = networks
        .iter()
        .filter(|net| net.nodes.iter().any(|n| n.form == form))
        .collect();

    eprintln!("Found {} network(s) containing {form:?}", matching.len());

    #[derive(serde::Serialize)]
    struct QueryResult<'a> {
        form: &'a str,
        network_count: usize,
        networks: Vec<&'a Network>,
    }

    let result = QueryResult {
        form,
        network_count: matching.len(),
        networks: matching,
    };

    let json = serde_json::to_string_pretty(&result).expect("JSON serialization");
    println!("{json}");
}

// ═══════════════════════════════════════════════════════════════════════
//  PERIODS MODE: print the chronological inventory to stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_periods() {
    println!("Period ranking (ascending chronological order):");
    for (name, rank) in period::inventory() {
        println!("  {rank:>3}  {name}");
    }
    println!("\nDynasty ranges:");
    for (range, kingdom) in period::DYNASTY_RANGES {
        println!("  {range:<16} → {kingdom}");
    }
    println!(
        "\nUnrecognized labels rank {} (undated).",
        period::UNDATED_RANK
    );
}
