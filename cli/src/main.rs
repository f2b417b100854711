//! dcat-graph CLI: render metadata records as DCAT graphs
//!
//! Loads a mapping specification and records from disk and prints the
//! serialized graph on stdout. Log output goes to stderr (`RUST_LOG`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use dcat_graph::dcat::{build_dataset_graph, build_dataset_graphs, catalog_as_rdf, MappingSpec, Record};
use dcat_graph::rdf::{RdfSerializer, RdfStore};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "dcat-graph", version, about = "Render catalog metadata as DCAT graphs")]
struct Cli {
    /// Mapping specification (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, default_value = "config/dcat.json", global = true, env = "DCAT_GRAPH_SPEC")]
    spec: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one dataset record, or each record of a JSON list
    Dataset {
        /// JSON file holding the record
        #[arg(long)]
        record: PathBuf,

        /// Output syntax: xml, rdf, ttl, n3, nt or jsonld
        #[arg(long, default_value = "xml")]
        output: String,
    },
    /// Render the catalog with a stub per member dataset
    Catalog {
        /// JSON file with a list of identifiers, or a comma separated list
        #[arg(long)]
        ids: String,

        /// Output syntax: xml, rdf, ttl, n3, nt or jsonld
        #[arg(long, default_value = "xml")]
        output: String,
    },
    /// Count the statements of a dataset graph per predicate
    Stats {
        /// JSON file holding the record
        #[arg(long)]
        record: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let spec = MappingSpec::from_path(&cli.spec)
        .with_context(|| format!("loading specification {}", cli.spec.display()))?;

    match cli.command {
        Commands::Dataset { record, output } => run_dataset(&spec, &record, &output),
        Commands::Catalog { ids, output } => {
            let ids = parse_ids(&ids)?;
            debug!("Rendering catalog with {} members", ids.len());
            println!("{}", catalog_as_rdf(&spec, ids.as_slice(), &output)?);
            Ok(())
        }
        Commands::Stats { record } => run_stats(&spec, &record),
    }
}

fn run_dataset(spec: &MappingSpec, path: &Path, output: &str) -> Result<()> {
    let records = read_records(path)?;

    if let [record] = records.as_slice() {
        let store = build_dataset_graph(spec, record)?;
        println!("{}", RdfSerializer::serialize_output(&store, output)?);
        return Ok(());
    }

    for (index, result) in build_dataset_graphs(spec, &records).into_iter().enumerate() {
        let store = result.with_context(|| format!("record {} of {}", index, path.display()))?;
        println!("{}", RdfSerializer::serialize_output(&store, output)?);
    }
    Ok(())
}

fn run_stats(spec: &MappingSpec, path: &Path) -> Result<()> {
    let records = read_records(path)?;
    let Some(record) = records.first() else {
        bail!("{} holds no records", path.display());
    };

    let store = build_dataset_graph(spec, record)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Predicate", "Statements"]);
    for (predicate, count) in predicate_counts(&store) {
        table.add_row(vec![predicate, count.to_string()]);
    }

    println!("{}", table);
    println!(
        "{} statement(s), {} subject(s)",
        store.len(),
        store.subjects().len()
    );
    Ok(())
}

/// Records from a JSON file holding either one object or a list of objects
fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading record {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parsing record {}", path.display()))?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => bail!("entry {} of {} is not an object", index, path.display()),
            })
            .collect(),
        _ => bail!("{} does not hold a JSON object or list", path.display()),
    }
}

/// Member identifiers from a JSON list file or a comma separated list
fn parse_ids(ids: &str) -> Result<Vec<String>> {
    let path = Path::new(ids);
    if path.extension().map_or(false, |ext| ext == "json") {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading identifiers {}", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("parsing identifiers {}", path.display()));
    }

    Ok(ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect())
}

/// Statement count per predicate, in first-appearance order
fn predicate_counts(store: &RdfStore) -> IndexMap<String, usize> {
    let namespaces = store.namespaces();
    let mut counts = IndexMap::new();
    for triple in store.iter() {
        let iri = triple.predicate.as_str();
        let name = namespaces.compact(iri).unwrap_or_else(|| iri.to_string());
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_spec_path_from_environment() {
        let cli = Cli::try_parse_from(["dcat-graph", "stats", "--record", "r.json"]).unwrap();
        assert_eq!(cli.spec, PathBuf::from("config/dcat.json"));

        std::env::set_var("DCAT_GRAPH_SPEC", "/etc/dcat/mapping.yaml");
        let from_env = Cli::try_parse_from(["dcat-graph", "stats", "--record", "r.json"]);
        let explicit = Cli::try_parse_from([
            "dcat-graph",
            "--spec",
            "local.json",
            "catalog",
            "--ids",
            "a,b",
        ]);
        std::env::remove_var("DCAT_GRAPH_SPEC");

        assert_eq!(from_env.unwrap().spec, PathBuf::from("/etc/dcat/mapping.yaml"));
        let explicit = explicit.unwrap();
        assert_eq!(explicit.spec, PathBuf::from("local.json"));
        assert!(matches!(explicit.command, Commands::Catalog { .. }));
    }

    #[test]
    fn test_parse_comma_list() {
        assert_eq!(parse_ids("a, b,,c").unwrap(), vec!["a", "b", "c"]);
        assert!(parse_ids("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_list() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"["a", "b"]"#).unwrap();

        let ids = parse_ids(file.path().to_str().unwrap()).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_read_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "n1", "id": "i1"}}, {{"name": "n2", "id": "i2"}}]"#).unwrap();
        assert_eq!(read_records(file.path()).unwrap().len(), 2);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#""just a string""#).unwrap();
        assert!(read_records(file.path()).is_err());
    }

    #[test]
    fn test_predicate_counts() {
        let spec = MappingSpec::from_json_str(include_str!("../../config/dcat.json")).unwrap();
        let record: Record =
            serde_json::from_str(r#"{"name": "n1", "id": "i1", "title": ["A", "B"]}"#).unwrap();
        let store = build_dataset_graph(&spec, &record).unwrap();

        let counts = predicate_counts(&store);
        assert_eq!(counts["dct:title"], 2);
        assert_eq!(counts.values().sum::<usize>(), store.len());
    }
}
