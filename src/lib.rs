//! DCAT graph builder
//!
//! Exposes metadata catalog records (datasets, distributions, the catalog
//! itself) as DCAT linked-data graphs, serialized on demand as RDF/XML,
//! Turtle, N-Triples or JSON-LD.
//!
//! A declarative mapping specification drives the translation: per class,
//! which record fields become literals, numbers, datetimes, references,
//! vocabulary terms or class memberships.
//!
//! # Modules
//!
//! - [`rdf`]: terms, namespace registry, graph store and serializers
//! - [`dcat`]: specification compilation and the dataset/catalog builders
//!
//! ## Example Usage
//!
//! ```rust
//! use dcat_graph::dcat::{build_catalog_graph, MappingSpec};
//! use dcat_graph::rdf::{RdfFormat, RdfSerializer};
//!
//! let spec = MappingSpec::from_json_str(include_str!("../config/dcat.json")).unwrap();
//!
//! let graph = build_catalog_graph(&spec, &["a", "b"]).unwrap();
//! let xml = RdfSerializer::serialize_store(&graph, RdfFormat::from_output("rdf")).unwrap();
//! assert!(xml.contains("https://data.example.org/dataset/a"));
//! ```

pub mod dcat;
pub mod rdf;

pub use dcat::{BuildError, BuildResult, MappingSpec, Record};
pub use rdf::{RdfFormat, RdfSerializer, RdfStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
