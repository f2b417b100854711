//! DCAT mapping engine
//!
//! Turns metadata records into DCAT graphs, driven by a [`MappingSpec`]:
//! - [`build_dataset_graph`] models one record as a dataset with its catalog
//!   record, sub-entities and distributions
//! - [`build_catalog_graph`] models the catalog with one stub per member
//!
//! # Example
//!
//! ```rust,no_run
//! use dcat_graph::dcat::{build_dataset_graph, MappingSpec, Record};
//! use dcat_graph::rdf::RdfSerializer;
//!
//! let spec = MappingSpec::from_path("config/dcat.json")?;
//! let record: Record = serde_json::from_str(r#"{ "name": "n1", "id": "i1", "title": "T" }"#)?;
//!
//! let graph = build_dataset_graph(&spec, &record)?;
//! println!("{}", RdfSerializer::serialize_output(&graph, "ttl")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod catalog;
mod dataset;
mod encoders;
mod processor;
pub mod record;
pub mod spec;

pub use catalog::{build_catalog_graph, catalog_as_rdf};
pub use dataset::{
    add_fallback_alternate_identifiers, build_dataset_graph, build_dataset_graphs, dataset_as_rdf,
};
pub use encoders::ValueEncoder;
pub use processor::ClassProcessor;
pub use record::Record;
pub use spec::{ClassMapping, MappingSpec, PropertyMapping, SpecError, SpecResult, ValueKind};

use crate::rdf::{RdfError, SerializeError};
use thiserror::Error;

/// Errors raised while building or rendering a graph
#[derive(Error, Debug)]
pub enum BuildError {
    /// The specification cannot support the requested build
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// An identity IRI of the record is not a valid IRI
    #[error(transparent)]
    Rdf(#[from] RdfError),

    /// A field the builder cannot do without
    #[error("Record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

pub type BuildResult<T> = Result<T, BuildError>;
