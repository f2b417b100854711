//! RDF (Resource Description Framework) plumbing
//!
//! This module implements the graph side of the mapping engine:
//! - RDF terms and triples (wrapping `oxrdf`)
//! - A namespace registry resolving `(prefix, local name)` pairs
//! - An insertion-ordered triple store with membership tests
//! - Serializers for RDF/XML, Turtle, N-Triples and JSON-LD (via `rio`)
//!
//! # Example
//!
//! ```rust
//! use dcat_graph::rdf::{Literal, NamespaceManager, RdfFormat, RdfSerializer, RdfStore};
//!
//! let namespaces = NamespaceManager::new();
//! let mut store = RdfStore::with_namespaces(namespaces.clone());
//!
//! let dataset = namespaces.resolve("dcat", "Dataset").unwrap();
//! let title = namespaces.resolve("dct", "title").unwrap();
//! store.add(dataset, title, Literal::new_simple_literal("Example"));
//!
//! let turtle = RdfSerializer::serialize_store(&store, RdfFormat::Turtle).unwrap();
//! assert!(turtle.contains("Example"));
//! ```

pub mod namespace;
mod serialization;
mod store;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    Triple, TriplePattern,
};

pub use store::RdfStore;

pub use namespace::{Namespace, NamespaceManager, PrefixError, PrefixResult};

pub use serialization::{RdfFormat, RdfSerializer, SerializeError, SerializeResult};
