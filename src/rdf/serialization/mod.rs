//! RDF serialization formats
//!
//! Supports:
//! - RDF/XML (default)
//! - Turtle
//! - N-Triples
//! - JSON-LD
//!
//! Serialization is a pure function of the store and the format. Triples
//! are written grouped by subject, so the same store always yields the
//! same bytes.

mod jsonld;
mod turtle;
mod xml;

pub use jsonld::JsonLdSerializerWrapper;
pub use turtle::{NTriplesSerializerWrapper, TurtleSerializerWrapper};
pub use xml::RdfXmlSerializerWrapper;

use super::{RdfObject, RdfStore, RdfSubject, Triple};
use rio_api::model as rio;
use thiserror::Error;
use tracing::debug;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RdfFormat {
    /// RDF/XML format (.rdf)
    #[default]
    RdfXml,
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// JSON-LD format (.jsonld)
    JsonLd,
}

impl RdfFormat {
    /// Map a requested output name onto a format.
    ///
    /// `xml` and `rdf` select RDF/XML, `ttl` and `n3` select Turtle, `nt`
    /// selects N-Triples and `jsonld` selects JSON-LD. Anything else falls
    /// back to RDF/XML.
    pub fn from_output(output: &str) -> Self {
        match output.to_ascii_lowercase().as_str() {
            "xml" | "rdf" => RdfFormat::RdfXml,
            "ttl" | "n3" => RdfFormat::Turtle,
            "nt" => RdfFormat::NTriples,
            "jsonld" => RdfFormat::JsonLd,
            other => {
                debug!("Unsupported output '{}', falling back to RDF/XML", other);
                RdfFormat::RdfXml
            }
        }
    }

    /// Media type to announce for this format
    pub fn media_type(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::JsonLd => "application/ld+json",
        }
    }

    /// Conventional file extension
    pub fn file_extension(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "rdf",
            RdfFormat::Turtle => "ttl",
            RdfFormat::NTriples => "nt",
            RdfFormat::JsonLd => "jsonld",
        }
    }
}

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize an RDF store in the given format
    pub fn serialize_store(store: &RdfStore, format: RdfFormat) -> SerializeResult<String> {
        let triples = store.grouped_by_subject();

        match format {
            RdfFormat::RdfXml => RdfXmlSerializerWrapper::serialize(&triples),
            RdfFormat::Turtle => TurtleSerializerWrapper::serialize(&triples),
            RdfFormat::NTriples => NTriplesSerializerWrapper::serialize(&triples),
            RdfFormat::JsonLd => JsonLdSerializerWrapper::serialize(&triples, store.namespaces()),
        }
    }

    /// Serialize an RDF store for a requested output name (see [`RdfFormat::from_output`])
    pub fn serialize_output(store: &RdfStore, output: &str) -> SerializeResult<String> {
        Self::serialize_store(store, RdfFormat::from_output(output))
    }
}

/// Borrow a triple as a rio model triple
pub(crate) fn to_rio(triple: &Triple) -> rio::Triple<'_> {
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
    };

    let object = match &triple.object {
        RdfObject::NamedNode(n) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => {
            let literal = if let Some(language) = l.language() {
                rio::Literal::LanguageTaggedString {
                    value: l.value(),
                    language,
                }
            } else if l.is_plain() {
                rio::Literal::Simple { value: l.value() }
            } else {
                rio::Literal::Typed {
                    value: l.value(),
                    datatype: rio::NamedNode {
                        iri: l.datatype_iri(),
                    },
                }
            };
            rio::Term::Literal(literal)
        }
    };

    rio::Triple {
        subject,
        predicate: rio::NamedNode {
            iri: triple.predicate.as_str(),
        },
        object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(RdfFormat::from_output("xml"), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::from_output("rdf"), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::from_output("ttl"), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_output("n3"), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_output("nt"), RdfFormat::NTriples);
        assert_eq!(RdfFormat::from_output("JSONLD"), RdfFormat::JsonLd);
    }

    #[test]
    fn test_unknown_output_falls_back_to_xml() {
        assert_eq!(RdfFormat::from_output("csv"), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::from_output(""), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::default().media_type(), "application/rdf+xml");
    }

    #[test]
    fn test_empty_store_serializes() {
        let store = RdfStore::new();
        for format in [
            RdfFormat::RdfXml,
            RdfFormat::Turtle,
            RdfFormat::NTriples,
            RdfFormat::JsonLd,
        ] {
            assert!(RdfSerializer::serialize_store(&store, format).is_ok());
        }
    }
}
