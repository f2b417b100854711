//! RDF/XML output

use super::{to_rio, SerializeError, SerializeResult};
use crate::rdf::Triple;
use rio_api::formatter::TriplesFormatter;
use rio_xml::RdfXmlFormatter;

/// RDF/XML serializer
pub struct RdfXmlSerializerWrapper;

impl RdfXmlSerializerWrapper {
    /// Serialize Triples to an RDF/XML document
    ///
    /// The formatter keeps one `rdf:Description` open while the subject
    /// stays the same, so grouped input gives one element per node.
    pub fn serialize(triples: &[&Triple]) -> SerializeResult<String> {
        let mut formatter = RdfXmlFormatter::new(Vec::new())?;

        for triple in triples {
            formatter.format(&to_rio(triple))?;
        }

        let output = formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}
