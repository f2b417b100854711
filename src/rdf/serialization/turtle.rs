//! Turtle and N-Triples output

use super::{to_rio, SerializeError, SerializeResult};
use crate::rdf::Triple;
use rio_api::formatter::TriplesFormatter;
use rio_turtle::{NTriplesFormatter, TurtleFormatter};

/// Turtle serializer
pub struct TurtleSerializerWrapper;

impl TurtleSerializerWrapper {
    /// Serialize Triples to Turtle string
    ///
    /// Consecutive triples sharing a subject are folded with `;`, so callers
    /// should pass triples grouped by subject.
    pub fn serialize(triples: &[&Triple]) -> SerializeResult<String> {
        let mut formatter = TurtleFormatter::new(Vec::new());

        for triple in triples {
            formatter.format(&to_rio(triple))?;
        }

        let output = formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

/// N-Triples serializer
pub struct NTriplesSerializerWrapper;

impl NTriplesSerializerWrapper {
    /// Serialize Triples to N-Triples, one statement per line
    pub fn serialize(triples: &[&Triple]) -> SerializeResult<String> {
        let mut formatter = NTriplesFormatter::new(Vec::new());

        for triple in triples {
            formatter.format(&to_rio(triple))?;
        }

        let output = formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}
