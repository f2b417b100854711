//! JSON-LD output (flattened, with a prefix context)

use super::{SerializeError, SerializeResult};
use crate::rdf::namespace::RDF;
use crate::rdf::{NamespaceManager, RdfObject, RdfSubject, Triple};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// JSON-LD serializer
pub struct JsonLdSerializerWrapper;

impl JsonLdSerializerWrapper {
    /// Serialize Triples to a flattened JSON-LD document.
    ///
    /// Every registered prefix goes into `@context`; predicates, `@type`
    /// values and datatypes are written as compact IRIs where a prefix
    /// matches. `rdf:type` statements with IRI objects become `@type`.
    pub fn serialize(triples: &[&Triple], namespaces: &NamespaceManager) -> SerializeResult<String> {
        let rdf_type = format!("{}type", RDF);
        let compact = |iri: &str| namespaces.compact(iri).unwrap_or_else(|| iri.to_string());

        let mut nodes: IndexMap<String, Map<String, Value>> = IndexMap::new();

        for triple in triples {
            let id = match &triple.subject {
                RdfSubject::NamedNode(n) => n.as_str().to_string(),
                RdfSubject::BlankNode(b) => b.to_string(),
            };
            let node = nodes.entry(id.clone()).or_insert_with(|| {
                let mut node = Map::new();
                node.insert("@id".to_string(), Value::String(id));
                node
            });

            if triple.predicate.as_str() == rdf_type {
                if let RdfObject::NamedNode(class) = &triple.object {
                    push(node, "@type", Value::String(compact(class.as_str())));
                    continue;
                }
            }

            let value = match &triple.object {
                RdfObject::NamedNode(n) => json!({ "@id": n.as_str() }),
                RdfObject::BlankNode(b) => json!({ "@id": b.to_string() }),
                RdfObject::Literal(l) => {
                    if let Some(lang) = l.language() {
                        json!({ "@value": l.value(), "@language": lang })
                    } else if l.is_plain() {
                        json!({ "@value": l.value() })
                    } else {
                        json!({ "@value": l.value(), "@type": compact(l.datatype_iri()) })
                    }
                }
            };
            push(node, &compact(triple.predicate.as_str()), value);
        }

        let context: Map<String, Value> = namespaces
            .prefixes()
            .into_iter()
            .map(|ns| (ns.prefix, Value::String(ns.iri)))
            .collect();

        let document = json!({
            "@context": context,
            "@graph": nodes.into_values().map(Value::Object).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&document).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn push(node: &mut Map<String, Value>, key: &str, value: Value) {
    match node
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(values) => values.push(value),
        other => *other = Value::Array(vec![other.take(), value]),
    }
}
