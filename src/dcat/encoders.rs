//! Value encoders
//!
//! Each encoder turns one raw record value into zero or more statements on
//! a target node. All of them are list-transparent: a list value is
//! encoded element by element, and null encodes to nothing.

use super::record::{is_true, lexical};
use super::spec::{CoreTerms, PropertyMapping, ValueKind};
use crate::rdf::{Literal, NamedNode, RdfPredicate, RdfStore, RdfSubject};
use serde_json::Value;
use tracing::warn;

/// Encoders bound to the core terms and the record's language tag
#[derive(Debug, Clone, Copy)]
pub struct ValueEncoder<'a> {
    terms: &'a CoreTerms,
    language: Option<&'a str>,
}

impl<'a> ValueEncoder<'a> {
    /// `language` is an RDF language tag applied to literal fields
    pub fn new(terms: &'a CoreTerms, language: Option<&'a str>) -> Self {
        Self { terms, language }
    }

    /// Encode a value according to a compiled rule.
    /// Returns the number of statements emitted.
    pub fn encode(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        mapping: &PropertyMapping,
        value: &Value,
    ) -> usize {
        let predicate = &mapping.predicate;
        match &mapping.kind {
            ValueKind::Literal { prefix } => self.literal(store, target, predicate, value, prefix),
            ValueKind::Number => self.number(store, target, predicate, value),
            ValueKind::Datetime { prefix } => self.datetime(store, target, predicate, value, prefix),
            ValueKind::Identifier { prefix } => {
                self.identifier(store, target, predicate, value, prefix)
            }
            ValueKind::Resource { prefix, vocabulary } => {
                self.resource(store, target, predicate, value, prefix, vocabulary)
            }
            ValueKind::Boolean { class } => self.boolean(store, target, predicate, value, class),
        }
    }

    /// Plain literal, language-tagged when a language is known
    pub fn literal(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
        prefix: &str,
    ) -> usize {
        each_scalar(value, &mut |scalar| {
            let text = format!("{}{}", prefix, scalar);
            let literal = match self.language {
                Some(tag) => Literal::new_language_tagged_literal(text.clone(), tag)
                    .unwrap_or_else(|e| {
                        warn!("Dropping language tag '{}': {}", tag, e);
                        Literal::new_simple_literal(text)
                    }),
                None => Literal::new_simple_literal(text),
            };
            store.add(target.clone(), predicate.clone(), literal);
            1
        })
    }

    /// `xsd:decimal` literal; prefixes do not apply
    pub fn number(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
    ) -> usize {
        each_scalar(value, &mut |scalar| {
            store.add(target.clone(), predicate.clone(), Literal::decimal(scalar));
            1
        })
    }

    /// `xsd:dateTime` literal
    pub fn datetime(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
        prefix: &str,
    ) -> usize {
        each_scalar(value, &mut |scalar| {
            let literal = Literal::date_time(format!("{}{}", prefix, scalar));
            store.add(target.clone(), predicate.clone(), literal);
            1
        })
    }

    /// Reference to the node named by `prefix + value`
    pub fn identifier(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
        prefix: &str,
    ) -> usize {
        each_scalar(value, &mut |scalar| match reference(prefix, &scalar) {
            Some(node) => {
                store.add(target.clone(), predicate.clone(), node);
                1
            }
            None => 0,
        })
    }

    /// Reference to a vocabulary term, which is also typed with the
    /// vocabulary class and tied to the vocabularies document
    pub fn resource(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
        prefix: &str,
        vocabulary: &NamedNode,
    ) -> usize {
        each_scalar(value, &mut |scalar| match reference(prefix, &scalar) {
            Some(node) => {
                store.add(target.clone(), predicate.clone(), node.clone());
                store.add(
                    node.clone(),
                    self.terms.is_defined_by.clone(),
                    self.terms.vocabularies.clone(),
                );
                store.add(node, self.terms.rdf_type.clone(), vocabulary.clone());
                3
            }
            None => 0,
        })
    }

    /// `target predicate class` when the value is true; false emits nothing
    pub fn boolean(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        predicate: &RdfPredicate,
        value: &Value,
        class: &NamedNode,
    ) -> usize {
        each_value(value, &mut |v| {
            if is_true(v) {
                store.add(target.clone(), predicate.clone(), class.clone());
                1
            } else {
                0
            }
        })
    }
}

fn reference(prefix: &str, value: &str) -> Option<NamedNode> {
    let iri = format!("{}{}", prefix, value);
    match NamedNode::new(&iri) {
        Ok(node) => Some(node),
        Err(e) => {
            warn!("Skipping invalid IRI '{}': {}", iri, e);
            None
        }
    }
}

/// Visit every non-list, non-null element of a value
fn each_value(value: &Value, f: &mut dyn FnMut(&Value) -> usize) -> usize {
    match value {
        Value::Array(items) => items.iter().map(|item| each_value(item, f)).sum(),
        Value::Null => 0,
        other => f(other),
    }
}

/// Visit the lexical form of every element that has one
fn each_scalar(value: &Value, f: &mut dyn FnMut(String) -> usize) -> usize {
    each_value(value, &mut |v| match lexical(v) {
        Some(text) => f(text),
        None => {
            warn!("Skipping value without a lexical form: {}", v);
            0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::namespace::{RDF, RDFS, XSD};
    use crate::rdf::{RdfObject, Triple};
    use serde_json::json;

    fn terms() -> CoreTerms {
        let p = |iri: &str| RdfPredicate::new(iri).unwrap();
        CoreTerms {
            rdf_type: p(&format!("{}type", RDF)),
            is_defined_by: p(&format!("{}isDefinedBy", RDFS)),
            primary_topic: p("http://xmlns.com/foaf/0.1/primaryTopic"),
            has_dataset: p("http://www.w3.org/ns/dcat#dataset"),
            alternate_check: p("https://data.example.org/ns/donl#identifier"),
            alternate_emit: p("http://www.w3.org/ns/adms#identifier"),
            vocabularies: NamedNode::new("https://data.example.org/vocabularies.rdf").unwrap(),
            stub_class: NamedNode::new("http://www.w3.org/ns/dcat#Dataset").unwrap(),
        }
    }

    fn target() -> RdfSubject {
        NamedNode::new("https://data.example.org/dataset/n1").unwrap().into()
    }

    fn predicate(local: &str) -> RdfPredicate {
        RdfPredicate::new(&format!("http://purl.org/dc/terms/{}", local)).unwrap()
    }

    fn literals(store: &RdfStore) -> Vec<&Literal> {
        store.iter().filter_map(|t| t.object.as_literal()).collect()
    }

    #[test]
    fn test_literal_with_language_and_prefix() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, Some("nl-NL"));
        let mut store = RdfStore::new();

        let n = encoder.literal(&mut store, &target(), &predicate("title"), &json!("Titel"), "T: ");
        assert_eq!(n, 1);

        let literal = literals(&store)[0];
        assert_eq!(literal.value(), "T: Titel");
        assert!(literal.language().unwrap().eq_ignore_ascii_case("nl-NL"));
    }

    #[test]
    fn test_literal_is_list_transparent() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, None);
        let mut store = RdfStore::new();

        let n = encoder.literal(
            &mut store,
            &target(),
            &predicate("keyword"),
            &json!(["a", { "display_name": "b" }, null, ["c"]]),
            "",
        );
        assert_eq!(n, 3);

        let values: Vec<&str> = literals(&store).iter().map(|l| l.value()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert!(literals(&store).iter().all(|l| l.is_plain()));
    }

    #[test]
    fn test_number_and_datetime_datatypes() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, Some("en"));
        let mut store = RdfStore::new();

        encoder.number(&mut store, &target(), &predicate("byteSize"), &json!(1024));
        encoder.datetime(
            &mut store,
            &target(),
            &predicate("modified"),
            &json!("2020-01-01T00:00:00"),
            "",
        );

        let literals = literals(&store);
        assert_eq!(literals[0].value(), "1024");
        assert_eq!(literals[0].datatype_iri(), format!("{}decimal", XSD));
        assert_eq!(literals[1].datatype_iri(), format!("{}dateTime", XSD));
        assert!(literals.iter().all(|l| l.language().is_none()));
    }

    #[test]
    fn test_identifier_skips_invalid_iris() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, None);
        let mut store = RdfStore::new();

        let n = encoder.identifier(
            &mut store,
            &target(),
            &predicate("source"),
            &json!(["https://a.example.org/1", "not an iri"]),
            "",
        );
        assert_eq!(n, 1);
        assert_eq!(store.len(), 1);
        assert!(store.iter().all(|t| t.object.is_named_node()));
    }

    #[test]
    fn test_resource_types_the_term() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, None);
        let mut store = RdfStore::new();
        let taxonomy = NamedNode::new("https://data.example.org/ns/donl#Taxonomy").unwrap();

        encoder.resource(
            &mut store,
            &target(),
            &predicate("theme"),
            &json!("economy"),
            "http://standaarden.overheid.nl/owms/terms/",
            &taxonomy,
        );

        let term = NamedNode::new("http://standaarden.overheid.nl/owms/terms/economy").unwrap();
        assert!(store.contains(&Triple::new(target(), predicate("theme"), term.clone())));
        assert!(store.contains(&Triple::new(
            term.clone(),
            terms.is_defined_by.clone(),
            terms.vocabularies.clone()
        )));
        assert!(store.contains(&Triple::new(term, terms.rdf_type.clone(), taxonomy)));
    }

    #[test]
    fn test_boolean_accepts_true_variants_only() {
        let terms = terms();
        let encoder = ValueEncoder::new(&terms, None);
        let class = NamedNode::new("https://data.example.org/ns/donl#HighValue").unwrap();
        let high_value = predicate("type");

        for value in [json!(true), json!("true"), json!("True")] {
            let mut store = RdfStore::new();
            assert_eq!(encoder.boolean(&mut store, &target(), &high_value, &value, &class), 1);
            let triple = store.iter().next().unwrap();
            assert_eq!(triple.predicate, high_value);
            assert_eq!(triple.object, RdfObject::NamedNode(class.clone()));
        }

        for value in [json!(false), json!("false"), json!("yes"), json!(null)] {
            let mut store = RdfStore::new();
            assert_eq!(encoder.boolean(&mut store, &target(), &high_value, &value, &class), 0);
            assert!(store.is_empty());
        }
    }
}
