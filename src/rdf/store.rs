//! In-memory RDF graph store
//!
//! A set of triples that remembers insertion order. One store is owned by
//! exactly one build; it is never shared mutably between builds.

use super::namespace::NamespaceManager;
use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use indexmap::{IndexMap, IndexSet};

/// Append-only RDF triple store
///
/// Triples are kept in an `IndexSet`, so membership tests are O(1) and
/// iteration follows first insertion. The namespace bindings travel with
/// the store so serializers can emit prefixes.
#[derive(Debug, Clone, Default)]
pub struct RdfStore {
    /// All triples (primary storage)
    triples: IndexSet<Triple>,

    /// Prefix bindings used when serializing
    namespaces: NamespaceManager,
}

impl RdfStore {
    /// Create a new empty RDF store with the well-known prefixes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty RDF store bound to the given namespaces
    pub fn with_namespaces(namespaces: NamespaceManager) -> Self {
        Self {
            triples: IndexSet::new(),
            namespaces,
        }
    }

    /// Namespace bindings of this store
    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// Insert a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Add a triple from its parts
    pub fn add(
        &mut self,
        subject: impl Into<RdfSubject>,
        predicate: impl Into<RdfPredicate>,
        object: impl Into<RdfObject>,
    ) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Query triples matching a pattern
    pub fn query(&self, pattern: &TriplePattern) -> Vec<&Triple> {
        self.triples
            .iter()
            .filter(|triple| pattern.matches(triple))
            .collect()
    }

    /// Get triples with a specific subject
    pub fn get_triples_with_subject(&self, subject: &RdfSubject) -> Vec<&Triple> {
        self.triples
            .iter()
            .filter(|triple| &triple.subject == subject)
            .collect()
    }

    /// Get triples with a specific predicate
    pub fn get_triples_with_predicate(&self, predicate: &RdfPredicate) -> Vec<&Triple> {
        self.triples
            .iter()
            .filter(|triple| &triple.predicate == predicate)
            .collect()
    }

    /// Get an iterator over all triples, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects, in order of first appearance
    pub fn subjects(&self) -> Vec<&RdfSubject> {
        self.triples
            .iter()
            .map(|t| &t.subject)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Triples grouped by subject.
    ///
    /// Subjects appear in order of first appearance, and each subject's
    /// triples keep their insertion order.
    pub fn grouped_by_subject(&self) -> Vec<&Triple> {
        let mut groups: IndexMap<&RdfSubject, Vec<&Triple>> = IndexMap::new();
        for triple in &self.triples {
            groups.entry(&triple.subject).or_default().push(triple);
        }
        groups.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{BlankNode, Literal, NamedNode};

    fn title() -> RdfPredicate {
        RdfPredicate::new("http://purl.org/dc/terms/title").unwrap()
    }

    fn dataset(name: &str) -> NamedNode {
        NamedNode::new(&format!("https://data.example.org/dataset/{}", name)).unwrap()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut store = RdfStore::new();
        let triple = Triple::new(dataset("n1"), title(), Literal::new_simple_literal("A"));

        assert!(store.insert(triple.clone()));
        assert!(!store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&triple));
    }

    #[test]
    fn test_query_by_subject_and_predicate() {
        let mut store = RdfStore::new();
        let modified = RdfPredicate::new("http://purl.org/dc/terms/modified").unwrap();

        store.add(dataset("n1"), title(), Literal::new_simple_literal("A"));
        store.add(dataset("n1"), modified.clone(), Literal::date_time("2020-01-01T00:00:00"));
        store.add(dataset("n2"), title(), Literal::new_simple_literal("B"));

        assert_eq!(store.get_triples_with_subject(&dataset("n1").into()).len(), 2);
        assert_eq!(store.get_triples_with_predicate(&title()).len(), 2);
        assert_eq!(store.get_triples_with_predicate(&modified).len(), 1);

        let pattern = TriplePattern::new(Some(dataset("n2").into()), Some(title()), None);
        assert_eq!(store.query(&pattern).len(), 1);
    }

    #[test]
    fn test_grouped_by_subject_keeps_first_appearance_order() {
        let mut store = RdfStore::new();
        let contact = BlankNode::from_str("dataset.n1.contactPoint").unwrap();

        store.add(dataset("n1"), title(), Literal::new_simple_literal("A"));
        store.add(contact.clone(), title(), Literal::new_simple_literal("C"));
        store.add(dataset("n1"), title(), Literal::new_simple_literal("B"));

        let grouped = store.grouped_by_subject();
        let values: Vec<&str> = grouped
            .iter()
            .filter_map(|t| t.object.as_literal().map(|l| l.value()))
            .collect();
        assert_eq!(values, vec!["A", "B", "C"]);

        assert_eq!(store.subjects().len(), 2);
        assert!(store.subjects()[1].is_blank_node());
    }
}
