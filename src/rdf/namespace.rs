//! RDF namespace and prefix management
//!
//! Prefix lookups are case-insensitive: `DCAT:Dataset` and `dcat:Dataset`
//! resolve to the same IRI. Registered prefixes keep their registration
//! order so serializers emit them deterministically.

use super::types::NamedNode;
use indexmap::IndexMap;
use oxiri::Iri;
use thiserror::Error;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DCAT: &str = "http://www.w3.org/ns/dcat#";
pub const DCT: &str = "http://purl.org/dc/terms/";
pub const ADMS: &str = "http://www.w3.org/ns/adms#";

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }
}

/// Namespace registry with the vocabularies every DCAT graph needs.
///
/// Built once, then only read. Cloning is cheap enough to hand a copy to
/// each build thread, or share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Lowercased prefix → IRI mappings
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a new namespace manager with the well-known prefixes
    pub fn new() -> Self {
        let mut prefixes = IndexMap::new();
        for (prefix, iri) in [
            ("rdf", RDF),
            ("rdfs", RDFS),
            ("xsd", XSD),
            ("foaf", FOAF),
            ("dcat", DCAT),
            ("dct", DCT),
            ("adms", ADMS),
        ] {
            prefixes.insert(prefix.to_string(), iri.to_string());
        }

        Self { prefixes }
    }

    /// Create a manager from well-known prefixes plus the given bindings.
    /// A binding for an existing prefix replaces it.
    pub fn with_bindings<'a, I>(bindings: I) -> PrefixResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut mgr = Self::new();
        for (prefix, iri) in bindings {
            mgr.add_prefix(prefix, iri)?;
        }
        Ok(mgr)
    }

    /// Add a prefix. The IRI must be absolute.
    pub fn add_prefix(&mut self, prefix: &str, iri: &str) -> PrefixResult<()> {
        Iri::parse(iri).map_err(|e| PrefixError::InvalidIri(format!("{}: {}", iri, e)))?;
        self.prefixes.insert(prefix.to_ascii_lowercase(), iri.to_string());
        Ok(())
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(&prefix.to_ascii_lowercase())
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Resolve `(prefix, local name)` to a full IRI node
    pub fn resolve(&self, prefix: &str, local: &str) -> PrefixResult<NamedNode> {
        let iri = format!("{}{}", self.get_iri(prefix)?, local);
        NamedNode::new(&iri).map_err(|e| PrefixError::InvalidIri(e.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        match compact_iri.split_once(':') {
            Some((prefix, local)) => Ok(format!("{}{}", self.get_iri(prefix)?, local)),
            None => Err(PrefixError::InvalidIri(compact_iri.to_string())),
        }
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }

    /// Get all registered prefixes, in registration order
    pub fn prefixes(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefixes() {
        let mgr = NamespaceManager::new();

        assert_eq!(mgr.get_iri("rdf").unwrap(), RDF);
        assert_eq!(mgr.get_iri("RDFS").unwrap(), RDFS);
        assert_eq!(mgr.get_iri("dcat").unwrap(), DCAT);
    }

    #[test]
    fn test_resolve() {
        let mgr = NamespaceManager::new();

        let node = mgr.resolve("DCAT", "Dataset").unwrap();
        assert_eq!(node.as_str(), "http://www.w3.org/ns/dcat#Dataset");

        let node = mgr.resolve("foaf", "primaryTopic").unwrap();
        assert_eq!(node.as_str(), "http://xmlns.com/foaf/0.1/primaryTopic");
    }

    #[test]
    fn test_unknown_prefix() {
        let mgr = NamespaceManager::new();

        match mgr.resolve("DONL", "identifier") {
            Err(PrefixError::UnknownPrefix(p)) => assert_eq!(p, "DONL"),
            other => panic!("expected unknown prefix, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_bindings() {
        let bindings: IndexMap<String, String> = [
            ("DONL".to_string(), "https://data.overheid.nl/ns/donl#".to_string()),
            ("dct".to_string(), "http://purl.org/dc/terms/".to_string()),
        ]
        .into_iter()
        .collect();

        let mgr = NamespaceManager::with_bindings(&bindings).unwrap();
        let expanded = mgr.expand("donl:identifier").unwrap();
        assert_eq!(expanded, "https://data.overheid.nl/ns/donl#identifier");

        // Overriding keeps a single entry
        assert_eq!(
            mgr.prefixes().iter().filter(|ns| ns.prefix == "dct").count(),
            1
        );
    }

    #[test]
    fn test_invalid_base_iri() {
        let mut mgr = NamespaceManager::new();
        assert!(matches!(
            mgr.add_prefix("ex", "not a base"),
            Err(PrefixError::InvalidIri(_))
        ));
    }

    #[test]
    fn test_compact() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("ex", "http://example.org/").unwrap();
        mgr.add_prefix("exv", "http://example.org/vocab/").unwrap();

        assert_eq!(
            mgr.compact("http://www.w3.org/ns/dcat#Distribution"),
            Some("dcat:Distribution".to_string())
        );
        assert_eq!(
            mgr.compact("http://example.org/vocab/term"),
            Some("exv:term".to_string())
        );
        assert_eq!(mgr.compact("urn:nothing"), None);
    }
}
