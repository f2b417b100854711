//! Mapping specification: loading and compilation
//!
//! The specification document describes, per DCAT class, which record
//! fields become which statements. It is read once (JSON or YAML), then
//! compiled into a [`MappingSpec`]: every `namespace`/`property` pair is
//! resolved to an IRI and every rule `type` string becomes a [`ValueKind`].
//! Builders only ever see the compiled form.

use super::record::Record;
use crate::rdf::{Literal, NamedNode, NamespaceManager, PrefixError, RdfError, RdfPredicate};
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

/// Class table keys the builders rely on
pub mod classes {
    pub const DATASET: &str = "dataset";
    pub const CATALOG_RECORD: &str = "catalogRecord";
    pub const CONTACT_POINT: &str = "contactPoint";
    pub const TEMPORAL: &str = "temporal";
    pub const LEGAL_BASES: &str = "legalBases";
    pub const DISTRIBUTION: &str = "distribution";
    pub const CHECKSUM: &str = "checksum";
    pub const CATALOG: &str = "catalog";

    /// Classes that must be present in every specification
    pub const REQUIRED: [&str; 8] = [
        DATASET,
        CATALOG_RECORD,
        CONTACT_POINT,
        TEMPORAL,
        LEGAL_BASES,
        DISTRIBUTION,
        CHECKSUM,
        CATALOG,
    ];

    /// Classes always attached to a parent node
    pub const CHILDREN: [&str; 5] = [CONTACT_POINT, TEMPORAL, LEGAL_BASES, DISTRIBUTION, CHECKSUM];
}

/// Specification (configuration) errors
#[derive(Error, Debug)]
pub enum SpecError {
    /// Reading the document failed
    #[error("Failed to read specification: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("Malformed specification: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML document
    #[error("Malformed specification: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Unknown prefix or bad namespace IRI
    #[error(transparent)]
    Prefix(#[from] PrefixError),

    /// An IRI or language tag in the document is not valid RDF
    #[error(transparent)]
    Rdf(#[from] RdfError),

    /// A required class descriptor is missing
    #[error("Missing class descriptor: {0}")]
    MissingClass(String),

    /// A class used as a child has no attach predicate
    #[error("Class '{0}' is attached to a parent but declares no namespace/property")]
    MissingAttachPredicate(String),

    /// A required key is missing
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// A template without a placeholder
    #[error("Template has no '{{}}' placeholder: {0}")]
    InvalidTemplate(String),
}

pub type SpecResult<T> = Result<T, SpecError>;

// ---------------------------------------------------------------------------
// Document (as written on disk)
// ---------------------------------------------------------------------------

/// Specification document, as deserialized
#[derive(Debug, Clone, Deserialize)]
pub struct SpecDocument {
    /// Prefix → base IRI
    #[serde(default)]
    pub namespaces: IndexMap<String, String>,

    /// Object of `rdfs:isDefinedBy` for referenced vocabulary terms
    pub vocabularies: String,

    /// Language code → RDF language tag
    #[serde(default)]
    pub language_map: IndexMap<String, String>,

    pub templates: TemplatesDocument,

    #[serde(default)]
    pub alternate_identifier_predicates: Option<AlternatePredicatesDocument>,

    /// Class of catalog stub nodes (defaults to the dataset class)
    #[serde(default)]
    pub stub_class: Option<ClassRef>,

    /// Static record describing the catalog itself
    pub catalog_data: Record,

    /// Class table
    pub rdf: ClassTableDocument,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesDocument {
    pub identifier: String,
    pub dataset_definition: String,
    #[serde(default)]
    pub alternate_identifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternatePredicatesDocument {
    pub check: PropertyRef,
    pub emit: PropertyRef,
}

/// A `namespace` + `property` pair
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRef {
    pub namespace: String,
    pub property: String,
}

/// A `namespace` + `name` pair naming a class
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRef {
    pub namespace: String,
    pub name: String,
    /// Optional defining document of the class
    #[serde(default)]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassTableDocument {
    #[serde(rename = "_exclusions", default)]
    pub exclusions: Vec<String>,

    #[serde(flatten)]
    pub classes: IndexMap<String, ClassDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDocument {
    pub class: ClassRef,

    /// Attach predicate namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Attach predicate local name
    #[serde(default)]
    pub property: Option<String>,

    /// Record field → rule
    #[serde(flatten)]
    pub rules: IndexMap<String, RuleDocument>,
}

/// One property rule, tagged by its `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleDocument {
    Literal {
        namespace: String,
        property: String,
        #[serde(default)]
        prefix: String,
    },
    Number {
        namespace: String,
        property: String,
    },
    Datetime {
        namespace: String,
        property: String,
        #[serde(default)]
        prefix: String,
    },
    #[serde(alias = "uri")]
    Identifier {
        namespace: String,
        property: String,
        #[serde(default)]
        prefix: String,
    },
    Resource {
        namespace: String,
        property: String,
        #[serde(default)]
        prefix: String,
        class: ClassRef,
    },
    Boolean {
        namespace: String,
        property: String,
        class: ClassRef,
    },
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// How a record field turns into statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain or language-tagged literal
    Literal { prefix: String },
    /// `xsd:decimal` literal
    Number,
    /// `xsd:dateTime` literal
    Datetime { prefix: String },
    /// Reference to another node
    Identifier { prefix: String },
    /// Reference to a controlled vocabulary term
    Resource { prefix: String, vocabulary: NamedNode },
    /// Membership in a class when the value is true
    Boolean { class: NamedNode },
}

/// One compiled property rule
#[derive(Debug, Clone)]
pub struct PropertyMapping {
    /// Record field the value is read from
    pub field: String,
    pub predicate: RdfPredicate,
    pub kind: ValueKind,
}

/// One compiled class descriptor
#[derive(Debug, Clone)]
pub struct ClassMapping {
    /// Key in the class table
    pub name: String,
    /// Class IRI used for the `rdf:type` statement
    pub class: NamedNode,
    /// Defining document, if configured
    pub definition: Option<NamedNode>,
    /// Predicate linking a parent node to this class's node
    pub attach: Option<RdfPredicate>,
    pub properties: Vec<PropertyMapping>,
}

impl ClassMapping {
    /// True if at least one mapped field holds a value in the record
    pub fn has_any_field(&self, record: &Record) -> bool {
        self.properties
            .iter()
            .any(|p| record.get(&p.field).map_or(false, |v| !v.is_null()))
    }
}

/// Format string with a single `{}` (or `{0}`) placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{0?\}").expect("placeholder pattern is valid"))
}

impl Template {
    /// Parse a template, rejecting templates without a placeholder
    pub fn parse(template: &str) -> SpecResult<Self> {
        if !placeholder().is_match(template) {
            return Err(SpecError::InvalidTemplate(template.to_string()));
        }
        Ok(Self(template.to_string()))
    }

    /// Substitute the value into every placeholder
    pub fn format(&self, value: &str) -> String {
        placeholder()
            .replace_all(&self.0, regex::NoExpand(value))
            .into_owned()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Predicates and IRIs the builders emit directly
#[derive(Debug, Clone)]
pub struct CoreTerms {
    pub rdf_type: RdfPredicate,
    pub is_defined_by: RdfPredicate,
    pub primary_topic: RdfPredicate,
    pub has_dataset: RdfPredicate,
    /// Predicate whose presence suppresses a fallback alternate identifier
    pub alternate_check: RdfPredicate,
    /// Predicate used for fallback alternate identifiers
    pub alternate_emit: RdfPredicate,
    /// Defining document of vocabulary terms
    pub vocabularies: NamedNode,
    /// Class of catalog stub nodes
    pub stub_class: NamedNode,
}

/// Compiled, immutable mapping specification.
///
/// Owned by the caller; share it across threads behind an `Arc` if needed.
#[derive(Debug, Clone)]
pub struct MappingSpec {
    namespaces: NamespaceManager,
    terms: CoreTerms,
    language_map: IndexMap<String, String>,
    identifier: Template,
    dataset_definition: Template,
    alternate_identifiers: Vec<Template>,
    exclusions: IndexSet<String>,
    classes: IndexMap<String, ClassMapping>,
    catalog_node: NamedNode,
    catalog_data: Record,
}

impl MappingSpec {
    /// Load a specification from a JSON string
    pub fn from_json_str(input: &str) -> SpecResult<Self> {
        let document: SpecDocument = serde_json::from_str(input)?;
        Self::compile(document)
    }

    /// Load a specification from a YAML string
    pub fn from_yaml_str(input: &str) -> SpecResult<Self> {
        let document: SpecDocument = serde_yaml::from_str(input)?;
        Self::compile(document)
    }

    /// Load a specification file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        debug!("Read specification from {:?}", path);

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    /// Compile a deserialized document
    pub fn compile(document: SpecDocument) -> SpecResult<Self> {
        let namespaces = NamespaceManager::with_bindings(&document.namespaces)?;

        for tag in document.language_map.values() {
            Literal::new_language_tagged_literal("", tag.as_str())?;
        }

        let mut class_table = IndexMap::new();
        for (name, class_doc) in &document.rdf.classes {
            class_table.insert(name.clone(), compile_class(&namespaces, name, class_doc)?);
        }

        for name in classes::REQUIRED {
            if !class_table.contains_key(name) {
                return Err(SpecError::MissingClass(name.to_string()));
            }
        }
        for name in classes::CHILDREN {
            if class_table[name].attach.is_none() {
                return Err(SpecError::MissingAttachPredicate(name.to_string()));
            }
        }

        let resolve = |prefix: &str, local: &str| -> SpecResult<RdfPredicate> {
            Ok(namespaces.resolve(prefix, local)?.into())
        };

        let (alternate_check, alternate_emit) = match &document.alternate_identifier_predicates {
            Some(preds) => (
                resolve(&preds.check.namespace, &preds.check.property)?,
                resolve(&preds.emit.namespace, &preds.emit.property)?,
            ),
            None => (resolve("DONL", "identifier")?, resolve("ADMS", "identifier")?),
        };

        let stub_class = match &document.stub_class {
            Some(class) => namespaces.resolve(&class.namespace, &class.name)?,
            None => class_table[classes::DATASET].class.clone(),
        };

        let terms = CoreTerms {
            rdf_type: resolve("RDF", "type")?,
            is_defined_by: resolve("RDFS", "isDefinedBy")?,
            primary_topic: resolve("FOAF", "primaryTopic")?,
            has_dataset: resolve("DCAT", "dataset")?,
            alternate_check,
            alternate_emit,
            vocabularies: NamedNode::new(&document.vocabularies)?,
            stub_class,
        };

        let catalog_identifier = document
            .catalog_data
            .get("identifier")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SpecError::MissingKey("catalog_data.identifier".to_string()))?;
        let catalog_node = NamedNode::new(catalog_identifier)?;

        let alternate_identifiers = document
            .templates
            .alternate_identifiers
            .iter()
            .map(|t| Template::parse(t))
            .collect::<SpecResult<Vec<_>>>()?;

        let spec = Self {
            terms,
            language_map: document.language_map,
            identifier: Template::parse(&document.templates.identifier)?,
            dataset_definition: Template::parse(&document.templates.dataset_definition)?,
            alternate_identifiers,
            exclusions: document.rdf.exclusions.into_iter().collect(),
            classes: class_table,
            catalog_node,
            catalog_data: document.catalog_data,
            namespaces,
        };

        info!(
            "Compiled mapping specification: {} classes, {} namespaces, {} exclusions",
            spec.classes.len(),
            spec.namespaces.prefixes().len(),
            spec.exclusions.len()
        );

        Ok(spec)
    }

    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    pub fn terms(&self) -> &CoreTerms {
        &self.terms
    }

    /// Look up a class descriptor
    pub fn class(&self, name: &str) -> SpecResult<&ClassMapping> {
        self.classes
            .get(name)
            .ok_or_else(|| SpecError::MissingClass(name.to_string()))
    }

    /// True if the field must never be mapped
    pub fn is_excluded(&self, field: &str) -> bool {
        self.exclusions.contains(field)
    }

    /// RDF language tag for a language code
    pub fn language_tag(&self, code: &str) -> Option<&str> {
        self.language_map.get(code).map(|s| s.as_str())
    }

    pub fn identifier_template(&self) -> &Template {
        &self.identifier
    }

    pub fn dataset_definition_template(&self) -> &Template {
        &self.dataset_definition
    }

    pub fn alternate_identifier_templates(&self) -> &[Template] {
        &self.alternate_identifiers
    }

    /// IRI of the catalog node
    pub fn catalog_node(&self) -> &NamedNode {
        &self.catalog_node
    }

    /// Static catalog record
    pub fn catalog_data(&self) -> &Record {
        &self.catalog_data
    }
}

fn compile_class(
    namespaces: &NamespaceManager,
    name: &str,
    doc: &ClassDocument,
) -> SpecResult<ClassMapping> {
    let class = namespaces.resolve(&doc.class.namespace, &doc.class.name)?;
    let definition = doc
        .class
        .definition
        .as_deref()
        .map(NamedNode::new)
        .transpose()?;

    let attach = match (&doc.namespace, &doc.property) {
        (Some(ns), Some(prop)) => Some(namespaces.resolve(ns, prop)?.into()),
        (None, None) => None,
        (Some(_), None) => return Err(SpecError::MissingKey(format!("rdf.{}.property", name))),
        (None, Some(_)) => return Err(SpecError::MissingKey(format!("rdf.{}.namespace", name))),
    };

    let properties = doc
        .rules
        .iter()
        .map(|(field, rule)| compile_rule(namespaces, field, rule))
        .collect::<SpecResult<Vec<_>>>()?;

    debug!("Compiled class '{}' with {} rules", name, properties.len());

    Ok(ClassMapping {
        name: name.to_string(),
        class,
        definition,
        attach,
        properties,
    })
}

fn compile_rule(
    namespaces: &NamespaceManager,
    field: &str,
    rule: &RuleDocument,
) -> SpecResult<PropertyMapping> {
    let (namespace, property, kind) = match rule {
        RuleDocument::Literal {
            namespace,
            property,
            prefix,
        } => (namespace, property, ValueKind::Literal { prefix: prefix.clone() }),
        RuleDocument::Number {
            namespace,
            property,
        } => (namespace, property, ValueKind::Number),
        RuleDocument::Datetime {
            namespace,
            property,
            prefix,
        } => (namespace, property, ValueKind::Datetime { prefix: prefix.clone() }),
        RuleDocument::Identifier {
            namespace,
            property,
            prefix,
        } => (namespace, property, ValueKind::Identifier { prefix: prefix.clone() }),
        RuleDocument::Resource {
            namespace,
            property,
            prefix,
            class,
        } => (
            namespace,
            property,
            ValueKind::Resource {
                prefix: prefix.clone(),
                vocabulary: namespaces.resolve(&class.namespace, &class.name)?,
            },
        ),
        RuleDocument::Boolean {
            namespace,
            property,
            class,
        } => (
            namespace,
            property,
            ValueKind::Boolean {
                class: namespaces.resolve(&class.namespace, &class.name)?,
            },
        ),
    };

    Ok(PropertyMapping {
        field: field.to_string(),
        predicate: namespaces.resolve(namespace, property)?.into(),
        kind,
    })
}
