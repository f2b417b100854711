//! Class processing: one record against one class descriptor

use super::encoders::ValueEncoder;
use super::record::{self, Record, METADATA_LANGUAGE};
use super::spec::{ClassMapping, MappingSpec, SpecError};
use super::BuildResult;
use crate::rdf::{RdfStore, RdfSubject};
use tracing::{debug, warn};

/// Applies class descriptors to records
#[derive(Debug, Clone, Copy)]
pub struct ClassProcessor<'a> {
    spec: &'a MappingSpec,
    fallback_language: Option<&'a str>,
}

impl<'a> ClassProcessor<'a> {
    pub fn new(spec: &'a MappingSpec) -> Self {
        Self {
            spec,
            fallback_language: None,
        }
    }

    /// Language code used for records without their own `metadata_language`
    pub fn with_fallback_language(mut self, code: Option<&'a str>) -> Self {
        self.fallback_language = code;
        self
    }

    /// Emit the statements for `record` under `class` on `target`.
    ///
    /// Unless `allow_empty` is set, nothing is emitted when none of the
    /// class's mapped fields are present. Otherwise the node is typed, every
    /// non-excluded present field is encoded, and, with a parent, the parent
    /// is linked to the node through the class's attach predicate.
    ///
    /// Returns whether the class was emitted.
    pub fn process(
        &self,
        store: &mut RdfStore,
        target: &RdfSubject,
        class: &ClassMapping,
        record: &Record,
        parent: Option<&RdfSubject>,
        allow_empty: bool,
    ) -> BuildResult<bool> {
        if !allow_empty && !class.has_any_field(record) {
            debug!("Skipping class '{}' for {}: no mapped fields", class.name, target);
            return Ok(false);
        }

        let attach = match parent {
            Some(parent) => {
                let predicate = class
                    .attach
                    .as_ref()
                    .ok_or_else(|| SpecError::MissingAttachPredicate(class.name.clone()))?;
                Some((parent, predicate))
            }
            None => None,
        };

        let terms = self.spec.terms();
        store.add(target.clone(), terms.rdf_type.clone(), class.class.clone());

        let encoder = ValueEncoder::new(terms, self.language_tag(record));
        let mut emitted = 0;
        for mapping in &class.properties {
            if self.spec.is_excluded(&mapping.field) {
                continue;
            }
            if let Some(value) = record::value(record, &mapping.field) {
                emitted += encoder.encode(store, target, mapping, value);
            }
        }

        if let Some((parent, predicate)) = attach {
            store.add(parent.clone(), predicate.clone(), target.clone());
        }

        debug!(
            "Processed class '{}' for {}: {} property statements",
            class.name, target, emitted
        );
        Ok(true)
    }

    fn language_tag<'r>(&'r self, record: &'r Record) -> Option<&'r str> {
        let code = record::text(record, METADATA_LANGUAGE).or(self.fallback_language)?;
        let tag = self.spec.language_tag(code);
        if tag.is_none() {
            warn!("No language tag for code '{}', writing plain literals", code);
        }
        tag
    }
}
