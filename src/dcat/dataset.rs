//! Dataset graphs: one record as a dataset with its catalog record,
//! sub-entities and distributions

use super::processor::ClassProcessor;
use super::record::{self, Record, METADATA_LANGUAGE};
use super::spec::{classes, MappingSpec};
use super::{BuildError, BuildResult};
use crate::rdf::{BlankNode, NamedNode, RdfSerializer, RdfStore, RdfSubject, Triple};
use rayon::prelude::*;
use tracing::{info, warn};

/// Sub-entities attached directly to the dataset node
const SUB_ENTITIES: [&str; 3] = [
    classes::CONTACT_POINT,
    classes::TEMPORAL,
    classes::LEGAL_BASES,
];

/// Build the graph of a single dataset record.
///
/// The record must carry a `name` (dataset identity) and an `id`
/// (catalog record identity). Every other field is optional.
pub fn build_dataset_graph(spec: &MappingSpec, record: &Record) -> BuildResult<RdfStore> {
    let name = record::text(record, "name").ok_or(BuildError::MissingField("name"))?;
    let id = record::text(record, "id").ok_or(BuildError::MissingField("id"))?;

    let terms = spec.terms();
    let identifier = spec.identifier_template();
    let definition = spec.dataset_definition_template();
    let processor = ClassProcessor::new(spec);
    let mut store = RdfStore::with_namespaces(spec.namespaces().clone());

    // Dataset, identified by name
    let dataset: RdfSubject = NamedNode::new(&identifier.format(name))?.into();
    for key in [name, id] {
        let defined_by = NamedNode::new(&identifier.format(key))?;
        store.add(dataset.clone(), terms.is_defined_by.clone(), defined_by);
    }
    processor.process(
        &mut store,
        &dataset,
        spec.class(classes::DATASET)?,
        record,
        None,
        true,
    )?;

    // Catalog record, identified by id
    let catalog_record: RdfSubject = NamedNode::new(&identifier.format(id))?.into();
    for key in [name, id] {
        let defined_by = NamedNode::new(&definition.format(key))?;
        store.add(catalog_record.clone(), terms.is_defined_by.clone(), defined_by);
    }
    store.add(
        catalog_record.clone(),
        terms.primary_topic.clone(),
        dataset.clone(),
    );
    processor.process(
        &mut store,
        &catalog_record,
        spec.class(classes::CATALOG_RECORD)?,
        record,
        None,
        false,
    )?;

    for role in SUB_ENTITIES {
        let node: RdfSubject = BlankNode::from_composite_key(&["dataset", name, role])?.into();
        processor.process(
            &mut store,
            &node,
            spec.class(role)?,
            record,
            Some(&dataset),
            false,
        )?;
    }

    let resource_processor = processor.with_fallback_language(record::text(record, METADATA_LANGUAGE));
    let resources = record::resources(record);
    for &(index, resource) in &resources {
        let position = (index + 1).to_string();
        let distribution: RdfSubject =
            BlankNode::from_composite_key(&["dataset", name, "distribution", position.as_str()])?
                .into();
        let checksum: RdfSubject = BlankNode::from_composite_key(&[
            "dataset",
            name,
            "distribution",
            position.as_str(),
            "checksum",
        ])?
        .into();

        resource_processor.process(
            &mut store,
            &checksum,
            spec.class(classes::CHECKSUM)?,
            resource,
            Some(&distribution),
            false,
        )?;
        let emitted = resource_processor.process(
            &mut store,
            &distribution,
            spec.class(classes::DISTRIBUTION)?,
            resource,
            Some(&dataset),
            false,
        )?;
        if emitted {
            for key in [name, id] {
                let defined_by = NamedNode::new(&definition.format(key))?;
                store.add(distribution.clone(), terms.is_defined_by.clone(), defined_by);
            }
        }
    }

    add_fallback_alternate_identifiers(spec, &mut store, &dataset, id, name);

    info!(
        "Built dataset graph for '{}': {} statements, {} distributions",
        name,
        store.len(),
        resources.len()
    );

    Ok(store)
}

/// Add the configured alternate identifiers, formatted with the id and
/// with the name, unless the dataset already declares them.
///
/// An identifier counts as declared when the dataset has it under either
/// the check predicate or the emit predicate, so repeated calls add
/// nothing. Returns the number of statements added.
pub fn add_fallback_alternate_identifiers(
    spec: &MappingSpec,
    store: &mut RdfStore,
    dataset: &RdfSubject,
    id: &str,
    name: &str,
) -> usize {
    let terms = spec.terms();
    let mut added = 0;

    for template in spec.alternate_identifier_templates() {
        for key in [id, name] {
            let iri = template.format(key);
            let node = match NamedNode::new(&iri) {
                Ok(node) => node,
                Err(e) => {
                    warn!("Skipping alternate identifier '{}': {}", iri, e);
                    continue;
                }
            };

            let declared = Triple::new(dataset.clone(), terms.alternate_check.clone(), node.clone());
            let fallback = Triple::new(dataset.clone(), terms.alternate_emit.clone(), node);
            if store.contains(&declared) || store.contains(&fallback) {
                continue;
            }

            store.insert(fallback);
            added += 1;
        }
    }

    added
}

/// Build many dataset graphs in parallel, one store per record.
/// Results come back in record order.
pub fn build_dataset_graphs(spec: &MappingSpec, records: &[Record]) -> Vec<BuildResult<RdfStore>> {
    records
        .par_iter()
        .map(|record| build_dataset_graph(spec, record))
        .collect()
}

/// Build a dataset graph and serialize it in the requested output syntax
pub fn dataset_as_rdf(spec: &MappingSpec, record: &Record, output: &str) -> BuildResult<String> {
    let store = build_dataset_graph(spec, record)?;
    Ok(RdfSerializer::serialize_output(&store, output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{RdfObject, TriplePattern};
    use serde_json::{json, Value};

    fn spec() -> MappingSpec {
        MappingSpec::from_json_str(include_str!("../../config/dcat.json")).unwrap()
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn dataset(spec: &MappingSpec, name: &str) -> RdfSubject {
        NamedNode::new(&spec.identifier_template().format(name))
            .unwrap()
            .into()
    }

    #[test]
    fn test_identity_fields_are_required() {
        let spec = spec();
        assert!(matches!(
            build_dataset_graph(&spec, &record(json!({ "id": "i1" }))),
            Err(BuildError::MissingField("name"))
        ));
        assert!(matches!(
            build_dataset_graph(&spec, &record(json!({ "name": "n1" }))),
            Err(BuildError::MissingField("id"))
        ));
    }

    #[test]
    fn test_minimal_record() {
        let spec = spec();
        let store = build_dataset_graph(&spec, &record(json!({ "name": "n1", "id": "i1" }))).unwrap();

        let n1 = dataset(&spec, "n1");
        let i1 = dataset(&spec, "i1");
        let terms = spec.terms();

        assert!(store.contains(&Triple::new(
            n1.clone(),
            terms.rdf_type.clone(),
            spec.class(classes::DATASET).unwrap().class.clone()
        )));
        assert!(store.contains(&Triple::new(
            i1.clone(),
            terms.primary_topic.clone(),
            RdfObject::from(n1.clone())
        )));

        // no sub-entities, no distributions
        assert!(store.subjects().iter().all(|s| s.is_named_node()));
        assert_eq!(store.subjects().len(), 2);
    }

    #[test]
    fn test_fallback_identifiers_are_idempotent() {
        let spec = spec();
        let n1 = dataset(&spec, "n1");
        let mut store = RdfStore::new();

        let added = add_fallback_alternate_identifiers(&spec, &mut store, &n1, "i1", "n1");
        assert_eq!(added, 2 * spec.alternate_identifier_templates().len());
        assert_eq!(
            add_fallback_alternate_identifiers(&spec, &mut store, &n1, "i1", "n1"),
            0
        );
    }

    #[test]
    fn test_declared_identifier_suppresses_fallback() {
        let spec = spec();
        let n1 = dataset(&spec, "n1");
        let terms = spec.terms();
        let template = &spec.alternate_identifier_templates()[0];
        let declared = NamedNode::new(&template.format("i1")).unwrap();

        let mut store = RdfStore::new();
        store.add(n1.clone(), terms.alternate_check.clone(), declared.clone());
        add_fallback_alternate_identifiers(&spec, &mut store, &n1, "i1", "n1");

        let pattern = TriplePattern::new(
            None,
            Some(terms.alternate_emit.clone()),
            Some(RdfObject::from(declared)),
        );
        assert!(store.query(&pattern).is_empty());
    }

    #[test]
    fn test_distribution_keys_follow_list_position() {
        let spec = spec();
        let r = record(json!({
            "name": "n1",
            "id": "i1",
            "resources": ["bogus", { "url": "https://data.example.org/files/n1.csv" }]
        }));
        let store = build_dataset_graph(&spec, &r).unwrap();

        let first: RdfSubject = BlankNode::from_composite_key(&["dataset", "n1", "distribution", "1"])
            .unwrap()
            .into();
        let second: RdfSubject = BlankNode::from_composite_key(&["dataset", "n1", "distribution", "2"])
            .unwrap()
            .into();

        assert!(store.get_triples_with_subject(&first).is_empty());
        assert!(store.contains(&Triple::new(
            dataset(&spec, "n1"),
            spec.class(classes::DISTRIBUTION).unwrap().attach.clone().unwrap(),
            RdfObject::from(second)
        )));
    }

    #[test]
    fn test_batch_build_keeps_order() {
        let spec = spec();
        let records = vec![
            record(json!({ "name": "a", "id": "1" })),
            record(json!({ "id": "2" })),
            record(json!({ "name": "c", "id": "3" })),
        ];

        let results = build_dataset_graphs(&spec, &records);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2]
            .as_ref()
            .unwrap()
            .contains(&Triple::new(
                dataset(&spec, "c"),
                spec.terms().rdf_type.clone(),
                spec.class(classes::DATASET).unwrap().class.clone()
            )));
    }
}
