//! Catalog graphs: the catalog node plus one stub per member dataset

use super::processor::ClassProcessor;
use super::spec::{classes, MappingSpec};
use super::BuildResult;
use crate::rdf::{NamedNode, RdfSerializer, RdfStore, RdfSubject, Triple};
use rayon::prelude::*;
use tracing::info;

/// Build the catalog graph for the given member identifiers.
///
/// Members get stub nodes only: a type, a defining reference, and the
/// catalog's `dcat:dataset` link. Repeated identifiers collapse into one stub.
pub fn build_catalog_graph<S>(spec: &MappingSpec, identifiers: &[S]) -> BuildResult<RdfStore>
where
    S: AsRef<str> + Sync,
{
    let terms = spec.terms();
    let class = spec.class(classes::CATALOG)?;
    let catalog: RdfSubject = spec.catalog_node().clone().into();
    let mut store = RdfStore::with_namespaces(spec.namespaces().clone());

    if let Some(definition) = &class.definition {
        store.add(catalog.clone(), terms.is_defined_by.clone(), definition.clone());
    }
    ClassProcessor::new(spec).process(
        &mut store,
        &catalog,
        class,
        spec.catalog_data(),
        None,
        false,
    )?;

    let stubs = identifiers
        .par_iter()
        .map(|identifier| stub_statements(spec, &catalog, identifier.as_ref()))
        .collect::<BuildResult<Vec<_>>>()?;

    for statements in stubs {
        for triple in statements {
            store.insert(triple);
        }
    }

    info!(
        "Built catalog graph: {} members, {} statements",
        identifiers.len(),
        store.len()
    );

    Ok(store)
}

fn stub_statements(
    spec: &MappingSpec,
    catalog: &RdfSubject,
    identifier: &str,
) -> BuildResult<[Triple; 3]> {
    let terms = spec.terms();
    let stub = NamedNode::new(&spec.identifier_template().format(identifier))?;
    let definition = NamedNode::new(&spec.dataset_definition_template().format(identifier))?;

    Ok([
        Triple::new(stub.clone(), terms.is_defined_by.clone(), definition),
        Triple::new(stub.clone(), terms.rdf_type.clone(), terms.stub_class.clone()),
        Triple::new(catalog.clone(), terms.has_dataset.clone(), stub),
    ])
}

/// Build a catalog graph and serialize it in the requested output syntax
pub fn catalog_as_rdf<S>(spec: &MappingSpec, identifiers: &[S], output: &str) -> BuildResult<String>
where
    S: AsRef<str> + Sync,
{
    let store = build_catalog_graph(spec, identifiers)?;
    Ok(RdfSerializer::serialize_output(&store, output)?)
}
