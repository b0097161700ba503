use std::sync::Arc;

use query_core::{pipeline, QuerySchema, Record, ValidatedQuery};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::collection::Identifier;
use crate::domain::descriptor::{Identity, ResourceDescriptor};
use crate::domain::error::DomainError;
use crate::domain::refine::{Lookups, RefineContext};
use crate::domain::store::CollectionStore;

/// One resource with its schemas synthesized up front.
#[derive(Debug)]
pub struct Endpoint {
    descriptor: ResourceDescriptor,
    list_schema: QuerySchema,
    record_schema: QuerySchema,
}

impl Endpoint {
    /// Synthesize both schemas; any definition problem surfaces here.
    pub fn new(descriptor: ResourceDescriptor) -> Result<Self, DomainError> {
        let schema_err = |e| DomainError::schema(&descriptor.name, e);
        let list_schema =
            QuerySchema::synthesize(&descriptor.fields, &descriptor.filters).map_err(schema_err)?;
        let record_schema = QuerySchema::for_record(&descriptor.fields, &descriptor.record_params)
            .map_err(schema_err)?;
        Ok(Self {
            descriptor,
            list_schema,
            record_schema,
        })
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }
}

/// Domain service: composes parsing, storage and the query pipeline per resource.
#[derive(Clone)]
pub struct Service {
    endpoints: Arc<Vec<Endpoint>>,
    store: Arc<CollectionStore>,
}

impl Service {
    pub fn new(
        descriptors: Vec<ResourceDescriptor>,
        store: Arc<CollectionStore>,
    ) -> Result<Self, DomainError> {
        let endpoints = descriptors
            .into_iter()
            .map(Endpoint::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            endpoints: Arc::new(endpoints),
            store,
        })
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    fn endpoint(&self, path: &str) -> Result<&Endpoint, DomainError> {
        self.endpoints
            .iter()
            .find(|e| e.descriptor.path == path)
            .ok_or_else(|| DomainError::not_found("resource"))
    }

    /// Load every collection any endpoint needs.
    pub async fn preload(&self) -> Result<(), DomainError> {
        for endpoint in self.endpoints.iter() {
            let d = &endpoint.descriptor;
            self.store.get(&d.name).await?;
            self.lookups(d).await?;
        }
        info!("all collections preloaded");
        Ok(())
    }

    async fn lookups(&self, descriptor: &ResourceDescriptor) -> Result<Lookups, DomainError> {
        let mut lookups = Lookups::default();
        for name in &descriptor.lookups {
            lookups.insert(self.store.get(name).await?);
        }
        Ok(lookups)
    }

    #[instrument(name = "catalog.service.list", skip(self, raw_query), fields(resource = %path))]
    pub async fn list(&self, path: &str, raw_query: &str) -> Result<Vec<Record>, DomainError> {
        let endpoint = self.endpoint(path)?;
        let d = &endpoint.descriptor;
        let query = endpoint.list_schema.parse_str(raw_query)?;
        debug!(?query, "query validated");

        let collection = self.store.get(&d.name).await?;
        let lookups = self.lookups(d).await?;
        let ctx = RefineContext {
            query: &query,
            lookups: &lookups,
        };
        let records = pipeline::run(
            collection.records().iter().collect(),
            &query,
            &d.filterable,
            |records| {
                d.refiners
                    .iter()
                    .try_fold(records, |acc, hook| hook.refine(acc, &ctx))
            },
        )?;
        debug!(count = records.len(), "records selected");
        resolve_page(d, &query, records, &lookups)
    }

    #[instrument(name = "catalog.service.get", skip(self, raw_query), fields(resource = %path))]
    pub async fn get(&self, path: &str, id: &str, raw_query: &str) -> Result<Record, DomainError> {
        let endpoint = self.endpoint(path)?;
        let d = &endpoint.descriptor;
        let query = endpoint.record_schema.parse_str(raw_query)?;

        let collection = self.store.get(&d.name).await?;
        let found = match d.identity {
            Identity::Flexible => collection.lookup(id),
            Identity::PositionOnly => match Identifier::parse(id) {
                Identifier::Position(p) => collection.at_position(p),
                _ => None,
            },
        };
        let record = found.ok_or_else(|| DomainError::not_found(&d.singular))?;
        let projected = pipeline::project(record, &query.fields);

        let lookups = self.lookups(d).await?;
        let mut resolved = resolve_page(d, &query, vec![projected], &lookups)?;
        resolved
            .pop()
            .ok_or_else(|| DomainError::internal("resolution dropped the record"))
    }
}

/// Apply the descriptor's resolver when the query asks for item fields.
fn resolve_page(
    d: &ResourceDescriptor,
    query: &ValidatedQuery,
    records: Vec<Record>,
    lookups: &Lookups,
) -> Result<Vec<Record>, DomainError> {
    let Some(resolver) = &d.resolver else {
        return Ok(records);
    };
    let Some(Value::Array(requested)) = query.filter(resolver.param()) else {
        return Ok(records);
    };
    let fields: Vec<String> = requested
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let items = lookups.get(resolver.lookup())?;
    resolver.resolve_all(records, items, &fields)
}
