use std::sync::Arc;

use query_core::{FilterSchema, Rule, SchemaError};

use crate::domain::error::DomainError;
use crate::domain::refine::{RangeFilter, Refine};
use crate::domain::resolver::RecipeResolver;

/// How the single-record route interprets its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Position, then namespaced id, then display name.
    Flexible,
    /// 1-based position only.
    PositionOnly,
}

/// Immutable description of one served collection.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Collection name in storage.
    pub name: String,
    /// URL segment.
    pub path: String,
    /// Used in not-found messages.
    pub singular: String,
    pub fields: Vec<String>,
    pub filterable: Vec<String>,
    pub filters: FilterSchema,
    pub record_params: FilterSchema,
    pub identity: Identity,
    /// Other collections the hooks need loaded.
    pub lookups: Vec<String>,
    pub refiners: Vec<Arc<dyn Refine>>,
    pub resolver: Option<RecipeResolver>,
}

impl ResourceDescriptor {
    pub fn builder(name: &str) -> DescriptorBuilder {
        DescriptorBuilder {
            inner: ResourceDescriptor {
                name: name.to_string(),
                path: name.to_string(),
                singular: name.trim_end_matches('s').to_string(),
                fields: Vec::new(),
                filterable: Vec::new(),
                filters: FilterSchema::new(),
                record_params: FilterSchema::new(),
                identity: Identity::Flexible,
                lookups: Vec::new(),
                refiners: Vec::new(),
                resolver: None,
            },
        }
    }
}

pub struct DescriptorBuilder {
    inner: ResourceDescriptor,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl DescriptorBuilder {
    pub fn path(mut self, path: &str) -> Self {
        self.inner.path = path.to_string();
        self
    }

    pub fn singular(mut self, singular: &str) -> Self {
        self.inner.singular = singular.to_string();
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.inner.fields = owned(fields);
        self
    }

    pub fn filterable(mut self, fields: &[&str]) -> Self {
        self.inner.filterable = owned(fields);
        self
    }

    pub fn filter(mut self, name: &str, rule: Rule) -> Self {
        self.inner.filters = self.inner.filters.rule(name, rule);
        self
    }

    /// Add `min<Field>` / `max<Field>` parameters with `rule` and the
    /// matching inclusive range hook.
    pub fn range_filter(mut self, field: &str, rule: Rule) -> Self {
        let range = RangeFilter::new(field);
        self.inner.filters = self
            .inner
            .filters
            .rule(range.min_param(), rule.clone())
            .rule(range.max_param(), rule);
        self.inner.refiners.push(Arc::new(range));
        self
    }

    pub fn record_param(mut self, name: &str, rule: Rule) -> Self {
        self.inner.record_params = self.inner.record_params.rule(name, rule);
        self
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.inner.identity = identity;
        self
    }

    pub fn lookup(mut self, collection: &str) -> Self {
        if !self.inner.lookups.iter().any(|c| c == collection) {
            self.inner.lookups.push(collection.to_string());
        }
        self
    }

    pub fn refine(mut self, hook: impl Refine + 'static) -> Self {
        self.inner.refiners.push(Arc::new(hook));
        self
    }

    pub fn resolver(mut self, resolver: RecipeResolver) -> Self {
        let lookup = resolver.lookup().to_string();
        self.inner.resolver = Some(resolver);
        self.lookup(&lookup)
    }

    /// Check that every filterable field is a declared field.
    pub fn build(self) -> Result<ResourceDescriptor, DomainError> {
        let d = self.inner;
        if let Some(stray) = d.filterable.iter().find(|f| !d.fields.contains(f)) {
            return Err(DomainError::schema(
                &d.name,
                SchemaError::FilterableNotInFields(stray.clone()),
            ));
        }
        Ok(d)
    }
}
