//! Resource-specific refinement hooks, run after generic equality filtering.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use query_core::{Record, ValidatedQuery};
use serde::Deserialize;
use serde_json::Value;

use crate::contract::model::{BlockColor, Slot};
use crate::domain::collection::Collection;
use crate::domain::color::{ColorMatch, Rgb};
use crate::domain::error::DomainError;

/// Collections a hook may consult besides the one being filtered.
#[derive(Debug, Default, Clone)]
pub struct Lookups {
    collections: HashMap<String, Arc<Collection>>,
}

impl Lookups {
    pub fn insert(&mut self, collection: Arc<Collection>) {
        self.collections
            .insert(collection.name().to_string(), collection);
    }

    pub fn get(&self, name: &str) -> Result<&Collection, DomainError> {
        self.collections
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| DomainError::internal(format!("lookup collection '{name}' not loaded")))
    }
}

pub struct RefineContext<'q> {
    pub query: &'q ValidatedQuery,
    pub lookups: &'q Lookups,
}

/// A narrowing step over the equality-filtered records. Must not reorder.
pub trait Refine: Send + Sync + fmt::Debug {
    fn refine<'a>(
        &self,
        records: Vec<&'a Record>,
        ctx: &RefineContext<'_>,
    ) -> Result<Vec<&'a Record>, DomainError>;
}

/// Keeps blocks with a dominant color near `color`.
#[derive(Debug, Default)]
pub struct ColorFilter;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorParams {
    color: Option<String>,
    color_variance: f64,
    color_amount: f64,
}

fn block_colors(record: &Record) -> Vec<BlockColor> {
    record
        .get("colors")
        .and_then(|v| Vec::<BlockColor>::deserialize(v).ok())
        .unwrap_or_default()
}

impl Refine for ColorFilter {
    fn refine<'a>(
        &self,
        records: Vec<&'a Record>,
        ctx: &RefineContext<'_>,
    ) -> Result<Vec<&'a Record>, DomainError> {
        let params: ColorParams = ctx
            .query
            .filters_as()
            .map_err(|e| DomainError::internal(format!("color parameters: {e}")))?;
        let Some(raw) = params.color else {
            return Ok(records);
        };
        let target = Rgb::parse_hex(&raw)
            .ok_or_else(|| DomainError::internal(format!("unparsable color '{raw}'")))?;
        let matcher = ColorMatch {
            target,
            variance: params.color_variance,
            min_amount: params.color_amount,
        };
        Ok(records
            .into_iter()
            .filter(|r| matcher.matches(&block_colors(r)))
            .collect())
    }
}

/// Inclusive numeric bounds on one field, from `min<Field>` / `max<Field>`.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    field: String,
    min_param: String,
    max_param: String,
}

impl RangeFilter {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        let mut chars = field.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self {
            min_param: format!("min{capitalized}"),
            max_param: format!("max{capitalized}"),
            field,
        }
    }

    pub fn min_param(&self) -> &str {
        &self.min_param
    }

    pub fn max_param(&self) -> &str {
        &self.max_param
    }
}

impl Refine for RangeFilter {
    fn refine<'a>(
        &self,
        records: Vec<&'a Record>,
        ctx: &RefineContext<'_>,
    ) -> Result<Vec<&'a Record>, DomainError> {
        let min = ctx.query.filter(&self.min_param).and_then(Value::as_f64);
        let max = ctx.query.filter(&self.max_param).and_then(Value::as_f64);
        if min.is_none() && max.is_none() {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .filter(|r| {
                let Some(v) = r.get(&self.field).and_then(Value::as_f64) else {
                    return false;
                };
                min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m)
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMatch {
    /// The recipe produces the item.
    Produces,
    /// The item appears in one of the recipe's slots.
    Uses,
}

/// Filters recipes by an item given as a human identifier.
#[derive(Debug, Clone)]
pub struct RecipeFilter {
    param: String,
    lookup: String,
    mode: RecipeMatch,
}

impl RecipeFilter {
    pub fn new(param: impl Into<String>, lookup: impl Into<String>, mode: RecipeMatch) -> Self {
        Self {
            param: param.into(),
            lookup: lookup.into(),
            mode,
        }
    }
}

fn slot_accepts(slot: &Value, name: &str) -> bool {
    Slot::deserialize(slot).is_ok_and(|slot| slot.accepts(name))
}

impl Refine for RecipeFilter {
    fn refine<'a>(
        &self,
        records: Vec<&'a Record>,
        ctx: &RefineContext<'_>,
    ) -> Result<Vec<&'a Record>, DomainError> {
        let Some(raw) = ctx.query.filter(&self.param).and_then(Value::as_str) else {
            return Ok(records);
        };
        let items = ctx.lookups.get(&self.lookup)?;
        let name = items
            .lookup(raw)
            .and_then(|item| item.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::not_found("item"))?;

        Ok(records
            .into_iter()
            .filter(|recipe| match self.mode {
                RecipeMatch::Produces => recipe.get("item").and_then(Value::as_str) == Some(name),
                RecipeMatch::Uses => recipe
                    .get("recipe")
                    .and_then(Value::as_array)
                    .is_some_and(|slots| slots.iter().any(|slot| slot_accepts(slot, name))),
            })
            .collect())
    }
}
