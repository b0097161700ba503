//! Materializes item references inside projected recipes.

use query_core::pipeline::project;
use query_core::Record;
use rayon::prelude::*;
use serde_json::Value;

use crate::domain::collection::Collection;
use crate::domain::error::DomainError;

const ITEM: &str = "item";
const RECIPE: &str = "recipe";

/// Replaces item names in `item` and in every `recipe` slot with the
/// referenced item, projected to the requested item fields.
#[derive(Debug, Clone)]
pub struct RecipeResolver {
    param: String,
    lookup: String,
}

impl RecipeResolver {
    /// `param` names the query parameter carrying the item fields; `lookup`
    /// the collection references point into.
    pub fn new(param: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            lookup: lookup.into(),
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn lookup(&self) -> &str {
        &self.lookup
    }

    /// Resolve a page of recipes in parallel. Output order matches input order.
    pub fn resolve_all(
        &self,
        recipes: Vec<Record>,
        items: &Collection,
        fields: &[String],
    ) -> Result<Vec<Record>, DomainError> {
        recipes
            .into_par_iter()
            .map(|recipe| self.resolve(recipe, items, fields))
            .collect()
    }

    /// Resolve one recipe. Only keys present in the (already projected)
    /// recipe are touched.
    pub fn resolve(
        &self,
        mut recipe: Record,
        items: &Collection,
        fields: &[String],
    ) -> Result<Record, DomainError> {
        if let Some(item) = recipe.get_mut(ITEM) {
            *item = materialize(item, items, fields)?;
        }
        if let Some(Value::Array(slots)) = recipe.get_mut(RECIPE) {
            for slot in slots.iter_mut() {
                *slot = match &*slot {
                    Value::Array(options) => Value::Array(
                        options
                            .iter()
                            .map(|o| materialize(o, items, fields))
                            .collect::<Result<_, _>>()?,
                    ),
                    other => materialize(other, items, fields)?,
                };
            }
        }
        Ok(recipe)
    }
}

/// Turn one reference into the projected item. `null` stays `null`; a
/// projection left with exactly one key collapses to the bare value.
fn materialize(reference: &Value, items: &Collection, fields: &[String]) -> Result<Value, DomainError> {
    let Value::String(id) = reference else {
        return Ok(reference.clone());
    };
    let item = items.lookup(id).ok_or_else(|| DomainError::not_found("item"))?;
    let projected = project(item, fields);
    if projected.len() == 1 {
        return Ok(projected.into_iter().next().map_or(Value::Null, |(_, only)| only));
    }
    Ok(Value::Object(projected))
}
