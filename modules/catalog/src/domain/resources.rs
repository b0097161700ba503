//! The catalog's collections.

use query_core::Rule;

use crate::contract::model::Tool;
use crate::domain::descriptor::{Identity, ResourceDescriptor};
use crate::domain::error::DomainError;
use crate::domain::refine::{ColorFilter, RecipeFilter, RecipeMatch};
use crate::domain::resolver::RecipeResolver;

pub const ITEMS: &str = "items";
pub const BLOCKS: &str = "blocks";
pub const RECIPES: &str = "recipes";

const ITEM_FIELDS: [&str; 6] = [
    "name",
    "namespacedId",
    "description",
    "image",
    "stackSize",
    "renewable",
];

pub fn items() -> Result<ResourceDescriptor, DomainError> {
    ResourceDescriptor::builder(ITEMS)
        .fields(&ITEM_FIELDS)
        .filterable(&["name", "namespacedId", "stackSize", "renewable"])
        .filter("name", Rule::string())
        .filter("namespacedId", Rule::string())
        .filter("stackSize", Rule::one_of([1, 16, 64]))
        .filter("renewable", Rule::boolean())
        .build()
}

pub fn blocks() -> Result<ResourceDescriptor, DomainError> {
    let color = Rule::pattern("^#?[0-9a-f]{6}$").map_err(|e| DomainError::schema(BLOCKS, e))?;
    ResourceDescriptor::builder(BLOCKS)
        .fields(&[
            "name",
            "namespacedId",
            "description",
            "image",
            "item",
            "tool",
            "flammable",
            "transparent",
            "luminance",
            "blastResistance",
        ])
        .filterable(&[
            "item",
            "tool",
            "flammable",
            "transparent",
            "luminance",
            "blastResistance",
        ])
        .filter("item", Rule::string())
        .filter("tool", Rule::one_of(Tool::NAMES))
        .filter("flammable", Rule::boolean())
        .filter("transparent", Rule::boolean())
        .filter("blastResistance", Rule::non_negative_number())
        .range_filter("blastResistance", Rule::non_negative_number())
        .filter("luminance", Rule::non_negative_int())
        .range_filter("luminance", Rule::non_negative_int())
        .filter("color", color)
        .filter(
            "colorVariance",
            Rule::number().min(0.0).max(255.0).with_default(20),
        )
        .filter(
            "colorAmount",
            Rule::number().min(0.0).max(1.0).with_default(0.1),
        )
        .refine(ColorFilter)
        .build()
}

pub fn crafting_recipes() -> Result<ResourceDescriptor, DomainError> {
    let item_fields = || Rule::list(Rule::one_of(ITEM_FIELDS));
    ResourceDescriptor::builder(RECIPES)
        .path("crafting-recipes")
        .singular("crafting recipe")
        .fields(&["item", "quantity", "shapeless", "recipe"])
        .filterable(&["quantity", "shapeless"])
        .filter("item", Rule::string())
        .filter("quantity", Rule::non_negative_number())
        .filter("shapeless", Rule::boolean())
        .filter("uses", Rule::string())
        .filter("itemFields", item_fields())
        .record_param("itemFields", item_fields())
        .identity(Identity::PositionOnly)
        .refine(RecipeFilter::new("item", ITEMS, RecipeMatch::Produces))
        .refine(RecipeFilter::new("uses", ITEMS, RecipeMatch::Uses))
        .resolver(RecipeResolver::new("itemFields", ITEMS))
        .build()
}

/// Every served collection, in route order.
pub fn all() -> Result<Vec<ResourceDescriptor>, DomainError> {
    Ok(vec![items()?, blocks()?, crafting_recipes()?])
}
