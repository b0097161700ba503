use serde::{Deserialize, Serialize};

/// A single record as returned by the catalog: an ordered JSON object.
pub use query_core::Record;

/// The collections the catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Items,
    Blocks,
    CraftingRecipes,
}

impl ResourceKind {
    /// URL segment the collection is served under.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Items => "items",
            ResourceKind::Blocks => "blocks",
            ResourceKind::CraftingRecipes => "crafting-recipes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub namespaced_id: String,
    pub description: String,
    pub image: String,
    pub stack_size: u8,
    pub renewable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Axe,
    Pickaxe,
    Sword,
    Shovel,
    Hoe,
    Shears,
}

impl Tool {
    pub const NAMES: [&'static str; 6] = ["Axe", "Pickaxe", "Sword", "Shovel", "Hoe", "Shears"];
}

/// One dominant color of a block texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockColor {
    pub color: [u8; 3],
    /// Share of the texture covered by this color, in `[0, 1]`.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub name: String,
    pub namespaced_id: String,
    pub description: String,
    pub image: String,
    pub item: Option<String>,
    pub tool: Option<Tool>,
    pub flammable: bool,
    pub transparent: bool,
    pub luminance: u8,
    pub blast_resistance: f64,
    #[serde(default)]
    pub colors: Vec<BlockColor>,
}

/// A crafting grid slot: empty, one item, or a list of interchangeable items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    Item(String),
    Alternatives(Vec<String>),
}

impl Slot {
    pub fn accepts(&self, item: &str) -> bool {
        match self {
            Slot::Item(name) => name == item,
            Slot::Alternatives(names) => names.iter().any(|n| n == item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingRecipe {
    pub item: String,
    pub quantity: u32,
    pub shapeless: bool,
    pub recipe: Vec<Option<Slot>>,
}
