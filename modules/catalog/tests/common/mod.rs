#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use api_ingress::ApiIngress;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use catalog::infra::storage::InMemoryProvider;
use catalog::Catalog;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn items() -> Value {
    json!([
        {"name": "Oak Log", "namespacedId": "oak_log", "description": "A log.", "image": "oak_log.png", "stackSize": 64, "renewable": true},
        {"name": "Oak Planks", "namespacedId": "oak_planks", "description": "Planks.", "image": "oak_planks.png", "stackSize": 64, "renewable": true},
        {"name": "Spruce Planks", "namespacedId": "spruce_planks", "description": "Darker planks.", "image": "spruce_planks.png", "stackSize": 64, "renewable": true},
        {"name": "Stick", "namespacedId": "stick", "description": "A stick.", "image": "stick.png", "stackSize": 64, "renewable": true},
        {"name": "Crafting Table", "namespacedId": "crafting_table", "description": "A table.", "image": "crafting_table.png", "stackSize": 64, "renewable": true},
        {"name": "Coal", "namespacedId": "coal", "description": "Fuel.", "image": "coal.png", "stackSize": 64, "renewable": false},
        {"name": "Torch", "namespacedId": "torch", "description": "Light.", "image": "torch.png", "stackSize": 64, "renewable": true},
        {"name": "Ender Pearl", "namespacedId": "ender_pearl", "description": "Teleports.", "image": "ender_pearl.png", "stackSize": 16, "renewable": true},
        {"name": "Bed", "namespacedId": "bed", "description": "Sleep.", "image": "bed.png", "stackSize": 1, "renewable": true},
        {"name": "Diamond", "namespacedId": "diamond", "description": "Shiny.", "image": "diamond.png", "stackSize": 64, "renewable": false}
    ])
}

pub fn blocks() -> Value {
    json!([
        {"name": "Stone", "namespacedId": "stone", "description": "Rock.", "image": "stone.png", "item": "Stone", "tool": "Pickaxe", "flammable": false, "transparent": false, "luminance": 0, "blastResistance": 6,
         "colors": [{"color": [125, 125, 125], "amount": 0.9}]},
        {"name": "Glowstone", "namespacedId": "glowstone", "description": "Glows.", "image": "glowstone.png", "item": "Glowstone", "tool": null, "flammable": false, "transparent": true, "luminance": 15, "blastResistance": 0.3,
         "colors": [{"color": [210, 170, 100], "amount": 0.6}, {"color": [250, 220, 150], "amount": 0.3}]},
        {"name": "Torch", "namespacedId": "torch", "description": "Light.", "image": "torch.png", "item": "Torch", "tool": null, "flammable": false, "transparent": true, "luminance": 14, "blastResistance": 0,
         "colors": []},
        {"name": "Snow Block", "namespacedId": "snow_block", "description": "Cold.", "image": "snow_block.png", "item": "Snow Block", "tool": "Shovel", "flammable": false, "transparent": false, "luminance": 0, "blastResistance": 0.2,
         "colors": [{"color": [250, 250, 250], "amount": 0.5}]},
        {"name": "Oak Planks", "namespacedId": "oak_planks", "description": "Planks.", "image": "oak_planks.png", "item": "Oak Planks", "tool": "Axe", "flammable": true, "transparent": false, "luminance": 0, "blastResistance": 3,
         "colors": [{"color": [160, 130, 80], "amount": 0.8}]},
        {"name": "Sea Lantern", "namespacedId": "sea_lantern", "description": "Underwater light.", "image": "sea_lantern.png", "item": "Sea Lantern", "tool": null, "flammable": false, "transparent": false, "luminance": 15, "blastResistance": 0.3,
         "colors": [{"color": [170, 200, 190], "amount": 0.7}]},
        {"name": "Fire", "namespacedId": "fire", "description": "Hot.", "image": "fire.png", "item": null, "tool": null, "flammable": false, "transparent": true, "luminance": 10, "blastResistance": 0,
         "colors": []}
    ])
}

pub fn recipes() -> Value {
    json!([
        {"item": "Oak Planks", "quantity": 4, "shapeless": true, "recipe": ["Oak Log"]},
        {"item": "Stick", "quantity": 4, "shapeless": false,
         "recipe": [null, null, null, null, ["Oak Planks", "Spruce Planks"], null, null, ["Oak Planks", "Spruce Planks"], null]},
        {"item": "Crafting Table", "quantity": 1, "shapeless": false,
         "recipe": [null, null, null, ["Oak Planks", "Spruce Planks"], ["Oak Planks", "Spruce Planks"], null, ["Oak Planks", "Spruce Planks"], ["Oak Planks", "Spruce Planks"], null]},
        {"item": "Torch", "quantity": 4, "shapeless": false,
         "recipe": [null, null, null, null, "Coal", null, null, "Stick", null]}
    ])
}

pub fn provider() -> InMemoryProvider {
    InMemoryProvider::new()
        .with_json("items", items())
        .with_json("blocks", blocks())
        .with_json("recipes", recipes())
}

pub async fn catalog() -> Catalog {
    let catalog = Catalog::new();
    catalog
        .init_with_provider(Arc::new(provider()), false)
        .await
        .expect("catalog init");
    catalog
}

/// Full router: ingress layers plus the catalog routes.
pub async fn app() -> Router {
    let catalog = catalog().await;
    let ingress = ApiIngress::default();
    ingress
        .register(|router| catalog.register_rest(router))
        .expect("register catalog routes");
    ingress.build_router()
}

/// Write the fixtures as `<name>.json` under `dir`.
pub fn write_fixtures(dir: &Path) {
    for (name, value) in [("items", items()), ("blocks", blocks()), ("recipes", recipes())] {
        std::fs::write(dir.join(format!("{name}.json")), value.to_string()).unwrap();
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    Reply {
        status,
        content_type,
        body,
    }
}

pub fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["name"].as_str().expect("name").to_string())
        .collect()
}
