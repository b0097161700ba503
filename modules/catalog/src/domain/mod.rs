pub mod collection;
pub mod color;
pub mod descriptor;
pub mod error;
pub mod ports;
pub mod refine;
pub mod resolver;
pub mod resources;
pub mod service;
pub mod store;
