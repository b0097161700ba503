pub mod json_provider;
pub mod memory;

pub use json_provider::JsonFileProvider;
pub use memory::InMemoryProvider;
