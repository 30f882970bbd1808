pub mod catalog;
pub mod generator;
pub mod names;

pub use catalog::{builtin_catalog, load_catalog_json, load_catalog_path, validate_catalog};
pub use generator::{case_bias_offset, generate_pool, instantiate};
