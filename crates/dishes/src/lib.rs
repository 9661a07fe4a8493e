//! Plant-based dish catalog.
//!
//! The catalog ships inside the binary as JSON. [`Catalog::find_replacement_groups`]
//! turns a free-text search for a familiar dish ("butter chicken", "fish fry")
//! into groups of substitutes, one group per replacement category.

pub mod catalog;
pub mod categories;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use categories::{ReplacementCategory, REPLACEMENT_CATEGORIES};
pub use types::{Diet, DishDetail, DishStep, Ingredient, ReplacementGroup};
