//! Clients for external collaborators.

pub mod catalog;

pub use catalog::{
    CatalogCategory, CatalogItem, ExerciseCatalog, HttpExerciseCatalog, PlaceholderExerciseCatalog,
};
