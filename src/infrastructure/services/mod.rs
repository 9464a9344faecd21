//! Application services

mod catalog_service;
mod retrieval_service;

pub use catalog_service::{CatalogService, PersonaSeed};
pub use retrieval_service::RetrievalEngine;
