pub mod catalog;
pub mod client;
pub mod config;
pub mod dblist;
pub mod domain;
pub mod error;
pub mod natural;
pub mod output;
pub mod service;
pub mod tree;
pub mod validate;

pub use client::{BiomajHttpClient, CatalogQuery, CatalogSource};
pub use domain::{Bank, Catalog, Release, SectionMap};
pub use error::BiomajError;
pub use service::CatalogService;
pub use tree::{DisplayNode, TreeDocument, TreeOptions};
