use std::sync::Mutex;

use biomaj_catalog::client::{CatalogQuery, CatalogSource};
use biomaj_catalog::error::BiomajError;

pub const CATALOG: &str = include_str!("../fixtures/catalog.json");

/// Answers every query with the same document and remembers the queries.
#[derive(Default)]
pub struct MockSource {
    pub body: Vec<u8>,
    pub queries: Mutex<Vec<CatalogQuery>>,
}

impl MockSource {
    pub fn catalog() -> Self {
        Self::with_body(CATALOG)
    }

    pub fn with_body(body: &str) -> Self {
        Self {
            body: body.as_bytes().to_vec(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn last_query(&self) -> Option<CatalogQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl CatalogSource for MockSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<u8>, BiomajError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.body.clone())
    }
}

pub struct DownSource;

impl CatalogSource for DownSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<u8>, BiomajError> {
        Err(BiomajError::UnreachableServer {
            url: format!("http://biomaj.invalid/GET?{}", query.to_query_string()),
            message: "connection refused".to_string(),
        })
    }
}
