use crate::catalog::parse_catalog;
use crate::client::{ALL_BANKS, CatalogQuery, CatalogSource};
use crate::domain::{Bank, Catalog};
use crate::error::BiomajError;
use crate::tree::{DisplayNode, TreeDocument, TreeOptions, build_catalog_tree};

#[derive(Clone)]
pub struct CatalogService<S: CatalogSource> {
    source: S,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn banks(&self, query: &CatalogQuery) -> Result<Catalog, BiomajError> {
        let bytes = self.source.fetch(query)?;
        parse_catalog(&bytes)
    }

    pub fn bank(&self, name: &str, format: &str) -> Result<Option<Bank>, BiomajError> {
        let catalog = self.banks_named([name], format)?;
        Ok(catalog.get(name).cloned())
    }

    pub fn banks_named<I, N>(&self, names: I, format: &str) -> Result<Catalog, BiomajError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.banks(&CatalogQuery::new().names(names).formats([format]))
    }

    pub fn banks_of_type(&self, kind: &str, format: &str) -> Result<Catalog, BiomajError> {
        self.banks(&CatalogQuery::new().formats([format]).types([kind]))
    }

    pub fn all_banks(&self, format: &str) -> Result<Catalog, BiomajError> {
        self.banks(&CatalogQuery::new().names([ALL_BANKS]).formats([format]))
    }

    pub fn bank_names(&self, kind: &str) -> Result<Vec<(String, String)>, BiomajError> {
        let query = CatalogQuery::new()
            .names([ALL_BANKS])
            .types([kind])
            .light(true);
        Ok(self
            .banks(&query)?
            .into_banks()
            .into_iter()
            .map(|bank| (bank.name, bank.last_update))
            .collect())
    }

    pub fn bank_tree(
        &self,
        types: &[String],
        format: &str,
        options: TreeOptions,
    ) -> Result<Vec<DisplayNode>, BiomajError> {
        let query = CatalogQuery::new()
            .names([ALL_BANKS])
            .formats([format])
            .types(types.iter().cloned());
        let catalog = self.banks(&query)?;
        let tree = build_catalog_tree(&catalog, format, options);
        tracing::debug!(
            banks = catalog.len(),
            shown = tree.len(),
            format,
            "built bank tree"
        );
        Ok(tree)
    }

    pub fn tree_json(
        &self,
        types: &[String],
        format: &str,
        options: TreeOptions,
    ) -> Result<String, BiomajError> {
        let tree = self.bank_tree(types, format, options)?;
        Ok(TreeDocument { tree }.to_json())
    }
}
