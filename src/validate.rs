use std::fs;
use std::path::Path;

use camino::Utf8PathBuf;

use crate::client::CatalogSource;
use crate::error::BiomajError;
use crate::service::CatalogService;
use crate::tree::{DisplayNode, TreeOptions, leaf_paths};

pub fn is_valid_path(tree: &[DisplayNode], candidate: &str) -> bool {
    leaf_paths(tree).contains(&candidate)
}

pub fn validate_choice(tree: &[DisplayNode], candidate: Option<&str>) -> Result<(), BiomajError> {
    match candidate {
        None => Ok(()),
        Some(candidate) if is_valid_path(tree, candidate) => Ok(()),
        Some(candidate) => Err(BiomajError::ValidationFailed(candidate.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConstraint {
    types: Vec<String>,
    format: String,
    clean_up: bool,
}

impl CatalogConstraint {
    pub fn new<I, S>(types: I, format: &str) -> Result<Self, BiomajError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types
            .into_iter()
            .map(Into::into)
            .filter(|kind: &String| !kind.is_empty())
            .collect();
        if types.is_empty() {
            return Err(BiomajError::InvalidConstraint(
                "bank type must be specified".to_string(),
            ));
        }
        Ok(Self {
            types,
            format: format.to_string(),
            clean_up: true,
        })
    }

    pub fn clean_up(mut self, clean_up: bool) -> Self {
        self.clean_up = clean_up;
        self
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn validate<S: CatalogSource>(
        &self,
        service: &CatalogService<S>,
        candidate: Option<&str>,
    ) -> Result<(), BiomajError> {
        let Some(candidate) = candidate else {
            return Ok(());
        };
        let options = TreeOptions {
            clean_up: self.clean_up,
            filter_all: false,
        };
        let tree = service.bank_tree(&self.types, &self.format, options)?;
        validate_choice(&tree, Some(candidate))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixConstraint {
    prefix: Utf8PathBuf,
}

impl PrefixConstraint {
    pub fn new(prefix: impl Into<Utf8PathBuf>) -> Result<Self, BiomajError> {
        let prefix = prefix.into();
        if prefix.as_str().is_empty() {
            return Err(BiomajError::InvalidConstraint(
                "prefix must be specified".to_string(),
            ));
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn validate(&self, candidate: Option<&str>) -> Result<(), BiomajError> {
        let Some(candidate) = candidate else {
            return Ok(());
        };

        // blast paths carry no extension, so only the parent has to exist
        let path = Path::new(candidate);
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ if path.has_root() => path,
            _ => Path::new("."),
        };
        let resolved = fs::canonicalize(parent)
            .map_err(|_| BiomajError::PathNotFound(candidate.to_string()))?;
        let resolved = resolved.to_string_lossy();

        if !resolved.starts_with(self.prefix.as_str()) {
            return Err(BiomajError::PrefixMismatch {
                path: candidate.to_string(),
                prefix: self.prefix.to_string(),
            });
        }
        Ok(())
    }
}
