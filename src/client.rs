use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::BiomajError;

pub const ALL_BANKS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub names: Vec<String>,
    pub formats: Vec<String>,
    pub types: Vec<String>,
    pub light: bool,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn light(mut self, light: bool) -> Self {
        self.light = light;
        self
    }

    // banks=a|b&formats=f&types=t[&lightmode]
    pub fn to_query_string(&self) -> String {
        let mut names = join_values(&self.names);
        if names.is_empty() {
            names = ALL_BANKS.to_string();
        }
        let mut query = format!("banks={names}");

        let formats = join_values(&self.formats);
        if !formats.is_empty() {
            query.push_str("&formats=");
            query.push_str(&formats);
        }
        let types = join_values(&self.types);
        if !types.is_empty() {
            query.push_str("&types=");
            query.push_str(&types);
        }
        if self.light {
            query.push_str("&lightmode");
        }
        query
    }
}

fn join_values(values: &[String]) -> String {
    values
        .iter()
        .filter(|value| !value.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

pub trait CatalogSource: Send + Sync {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<u8>, BiomajError>;
}

#[derive(Clone)]
pub struct BiomajHttpClient {
    client: Client,
    base_url: String,
}

impl BiomajHttpClient {
    pub fn new(base_url: &str) -> Result<Self, BiomajError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, BiomajError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("biomaj-catalog/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| BiomajError::Http(err.to_string()))?,
        );
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BiomajError::Http(err.to_string()))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_url(&self, query: &CatalogQuery) -> String {
        format!("{}GET?{}", self.base_url, query.to_query_string())
    }
}

impl CatalogSource for BiomajHttpClient {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<u8>, BiomajError> {
        let url = self.request_url(query);
        tracing::debug!(%url, "requesting BioMaj catalog");

        let transport_error = |message: String| {
            tracing::warn!(%url, %message, "BioMaj request failed");
            BiomajError::UnreachableServer {
                url: url.clone(),
                message,
            }
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| transport_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(transport_error(format!("status {}", response.status().as_u16())));
        }
        let bytes = response
            .bytes()
            .map_err(|err| transport_error(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
