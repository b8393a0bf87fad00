use crate::client::CatalogSource;
use crate::error::BiomajError;
use crate::service::CatalogService;
use crate::tree::{TreeDocument, TreeOptions};

pub const SLASH_PLACEHOLDER: &str = "___";

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const CACHE_CONTROL: &str =
    "public, max-age=86400, s-maxage=86400, stale-while-revalidate=300, stale-if-error=86400";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbListRequest {
    pub types: Vec<String>,
    pub format: String,
    pub options: TreeOptions,
}

impl Default for DbListRequest {
    fn default() -> Self {
        Self::from_params(None, None, None, None)
    }
}

impl DbListRequest {
    // flags are set only by the literal `true`
    pub fn from_params(
        dbtype: Option<&str>,
        dbformat: Option<&str>,
        cleanup: Option<&str>,
        filterall: Option<&str>,
    ) -> Self {
        Self {
            types: decode_types(dbtype.unwrap_or("all")),
            format: dbformat.unwrap_or("all").to_string(),
            options: TreeOptions {
                clean_up: cleanup == Some("true"),
                filter_all: filterall == Some("true"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbListResponse {
    pub content_type: &'static str,
    pub cache_control: &'static str,
    pub body: String,
}

pub fn decode_types(dbtype: &str) -> Vec<String> {
    dbtype
        .replace(SLASH_PLACEHOLDER, "/")
        .split('|')
        .filter(|kind| !kind.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn encode_types<S: AsRef<str>>(types: &[S]) -> String {
    types
        .iter()
        .map(|kind| kind.as_ref().replace('/', SLASH_PLACEHOLDER))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn handle_dblist<S: CatalogSource>(
    service: &CatalogService<S>,
    request: &DbListRequest,
) -> Result<DbListResponse, BiomajError> {
    let body = if request.types.is_empty() || request.format.is_empty() {
        TreeDocument { tree: Vec::new() }.to_json()
    } else {
        service.tree_json(&request.types, &request.format, request.options)?
    };
    Ok(DbListResponse {
        content_type: CONTENT_TYPE,
        cache_control: CACHE_CONTROL,
        body,
    })
}
