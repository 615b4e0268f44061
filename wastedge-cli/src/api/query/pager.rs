//! Cursor-based continuation of a query
//!
//! A pager is created by the first query and keeps that query's base
//! parameters (filters and output format) for its whole life. Every call to
//! [`Pager::next`] reuses them verbatim; only the cursor and page size change.
//! There is no exhausted state: the payload of the returned page tells the
//! caller whether more data exists.

use std::sync::Arc;

use reqwest::Method;

use super::result::ResultSet;
use crate::api::client::ApiClient;
use crate::api::constants::{COUNT_PARAM, START_PARAM};
use crate::api::error::{ApiError, Result};
use crate::api::metadata::EntitySchema;

#[derive(Debug, Clone)]
pub struct Pager {
    client: ApiClient,
    entity: Arc<EntitySchema>,
    parameters: Arc<str>,
}

impl Pager {
    pub(crate) fn new(client: ApiClient, entity: Arc<EntitySchema>, base_parameters: String) -> Self {
        Self {
            client,
            entity,
            parameters: base_parameters.into(),
        }
    }

    pub fn entity(&self) -> &Arc<EntitySchema> {
        &self.entity
    }

    /// Filters and output format of the originating query
    pub fn base_parameters(&self) -> &str {
        &self.parameters
    }

    /// Parameters for the page starting at `start`.
    ///
    /// The cursor is opaque and passed back escaped but otherwise untouched.
    pub fn next_parameters(&self, start: &str, count: Option<u32>) -> Result<String> {
        if start.is_empty() {
            return Err(ApiError::invalid_argument("start cursor must not be empty"));
        }

        let mut sb = String::from(&*self.parameters);
        if !sb.is_empty() {
            sb.push('&');
        }
        sb.push_str(START_PARAM);
        sb.push('=');
        sb.push_str(&urlencoding::encode(start));
        if let Some(count) = count {
            sb.push_str(&format!("&{}={}", COUNT_PARAM, count));
        }
        Ok(sb)
    }

    /// Fetch the page starting at `start`
    pub async fn next(&self, start: &str, count: Option<u32>) -> Result<ResultSet> {
        let parameters = self.next_parameters(start, count)?;

        log::debug!("Fetching next page of '{}' from cursor", self.entity.name);
        let payload = self
            .client
            .execute_object(&self.entity.name, Some(&parameters), Method::GET, None)
            .await?;

        Ok(ResultSet::new(self.entity.clone(), payload, self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metadata::{EntityDataType, EntityMember, parse_entity_schema};
    use crate::api::models::Credentials;
    use crate::api::query::{Filter, FilterType, OutputFormat};
    use httpmock::MockServer;
    use serde_json::{Map, json};

    const API_PATH: &str = "/scripts/cgiip.exe/WService=wsDEV/api.p";

    fn order() -> Arc<EntitySchema> {
        Arc::new(parse_entity_schema("order", Map::new()).unwrap())
    }

    fn offline_pager(base: &str) -> Pager {
        let creds = Credentials::new("http://127.0.0.1:1", "ACME", "jdoe", "pw").unwrap();
        Pager::new(ApiClient::new(creds), order(), base.to_string())
    }

    #[test]
    fn test_next_parameters() {
        let pager = offline_pager("status=eq.open&$output=verbose");

        assert_eq!(
            pager.next_parameters("abc", None).unwrap(),
            "status=eq.open&$output=verbose&$start=abc"
        );
        assert_eq!(
            pager.next_parameters("a b/c==", Some(25)).unwrap(),
            "status=eq.open&$output=verbose&$start=a%20b%2Fc%3D%3D&$count=25"
        );
        // Base parameters are untouched by building
        assert_eq!(pager.base_parameters(), "status=eq.open&$output=verbose");
    }

    #[test]
    fn test_empty_cursor_is_rejected() {
        let pager = offline_pager("$output=verbose");
        assert!(matches!(
            pager.next_parameters("", None),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_paging_reuses_base_parameters() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path(API_PATH)
                .query_param("$uri", "order")
                .query_param("$offset", "10")
                .query_param("$count", "2");
            then.status(200).json_body(json!({"result": [{"id": 1}, {"id": 2}], "next": "page-2"}));
        });
        let second = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path(API_PATH)
                .query_param("$uri", "order")
                .query_param("status", "eq.open")
                .query_param("$output", "compact")
                .query_param("$start", "page-2");
            then.status(200).json_body(json!({"result": [{"id": 3}], "next": "page-3"}));
        });
        let third = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path(API_PATH)
                .query_param("$start", "page-3")
                .query_param("status", "eq.open");
            then.status(200).json_body(json!({"result": []}));
        });

        let creds = Credentials::new(server.base_url(), "ACME", "jdoe", "pw").unwrap();
        let client = ApiClient::new(creds);
        let filters = vec![
            Filter::compare(
                EntityMember::field("status", EntityDataType::String),
                FilterType::Equal,
                "open",
            )
            .unwrap(),
        ];

        let page1 = client
            .query_with(&order(), &filters, Some(10), Some(2), OutputFormat::Compact)
            .await
            .unwrap();
        let base = page1.pager().base_parameters().to_string();
        assert_eq!(base, "status=eq.open&$output=compact");

        let page2 = page1.pager().next(page1.next_cursor().unwrap(), None).await.unwrap();
        assert_eq!(page2.pager().base_parameters(), base);
        assert_eq!(page2.rows().len(), 1);

        let page3 = page2.pager().next(page2.next_cursor().unwrap(), None).await.unwrap();
        assert_eq!(page3.pager().base_parameters(), base);
        assert!(page3.rows().is_empty());
        assert!(page3.next_cursor().is_none());

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 1);
    }
}
