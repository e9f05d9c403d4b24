use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::classifier::{is_api_token_valid, parse_response_message};
use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    contains_filter, ContentObject, ContentType, ContentTypeListResponse, MediaPayload,
    ObjectListResponse, Page,
};
use crate::api::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::config::{CredentialProvider, API_VERSION_PREFIX};

const CONTENT_TYPE_PATH: &str = "/internal/contenttype";
const CONTENT_PATH: &str = "/content";
const MEDIA_PATH: &str = "/media";
const AUTH_HEADER: &str = "X-AUTH-TOKEN";
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Content types come back in a single page this large.
const CONTENT_TYPE_PAGE_LIMIT: u32 = 200;

/// Upper bound on matches returned per search.
const SEARCH_RESULT_LIMIT: u32 = 100;

/// Typed client for the content API.
///
/// Composes a credential provider, a transport and the response classifier.
/// Credentials are read from the provider on every call, so a token change
/// in the backing store is picked up immediately.
pub struct ContentApiClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialProvider>,
}

impl ContentApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// List all content type definitions, one page of up to
    /// [`CONTENT_TYPE_PAGE_LIMIT`].
    pub async fn list_content_types(&self) -> ApiResult<Vec<ContentType>> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_TYPE_PATH}");
        let response = self
            .fetch_data(&path, &[("limit", CONTENT_TYPE_PAGE_LIMIT.to_string())])
            .await?
            .ok_or_else(|| ApiError::NoData("Missing content type data".to_string()))?;

        let list: ContentTypeListResponse = decode(response)?;
        match list.data {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(ApiError::NoData("Missing content type data".to_string())),
        }
    }

    /// List one page of objects of the given type. Pages are 1-indexed;
    /// the returned cursor names the next page only when the backend
    /// reports one.
    pub async fn list_content_objects(&self, type_name: &str, page: u32) -> ApiResult<Page> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}");
        let response = self
            .fetch_data(&path, &[("page", page.to_string())])
            .await?
            .ok_or_else(|| missing_data(type_name))?;

        let list: ObjectListResponse = decode(response)?;
        let data = list.data.ok_or_else(|| missing_data(type_name))?;
        let next_page = if list.total_pages >= page + 1 {
            Some(page + 1)
        } else {
            None
        };

        Ok(Page {
            data,
            next_page,
            total_pages: list.total_pages,
        })
    }

    /// Fetch a single object with related references expanded one level.
    pub async fn get_content_object(&self, type_name: &str, id: &str) -> ApiResult<ContentObject> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}/{id}");
        let response = self
            .fetch_data(&path, &[("hydrate", "1".to_string())])
            .await?
            .ok_or_else(|| missing_data(id))?;
        decode(response)
    }

    /// Search objects of the given type with a wildcard substring filter
    /// over all fields. A miss is an empty result, not an error.
    pub async fn search(&self, type_name: &str, raw_text: &str) -> ApiResult<Vec<ContentObject>> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}");
        let params = [
            ("filters", contains_filter(raw_text.trim())),
            ("limit", SEARCH_RESULT_LIMIT.to_string()),
        ];
        let Some(response) = self.fetch_data(&path, &params).await? else {
            return Ok(Vec::new());
        };

        let list: ObjectListResponse = decode(response)?;
        Ok(list.data.unwrap_or_default())
    }

    /// Create an object of the given type. Preconditions are checked
    /// before any network traffic.
    pub async fn create_content_object(&self, type_name: &str, body: &Value) -> ApiResult<()> {
        if type_name.trim().is_empty() || is_empty_body(body) {
            return Err(ApiError::InvalidArgument(
                "Missing content object data".to_string(),
            ));
        }
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}");
        self.make_api_call(&path, HttpMethod::Post, Some(encode(body)?), None)
            .await
    }

    /// Replace an existing object.
    pub async fn update_content_object(
        &self,
        type_name: &str,
        id: &str,
        body: &Value,
    ) -> ApiResult<()> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}/{id}");
        self.make_api_call(&path, HttpMethod::Put, Some(encode(body)?), None)
            .await
    }

    /// Delete an object.
    pub async fn remove_content_object(&self, type_name: &str, id: &str) -> ApiResult<()> {
        let path = format!("{API_VERSION_PREFIX}{CONTENT_PATH}/{type_name}/{id}");
        self.make_api_call(&path, HttpMethod::Delete, None, None).await
    }

    /// Upload a pre-encoded multipart payload. The media endpoint sits
    /// outside the versioned prefix.
    pub async fn upload_media(&self, payload: &MediaPayload) -> ApiResult<()> {
        self.make_api_call(
            MEDIA_PATH,
            HttpMethod::Post,
            Some(payload.data.clone()),
            Some(&payload.content_type),
        )
        .await
    }

    /// Shared read path: authenticated GET, unconditional body parse.
    ///
    /// A 404 normalizes to `Ok(None)` so callers can tell "nothing found"
    /// from a hard failure; a token rejection wins over the 404 check.
    async fn fetch_data(&self, path: &str, params: &[(&str, String)]) -> ApiResult<Option<Value>> {
        let credentials = self.credentials.get()?;
        let url = endpoint(&credentials.api_url, path, params)?;
        debug!(target: "api", "GET {}", url);

        let request =
            HttpRequest::new(HttpMethod::Get, url).header(AUTH_HEADER, &credentials.api_key);
        let response = self.transport.send(request).await?;
        let body = response.json()?;

        if response.status >= 400 || body.is_null() {
            let message = parse_response_message(&body);
            if !is_api_token_valid(&message) {
                warn!(target: "api", "API token rejected: {}", message);
                return Err(ApiError::InvalidToken);
            }
            if response.status == 404 {
                return Ok(None);
            }
            warn!(target: "api", "Request failed ({}): {}", response.status, message);
            return Err(ApiError::Api(message));
        }

        Ok(Some(body))
    }

    /// Shared write path: success is any status below 400 and requires no
    /// parseable body; anything else is classified and raised.
    async fn make_api_call(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> ApiResult<()> {
        let credentials = self.credentials.get()?;
        let url = endpoint(&credentials.api_url, path, &[])?;
        debug!(target: "api", "{} {}", method.as_str(), url);

        let mut request = HttpRequest::new(method, url)
            .header(AUTH_HEADER, &credentials.api_key)
            .header("Content-Type", content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = self.transport.send(request).await?;
        if response.status < 400 {
            return Ok(());
        }

        let body = response.json()?;
        let message = parse_response_message(&body);
        if !is_api_token_valid(&message) {
            warn!(target: "api", "API token rejected: {}", message);
            return Err(ApiError::InvalidToken);
        }
        warn!(target: "api", "{} failed ({}): {}", method.as_str(), response.status, message);
        Err(ApiError::Api(message))
    }
}

/// Build a full endpoint URL from the configured base.
fn endpoint(base: &str, path: &str, params: &[(&str, String)]) -> ApiResult<Url> {
    let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid API URL: {e}")))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Transport(format!("Unexpected response shape: {e}")))
}

fn encode(body: &Value) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| ApiError::InvalidArgument(format!("Unencodable body: {e}")))
}

fn missing_data(name: &str) -> ApiError {
    ApiError::NoData(format!("Missing data for {name}!"))
}

/// A body with nothing in it fails the create precondition.
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
