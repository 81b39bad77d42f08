use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::dtos::trash_dto::{AckDto, ListTrashResponseDto};
use crate::application::ports::trash_ports::RemoteTrashClient;
use crate::common::config::AppConfig;
use crate::common::errors::{DomainError, ErrorContext, ErrorKind, Result};
use crate::domain::entities::auth_context::AuthContext;
use crate::domain::entities::trash_entry::FsId;

const LIST_ENDPOINT: &str = "recycle/list";
const RESTORE_ENDPOINT: &str = "recycle/restore";
const DELETE_ENDPOINT: &str = "recycle/delete";
const CLEAR_ENDPOINT: &str = "recycle/clear";

/// `RemoteTrashClient` over the storage web API (`recycle/*` endpoints)
pub struct PcsTrashClient {
    client: Client,
    base_url: Url,
    page_size: u32,
}

impl PcsTrashClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeouts.network_timeout())
            .connect_timeout(config.timeouts.connect_timeout())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Self::with_client(client, &config.remote.api_url, config.trash.page_size)
    }

    pub fn with_client(client: Client, api_url: &str, page_size: u32) -> Result<Self> {
        let base_url = Url::parse(api_url)
            .with_error_kind(ErrorKind::InvalidInput, "RemoteTrash")?;
        Ok(Self {
            client,
            base_url,
            page_size,
        })
    }

    /// Endpoint URL with the query parameters every web API call carries
    fn endpoint(&self, path: &str, auth: &AuthContext) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .with_error_kind(ErrorKind::InvalidInput, "RemoteTrash")?;
        url.query_pairs_mut()
            .append_pair("channel", "chunlei")
            .append_pair("clienttype", "0")
            .append_pair("web", "1")
            .append_pair("bdstoken", &auth.bdstoken);
        Ok(url)
    }

    fn list_url(&self, auth: &AuthContext, dir: &str, page: u32) -> Result<Url> {
        let mut url = self.endpoint(LIST_ENDPOINT, auth)?;
        url.query_pairs_mut()
            .append_pair("num", &self.page_size.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("dir", dir)
            .append_pair("order", "time")
            .append_pair("desc", "1");
        Ok(url)
    }

    fn with_cookie(&self, request: RequestBuilder, auth: &AuthContext) -> Result<RequestBuilder> {
        if auth.cookie.is_empty() {
            return Ok(request);
        }
        let value = HeaderValue::from_str(&auth.cookie)
            .map_err(|e| DomainError::validation_error("AuthContext", "Cookie is not a valid header value").with_source(e))?;
        Ok(request.header(COOKIE, value))
    }

    fn list_request(&self, auth: &AuthContext, dir: &str, page: u32) -> Result<RequestBuilder> {
        let url = self.list_url(auth, dir, page)?;
        self.with_cookie(self.client.get(url), auth)
    }

    /// POST carrying the ids as a form-encoded `fidlist` field
    fn fidlist_request(&self, endpoint: &str, auth: &AuthContext, fs_ids: &[FsId]) -> Result<RequestBuilder> {
        let url = self.endpoint(endpoint, auth)?;
        let form = [("fidlist", fidlist_json(fs_ids)?)];
        self.with_cookie(self.client.post(url).form(&form), auth)
    }

    fn clear_request(&self, auth: &AuthContext) -> Result<RequestBuilder> {
        let url = self.endpoint(CLEAR_ENDPOINT, auth)?;
        // POST with an empty body
        self.with_cookie(self.client.post(url).body(Vec::<u8>::new()), auth)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        decode(&body)
    }
}

/// Decodes a JSON body. A non-zero `errno` is left for the caller to inspect.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// JSON array of ids as strings, the shape the web API expects in `fidlist`
pub fn fidlist_json(fs_ids: &[FsId]) -> Result<String> {
    let ids: Vec<String> = fs_ids.iter().map(FsId::to_string).collect();
    Ok(serde_json::to_string(&ids)?)
}

#[async_trait]
impl RemoteTrashClient for PcsTrashClient {
    #[instrument(skip(self, auth))]
    async fn list_trash(&self, auth: &AuthContext, path: &str, page: u32) -> Result<ListTrashResponseDto> {
        debug!("GET {}", LIST_ENDPOINT);
        let request = self.list_request(auth, path, page)?;
        self.send(request).await
    }

    #[instrument(skip(self, auth, fs_ids), fields(count = fs_ids.len()))]
    async fn restore_trash(&self, auth: &AuthContext, fs_ids: &[FsId]) -> Result<AckDto> {
        debug!("POST {}", RESTORE_ENDPOINT);
        let request = self.fidlist_request(RESTORE_ENDPOINT, auth, fs_ids)?;
        self.send(request).await
    }

    #[instrument(skip(self, auth, fs_ids), fields(count = fs_ids.len()))]
    async fn delete_trash(&self, auth: &AuthContext, fs_ids: &[FsId]) -> Result<AckDto> {
        debug!("POST {}", DELETE_ENDPOINT);
        let request = self.fidlist_request(DELETE_ENDPOINT, auth, fs_ids)?;
        self.send(request).await
    }

    #[instrument(skip(self, auth))]
    async fn clear_trash(&self, auth: &AuthContext) -> Result<AckDto> {
        debug!("POST {}", CLEAR_ENDPOINT);
        let request = self.clear_request(auth)?;
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> PcsTrashClient {
        PcsTrashClient::with_client(Client::new(), "https://pan.example.com/api/", 100).unwrap()
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_list_url_carries_paging_and_token() {
        let auth = AuthContext::new("BDUSS=x", "tok123");
        let url = client().list_url(&auth, "/my docs", 3).unwrap();

        assert_eq!(url.path(), "/api/recycle/list");
        let q = query(&url);
        assert_eq!(q["page"], "3");
        assert_eq!(q["num"], "100");
        assert_eq!(q["dir"], "/my docs");
        assert_eq!(q["bdstoken"], "tok123");
        assert_eq!(q["channel"], "chunlei");
        assert_eq!(q["order"], "time");
    }

    #[test]
    fn test_mutation_endpoints() {
        let auth = AuthContext::new("", "t");
        let c = client();
        assert_eq!(c.endpoint(RESTORE_ENDPOINT, &auth).unwrap().path(), "/api/recycle/restore");
        assert_eq!(c.endpoint(CLEAR_ENDPOINT, &auth).unwrap().path(), "/api/recycle/clear");
    }

    #[test]
    fn test_fidlist_json() {
        let json = fidlist_json(&[FsId(11), FsId(987654321012)]).unwrap();
        assert_eq!(json, r#"["11","987654321012"]"#);
    }

    #[test]
    fn test_delete_request_carries_cookie_and_fidlist_form() {
        let auth = AuthContext::new("BDUSS=abc; STOKEN=def", "tok");
        let request = client()
            .fidlist_request(DELETE_ENDPOINT, &auth, &[FsId(11), FsId(22)])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/recycle/delete");
        assert_eq!(query(request.url())["bdstoken"], "tok");
        assert_eq!(request.headers()[COOKIE], "BDUSS=abc; STOKEN=def");
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"fidlist=%5B%2211%22%2C%2222%22%5D");
    }

    #[test]
    fn test_list_and_clear_requests() {
        let auth = AuthContext::new("BDUSS=abc", "tok");
        let c = client();

        let list = c.list_request(&auth, "/", 1).unwrap().build().unwrap();
        assert_eq!(list.method(), reqwest::Method::GET);
        assert_eq!(list.headers()[COOKIE], "BDUSS=abc");
        assert!(list.body().is_none());

        let clear = c.clear_request(&auth).unwrap().build().unwrap();
        assert_eq!(clear.method(), reqwest::Method::POST);
        assert_eq!(clear.url().path(), "/api/recycle/clear");
        assert_eq!(clear.headers()[COOKIE], "BDUSS=abc");
        assert_eq!(clear.body().and_then(|b| b.as_bytes()), Some(&b""[..]));
    }

    #[test]
    fn test_anonymous_request_has_no_cookie() {
        let auth = AuthContext::new("", "tok");
        let request = client().list_request(&auth, "/", 1).unwrap().build().unwrap();
        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_decode_errno_bodies() {
        let ack: AckDto = decode(br#"{"errno": -9, "request_id": 42}"#).unwrap();
        assert_eq!(ack.request_id, Some(42));
        let err = ack.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::RemoteError);

        let list: ListTrashResponseDto = decode(br#"{"errno": -6}"#).unwrap();
        assert!(!list.is_success());
        assert!(list.list.is_empty());

        let err = decode::<AckDto>(b"<html>login</html>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalError);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = PcsTrashClient::with_client(Client::new(), "not a url", 100).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_cookie_with_newline_is_rejected() {
        let auth = AuthContext::new("BDUSS=a\nb", "t");
        let c = client();
        let request = c.client.get("https://pan.example.com/");
        let err = c.with_cookie(request, &auth).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
    }
}
