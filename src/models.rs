use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    /// All supported methods in selector order
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(0)
    }

    pub fn next(&self) -> HttpMethod {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> HttpMethod {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        }
    }
}

/// A request being edited or sent. `id == 0` means it has never been saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }
}

/// Outcome of one execution
#[derive(Clone, Debug, Default)]
pub struct Response {
    pub status_code: u16,
    /// Status line, e.g. "200 OK"
    pub status: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: Vec<u8>,
    pub duration: Duration,
    pub size: u64,
    pub error: Option<String>,
}

impl Response {
    /// Response carrying only an error and the time spent before it happened
    pub fn failed(error: impl Into<String>, duration: Duration) -> Self {
        Response {
            error: Some(error.into()),
            duration,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A group of saved requests
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl Collection {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Collection {
            id: 0,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Persisted form of a request; headers are kept as JSON text
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRequest {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: String,
    pub body: String,
    pub collection_id: i64,
}

impl SavedRequest {
    pub fn from_request(request: &Request, collection_id: i64) -> Self {
        let headers = serde_json::to_string(&request.headers).unwrap_or_else(|_| "{}".to_string());
        SavedRequest {
            id: request.id,
            name: request.name.clone(),
            url: request.url.clone(),
            method: request.method.as_str().to_string(),
            headers,
            body: request.body.clone(),
            collection_id,
        }
    }

    /// Convert back to an editable request. Unreadable header text becomes an
    /// empty map and an unknown method becomes GET.
    pub fn to_request(&self) -> Request {
        let headers = if self.headers.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&self.headers).unwrap_or_default()
        };
        Request {
            id: self.id,
            name: self.name.clone(),
            method: self.method.parse().unwrap_or_default(),
            url: self.url.clone(),
            headers,
            body: self.body.clone(),
        }
    }

    /// Decoded header map, for comparisons that shouldn't depend on JSON layout
    pub fn header_map(&self) -> BTreeMap<String, String> {
        self.to_request().headers
    }
}

/// One executed request in the history log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub method: String,
    pub status_code: u16,
    pub duration_ms: i64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn record(request: &Request, response: &Response) -> Self {
        HistoryEntry {
            id: 0,
            url: request.url.clone(),
            method: request.method.as_str().to_string(),
            status_code: response.status_code,
            duration_ms: response.duration.as_millis() as i64,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_cycle_wraps() {
        assert_eq!(HttpMethod::OPTIONS.next(), HttpMethod::GET);
        assert_eq!(HttpMethod::GET.prev(), HttpMethod::OPTIONS);
        assert_eq!(HttpMethod::POST.next(), HttpMethod::PUT);
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("patch".parse::<HttpMethod>(), Ok(HttpMethod::PATCH));
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn saved_request_keeps_headers() {
        let mut request = Request::new();
        request.name = "Ping".to_string();
        request.method = HttpMethod::POST;
        request.url = "https://api.example.com/ping".to_string();
        request.headers.insert("X-Test".to_string(), "1".to_string());

        let saved = SavedRequest::from_request(&request, 1);
        assert_eq!(saved.method, "POST");
        assert_eq!(saved.collection_id, 1);
        assert_eq!(saved.to_request(), request);
    }

    #[test]
    fn saved_request_tolerates_bad_header_text() {
        let saved = SavedRequest {
            method: "bogus".to_string(),
            headers: "not json".to_string(),
            ..Default::default()
        };
        let request = saved.to_request();
        assert!(request.headers.is_empty());
        assert_eq!(request.method, HttpMethod::GET);
    }

    #[test]
    fn failed_response_is_error() {
        let response = Response::failed("boom", Duration::from_millis(3));
        assert!(response.is_error());
        assert!(!response.is_success());
        assert_eq!(response.size, 0);
    }
}
