//! HTTP client wrapper - executes requests and captures responses

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::config::Config;
use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::models::{Request, Response};

/// Build the shared client from the user's settings
pub fn build_client(config: &Config) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout())
        .danger_accept_invalid_certs(!config.ssl_verify);

    let proxy = config.proxy.trim();
    if !proxy.is_empty() {
        match reqwest::Proxy::all(proxy) {
            Ok(p) => builder = builder.proxy(p),
            Err(e) => tracing::warn!(proxy, error = %e, "Ignoring invalid proxy"),
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default HTTP client");
        reqwest::Client::new()
    })
}

/// Turn a request into a reqwest builder. Every header replaces any previous
/// value for the same name; a body without an explicit content type is sent
/// as JSON.
fn build_request(
    client: &reqwest::Client,
    request: &Request,
) -> Result<reqwest::RequestBuilder, String> {
    let url = reqwest::Url::parse(request.url.trim()).map_err(|e| format!("Invalid URL: {}", e))?;

    let mut headers = HeaderMap::new();
    for (key, value) in &request.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| format!("Invalid header name: {:?}", key))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| format!("Invalid value for header {}", key))?;
        headers.insert(name, value);
    }

    if !request.body.is_empty() && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    let mut req_builder = client.request(request.method.into(), url).headers(headers);
    if !request.body.is_empty() {
        req_builder = req_builder.body(request.body.clone());
    }

    Ok(req_builder)
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

/// Execute one request. Never fails: problems are reported through
/// `Response::error`.
pub async fn execute(client: &reqwest::Client, request: &Request) -> Response {
    let start = Instant::now();

    let req_builder = match build_request(client, request) {
        Ok(builder) => builder,
        Err(msg) => return Response::failed(msg, start.elapsed()),
    };

    let resp = match req_builder.send().await {
        Ok(resp) => resp,
        Err(e) => return Response::failed(describe_error(&e), start.elapsed()),
    };

    let status_code = resp.status().as_u16();
    let status = match resp.status().canonical_reason() {
        Some(reason) => format!("{} {}", status_code, reason),
        None => status_code.to_string(),
    };

    let mut headers = std::collections::BTreeMap::<String, Vec<String>>::new();
    for (name, value) in resp.headers() {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    match resp.bytes().await {
        Ok(body) => Response {
            status_code,
            status,
            headers,
            size: body.len() as u64,
            body: body.to_vec(),
            duration: start.elapsed(),
            error: None,
        },
        Err(e) => Response {
            status_code,
            status,
            headers,
            duration: start.elapsed(),
            error: Some(format!("Error reading body: {}", e)),
            ..Default::default()
        },
    }
}
