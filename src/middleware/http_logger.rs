use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: [&str; 8] = [
    "password",
    "new_password",
    "token",
    "access_token",
    "refresh_token",
    "authorization",
    "secret",
    "jwt_secret",
];

const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "cookie", "set-cookie", "x-api-key"];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
        || path.starts_with("/swagger-ui")
        || path.starts_with("/api-docs")
}

/// Replaces sensitive values at any depth of a JSON document.
fn filter_sensitive_data(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if SENSITIVE_FIELDS.contains(&key.to_lowercase().as_str()) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, filter_sensitive_data(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(filter_sensitive_data).collect()),
        other => other,
    }
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();
    for name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(name) {
            filtered_headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    filtered_headers
}

fn parse_json_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => filter_sensitive_data(json),
        Err(_) => Value::Object(serde_json::Map::new()),
    }
}

pub async fn http_logger(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    if method == Method::OPTIONS || should_ignore_path(&path) {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (parts, body) = req.into_parts();
    let bytes = buffer_body("request", body).await?;
    let req_body = parse_json_body(&bytes);
    let req = Request::from_parts(parts, Body::from(bytes));

    let mut response = next.run(req).await;

    let latency = start_time.elapsed();
    let status = response.status();
    let res_headers = response.headers().clone();

    let should_log_body = matches!(method, Method::POST | Method::PUT | Method::PATCH)
        || status.is_client_error()
        || status.is_server_error();
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let json_body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(json) => filter_sensitive_data(json),
            Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        };
        response = Response::from_parts(parts, Body::from(bytes));
        json_body
    } else {
        Value::Object(serde_json::Map::new())
    };

    let filtered_req_headers = filter_sensitive_headers(&req_headers);
    let filtered_res_headers = filter_sensitive_headers(&res_headers);

    macro_rules! log_request {
        ($level:ident) => {
            tracing::$level!(
                method = %method,
                path = %path,
                query = uri.query().unwrap_or(""),
                x_request_id = %x_request_id,
                req_headers = ?filtered_req_headers,
                req_body = %req_body,
                status = status.as_u16(),
                latency_ms = latency.as_millis(),
                res_headers = ?filtered_res_headers,
                res_body = %res_body,
                "HTTP request completed"
            )
        };
    }

    if status.is_server_error() {
        log_request!(error);
    } else if status.is_client_error() {
        log_request!(warn);
    } else {
        log_request!(info);
    }

    Ok(response)
}

pub async fn buffer_body<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| {
            (
                StatusCode::BAD_REQUEST,
                format!("failed to read {direction} body: {err}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_nested_fields() {
        let body = json!({
            "email": "admin@instituto.edu.ar",
            "password": "hunter2",
            "user": { "access_token": "abc", "full_name": "Ana" },
            "items": [{ "secret": "x", "code": "MAT101" }]
        });

        let filtered = filter_sensitive_data(body);

        assert_eq!(filtered["email"], "admin@instituto.edu.ar");
        assert_eq!(filtered["password"], REDACTED);
        assert_eq!(filtered["user"]["access_token"], REDACTED);
        assert_eq!(filtered["user"]["full_name"], "Ana");
        assert_eq!(filtered["items"][0]["secret"], REDACTED);
        assert_eq!(filtered["items"][0]["code"], "MAT101");
    }

    #[test]
    fn test_redacts_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);

        assert_eq!(filtered["authorization"], REDACTED);
        assert_eq!(filtered["content-type"], "application/json");
    }

    #[test]
    fn test_ignored_paths() {
        assert!(should_ignore_path("/health"));
        assert!(should_ignore_path("/swagger-ui/index.html"));
        assert!(should_ignore_path("/api-docs/openapi.json"));
        assert!(!should_ignore_path("/api/v1/enrollments"));
    }

    #[test]
    fn test_non_json_body_logs_empty_object() {
        assert_eq!(parse_json_body(b"not json"), json!({}));
    }
}
