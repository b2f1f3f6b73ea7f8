//! AWS Lambda handler for building triangles over HTTP
//!
//! Accepts a JSON body holding the records (CSV text or flat JSON objects)
//! and the column selection, and returns cumulative triangles plus
//! age-to-age factors per category.
//!
//! Supports Lambda Function URLs for direct HTTP access:
//! - `POST .../triangle`: `{ "ok": true, "triangles": ..., "ldf_triangles": ... }`
//! - `POST .../summary`: `{ "ok": true, "results": [{ "origin", "sum" }] }`
//!
//! Failures return `{ "ok": false, "error": "..." }`.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use loss_triangles::{build, origin_totals, RecordSet, TriangleError, TriangleRequest};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Request body
#[derive(Debug, Deserialize)]
pub struct HttpRequest {
    /// CSV text with a header row
    #[serde(default)]
    pub csv: Option<String>,

    /// Already-parsed flat records, used when `csv` is absent
    #[serde(default)]
    pub records: Option<Vec<Map<String, Value>>>,

    #[serde(flatten)]
    pub request: TriangleRequest,
}

impl HttpRequest {
    fn record_set(&self) -> Result<RecordSet, TriangleError> {
        match (&self.csv, &self.records) {
            (Some(text), _) => RecordSet::from_csv_str(text),
            (None, Some(records)) => Ok(RecordSet::from_json_records(records)),
            (None, None) => Ok(RecordSet::default()),
        }
    }
}

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": body.to_string(),
    })
}

fn error_body(message: &str) -> Value {
    json!({ "ok": false, "error": message })
}

fn build_body(http: &HttpRequest) -> Result<Value, TriangleError> {
    let records = http.record_set()?;
    let output = build(&records, &http.request)?;
    let mut body = serde_json::to_value(&output)?;
    if let Value::Object(map) = &mut body {
        map.insert("ok".to_string(), Value::Bool(true));
    }
    Ok(body)
}

fn summary_body(http: &HttpRequest) -> Result<Value, TriangleError> {
    let records = http.record_set()?;
    let totals = origin_totals(&records, &http.request.origin_col, &http.request.value_col)?;
    Ok(json!({ "ok": true, "results": totals }))
}

/// Function URL response for one request
fn respond(request: LambdaFunctionUrlRequest) -> Value {
    // Handle CORS preflight
    let method = request.request_context.http.method.as_deref().unwrap_or("POST");
    if method.eq_ignore_ascii_case("OPTIONS") {
        return json!({ "statusCode": 200, "headers": cors_headers() });
    }

    if request.is_base64_encoded {
        return response(400, &error_body("Binary bodies are not supported; send JSON text"));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let http: HttpRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return response(400, &error_body(&format!("Invalid JSON: {}", e)));
        }
    };

    let path = request.raw_path.unwrap_or_default();
    let path = path.trim_end_matches('/');
    let result = if path.ends_with("/summary") || path.ends_with("/summary/ay-sum") {
        summary_body(&http)
    } else {
        build_body(&http)
    };

    match result {
        Ok(body) => response(200, &body),
        Err(e) => {
            log::info!("Build rejected: {}", e);
            response(200, &error_body(&e.to_string()))
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<Value, Error> {
    Ok(respond(event.payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
