#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    Router,
};
use rfm_predictor::core::{FeatureRow, Label};
use rfm_predictor::{build_app, AppState, Predictor, Result, RfmError};
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "----rfm-test-boundary";

/// Labels every row the same way.
pub struct ConstantPredictor(pub Label);

impl Predictor for ConstantPredictor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>> {
        Ok(vec![self.0; rows.len()])
    }

    fn describe(&self) -> &str {
        "constant"
    }
}

/// Buys when the customer came back within 30 days.
pub struct RecencyRule;

impl Predictor for RecencyRule {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>> {
        Ok(rows
            .iter()
            .map(|row| if row.recency <= 30.0 { 1 } else { 0 })
            .collect())
    }
}

/// Replays a fixed label sequence, whatever the input.
pub struct ScriptedPredictor(pub Vec<Label>);

impl Predictor for ScriptedPredictor {
    fn predict(&self, _rows: &[FeatureRow]) -> Result<Vec<Label>> {
        Ok(self.0.clone())
    }
}

pub struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn predict(&self, _rows: &[FeatureRow]) -> Result<Vec<Label>> {
        Err(RfmError::ModelError {
            message: "tensor shape mismatch".to_string(),
        })
    }
}

pub fn test_app(predictor: Arc<dyn Predictor>) -> Router {
    test_app_with_limit(predictor, 1024 * 1024)
}

pub fn test_app_with_limit(predictor: Arc<dyn Predictor>, max_upload_bytes: usize) -> Router {
    build_app(Arc::new(AppState::new(predictor, max_upload_bytes)))
}

pub fn multipart_body(field: &str, filename: Option<&str>, content: &str) -> String {
    let disposition = match filename {
        Some(filename) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv",
            field, filename
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"", field),
    };
    format!(
        "--{boundary}\r\n{disposition}\r\n\r\n{content}\r\n--{boundary}--\r\n",
        boundary = BOUNDARY,
        disposition = disposition,
        content = content
    )
}

pub fn upload_request(body: String) -> Request {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn csv_upload(content: &str) -> Request {
    upload_request(multipart_body("file", Some("customers.csv"), content))
}

pub async fn send(app: Router, request: Request) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Reads the number inside `<strong id="{id}">…</strong>`.
pub fn count_in(html: &str, id: &str) -> usize {
    let marker = format!("<strong id=\"{}\">", id);
    let start = html.find(&marker).expect("count marker") + marker.len();
    let end = start + html[start..].find('<').expect("closing tag");
    html[start..end].parse().expect("numeric count")
}
