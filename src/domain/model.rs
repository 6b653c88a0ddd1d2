use serde::{Deserialize, Serialize};

/// Feature columns handed to the predictor, in input order.
pub const FEATURE_COLUMNS: [&str; 3] = ["recency", "frequency", "monetary"];

/// Name of the column appended to the uploaded table.
pub const PREDICTION_COLUMN: &str = "prediction";

/// Class label emitted by a predictor. Only 0 and 1 are counted.
pub type Label = i64;

pub const BUY_LABEL: Label = 1;
pub const NO_BUY_LABEL: Label = 0;

/// A parsed CSV upload: header names plus raw cell text, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl UploadedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

impl FeatureRow {
    pub fn as_array(&self) -> [f64; 3] {
        [self.recency, self.frequency, self.monetary]
    }
}

/// The uploaded table with a `prediction` column appended, plus the tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub table: UploadedTable,
    pub predictions: Vec<Label>,
    pub buy_count: usize,
    pub no_buy_count: usize,
}

/// A file received in the `file` field of the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    Get,
    Post(UploadForm),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFormView {
    /// Message shown above the form, e.g. the missing-columns notice.
    pub error: Option<String>,
    /// Errors attached to the `file` field itself.
    pub field_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    UploadForm(UploadFormView),
    Result(PredictionResult),
}

/// Outcome of one request: the page to render and its HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: u16,
    pub view: View,
}

impl Rendered {
    pub fn ok(view: View) -> Self {
        Self { status: 200, view }
    }
}
