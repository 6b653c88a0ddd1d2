use crate::core::table::{extract_features, parse_csv};
use crate::domain::model::{
    Label, PredictionResult, Rendered, UploadForm, UploadFormView, UploadRequest, UploadedFile,
    UploadedTable, View, BUY_LABEL, NO_BUY_LABEL, PREDICTION_COLUMN,
};
use crate::domain::ports::Predictor;
use crate::utils::error::{RfmError, Result};
use crate::utils::validation::Validate;
use std::sync::Arc;

pub const FIELD_REQUIRED: &str = "This field is required.";
pub const FILE_EMPTY: &str = "The submitted file is empty.";

impl UploadForm {
    /// The submitted file, or the field error explaining why there is none.
    pub fn valid_file(&self) -> Result<&UploadedFile> {
        let message = match &self.file {
            Some(file) if !file.content.is_empty() => return Ok(file),
            Some(_) => FILE_EMPTY,
            None => FIELD_REQUIRED,
        };

        Err(RfmError::ValidationError {
            field_errors: vec![message.to_string()],
        })
    }
}

impl Validate for UploadForm {
    fn validate(&self) -> Result<()> {
        self.valid_file().map(|_| ())
    }
}

/// Turns an upload request into the page to render.
#[derive(Clone)]
pub struct UploadPredictHandler {
    predictor: Arc<dyn Predictor>,
}

impl UploadPredictHandler {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn handle(&self, request: UploadRequest) -> Rendered {
        match request {
            UploadRequest::Get => Rendered::ok(View::UploadForm(UploadFormView::default())),
            UploadRequest::Post(form) => match self.process(&form) {
                Ok(result) => {
                    tracing::info!(
                        rows = result.predictions.len(),
                        buy_count = result.buy_count,
                        no_buy_count = result.no_buy_count,
                        "Upload scored"
                    );
                    Rendered::ok(View::Result(result))
                }
                Err(e) => render_error(e),
            },
        }
    }

    /// Validate, parse, check schema, predict and aggregate one upload.
    pub fn process(&self, form: &UploadForm) -> Result<PredictionResult> {
        let file = form.valid_file()?;

        let table = parse_csv(&file.content)?;
        let features = extract_features(&table)?;

        let predictions = self.predictor.predict(&features)?;
        if predictions.len() != features.len() {
            return Err(RfmError::ModelError {
                message: format!(
                    "{} returned {} labels for {} rows",
                    self.predictor.describe(),
                    predictions.len(),
                    features.len()
                ),
            });
        }

        Ok(augment(table, predictions))
    }
}

/// Appends the prediction column and tallies the labels.
pub fn augment(mut table: UploadedTable, predictions: Vec<Label>) -> PredictionResult {
    let (buy_count, no_buy_count) = count_labels(&predictions);

    table.headers.push(PREDICTION_COLUMN.to_string());
    for (row, label) in table.rows.iter_mut().zip(&predictions) {
        row.push(label.to_string());
    }

    PredictionResult {
        table,
        predictions,
        buy_count,
        no_buy_count,
    }
}

/// Returns `(buy_count, no_buy_count)`; other labels land in neither bucket.
pub fn count_labels(predictions: &[Label]) -> (usize, usize) {
    predictions
        .iter()
        .fold((0, 0), |(buy, no_buy), label| match *label {
            BUY_LABEL => (buy + 1, no_buy),
            NO_BUY_LABEL => (buy, no_buy + 1),
            _ => (buy, no_buy),
        })
}

/// Upload form carrying the error, with the status the error maps to.
pub fn render_error(e: RfmError) -> Rendered {
    let status = e.status_code();
    if status >= 500 {
        tracing::error!(
            "❌ Upload failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
    } else {
        tracing::warn!(status, "Upload rejected: {}", e);
    }

    let view = match e {
        RfmError::ValidationError { field_errors } => UploadFormView {
            error: None,
            field_errors,
        },
        other => UploadFormView {
            error: Some(other.user_friendly_message()),
            field_errors: Vec::new(),
        },
    };

    Rendered {
        status,
        view: View::UploadForm(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureRow;
    use crate::utils::error::MISSING_COLUMNS_MESSAGE;

    struct FixedLabel(Label);

    impl Predictor for FixedLabel {
        fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>> {
            Ok(vec![self.0; rows.len()])
        }
    }

    struct ShortPredictor;

    impl Predictor for ShortPredictor {
        fn predict(&self, _rows: &[FeatureRow]) -> Result<Vec<Label>> {
            Ok(vec![1])
        }
    }

    fn post(content: &str) -> UploadRequest {
        UploadRequest::Post(UploadForm {
            file: Some(UploadedFile {
                filename: Some("customers.csv".to_string()),
                content: content.as_bytes().to_vec(),
            }),
        })
    }

    fn form_view(rendered: &Rendered) -> &UploadFormView {
        match &rendered.view {
            View::UploadForm(view) => view,
            View::Result(_) => panic!("expected the upload form"),
        }
    }

    #[test]
    fn test_get_renders_empty_form() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(UploadRequest::Get);
        assert_eq!(rendered, Rendered::ok(View::UploadForm(UploadFormView::default())));
    }

    #[test]
    fn test_all_buy_predictor_counts_five_rows() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let csv = "recency,frequency,monetary\n1,2,3\n4,5,6\n7,8,9\n10,11,12\n13,14,15\n";
        let rendered = handler.handle(post(csv));

        assert_eq!(rendered.status, 200);
        match rendered.view {
            View::Result(result) => {
                assert_eq!(result.buy_count, 5);
                assert_eq!(result.no_buy_count, 0);
                assert_eq!(result.predictions.len(), 5);
                assert_eq!(result.table.headers.last().unwrap(), PREDICTION_COLUMN);
            }
            View::UploadForm(_) => panic!("expected a result page"),
        }
    }

    #[test]
    fn test_missing_column_renders_fixed_message() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(post("recency,frequency\n1,2\n"));

        assert_eq!(rendered.status, 200);
        let view = form_view(&rendered);
        assert_eq!(view.error.as_deref(), Some(MISSING_COLUMNS_MESSAGE));
        assert!(view.field_errors.is_empty());
    }

    #[test]
    fn test_missing_and_empty_file_are_field_errors() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));

        let rendered = handler.handle(UploadRequest::Post(UploadForm::default()));
        assert_eq!(rendered.status, 200);
        assert_eq!(form_view(&rendered).field_errors, vec![FIELD_REQUIRED]);
        assert!(form_view(&rendered).error.is_none());

        let rendered = handler.handle(post(""));
        assert_eq!(form_view(&rendered).field_errors, vec![FILE_EMPTY]);
    }

    #[test]
    fn test_validate_agrees_with_valid_file() {
        assert!(UploadForm::default().validate().is_err());
        let form = UploadForm {
            file: Some(UploadedFile {
                filename: None,
                content: b"recency".to_vec(),
            }),
        };
        assert!(form.validate().is_ok());
        assert_eq!(form.valid_file().unwrap().content, b"recency");
    }

    #[test]
    fn test_short_row_without_feature_column_reports_missing_columns() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(post("recency,frequency\n1\n"));

        assert_eq!(rendered.status, 200);
        assert_eq!(
            form_view(&rendered).error.as_deref(),
            Some(MISSING_COLUMNS_MESSAGE)
        );
    }

    #[test]
    fn test_short_row_in_extra_column_is_scored() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(post("recency,frequency,monetary,extra\n1,2,3\n4,5,6,x\n"));

        assert_eq!(rendered.status, 200);
        match rendered.view {
            View::Result(result) => {
                assert_eq!(result.buy_count, 2);
                assert_eq!(result.table.rows[0], vec!["1", "2", "3", "", "1"]);
            }
            View::UploadForm(_) => panic!("expected a result page"),
        }
    }

    #[test]
    fn test_short_row_missing_feature_cell_names_row() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(post("recency,frequency,monetary\n1,2,3\n4,5\n"));

        assert_eq!(rendered.status, 400);
        assert_eq!(
            form_view(&rendered).error.as_deref(),
            Some("Row 2: column 'monetary' is empty")
        );
    }

    #[test]
    fn test_row_wider_than_header_is_client_error() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(1)));
        let rendered = handler.handle(post("recency,frequency,monetary\n1,2,3\n4,5,6,7\n"));

        assert_eq!(rendered.status, 400);
        assert!(form_view(&rendered)
            .error
            .as_deref()
            .unwrap()
            .contains("row 2 has 4 fields"));
    }

    #[test]
    fn test_bad_number_is_client_error() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(0)));
        let rendered = handler.handle(post("recency,frequency,monetary\n1,2,abc\n"));
        assert_eq!(rendered.status, 400);
        assert!(form_view(&rendered)
            .error
            .as_deref()
            .unwrap()
            .contains("monetary"));
    }

    #[test]
    fn test_label_count_mismatch_is_server_error() {
        let handler = UploadPredictHandler::new(Arc::new(ShortPredictor));
        let rendered = handler.handle(post("recency,frequency,monetary\n1,2,3\n4,5,6\n"));
        assert_eq!(rendered.status, 500);
    }

    #[test]
    fn test_unknown_labels_are_not_counted() {
        assert_eq!(count_labels(&[1, 0, 2, -1, 1]), (2, 1));
    }

    #[test]
    fn test_same_upload_yields_same_result() {
        let handler = UploadPredictHandler::new(Arc::new(FixedLabel(0)));
        let csv = "recency,frequency,monetary,extra\n1,2,3,a\n";
        assert_eq!(handler.handle(post(csv)), handler.handle(post(csv)));
    }
}
