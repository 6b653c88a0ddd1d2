//! HTML for the upload form and the result page.

use crate::domain::model::{PredictionResult, UploadFormView, UploadedTable, View};
use std::fmt::Write;

pub fn render(view: &View) -> String {
    match view {
        View::UploadForm(form) => render_upload_form(form),
        View::Result(result) => render_result(result),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn render_upload_form(form: &UploadFormView) -> String {
    let mut body = String::from("  <h1>Upload customer CSV</h1>\n");

    if let Some(error) = &form.error {
        let _ = writeln!(body, "  <p class=\"error\">{}</p>", escape_html(error));
    }

    body.push_str("  <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n");
    if !form.field_errors.is_empty() {
        body.push_str("    <ul class=\"errorlist\">\n");
        for error in &form.field_errors {
            let _ = writeln!(body, "      <li>{}</li>", escape_html(error));
        }
        body.push_str("    </ul>\n");
    }
    body.push_str("    <label for=\"id_file\">File:</label>\n");
    body.push_str("    <input type=\"file\" name=\"file\" id=\"id_file\" accept=\".csv\" required>\n");
    body.push_str("    <button type=\"submit\">Predict</button>\n");
    body.push_str("  </form>\n");

    page("Upload CSV", &body)
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut body = String::from("  <h1>Prediction results</h1>\n");
    let _ = writeln!(
        body,
        "  <p>Customers likely to buy: <strong id=\"buy-count\">{}</strong></p>",
        result.buy_count
    );
    let _ = writeln!(
        body,
        "  <p>Customers unlikely to buy: <strong id=\"no-buy-count\">{}</strong></p>",
        result.no_buy_count
    );
    body.push_str(&table_to_html(&result.table));
    body.push_str("  <p><a href=\"/upload\">Upload another file</a></p>\n");

    page("Prediction results", &body)
}

/// Dataframe-style dump: an unnamed index column followed by every column.
pub fn table_to_html(table: &UploadedTable) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n");
    html.push_str("    <tr style=\"text-align: right;\">\n      <th></th>\n");
    for header in &table.headers {
        let _ = writeln!(html, "      <th>{}</th>", escape_html(header));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for (index, row) in table.rows.iter().enumerate() {
        html.push_str("    <tr>\n");
        let _ = writeln!(html, "      <th>{}</th>", index);
        for cell in row {
            let _ = writeln!(html, "      <td>{}</td>", escape_html(cell));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}
