//! HTML-like table labels for node attribute maps.
//!
//! Each attribute becomes one `<TR>` with a key cell and a value cell, rows
//! sorted by key. Nested maps render as nested tables, lists as one cell with
//! `<BR/>` separated items.

use serde_json::Value;

use placement_core::{Attrs, FieldFilter};

const TABLE_OPEN: &str =
    "<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">\n";
const TABLE_CLOSE: &str = "</TABLE>\n";

/// Escape text for use inside an HTML-like label.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render `attrs` as a table keeping only the keys `filter` accepts.
///
/// A map with no accepted keys renders as `{}`. A `header` becomes a
/// borderless first row.
pub fn render_table(attrs: &Attrs, filter: &dyn FieldFilter, header: Option<&str>) -> String {
    let rows = visible_rows(attrs, filter);
    if rows.is_empty() {
        return "{}".to_string();
    }

    let mut output = String::from(TABLE_OPEN);
    if let Some(header) = header {
        output.push_str("<TR BORDER=\"0\" CELLBORDER=\"0\">");
        output.push_str("<TD ALIGN=\"LEFT\" BALIGN=\"LEFT\" BORDER=\"0\">");
        output.push_str(&escape_html(header));
        output.push_str("</TD></TR>\n");
    }
    for (key, value) in rows {
        output.push_str("<TR>");
        output.push_str(&cell(&escape_html(key)));
        output.push_str(&render_value(value, filter));
        output.push_str("</TR>\n");
    }
    output.push_str(TABLE_CLOSE);
    output
}

/// Accepted rows sorted by key.
fn visible_rows<'a, I>(rows: I, filter: &dyn FieldFilter) -> Vec<(&'a String, &'a Value)>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut rows: Vec<(&String, &Value)> =
        rows.into_iter().filter(|(key, _)| filter.accepts(key)).collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows
}

fn render_value(value: &Value, filter: &dyn FieldFilter) -> String {
    match value {
        Value::Array(items) if items.is_empty() => cell("[]"),
        Value::Array(items) => {
            let items: Vec<String> =
                items.iter().map(|item| escape_html(&scalar_text(item))).collect();
            cell(&items.join("<BR/>"))
        }
        Value::Object(map) => cell(&render_table(map, filter, None)),
        scalar => cell(&escape_html(&scalar_text(scalar))),
    }
}

/// Textual form of a scalar: strings unquoted, everything else as JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn cell(content: &str) -> String {
    format!("<TD  ALIGN=\"LEFT\" BALIGN=\"LEFT\">{content}</TD>")
}
