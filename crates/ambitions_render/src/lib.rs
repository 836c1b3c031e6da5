use std::fmt::Write as _;

use ambitions_core::core_api::{EditReport, FieldChange, FieldRead, Inspection};
use ambitions_core::scan::SaveEntry;
use ambitions_core::schema::FieldId;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const NOT_FOUND_TEXT: &str = "(field not found)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Include the byte offset of each value in the decompressed payload.
    pub verbose: bool,
}

pub fn render_inspection_text(inspection: &Inspection, options: TextRenderOptions) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Save: {}", inspection.path.display())
        .expect("writing to String cannot fail");
    for field in FieldId::ALL {
        let line = match inspection.get(field) {
            FieldRead::Found { offset, value } => {
                with_offset(format_value(value), offset, options)
            }
            FieldRead::NotFound => NOT_FOUND_TEXT.to_string(),
        };
        writeln!(&mut out, "  {field}: {line}").expect("writing to String cannot fail");
    }
    out
}

pub fn render_edit_report_text(report: &EditReport, options: TextRenderOptions) -> String {
    let mut out = String::new();
    if !report.written {
        out.push_str("No changes written.\n");
        return out;
    }

    out.push_str("Changes:\n");
    for (field, change) in &report.changes {
        let line = match *change {
            FieldChange::Changed { offset, old, new } => with_offset(
                format!("{} -> {}", format_value(old), format_value(new)),
                offset,
                options,
            ),
            FieldChange::NotFound => NOT_FOUND_TEXT.to_string(),
        };
        writeln!(&mut out, "  {field}: {line}").expect("writing to String cannot fail");
    }
    if let Some(backup) = &report.backup {
        writeln!(&mut out, "Backup: {}", backup.display()).expect("writing to String cannot fail");
    }
    writeln!(&mut out, "Saved to {}", report.output.display())
        .expect("writing to String cannot fail");
    out
}

pub fn render_save_list_text(dir_label: &str, entries: &[SaveEntry]) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Saves in {dir_label}:").expect("writing to String cannot fail");
    if entries.is_empty() {
        out.push_str("  (no .hsg files in this folder)\n");
        return out;
    }
    for entry in entries {
        writeln!(&mut out, "  {}", entry.display_name).expect("writing to String cannot fail");
    }
    out
}

pub fn render_inspection_json(inspection: &Inspection) -> JsonValue {
    let mut values = JsonMap::new();
    for field in FieldId::ALL {
        values.insert(
            field.to_string(),
            match inspection.get(field) {
                FieldRead::Found { offset, value } => {
                    let mut m = JsonMap::new();
                    m.insert("status".to_string(), JsonValue::from("found"));
                    m.insert("offset".to_string(), JsonValue::from(offset));
                    m.insert("value".to_string(), float_to_json(value));
                    JsonValue::Object(m)
                }
                FieldRead::NotFound => not_found_json(),
            },
        );
    }

    let mut out = JsonMap::new();
    out.insert(
        "path".to_string(),
        JsonValue::String(inspection.path.display().to_string()),
    );
    out.insert("fields".to_string(), JsonValue::Object(values));
    JsonValue::Object(out)
}

pub fn render_edit_report_json(report: &EditReport) -> JsonValue {
    let mut changes = JsonMap::new();
    for (field, change) in &report.changes {
        changes.insert(
            field.to_string(),
            match *change {
                FieldChange::Changed { offset, old, new } => {
                    let mut m = JsonMap::new();
                    m.insert("status".to_string(), JsonValue::from("changed"));
                    m.insert("offset".to_string(), JsonValue::from(offset));
                    m.insert("old".to_string(), float_to_json(old));
                    m.insert("new".to_string(), float_to_json(new));
                    JsonValue::Object(m)
                }
                FieldChange::NotFound => not_found_json(),
            },
        );
    }

    let mut out = JsonMap::new();
    out.insert(
        "input".to_string(),
        JsonValue::String(report.input.display().to_string()),
    );
    out.insert(
        "output".to_string(),
        JsonValue::String(report.output.display().to_string()),
    );
    out.insert("written".to_string(), JsonValue::Bool(report.written));
    out.insert(
        "backup".to_string(),
        match &report.backup {
            Some(path) => JsonValue::String(path.display().to_string()),
            None => JsonValue::Null,
        },
    );
    out.insert("changes".to_string(), JsonValue::Object(changes));
    JsonValue::Object(out)
}

pub fn render_save_list_json(dir_label: &str, entries: &[SaveEntry]) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("dir".to_string(), JsonValue::String(dir_label.to_string()));
    out.insert(
        "saves".to_string(),
        JsonValue::Array(
            entries
                .iter()
                .map(|entry| {
                    let mut m = JsonMap::new();
                    m.insert(
                        "name".to_string(),
                        JsonValue::String(entry.display_name.clone()),
                    );
                    m.insert(
                        "path".to_string(),
                        JsonValue::String(entry.path.display().to_string()),
                    );
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

/// Shortest decimal that reads back as the same `f32`, always showing a
/// fractional part for integral values (`1000.0`, not `1000`).
pub fn format_value(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn with_offset(text: String, offset: usize, options: TextRenderOptions) -> String {
    if options.verbose {
        format!("{text} @ {offset:#x}")
    } else {
        text
    }
}

fn not_found_json() -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("status".to_string(), JsonValue::from("not_found"));
    JsonValue::Object(m)
}

// Going through the f32's own shortest repr keeps 0.1f32 as 0.1 rather than
// 0.10000000149011612. Non-finite values have no JSON number form.
fn float_to_json(value: f32) -> JsonValue {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(JsonNumber::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}
