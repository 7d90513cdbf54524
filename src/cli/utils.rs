use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::pages::{Notice, NoticeKind};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a warning: the action took effect, but a later step failed
pub fn output_warning(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message,
                "warning": error_code,
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("! {}", message);
        }
    }
    Ok(())
}

/// Output rendered list rows, or `empty_message` when there are none
pub fn output_rows(output_format: &OutputFormat, rows: &[String], empty_message: &str) {
    if *output_format != OutputFormat::Text {
        return;
    }

    if rows.is_empty() {
        println!("{}", empty_message);
    }
    for row in rows {
        println!("  {}", row);
    }
}

/// Print a page notice; an error notice becomes the command's error so the
/// process exits non-zero. Warnings exit zero since the action took effect.
pub fn report(output_format: &OutputFormat, notice: Notice, data: Option<Value>) -> anyhow::Result<()> {
    match notice.kind {
        NoticeKind::Success => return output_success(output_format, &notice.message, data),
        NoticeKind::Warning => {
            let code = notice.error.as_ref().map(|e| e.error_code());
            return output_warning(output_format, &notice.message, code, data);
        }
        NoticeKind::Error => {}
    }

    let code = notice.error.as_ref().map(|e| e.error_code());
    if *output_format == OutputFormat::Json {
        output_error(output_format, &notice.message, code)?;
    }

    match notice.error {
        Some(err) => Err(anyhow::Error::new(err).context(notice.message)),
        None => Err(anyhow::anyhow!(notice.message)),
    }
}
