use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let document = result.to_document();
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(result),
    }

    Ok(())
}

fn render_table(result: &CommandResult) {
    println!("latency_ms  : {}", result.latency_ms);
    if !result.warnings.is_empty() {
        println!("warnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }

    println!("data:");
    for line in table_lines(&result.data, 1) {
        println!("{line}");
    }
}

fn table_lines(value: &Value, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, value)| match value {
                Value::Object(_) | Value::Array(_) => {
                    let mut lines = vec![format!("{indent}{key}:")];
                    lines.extend(table_lines(value, depth + 1));
                    lines
                }
                scalar => vec![format!("{indent}{key}: {}", scalar_text(scalar))],
            })
            .collect(),
        Value::Array(items) if items.is_empty() => vec![format!("{indent}(none)")],
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(_) | Value::Array(_) => {
                    let mut lines = vec![format!("{indent}-")];
                    lines.extend(table_lines(item, depth + 1));
                    lines
                }
                scalar => vec![format!("{indent}- {}", scalar_text(scalar))],
            })
            .collect(),
        scalar => vec![format!("{indent}{}", scalar_text(scalar))],
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
