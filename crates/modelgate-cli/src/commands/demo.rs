use std::io::{self, BufRead, Write};

use modelgate_core::{ModelSelector, Selection, UnavailableReason};
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize, PartialEq)]
struct DemoSummary {
    shown: Vec<String>,
    excluded: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopped_because: Option<UnavailableReason>,
}

pub async fn run(selector: &ModelSelector) -> Result<CommandResult, CliError> {
    let stdin = io::stdin();
    let stderr = io::stderr();
    let summary = run_loop(selector, stdin.lock(), stderr.lock()).await?;

    Ok(CommandResult::ok(serde_json::to_value(summary)?))
}

/// Prompts go to `output` so the final JSON on stdout stays machine-readable.
async fn run_loop<R, W>(
    selector: &ModelSelector,
    mut input: R,
    mut output: W,
) -> Result<DemoSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = DemoSummary {
        shown: Vec::new(),
        excluded: Vec::new(),
        stopped_because: None,
    };

    loop {
        let entry = match selector.next().await {
            Selection::Candidate(entry) => entry,
            Selection::Unavailable(reason) => {
                writeln!(output, "No more candidates available: {reason}")?;
                summary.stopped_because = Some(reason);
                break;
            }
        };

        if summary.shown.last() != Some(&entry.id) {
            summary.shown.push(entry.id.clone());
        }
        writeln!(output)?;
        writeln!(output, "Selected candidate: {}", entry.id)?;
        writeln!(output, "  Name: {}", entry.name)?;
        writeln!(output, "  Context: {}", entry.context_length)?;
        write!(output, "Simulate (s)uccess or (f)ailure? [s/f/q]: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match line.trim().to_lowercase().as_str() {
            "q" => break,
            "f" => {
                selector.exclude(&entry.id).await;
                summary.excluded.push(entry.id);
            }
            _ => writeln!(output, "Keeping current candidate.")?,
        }
    }

    Ok(summary)
}
