//! Output formatting: table or JSON.
//!
//! Table rendering uses `tabled`; JSON serializes the summary as the
//! HTTP boundary would return it.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use rastro_core::{BatchSummary, TrackResult};

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "LAST UPDATE")]
    last_update: String,
    #[tabled(rename = "LATEST EVENT")]
    latest_event: String,
    #[tabled(rename = "ORIGIN")]
    origin: String,
}

fn to_row(result: &TrackResult) -> ResultRow {
    let status = if result.ok {
        "ok".green().to_string()
    } else {
        "failed".red().to_string()
    };

    let (last_update, latest_event, origin) = match (&result.data, &result.error) {
        (Some(record), _) => {
            let newest = record.events.first();
            (
                record.last_update.clone().unwrap_or_else(|| "-".into()),
                newest
                    .and_then(|e| e.description.clone())
                    .unwrap_or_else(|| "-".into()),
                newest
                    .and_then(|e| e.from_text.clone())
                    .unwrap_or_else(|| "-".into()),
            )
        }
        (None, Some(error)) => ("-".into(), error.message.clone(), "-".into()),
        (None, None) => ("-".into(), "no data".into(), "-".into()),
    };

    ResultRow {
        code: result.code.clone(),
        status,
        last_update,
        latest_event,
        origin,
    }
}

/// Render the batch summary in the requested format.
pub fn render(summary: &BatchSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ResultRow> = summary.results.iter().map(to_row).collect();
            let table = Table::new(rows).with(Style::sharp()).to_string();
            format!(
                "{table}\n{} requested, {} succeeded, {} failed",
                summary.requested, summary.succeeded, summary.failed
            )
        }
        OutputFormat::Json => serde_json::to_string_pretty(summary).unwrap_or_default(),
        OutputFormat::JsonCompact => serde_json::to_string(summary).unwrap_or_default(),
    }
}
