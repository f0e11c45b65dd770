use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rigbridge_proto::LinkStats;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct DirectionOutput<'a> {
    direction: &'a str,
    valid_frames: u64,
    invalid_frames: u64,
    write_errors: u64,
}

/// Print the final per-direction link report.
pub fn print_report(directions: &[(&str, LinkStats)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<DirectionOutput<'_>> = directions
                .iter()
                .map(|(name, stats)| DirectionOutput {
                    direction: name,
                    valid_frames: stats.valid_frames,
                    invalid_frames: stats.invalid_frames,
                    write_errors: stats.write_errors,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DIRECTION", "VALID", "INVALID", "WRITE ERRORS"]);
            for (name, stats) in directions {
                table.add_row(vec![
                    name.to_string(),
                    stats.valid_frames.to_string(),
                    stats.invalid_frames.to_string(),
                    stats.write_errors.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, stats) in directions {
                println!(
                    "{name}: valid={} invalid={} write_errors={}",
                    stats.valid_frames, stats.invalid_frames, stats.write_errors
                );
            }
        }
    }
}
