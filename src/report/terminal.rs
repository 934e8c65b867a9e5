use std::io::{self, Write};

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::{headers, row, COLUMNS};
use crate::models::AnalyzedRecord;

/// Render a boxed table of every record.
pub fn render<W: Write>(records: &[AnalyzedRecord], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", build_table(records))
}

fn build_table(records: &[AnalyzedRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );

    let skip_column = column_index("Skip");
    let score_column = column_index("Score");

    for record in records {
        let cells = row(record).into_iter().enumerate().map(|(i, value)| {
            let cell = Cell::new(value);
            if Some(i) == skip_column {
                let color = if record.skip() { Color::Yellow } else { Color::Green };
                cell.fg(color).set_alignment(CellAlignment::Center)
            } else if Some(i) == score_column {
                match record.score() {
                    Some(s) if s < 0 => cell.fg(Color::Red),
                    Some(_) => cell.set_alignment(CellAlignment::Right),
                    None => cell.fg(Color::DarkGrey),
                }
            } else {
                cell
            }
        });
        table.add_row(cells.collect::<Vec<_>>());
    }

    table
}

fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|(column, _)| *column == name)
}

/// One-line colored count of analyzed vs skipped records.
pub fn summary(records: &[AnalyzedRecord]) -> String {
    let skipped = records.iter().filter(|r| r.skip()).count();
    let analyzed = records.len() - skipped;
    format!(
        "{} {} dependencies  {} analyzed  {} skipped",
        "stay-or-go".bold(),
        records.len(),
        analyzed.to_string().green(),
        skipped.to_string().yellow(),
    )
}
