use std::io::{self, Write};

use super::{headers, row};
use crate::models::AnalyzedRecord;

/// GitHub-flavored Markdown table.
pub fn markdown<W: Write>(records: &[AnalyzedRecord], out: &mut W) -> io::Result<()> {
    let header: Vec<&str> = headers().collect();
    writeln!(out, "| {} |", header.join(" | "))?;

    let separator: Vec<String> = header.iter().map(|h| "-".repeat(h.len())).collect();
    writeln!(out, "| {} |", separator.join(" | "))?;

    for record in records {
        let cells: Vec<String> = row(record)
            .into_iter()
            .map(|cell| cell.replace('|', "\\|"))
            .collect();
        writeln!(out, "| {} |", cells.join(" | "))?;
    }
    Ok(())
}

/// Comma-separated values, one header line.
pub fn csv<W: Write>(records: &[AnalyzedRecord], out: &mut W) -> io::Result<()> {
    let header: Vec<&str> = headers().collect();
    writeln!(out, "{}", header.join(", "))?;

    for record in records {
        let cells: Vec<String> = row(record).into_iter().map(quote_csv).collect();
        writeln!(out, "{}", cells.join(", "))?;
    }
    Ok(())
}

/// Tab-separated values, one header line.
pub fn tsv<W: Write>(records: &[AnalyzedRecord], out: &mut W) -> io::Result<()> {
    let header: Vec<&str> = headers().collect();
    writeln!(out, "{}", header.join("\t"))?;

    for record in records {
        let cells: Vec<String> = row(record)
            .into_iter()
            .map(|cell| cell.replace(['\t', '\n'], " "))
            .collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    Ok(())
}

fn quote_csv(cell: String) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell
    }
}
