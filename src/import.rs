use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Serialize;

use crate::model::candidate::Candidate;
use crate::model::vote::Vote;

/// Outcome counters for a bulk CSV import, as reported to the admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows turned into votes.
    pub imported: usize,
    /// Imported rows with at least one null field.
    pub null_votes: usize,
    /// Rows dropped entirely (all fields blank or unreadable).
    pub invalid_rows: usize,
}

/// Votes parsed out of a CSV upload, plus the counters for the report.
#[derive(Debug)]
pub struct ParsedImport {
    pub votes: Vec<Vote>,
    pub summary: ImportSummary,
}

/// Parse raw CSV text into votes.
///
/// The first line is a header and is discarded. Each non-blank line
/// contributes president/mayor/deputy fields (missing trailing fields
/// read as blank, extras are ignored). A row whose three fields are all
/// blank is counted invalid and dropped; otherwise blank or unknown ids
/// normalize to null votes. Bad rows never fail the whole import.
pub fn parse_votes(csv_text: &str, candidates: &[Candidate]) -> ParsedImport {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut votes = Vec::new();
    let mut summary = ImportSummary::default();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("Dropping unreadable CSV row: {err}");
                summary.invalid_rows += 1;
                continue;
            }
        };

        let president_raw = record.get(0).unwrap_or("");
        let mayor_raw = record.get(1).unwrap_or("");
        let deputy_raw = record.get(2).unwrap_or("");

        if president_raw.trim().is_empty()
            && mayor_raw.trim().is_empty()
            && deputy_raw.trim().is_empty()
        {
            summary.invalid_rows += 1;
            continue;
        }

        let president = Vote::normalize(president_raw, candidates);
        let mayor = Vote::normalize(mayor_raw, candidates);
        let deputy = Vote::normalize(deputy_raw, candidates);

        if president.is_none() || mayor.is_none() || deputy.is_none() {
            summary.null_votes += 1;
        }

        votes.push(Vote::imported(president, mayor, deputy));
        summary.imported += 1;
    }

    ParsedImport { votes, summary }
}
