//! Batch result rows and delimited-text export.

use crate::types::CompanyResult;

/// One batch row: either a completed research result or the per-company
/// error that prevented it (only possible on invalid input).
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub company: String,
    pub outcome: Result<CompanyResult, String>,
}

/// Column headers for the exported table, in order.
pub const CSV_HEADER: [&str; 11] = [
    "Company",
    "Profile",
    "Profile Confidence",
    "Sector",
    "Sector Confidence",
    "Objectives",
    "Objectives Confidence",
    "Profile Source",
    "Sector Source",
    "Objectives Source",
    "Error",
];

impl BatchRow {
    /// Render this row's column values, matching [`CSV_HEADER`].
    pub fn columns(&self) -> [String; 11] {
        match &self.outcome {
            Ok(result) => [
                self.company.clone(),
                result.profile.data.clone(),
                result.profile.confidence_percent(),
                result.sector.data.clone(),
                result.sector.confidence_percent(),
                result.objectives.data.clone(),
                result.objectives.confidence_percent(),
                result.profile.source_display().to_string(),
                result.sector.source_display().to_string(),
                result.objectives.source_display().to_string(),
                String::new(),
            ],
            Err(error) => [
                self.company.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                error.clone(),
            ],
        }
    }
}

/// Render rows as comma-delimited text with a header line.
pub fn to_csv(rows: &[BatchRow]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');
    for row in rows {
        let line: Vec<String> = row.columns().iter().map(|c| csv_field(c)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it carries the delimiter, quotes, or line breaks.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
