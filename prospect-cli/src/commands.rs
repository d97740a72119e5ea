//! Command handlers: single-company research, batch research, config
//! inspection.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use prospect_core::research::{to_csv, BatchProgress, BatchRow};
use prospect_core::{
    Facet, FacetResult, ProspectConfig, ResearchCallback, ResearchOrchestrator,
};
use std::path::Path;

/// Research one company and print each facet as it completes.
pub async fn research(company: &str, config: &ProspectConfig) -> anyhow::Result<()> {
    let orchestrator = ResearchOrchestrator::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build research pipeline: {}", e))?;

    tracing::info!(company, "starting research");
    let result = orchestrator
        .research_company_with(company, &ConsoleCallback)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("\nResearch complete for {}.", result.company);
    Ok(())
}

/// Prints facet sections as research progresses.
struct ConsoleCallback;

impl ResearchCallback for ConsoleCallback {
    fn on_facet_start(&self, facet: Facet) {
        println!("Searching for {} information...", facet.label());
    }

    fn on_facet_complete(&self, facet: Facet, result: &FacetResult) {
        println!("\n## {}", facet);
        println!("{}", result.data);
        if let Some(source) = &result.source {
            println!("Source: {}", source);
        }
        println!("Confidence: {}\n", result.confidence_percent());
    }
}

/// Research every company named in the input CSV and write the result table.
pub async fn batch(input: &Path, output: &Path, config: &ProspectConfig) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let companies = parse_company_column(&content)?;
    tracing::info!(count = companies.len(), input = %input.display(), "starting batch research");
    if companies.is_empty() {
        anyhow::bail!("no company rows found in {}", input.display());
    }

    let orchestrator = ResearchOrchestrator::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build research pipeline: {}", e))?;

    let bar = ProgressBar::new(companies.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} companies {msg}")?
            .progress_chars("#>-"),
    );

    let progress = BarProgress { bar: &bar };
    let rows = orchestrator
        .research_batch(&companies, Some(&progress as &dyn BatchProgress))
        .await;
    bar.finish_with_message("done");

    std::fs::write(output, to_csv(&rows))
        .with_context(|| format!("failed to write {}", output.display()))?;

    let failures = rows.iter().filter(|r| r.outcome.is_err()).count();
    println!(
        "Researched {} companies ({} failed). Results written to {}",
        rows.len(),
        failures,
        output.display()
    );
    Ok(())
}

struct BarProgress<'a> {
    bar: &'a ProgressBar,
}

impl BatchProgress for BarProgress<'_> {
    fn on_company_start(&self, _index: usize, _total: usize, company: &str) {
        self.bar.set_message(format!("researching {}", company));
    }

    fn on_company_complete(&self, _index: usize, _total: usize, _row: &BatchRow) {
        self.bar.inc(1);
    }
}

/// Print the effective configuration as TOML.
pub fn config_show(config: &ProspectConfig) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Print the config file locations that are consulted, in merge order.
pub fn config_path(workspace: &Path) -> anyhow::Result<()> {
    if let Some(dirs) = directories::ProjectDirs::from("dev", "prospect", "prospect") {
        println!("user:      {}", dirs.config_dir().join("config.toml").display());
    }
    println!(
        "workspace: {}",
        workspace.join(".prospect").join("config.toml").display()
    );
    println!("env:       PROSPECT_* (sections split with __)");
    Ok(())
}

/// Pull the `company_name` column out of a CSV file.
///
/// The header row locates the column; fields are split with quote
/// awareness so a quoted name like `"Amazon.com, Inc."` survives intact
/// and a quoted comma in an earlier column doesn't shift the index.
/// Empty names are kept so they surface as error rows in the result table
/// rather than silently vanishing.
fn parse_company_column(content: &str) -> anyhow::Result<Vec<String>> {
    let mut lines = content.lines();
    let header = lines.next().context("input CSV is empty")?;

    let column = split_csv_line(header)
        .iter()
        .position(|field| field.trim().eq_ignore_ascii_case("company_name"))
        .context("CSV must contain a 'company_name' column")?;

    let companies = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            split_csv_line(line)
                .get(column)
                .map(|f| f.trim())
                .unwrap_or("")
                .to_string()
        })
        .collect();
    Ok(companies)
}

/// Split one CSV line into fields, honoring quoted fields with `""`
/// escapes. The inverse of the result writer's quoting; fields spanning
/// multiple lines are not supported since company names are single-line.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_company_column() {
        let csv = "company_name\nAcme\nGlobex\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_parse_company_column_among_others() {
        let csv = "id,company_name,notes\n1,Acme,good\n2,\"Globex, Inc\",meh\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Acme", "Globex, Inc"]);
    }

    #[test]
    fn test_quoted_comma_name_survives_intact() {
        let csv = "company_name\n\"Amazon.com, Inc.\"\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Amazon.com, Inc."]);
    }

    #[test]
    fn test_quoted_comma_in_earlier_column_does_not_shift_index() {
        let csv = "notes,company_name\n\"fast, reliable\",Acme\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Acme"]);
    }

    #[test]
    fn test_reads_back_own_writer_quoting() {
        // The result writer doubles embedded quotes; the reader must undo it
        let csv = "company_name\n\"Say \"\"hi\"\", Inc\"\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Say \"hi\", Inc"]);
    }

    #[test]
    fn test_parse_missing_column_errors() {
        let csv = "name\nAcme\n";
        let err = parse_company_column(csv).unwrap_err();
        assert!(err.to_string().contains("company_name"));
    }

    #[test]
    fn test_parse_empty_file_errors() {
        assert!(parse_company_column("").is_err());
    }

    #[test]
    fn test_empty_names_kept_for_error_rows() {
        let csv = "company_name\nAcme\n\"\"\n";
        let companies = parse_company_column(csv).unwrap();
        assert_eq!(companies, vec!["Acme".to_string(), String::new()]);
    }

    #[test]
    fn test_split_csv_line() {
        assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_csv_line("a,\"b, c\",d"), vec!["a", "b, c", "d"]);
        assert_eq!(split_csv_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_csv_line("\"\""), vec![""]);
    }
}
