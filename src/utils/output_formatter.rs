/// Output formatter for card matcher results
///
/// This module turns validation results and scan matches into console text,
/// and exports scan results as JSON, HTML, and CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::core::matcher::{CardMatch, ValidationResult};

/// Options controlling console output
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Wrap output in markdown triple backticks
    pub markdown: bool,
    /// Hide all but the first and last four digits
    pub mask: bool,
}

/// Replace the middle digits of a card number with `*`
///
/// The first and last four digits and every separator are kept.
pub fn mask_card_number(raw: &str) -> String {
    let total = raw.chars().filter(char::is_ascii_digit).count();
    let mut seen = 0;

    raw.chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen <= 4 || seen > total.saturating_sub(4) {
                c
            } else {
                '*'
            }
        })
        .collect()
}

fn display_number(raw: &str, options: &FormatOptions) -> String {
    if options.mask {
        mask_card_number(raw)
    } else {
        raw.to_string()
    }
}

fn status_word(is_valid: bool) -> String {
    if is_valid {
        "VALID".green().bold().to_string()
    } else {
        "INVALID".red().bold().to_string()
    }
}

fn wrap_markdown(body: String, options: &FormatOptions) -> String {
    if options.markdown {
        format!("```\n{}```\n", body)
    } else {
        body
    }
}

/// Format the result of validating a single number
pub fn format_validation(input: &str, result: &ValidationResult, options: &FormatOptions) -> String {
    let message = if result.is_valid {
        result.message().green().to_string()
    } else {
        result.message().red().to_string()
    };

    let body = format!(
        "{} {}\n{} {}\n",
        "Number:".cyan(),
        display_number(input, options),
        "Result:".cyan(),
        message
    );

    wrap_markdown(body, options)
}

/// Format matches from a text or file scan
///
/// Matches carrying a line number are prefixed with `Line N:`.
pub fn format_matches(matches: &[CardMatch], options: &FormatOptions) -> String {
    if matches.is_empty() {
        return wrap_markdown("No card numbers found\n".to_string(), options);
    }

    let mut output = format!("{} {} card number(s):\n", "Found".bold(), matches.len());

    for card in matches {
        let number = display_number(&card.raw, options);
        match card.line {
            Some(line) => output.push_str(&format!(
                "  Line {}: {} - {}\n",
                line,
                number,
                status_word(card.is_valid)
            )),
            None => output.push_str(&format!("  {} - {}\n", number, status_word(card.is_valid))),
        }
    }

    wrap_markdown(output, options)
}

/// Serializable view of per-source results used by the exporters
fn results_to_json(all_results: &[(String, Vec<CardMatch>)], mask: bool) -> Result<Value> {
    let mut sources = Vec::with_capacity(all_results.len());

    for (source, matches) in all_results {
        let exported: Vec<CardMatch> = matches
            .iter()
            .map(|card| if mask { masked(card) } else { card.clone() })
            .collect();
        let valid = matches.iter().filter(|card| card.is_valid).count();

        sources.push(json!({
            "source": source,
            "total": matches.len(),
            "valid": valid,
            "matches": serde_json::to_value(&exported).context("Failed to serialize matches")?,
        }));
    }

    Ok(json!({ "sources": sources }))
}

fn masked(card: &CardMatch) -> CardMatch {
    CardMatch {
        raw: mask_card_number(&card.raw),
        normalized: mask_card_number(&card.normalized),
        ..card.clone()
    }
}

/// Export results to a JSON file
///
/// # Arguments
///
/// * `all_results` - Matches for each scanned source
/// * `output_path` - Path where the JSON file will be written
/// * `mask` - Whether to mask card numbers in the export
pub fn export_results_json(
    all_results: &[(String, Vec<CardMatch>)],
    output_path: &Path,
    mask: bool,
) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, &results_to_json(all_results, mask)?)
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Create an HTML report from scan results
pub fn create_html_report(
    all_results: &[(String, Vec<CardMatch>)],
    output_path: &Path,
    mask: bool,
) -> Result<()> {
    let mut handlebars = Handlebars::new();

    const HTML_TEMPLATE: &str = r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>Card Number Scan Report</title>
        <style>
            body {
                font-family: Arial, sans-serif;
                line-height: 1.6;
                color: #333;
                max-width: 1200px;
                margin: 0 auto;
                padding: 20px;
            }
            h1 {
                color: #2c3e50;
                border-bottom: 2px solid #3498db;
                padding-bottom: 10px;
            }
            .source {
                background-color: #f8f9fa;
                border-radius: 5px;
                padding: 15px;
                margin-bottom: 20px;
            }
            table { border-collapse: collapse; width: 100%; }
            td, th { border-bottom: 1px solid #eee; padding: 5px; text-align: left; }
            .valid { color: #27ae60; font-weight: bold; }
            .invalid { color: #c0392b; font-weight: bold; }
            .timestamp { color: #7f8c8d; font-size: 0.9em; }
        </style>
    </head>
    <body>
        <h1>Card Number Scan Report</h1>
        <div class="timestamp">Generated on: {{timestamp}}</div>
        <p>Sources scanned: {{total_sources}}, card numbers found: {{total_matches}}</p>

        {{#each sources}}
        <div class="source">
            <h2>{{source}}</h2>
            {{#if total}}
            <table>
                <tr><th>Line</th><th>Number</th><th>Status</th></tr>
                {{#each matches}}
                <tr>
                    <td>{{line}}</td>
                    <td>{{this.raw}}</td>
                    {{#if is_valid}}<td class="valid">VALID</td>{{else}}<td class="invalid">INVALID</td>{{/if}}
                </tr>
                {{/each}}
            </table>
            {{else}}
            <p>No card numbers found</p>
            {{/if}}
        </div>
        {{/each}}
    </body>
    </html>
    "#;

    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let mut template_data = results_to_json(all_results, mask)?;
    let total_matches: usize = all_results.iter().map(|(_, matches)| matches.len()).sum();
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    template_data["timestamp"] = json!(timestamp);
    template_data["total_sources"] = json!(all_results.len());
    template_data["total_matches"] = json!(total_matches);

    let html = handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes()).context("Failed to write HTML data")?;

    Ok(())
}

/// Create a CSV report from scan results
pub fn create_csv_report(
    all_results: &[(String, Vec<CardMatch>)],
    output_path: &Path,
    mask: bool,
) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Source", "Line", "Number", "Status"])
        .context("Failed to write CSV header")?;

    for (source, matches) in all_results {
        for card in matches {
            let line = card.line.map(|l| l.to_string()).unwrap_or_default();
            let number = if mask { mask_card_number(&card.raw) } else { card.raw.clone() };
            let status = if card.is_valid { "VALID" } else { "INVALID" };
            writer
                .write_record([source.as_str(), line.as_str(), number.as_str(), status])
                .context("Failed to write CSV record")?;
        }
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

/// Create a summary of findings for multiple sources
pub fn create_summary(all_results: &[(String, Vec<CardMatch>)]) -> String {
    let total: usize = all_results.iter().map(|(_, matches)| matches.len()).sum();
    let valid: usize = all_results
        .iter()
        .map(|(_, matches)| matches.iter().filter(|card| card.is_valid).count())
        .sum();

    let mut output = String::new();
    output.push_str(&format!("{}\n", "Scan Summary".yellow().bold()));
    output.push_str(&format!("Sources scanned: {}\n", all_results.len()));
    output.push_str(&format!("Card numbers found: {}\n", total));
    output.push_str(&format!("Valid: {}, invalid: {}\n", valid, total - valid));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::CardMatcher;

    fn card(raw: &str, is_valid: bool, line: Option<usize>) -> CardMatch {
        CardMatch {
            raw: raw.to_string(),
            normalized: crate::core::patterns::normalize(raw),
            is_valid,
            line,
        }
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4111-1111-1111-1111"), "4111-****-****-1111");
        assert_eq!(mask_card_number("4111111111111111"), "4111********1111");
        assert_eq!(mask_card_number("4111 1111 1111 1111"), "4111 **** **** 1111");
        assert_eq!(mask_card_number("1234"), "1234");
    }

    #[test]
    fn test_format_file_matches() {
        colored::control::set_override(false);
        let matches = vec![
            card("4111-1111-1111-1111", true, Some(1)),
            card("4111-1111-1111-1112", false, Some(3)),
        ];
        let output = format_matches(&matches, &FormatOptions::default());
        assert!(output.starts_with("Found 2 card number(s):"));
        assert!(output.contains("  Line 1: 4111-1111-1111-1111 - VALID\n"));
        assert!(output.contains("  Line 3: 4111-1111-1111-1112 - INVALID\n"));
    }

    #[test]
    fn test_format_text_matches_masked_markdown() {
        colored::control::set_override(false);
        let options = FormatOptions { markdown: true, mask: true };
        let output = format_matches(&[card("5555 5555 5555 4444", true, None)], &options);
        assert!(output.starts_with("```\n"));
        assert!(output.ends_with("```\n"));
        assert!(output.contains("  5555 **** **** 4444 - VALID\n"));
    }

    #[test]
    fn test_format_no_matches() {
        assert_eq!(format_matches(&[], &FormatOptions::default()), "No card numbers found\n");
    }

    #[test]
    fn test_format_validation() {
        colored::control::set_override(false);
        let result = CardMatcher::default().validate_single("5555-5555-5555-4444");
        let output = format_validation("5555-5555-5555-4444", &result, &FormatOptions::default());
        assert_eq!(output, "Number: 5555-5555-5555-4444\nResult: valid card number (MasterCard)\n");
    }

    #[test]
    fn test_exports() {
        let dir = tempfile::tempdir().expect("temp dir");
        let results = vec![(
            "cards.txt".to_string(),
            vec![card("4111-1111-1111-1111", true, Some(2))],
        )];

        let json_path = dir.path().join("report.json");
        export_results_json(&results, &json_path, false).expect("json export");
        let value: Value = serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read"))
            .expect("valid json");
        assert_eq!(value["sources"][0]["source"], "cards.txt");
        assert_eq!(value["sources"][0]["valid"], 1);
        assert_eq!(value["sources"][0]["matches"][0]["line"], 2);

        let csv_path = dir.path().join("report.csv");
        create_csv_report(&results, &csv_path, true).expect("csv export");
        let csv = std::fs::read_to_string(&csv_path).expect("read");
        assert!(csv.starts_with("Source,Line,Number,Status\n"));
        assert!(csv.contains("cards.txt,2,4111-****-****-1111,VALID"));

        let html_path = dir.path().join("report.html");
        create_html_report(&results, &html_path, false).expect("html export");
        let html = std::fs::read_to_string(&html_path).expect("read");
        assert!(html.contains("<td>4111-1111-1111-1111</td>"));
        assert!(html.contains("class=\"valid\""));
    }

    #[test]
    fn test_masked_exports() {
        let dir = tempfile::tempdir().expect("temp dir");
        let results = vec![(
            "text".to_string(),
            vec![card("5555 5555 5555 4444", true, None)],
        )];

        let json_path = dir.path().join("report.json");
        export_results_json(&results, &json_path, true).expect("json export");
        let value: Value = serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read"))
            .expect("valid json");
        let exported = &value["sources"][0]["matches"][0];
        assert_eq!(exported["raw"], "5555 **** **** 4444");
        assert_eq!(exported["normalized"], "5555********4444");
        assert_eq!(exported["is_valid"], true);
        assert!(exported.get("line").is_none());

        let html_path = dir.path().join("report.html");
        create_html_report(&results, &html_path, true).expect("html export");
        let html = std::fs::read_to_string(&html_path).expect("read");
        assert!(html.contains("<td>5555 **** **** 4444</td>"));
        assert!(!html.contains("5555 5555 5555 4444"));
    }

    #[test]
    fn test_summary_counts() {
        colored::control::set_override(false);
        let results = vec![
            ("a".to_string(), vec![card("4111111111111111", true, None)]),
            ("b".to_string(), vec![card("4111111111111112", false, None)]),
        ];
        let summary = create_summary(&results);
        assert!(summary.contains("Sources scanned: 2"));
        assert!(summary.contains("Valid: 1, invalid: 1"));
    }
}
