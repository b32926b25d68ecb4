//! Rendering of crawl reports for the command line.

use anyhow::Result;

use crate::host::PageReport;

/// Renders reports as `json`, `csv` or `text`.
pub fn render(reports: &[PageReport], format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => format_json(reports),
        "csv" => format_csv(reports),
        "text" | "txt" => Ok(format_text(reports)),
        other => {
            log::error!("Unknown format: {}", other);
            Err(anyhow::anyhow!(
                "Unknown format '{}'. Use: json, csv, or text",
                other
            ))
        }
    }
}

fn format_json(reports: &[PageReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

fn format_csv(reports: &[PageReport]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "url",
        "depth",
        "status_code",
        "emitted_lines",
        "next_urls",
        "terminal",
    ])?;

    for report in reports {
        writer.write_record([
            &report.url,
            &report.depth.to_string(),
            &report.status_code.to_string(),
            &report.emitted.len().to_string(),
            &report.next_urls.len().to_string(),
            &report.terminal.to_string(),
        ])?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}

/// Emitted lines exactly as handlers produced them, page after page.
fn format_text(reports: &[PageReport]) -> String {
    let mut output = String::new();

    for report in reports {
        for line in &report.emitted {
            output.push_str(line);
            if !line.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    output
}
