//! Text (terminal) reporter with colors and formatting

use crate::engine::AuditReport;
use crate::models::{CheckResult, CheckStatus};
use crate::scoring::CompositeOutput;
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

fn status_color(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "\x1b[32m",
        CheckStatus::Warn => "\x1b[33m",
        CheckStatus::Fail => "\x1b[31m",
        CheckStatus::NotApplicable => "\x1b[90m",
        CheckStatus::Error => "\x1b[35m",
    }
}

fn status_tag(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "[OK]",
        CheckStatus::Warn => "[WARN]",
        CheckStatus::Fail => "[FAIL]",
        CheckStatus::NotApplicable => "[N/A]",
        CheckStatus::Error => "[ERR]",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Evidence lines shown per result
const MAX_EVIDENCE: usize = 3;

fn push_results(out: &mut String, results: &[CheckResult]) {
    for result in results {
        let color = status_color(result.status);
        let preview = if result.preview { format!(" {DIM}(preview){RESET}") } else { String::new() };
        out.push_str(&format!(
            "  {color}{:<6}{RESET} {:>5.1}  {}{}\n",
            status_tag(result.status),
            result.score,
            result.id,
            preview
        ));
        if let Some(error) = result.detail_str("error") {
            out.push_str(&format!("         {DIM}error: {}{RESET}\n", error));
        }
        for item in result.evidence.iter().take(MAX_EVIDENCE) {
            out.push_str(&format!("         {DIM}- {}{RESET}\n", item));
        }
    }
}

fn push_composite(out: &mut String, composite: &CompositeOutput) {
    let grade_c = grade_color(&composite.grade);
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n",
        composite.total, composite.grade
    ));
    out.push_str(&format!(
        "  Page: {:.1}  Site: {:.1}\n",
        composite.page_score, composite.site_score
    ));
    out.push_str(&format!(
        "  {DIM}{} results scored, {} preview checks, {} disabled criteria{RESET}\n",
        composite.counts.included, composite.counts.preview, composite.counts.disabled
    ));
}

/// Render a full audit: composite header, then every page and the site
pub fn render_audit(report: &AuditReport) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}sitegrade audit {}{RESET}\n", report.audit_id));
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
    push_composite(&mut out, &report.composite);
    out.push('\n');

    for page in &report.pages {
        out.push_str(&format!("{BOLD}PAGE{RESET} {} {DIM}{}{RESET}\n", page.page_id, page.url));
        push_results(&mut out, &page.results);
        out.push('\n');
    }

    out.push_str(&format!("{BOLD}SITE{RESET}\n"));
    if report.site_results.is_empty() {
        out.push_str(&format!("  {DIM}no site results{RESET}\n"));
    }
    push_results(&mut out, &report.site_results);
    Ok(out)
}

pub fn render_page(page_id: &str, results: &[CheckResult]) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}PAGE{RESET} {}\n", page_id));
    push_results(&mut out, results);
    Ok(out)
}

pub fn render_composite(audit_id: &str, composite: &CompositeOutput) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}sitegrade audit {}{RESET}\n", audit_id));
    push_composite(&mut out, composite);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_audit_text_lists_every_result() {
        let report = test_report();
        let out = render_audit(&report).expect("render text");
        assert!(out.contains("sitegrade audit audit-1"));
        assert!(out.contains("C7_internal_links"));
        assert!(out.contains("S1_sitemap"));
        assert!(out.contains("error: selector failed"));
        assert!(out.contains("generic anchor text"));
        assert!(out.contains(&format!("{:.1}/100", report.composite.total)));
    }

    #[test]
    fn test_page_text_tags() {
        let report = test_report();
        let out = render_page("about", &report.pages[1].results).expect("render text");
        assert!(out.contains("[ERR]"));
        assert!(!out.contains("[OK]"));
    }
}
