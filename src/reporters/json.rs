//! JSON reporter
//!
//! Pretty-printed JSON for piping to jq or further processing.

use anyhow::Result;
use serde::Serialize;

pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["audit_id"], "audit-1");
        assert_eq!(parsed["pages"].as_array().expect("pages array").len(), 2);
        assert_eq!(parsed["composite"]["grade"], report.composite.grade.as_str());
    }

    #[test]
    fn test_error_results_keep_message() {
        let report = test_report();
        let json_str = render(&report.pages[1]).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["results"][0]["status"], "error");
        assert_eq!(parsed["results"][0]["details"]["error"], "selector failed");
    }
}
