//! FAQ structured-data check (C5)

use super::base::CheckExecutor;
use super::ids;
use crate::content::PageDocument;
use crate::models::Evaluation;
use anyhow::Result;

pub struct FaqSchemaCheck;

impl FaqSchemaCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FaqSchemaCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn pairs_score(pairs: usize) -> f64 {
    match pairs {
        0 => 0.0,
        1 => 50.0,
        2 => 75.0,
        _ => 100.0,
    }
}

impl CheckExecutor for FaqSchemaCheck {
    fn id(&self) -> &'static str {
        ids::FAQ_SCHEMA
    }

    fn description(&self) -> &'static str {
        "FAQPage structured data with well-formed question/answer pairs"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let data = doc.structured_data();
        let pairs = data.faq_pairs();
        let mut eval = Evaluation::scored(pairs_score(pairs))
            .with_detail("faq_page", data.has_faq_page())
            .with_detail("pairs", pairs);
        if !data.has_faq_page() {
            eval = eval.with_evidence("No FAQPage structured data");
        } else if pairs == 0 {
            eval = eval.with_evidence("FAQPage has no well-formed Question/Answer pairs");
        }
        if data.invalid_blocks > 0 {
            eval = eval.with_detail("invalid_json_ld_blocks", data.invalid_blocks);
        }
        Ok(Some(eval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::page;

    fn faq(questions: usize) -> String {
        let entities: Vec<String> = (0..questions)
            .map(|i| {
                format!(
                    r#"{{"@type":"Question","name":"Q{i}?","acceptedAnswer":{{"@type":"Answer","text":"A{i}"}}}}"#
                )
            })
            .collect();
        format!(
            r#"<html><head><script type="application/ld+json">{{"@context":"https://schema.org","@type":"FAQPage","mainEntity":[{}]}}</script></head></html>"#,
            entities.join(",")
        )
    }

    #[test]
    fn test_pair_ladder() {
        let check = FaqSchemaCheck::new();
        let score = |n| check.evaluate_page(&page("https://acme.com/faq", &faq(n))).unwrap().unwrap().score;
        assert_eq!(score(0), 0.0);
        assert_eq!(score(1), 50.0);
        assert_eq!(score(2), 75.0);
        assert_eq!(score(3), 100.0);
        assert_eq!(score(5), 100.0);
    }

    #[test]
    fn test_no_faq_page() {
        let eval = FaqSchemaCheck::new()
            .evaluate_page(&page("https://acme.com/", "<html><body><h1>FAQ</h1></body></html>"))
            .unwrap()
            .unwrap();
        assert_eq!(eval.score, 0.0);
        assert_eq!(eval.details["faq_page"], false);
    }
}
