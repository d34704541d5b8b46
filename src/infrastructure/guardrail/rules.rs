//! Query screening, output redaction and grounding checks

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::generation::cited_ids;
use crate::domain::guardrail::{GuardrailConfig, RejectionReason};
use crate::domain::index::ScoredPassage;

static INJECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:ignore|disregard|bypass|forget|contradict)\s+(?:all\s+|any\s+)?(?:the\s+)?(?:previous\s+|prior\s+|above\s+|earlier\s+)?(?:instructions|rules)|(?:ignore|r[ée][ée]cris|oublie|contourne)\s+(?:les|toutes?)\s+(?:les\s+)?(?:\w+\s+)?instructions)",
    )
    .unwrap()
});

static DENYLIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:malware|ransomware|fabriquer\s+(?:un\s+)?explosifs?|build\s+(?:an?\s+)?(?:bomb|explosives?)|pirater|hack\s+into)\b",
    )
    .unwrap()
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.[a-zA-Z]{2,}").unwrap());

static IBAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{2}\d{2}[A-Z0-9]{11,30}").unwrap());

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s-]{7,}\d").unwrap());

static PROFANITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:merde|con|pute|fdp|batard|enculé)\b").unwrap());

/// Redaction order. IBANs are matched before phones so their digits are not
/// taken for a phone number.
static PII: [(&str, &Lazy<Regex>); 3] = [("email", &EMAIL), ("iban", &IBAN), ("phone", &PHONE)];

#[derive(Debug, Clone, Default)]
pub struct Guardrails {
    config: GuardrailConfig,
}

impl Guardrails {
    pub fn new(config: GuardrailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Screen a question before it reaches retrieval. Checks length, then
    /// injection phrasing, then the topic denylist.
    pub fn validate_query(&self, query: &str) -> Result<(), RejectionReason> {
        if query.trim().graphemes(true).count() < self.config.min_query_chars {
            return Err(RejectionReason::QueryTooShort);
        }
        if INJECTION.is_match(query) {
            return Err(RejectionReason::PromptInjection);
        }
        if DENYLIST.is_match(query) {
            return Err(RejectionReason::UnsafeTopic);
        }
        Ok(())
    }

    /// Redact personal data, mask profanity and cap the length
    pub fn filter_output(&self, text: &str) -> String {
        let mut filtered = text.to_string();
        for (name, pattern) in PII.iter() {
            let replacement = format!("[REDACTED-{}]", name);
            filtered = pattern
                .replace_all(&filtered, regex::NoExpand(&replacement))
                .into_owned();
        }

        let masked = PROFANITY.replace_all(&filtered, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            let first = word.chars().next().map(String::from).unwrap_or_default();
            format!("{}***", first)
        });

        masked
            .graphemes(true)
            .take(self.config.max_answer_chars)
            .collect()
    }

    /// Check that an answer stands on retrieved evidence and cites only
    /// passages from it
    pub fn enforce_grounding(
        &self,
        answer: &str,
        evidence: &[ScoredPassage],
    ) -> Result<(), RejectionReason> {
        if evidence.is_empty() {
            return Err(RejectionReason::NoContext);
        }

        let mean = evidence.iter().map(|p| p.score).sum::<f32>() / evidence.len() as f32;
        if mean < self.config.grounding_min_score {
            return Err(RejectionReason::LowGrounding);
        }

        let cited = cited_ids(answer);
        if cited.is_empty() {
            return Err(RejectionReason::MissingCitations);
        }
        if !cited
            .iter()
            .all(|id| evidence.iter().any(|passage| passage.id() == *id))
        {
            return Err(RejectionReason::UnknownCitations);
        }

        Ok(())
    }
}
