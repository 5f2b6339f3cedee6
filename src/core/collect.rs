//! Interactive input collection with boundary validation.
//!
//! Every `Collector` method loops until the operator supplies a value
//! that satisfies the field's constraint: malformed input gets one error
//! line and a fresh prompt, never an error return. The only fatal
//! condition at this layer is the input stream closing mid-prompt, which
//! surfaces as `HandshakeError::InputClosed` so the session can abort
//! without committing.
//!
//! The reader and writer are generic so tests can drive a session from a
//! `Cursor` script and inspect the transcript.

use crate::core::error::HandshakeError;
use crate::core::model::{MixtureComponent, MixtureVector};
use serde_json::Value as JsonValue;
use std::io::{BufRead, Write};

pub struct Collector<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Collector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Collector { input, output }
    }

    /// Consume the collector and hand back the output sink, so tests can
    /// inspect the transcript.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a plain line to the transcript (stage banners, id listings).
    pub fn line(&mut self, text: &str) -> Result<(), HandshakeError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn read_answer(&mut self, prompt: &str, label: &str) -> Result<String, HandshakeError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut raw = String::new();
        let bytes = self.input.read_line(&mut raw)?;
        if bytes == 0 {
            return Err(HandshakeError::InputClosed(label.to_string()));
        }
        Ok(raw.trim().to_string())
    }

    /// Non-empty text unless `allow_empty`.
    pub fn text(&mut self, label: &str, allow_empty: bool) -> Result<String, HandshakeError> {
        loop {
            let value = self.read_answer(&format!("{label}: "), label)?;
            if !value.is_empty() || allow_empty {
                return Ok(value);
            }
            self.line("Please provide a value.")?;
        }
    }

    /// One of `options` (case-insensitive); returns the index into `options`.
    pub fn choice(&mut self, label: &str, options: &[&str]) -> Result<usize, HandshakeError> {
        let options_str = options.join("/");
        loop {
            let value = self
                .read_answer(&format!("{label} ({options_str}): "), label)?
                .to_lowercase();
            if let Some(index) = options.iter().position(|option| *option == value.as_str()) {
                return Ok(index);
            }
            self.line(&format!("Please choose one of: {options_str}."))?;
        }
    }

    /// Float in the closed range [min, max].
    pub fn float(&mut self, label: &str, min: f64, max: f64) -> Result<f64, HandshakeError> {
        loop {
            let raw = self.read_answer(&format!("{label} ({min}-{max}): "), label)?;
            let value = match raw.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.line("Please enter a number.")?;
                    continue;
                }
            };
            if value >= min && value <= max {
                return Ok(value);
            }
            self.line(&format!("Value must be between {min} and {max}."))?;
        }
    }

    /// Integer in the closed range [min, max].
    pub fn integer(&mut self, label: &str, min: i64, max: i64) -> Result<i64, HandshakeError> {
        loop {
            let raw = self.read_answer(&format!("{label} ({min}-{max}): "), label)?;
            let value = match raw.parse::<i64>() {
                Ok(value) => value,
                Err(_) => {
                    self.line("Please enter an integer.")?;
                    continue;
                }
            };
            if value >= min && value <= max {
                return Ok(value);
            }
            self.line(&format!("Value must be between {min} and {max}."))?;
        }
    }

    /// Mixture vector as a JSON list of `{domain, weight}`; empty input
    /// is the empty vector.
    pub fn mixture(&mut self, label: &str) -> Result<MixtureVector, HandshakeError> {
        loop {
            let raw = self.read_answer(
                &format!("{label} (JSON list of {{domain, weight}}, empty for []): "),
                label,
            )?;
            match parse_mixture_vector(&raw) {
                Ok(vector) => return Ok(vector),
                Err(message) => self.line(&message)?,
            }
        }
    }

    /// Evidence references as a JSON list of strings or a comma-separated
    /// line; empty input is the empty list.
    pub fn evidence_refs(&mut self, label: &str) -> Result<Vec<String>, HandshakeError> {
        loop {
            let raw = self.read_answer(&format!("{label} (comma-separated or JSON list): "), label)?;
            match parse_evidence_refs(&raw) {
                Ok(refs) => return Ok(refs),
                Err(message) => self.line(&message)?,
            }
        }
    }
}

/// Parse a mixture vector. Errors carry the operator-facing message.
pub fn parse_mixture_vector(raw: &str) -> Result<MixtureVector, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let data: JsonValue = serde_json::from_str(raw)
        .map_err(|_| "Mixture vector must be JSON (list of objects).".to_string())?;
    let entries = data
        .as_array()
        .ok_or_else(|| "Mixture vector must be a JSON list.".to_string())?;
    let mut cleaned = Vec::with_capacity(entries.len());
    for entry in entries {
        let object = entry
            .as_object()
            .ok_or_else(|| "Each mixture entry must be an object.".to_string())?;
        let domain = object
            .get("domain")
            .and_then(JsonValue::as_str)
            .filter(|domain| !domain.is_empty())
            .ok_or_else(|| "Each mixture entry needs a non-empty 'domain' string.".to_string())?;
        let weight = object
            .get("weight")
            .and_then(JsonValue::as_f64)
            .ok_or_else(|| "Each mixture entry needs a numeric 'weight'.".to_string())?;
        cleaned.push(MixtureComponent {
            domain: domain.to_string(),
            weight,
        });
    }
    Ok(cleaned)
}

/// Parse evidence refs: JSON list of strings when the input starts with
/// `[`, comma-separated tokens otherwise. Whitespace is trimmed and empty
/// tokens dropped.
pub fn parse_evidence_refs(raw: &str) -> Result<Vec<String>, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.trim_start().starts_with('[') {
        let data: JsonValue = serde_json::from_str(raw)
            .map_err(|_| "Evidence refs must be JSON list or comma-separated.".to_string())?;
        let entries = data
            .as_array()
            .ok_or_else(|| "Evidence refs JSON must be a list of strings.".to_string())?;
        let mut refs = Vec::with_capacity(entries.len());
        for entry in entries {
            let token = entry
                .as_str()
                .ok_or_else(|| "Evidence refs JSON must be a list of strings.".to_string())?;
            let token = token.trim();
            if !token.is_empty() {
                refs.push(token.to_string());
            }
        }
        return Ok(refs);
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collector(script: &str) -> Collector<Cursor<Vec<u8>>, Vec<u8>> {
        Collector::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn text_reprompts_until_nonempty() {
        let mut c = collector("\n\nfinally\n");
        assert_eq!(c.text("Goal", false).expect("text"), "finally");
    }

    #[test]
    fn text_allows_empty_when_requested() {
        let mut c = collector("\n");
        assert_eq!(c.text("Notes", true).expect("text"), "");
    }

    #[test]
    fn text_reports_closed_stream() {
        let mut c = collector("");
        let err = c.text("Goal", false).expect_err("must fail");
        assert!(matches!(err, HandshakeError::InputClosed(_)));
    }

    #[test]
    fn choice_is_case_insensitive_and_returns_index() {
        let mut c = collector("nope\nSYSTEM\n");
        let idx = c
            .choice("Model type", &["me", "we", "they", "system"])
            .expect("choice");
        assert_eq!(idx, 3);
    }

    #[test]
    fn float_rejects_out_of_range_and_garbage() {
        let mut c = collector("high\n1.5\n0.8\n");
        let value = c.float("Confidence", 0.0, 1.0).expect("float");
        assert_eq!(value, 0.8);
    }

    #[test]
    fn integer_rejects_out_of_bounds_counts() {
        let mut c = collector("2\n8\n3\n");
        assert_eq!(c.integer("Number of hypotheses", 3, 7).expect("int"), 3);
    }

    #[test]
    fn parse_mixture_vector_accepts_empty() {
        assert_eq!(parse_mixture_vector("").expect("empty"), Vec::new());
    }

    #[test]
    fn parse_mixture_vector_keeps_order_and_values() {
        let parsed = parse_mixture_vector(
            r#"[{"domain":"ops","weight":0.6},{"domain":"risk","weight":0.4}]"#,
        )
        .expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].domain, "ops");
        assert_eq!(parsed[0].weight, 0.6);
        assert_eq!(parsed[1].domain, "risk");
        assert_eq!(parsed[1].weight, 0.4);
    }

    #[test]
    fn parse_mixture_vector_rejects_non_numeric_weight() {
        let err = parse_mixture_vector(r#"[{"domain":"ops","weight":"high"}]"#)
            .expect_err("must reject");
        assert!(err.contains("numeric 'weight'"));
    }

    #[test]
    fn parse_mixture_vector_rejects_missing_domain() {
        let err = parse_mixture_vector(r#"[{"weight":0.5}]"#).expect_err("must reject");
        assert!(err.contains("'domain'"));
    }

    #[test]
    fn parse_mixture_vector_rejects_non_list() {
        let err = parse_mixture_vector(r#"{"domain":"ops"}"#).expect_err("must reject");
        assert!(err.contains("JSON list"));
    }

    #[test]
    fn parse_evidence_refs_comma_separated_trims_and_drops_empties() {
        let refs = parse_evidence_refs(" log:1 , , test:2 ,").expect("parse");
        assert_eq!(refs, vec!["log:1".to_string(), "test:2".to_string()]);
    }

    #[test]
    fn parse_evidence_refs_json_list() {
        let refs = parse_evidence_refs(r#"["log:1234"," pr:9 "]"#).expect("parse");
        assert_eq!(refs, vec!["log:1234".to_string(), "pr:9".to_string()]);
    }

    #[test]
    fn parse_evidence_refs_rejects_json_non_strings() {
        let err = parse_evidence_refs("[1,2]").expect_err("must reject");
        assert!(err.contains("list of strings"));
    }

    #[test]
    fn mixture_prompt_reprompts_on_bad_entry() {
        let mut c = collector(
            "[{\"domain\":\"ops\",\"weight\":\"high\"}]\n[{\"domain\":\"ops\",\"weight\":0.6}]\n",
        );
        let vector = c.mixture("Domain signature").expect("mixture");
        assert_eq!(vector.len(), 1);
        assert_eq!(vector[0].weight, 0.6);
    }
}
