//! Answer parsing and assembly.
//!
//! Generated text is expected to contain two labelled fields:
//!
//! ```text
//! Correct answer: 3
//! Reasoning: free text, possibly
//! over several lines
//! ```
//!
//! A small scanner finds each label and reads its value. Missing or
//! malformed fields are not errors: the answer index is simply absent and
//! the reasoning empty.

use crate::config::AnswerFormat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fields recovered from generated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnswer {
    /// Option number after the answer label, if one was found.
    pub answer_index: Option<u64>,
    /// Trimmed text after the reasoning label, or empty.
    pub reasoning: String,
}

/// Extracts [`ParsedAnswer`]s from generated text.
#[derive(Debug, Clone)]
pub struct AnswerParser {
    system_prompt: String,
    answer_label: String,
    reasoning_label: String,
}

impl AnswerParser {
    pub fn new(format: &AnswerFormat, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            answer_label: format.answer_label.clone(),
            reasoning_label: format.reasoning_label.clone(),
        }
    }

    /// Remove an echoed system prompt, then read both fields.
    pub fn parse(&self, generated: &str) -> ParsedAnswer {
        let cleaned = strip_echo(generated, &self.system_prompt);
        ParsedAnswer {
            answer_index: scan_index(&cleaned, &self.answer_label),
            reasoning: scan_rest(&cleaned, &self.reasoning_label),
        }
    }
}

/// Remove every occurrence of `system_prompt` and trim.
fn strip_echo(text: &str, system_prompt: &str) -> String {
    if system_prompt.is_empty() {
        return text.trim().to_owned();
    }
    text.replace(system_prompt, "").trim().to_owned()
}

/// First occurrence of `label`, optional whitespace, one or more ASCII digits.
///
/// Occurrences of the label not followed by digits are skipped. Digit runs
/// that overflow `u64` are treated as no match. Only `0`-`9` count as digits;
/// other scripts' numerals (`٣`, `३`) are not option numbers.
fn scan_index(text: &str, label: &str) -> Option<u64> {
    text.match_indices(label).find_map(|(pos, _)| {
        let rest = text[pos + label.len()..].trim_start();
        let digits_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits_len == 0 {
            return None;
        }
        rest[..digits_len].parse().ok()
    })
}

/// Everything after the first occurrence of `label`, trimmed.
fn scan_rest(text: &str, label: &str) -> String {
    text.find(label)
        .map(|pos| text[pos + label.len()..].trim().to_owned())
        .unwrap_or_default()
}

/// The `answer` field of a [`FinalAnswer`]: an option number or the string
/// `"null"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerValue {
    Index(u64),
    Null,
}

impl AnswerValue {
    /// Map a parsed index to an answer value.
    ///
    /// Both "no index" and index `0` map to [`AnswerValue::Null`]; option
    /// numbering starts at 1 and a `0` is reported as no answer.
    pub fn from_parsed(index: Option<u64>) -> Self {
        match index {
            None | Some(0) => Self::Null,
            Some(n) => Self::Index(n),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(n) => serializer.serialize_u64(*n),
            Self::Null => serializer.serialize_str("null"),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Index(u64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Index(n) => Ok(Self::Index(n)),
            Wire::Text(s) if s == "null" => Ok(Self::Null),
            Wire::Text(s) => Err(serde::de::Error::custom(format!(
                "expected an integer or \"null\", got {s:?}"
            ))),
        }
    }
}

/// The structured answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub id: i64,
    pub answer: AnswerValue,
    /// Attribution header followed by the parsed reasoning.
    pub reasoning: String,
    /// Source URLs in search order, including ones that failed to load.
    pub sources: Vec<String>,
}

/// Build the [`FinalAnswer`] for request `id`.
pub fn assemble(id: i64, parsed: ParsedAnswer, header: &str, sources: Vec<String>) -> FinalAnswer {
    let mut reasoning = String::with_capacity(header.len() + parsed.reasoning.len());
    reasoning.push_str(header);
    reasoning.push_str(&parsed.reasoning);

    FinalAnswer {
        id,
        answer: AnswerValue::from_parsed(parsed.answer_index),
        reasoning,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = "You answer multiple-choice questions.";

    fn parser() -> AnswerParser {
        AnswerParser::new(&AnswerFormat::default(), SYSTEM)
    }

    #[test]
    fn parses_both_fields() {
        let parsed = parser().parse("Correct answer: 2\nReasoning: because X");
        assert_eq!(parsed.answer_index, Some(2));
        assert_eq!(parsed.reasoning, "because X");
    }

    #[test]
    fn strips_echoed_system_prompt() {
        let text = format!("{SYSTEM}\nQuestion...\nCorrect answer: 4\nReasoning: see source");
        let parsed = parser().parse(&text);
        assert_eq!(parsed.answer_index, Some(4));
        assert_eq!(parsed.reasoning, "see source");
    }

    #[test]
    fn reasoning_spans_lines_and_is_trimmed() {
        let parsed = parser().parse("Reasoning:\n  line one\nline two  \n\n");
        assert_eq!(parsed.reasoning, "line one\nline two");
        assert_eq!(parsed.answer_index, None);
    }

    #[test]
    fn answer_label_without_digits_is_absent() {
        let parsed = parser().parse("Correct answer: unknown\nReasoning: unsure");
        assert_eq!(parsed.answer_index, None);
        assert_eq!(parsed.reasoning, "unsure");
    }

    #[test]
    fn later_label_with_digits_is_used() {
        let parsed = parser().parse("Correct answer: ?\nCorrect answer: 3");
        assert_eq!(parsed.answer_index, Some(3));
    }

    #[test]
    fn whitespace_between_label_and_digits_allowed() {
        assert_eq!(parser().parse("Correct answer:\n\t 12").answer_index, Some(12));
        assert_eq!(parser().parse("Correct answer:7.").answer_index, Some(7));
    }

    #[test]
    fn label_is_case_sensitive() {
        assert_eq!(parser().parse("correct answer: 3").answer_index, None);
    }

    #[test]
    fn non_ascii_numerals_are_not_indices() {
        assert_eq!(parser().parse("Correct answer: ٣").answer_index, None);
        assert_eq!(parser().parse("Correct answer: ३\nCorrect answer: 3").answer_index, Some(3));
    }

    #[test]
    fn overflowing_index_is_absent() {
        let parsed = parser().parse("Correct answer: 99999999999999999999999");
        assert_eq!(parsed.answer_index, None);
    }

    #[test]
    fn reasoning_may_contain_the_answer_label() {
        let parsed = parser().parse("Reasoning: the Correct answer: 1 is wrong");
        assert_eq!(parsed.reasoning, "the Correct answer: 1 is wrong");
        assert_eq!(parsed.answer_index, Some(1));
    }

    #[test]
    fn empty_text_parses_to_defaults() {
        assert_eq!(parser().parse(""), ParsedAnswer::default());
    }

    #[test]
    fn custom_labels() {
        let format = AnswerFormat {
            answer_label: "Правильный ответ:".into(),
            reasoning_label: "Рассуждения:".into(),
            ..Default::default()
        };
        let parsed = AnswerParser::new(&format, "").parse("Правильный ответ: 3\nРассуждения: в 2009 году");
        assert_eq!(parsed.answer_index, Some(3));
        assert_eq!(parsed.reasoning, "в 2009 году");
    }

    #[test]
    fn zero_and_absent_map_to_null() {
        assert_eq!(AnswerValue::from_parsed(None), AnswerValue::Null);
        assert_eq!(AnswerValue::from_parsed(Some(0)), AnswerValue::Null);
        assert_eq!(AnswerValue::from_parsed(Some(3)), AnswerValue::Index(3));
    }

    #[test]
    fn answer_value_serializes_as_int_or_null_string() {
        assert_eq!(serde_json::to_value(AnswerValue::Index(3)).unwrap(), serde_json::json!(3));
        assert_eq!(serde_json::to_value(AnswerValue::Null).unwrap(), serde_json::json!("null"));
    }

    #[test]
    fn answer_value_deserializes_wire_forms() {
        let index: AnswerValue = serde_json::from_str("2").unwrap();
        assert_eq!(index, AnswerValue::Index(2));
        let null: AnswerValue = serde_json::from_str(r#""null""#).unwrap();
        assert!(null.is_null());
        assert!(serde_json::from_str::<AnswerValue>(r#""two""#).is_err());
    }

    #[test]
    fn assemble_prefixes_header_and_keeps_sources() {
        let parsed = ParsedAnswer {
            answer_index: Some(2),
            reasoning: "because X".into(),
        };
        let sources = vec!["https://a.com".to_owned(), "https://b.com".to_owned()];
        let answer = assemble(7, parsed, "Answer generated by model M. ", sources.clone());

        assert_eq!(answer.id, 7);
        assert_eq!(answer.answer, AnswerValue::Index(2));
        assert_eq!(answer.reasoning, "Answer generated by model M. because X");
        assert_eq!(answer.sources, sources);
    }

    #[test]
    fn assemble_with_nothing_parsed_is_header_only() {
        let answer = assemble(1, ParsedAnswer::default(), "H. ", Vec::new());
        assert!(answer.answer.is_null());
        assert_eq!(answer.reasoning, "H. ");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn final_answer_json_shape() {
        let answer = assemble(5, ParsedAnswer::default(), "H. ", vec!["https://a.com".into()]);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 5,
                "answer": "null",
                "reasoning": "H. ",
                "sources": ["https://a.com"]
            })
        );
    }
}
