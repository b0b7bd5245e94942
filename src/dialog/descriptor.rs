//! Dialog descriptors: steps as data
//!
//! A dialog is a named, ordered list of steps. Steps carry no behavior of
//! their own; a single interpreter dispatches on the variant, so adding a
//! step kind means adding a variant, not a type hierarchy.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

/// Identity and ordered step list of one dialog. Created once at startup,
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct DialogDescriptor {
    pub id: String,
    pub steps: Vec<Step>,
}

impl DialogDescriptor {
    pub fn new(id: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Ids of child dialogs this dialog may push.
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            Step::Begin { dialog, .. } => Some(dialog.as_str()),
            _ => None,
        })
    }
}

/// One step of a waterfall.
#[derive(Debug, Clone)]
pub enum Step {
    /// Send a prompt, suspend until the next turn, validate the reply into
    /// a named slot.
    Prompt(PromptStep),
    /// Emit a templated message and continue within the same turn.
    Say(String),
    /// Push a child dialog; its completion payload lands in `result_slot`
    /// of this frame, then the waterfall continues.
    Begin {
        dialog: String,
        result_slot: Option<String>,
    },
    /// Finish this dialog early. Running past the last step is an implicit
    /// `End`.
    End,
}

impl Step {
    pub fn say(text: impl Into<String>) -> Self {
        Step::Say(text.into())
    }

    pub fn begin(dialog: impl Into<String>, result_slot: Option<&str>) -> Self {
        Step::Begin {
            dialog: dialog.into(),
            result_slot: result_slot.map(str::to_string),
        }
    }
}

/// A single request/response unit: prompt text, validator, retry policy.
#[derive(Debug, Clone)]
pub struct PromptStep {
    /// Slot name the validated value is stored under.
    pub slot: String,
    pub prompt: String,
    /// Sent on validation failure; falls back to `prompt` when absent.
    pub retry_prompt: Option<String>,
    pub validator: Validator,
    /// When set, exceeding this many failed attempts cancels the dialog.
    pub max_retries: Option<u32>,
}

impl PromptStep {
    pub fn new(slot: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            prompt: prompt.into(),
            retry_prompt: None,
            validator: Validator::Any,
            max_retries: None,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_retry_prompt(mut self, text: impl Into<String>) -> Self {
        self.retry_prompt = Some(text.into());
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = Some(max);
        self
    }
}

/// Validation predicate applied to a prompt reply.
///
/// A validator maps raw text to a typed JSON value, or rejects. Rejection
/// re-prompts without advancing the waterfall.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Any non-empty message.
    Any,
    /// Trimmed length of at least `n` characters.
    MinLength(usize),
    /// Regular expression match on the trimmed message.
    Pattern(Regex),
    /// A number, optionally bounded (inclusive).
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Yes/no confirmation, yielding a boolean.
    Confirm,
    /// One of a fixed set of choices, matched case-insensitively and
    /// yielding the canonical spelling.
    Choice(Vec<String>),
    /// An ISO `YYYY-MM-DD` date, optionally bounded (inclusive).
    Date {
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
    },
}

impl Validator {
    /// Build a `Pattern` validator, rejecting invalid expressions at
    /// configuration time.
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Ok(Validator::Pattern(Regex::new(expr)?))
    }

    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::Choice(options.into_iter().map(Into::into).collect())
    }

    /// Validate raw message text, producing the typed slot value on success.
    pub fn validate(&self, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        match self {
            Validator::Any => {
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Value::String(trimmed.to_string()))
                }
            }
            Validator::MinLength(min) => {
                if trimmed.chars().count() >= *min {
                    Some(Value::String(trimmed.to_string()))
                } else {
                    None
                }
            }
            Validator::Pattern(re) => {
                if re.is_match(trimmed) {
                    Some(Value::String(trimmed.to_string()))
                } else {
                    None
                }
            }
            Validator::Number { min, max } => {
                let n: f64 = trimmed.parse().ok()?;
                if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
                    None
                } else {
                    serde_json::Number::from_f64(n).map(Value::Number)
                }
            }
            Validator::Confirm => match trimmed.to_lowercase().as_str() {
                "yes" | "y" => Some(Value::Bool(true)),
                "no" | "n" => Some(Value::Bool(false)),
                _ => None,
            },
            Validator::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(trimmed))
                .map(|option| Value::String(option.clone())),
            Validator::Date { min, max } => {
                let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
                if min.is_some_and(|m| date < m) || max.is_some_and(|m| date > m) {
                    None
                } else {
                    Some(Value::String(date.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_any_rejects_empty() {
        assert_eq!(Validator::Any.validate("  Alice "), Some(json!("Alice")));
        assert_eq!(Validator::Any.validate("   "), None);
    }

    #[test]
    fn test_min_length_counts_chars() {
        let v = Validator::MinLength(3);
        assert_eq!(v.validate("abc"), Some(json!("abc")));
        assert_eq!(v.validate("ab"), None);
    }

    #[test]
    fn test_pattern_email() {
        let v = Validator::pattern(r"^\S+@\S+\.\S+$").expect("pattern");
        assert_eq!(
            v.validate("alice@example.com"),
            Some(json!("alice@example.com"))
        );
        assert_eq!(v.validate("not an email"), None);
    }

    #[test]
    fn test_number_bounds_inclusive() {
        let v = Validator::Number {
            min: Some(1.0),
            max: Some(150.0),
        };
        assert_eq!(v.validate("42"), Some(json!(42.0)));
        assert_eq!(v.validate("150"), Some(json!(150.0)));
        assert_eq!(v.validate("0"), None);
        assert_eq!(v.validate("151"), None);
        assert_eq!(v.validate("old"), None);
    }

    #[test]
    fn test_confirm_maps_to_bool() {
        assert_eq!(Validator::Confirm.validate("Yes"), Some(json!(true)));
        assert_eq!(Validator::Confirm.validate("n"), Some(json!(false)));
        assert_eq!(Validator::Confirm.validate("maybe"), None);
    }

    #[test]
    fn test_choice_yields_canonical_spelling() {
        let v = Validator::choice(["Car", "Bus", "Bicycle"]);
        assert_eq!(v.validate("bus"), Some(json!("Bus")));
        assert_eq!(v.validate("train"), None);
    }

    #[test]
    fn test_date_within_bounds() {
        let v = Validator::Date {
            min: NaiveDate::from_ymd_opt(2024, 1, 1),
            max: NaiveDate::from_ymd_opt(2024, 12, 31),
        };
        assert_eq!(v.validate("2024-06-15"), Some(json!("2024-06-15")));
        assert_eq!(v.validate("2023-12-31"), None);
        assert_eq!(v.validate("June 15th"), None);
    }

    #[test]
    fn test_children_lists_begin_targets() {
        let descriptor = DialogDescriptor::new(
            "root",
            vec![
                Step::say("hello"),
                Step::begin("child-a", Some("a")),
                Step::begin("child-b", None),
            ],
        );
        let children: Vec<_> = descriptor.children().collect();
        assert_eq!(children, vec!["child-a", "child-b"]);
    }
}
