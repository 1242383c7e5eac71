//! Form validation and sanitization pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`Rule`] descriptors. Each rule names a
//! form field and a sequence of steps: sanitizers (trim, escape) rewrite the
//! value, checks test it and carry the message reported on failure. Steps run
//! in declared order. Every rule runs: errors accumulate across fields, while
//! within one value the first failing check suppresses the remaining checks
//! (sanitizers still apply, so echoed values stay escaped).

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use uuid::Uuid;
use validator::ValidateLength;

use crate::error::AppResult;

// =============================================================================
// Form data
// =============================================================================

/// Submitted form fields. Repeated keys keep every value in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: IndexMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value of `field`, or `""` when absent
    pub fn get(&self, field: &str) -> &str {
        self.fields
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Every value of `field`; empty when absent
    pub fn get_all(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), vec![value.into()]);
    }

    pub fn set_all(&mut self, field: &str, values: Vec<String>) {
        self.fields.insert(field.to_string(), values);
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (key, value) in iter {
            form.fields.entry(key.into()).or_default().push(value.into());
        }
        form
    }
}

/// Templates see each field's first value, keyed by field name.
impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.keys().map(|key| (key, self.get(key))))
    }
}

// =============================================================================
// Rule descriptors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    Trim,
    /// HTML-escape so stored text renders safely
    Escape,
}

/// Asynchronous predicate that needs its own store round-trip
#[async_trait]
pub trait AsyncCheck: Send + Sync {
    async fn passes(&self, value: &str) -> AppResult<bool>;
}

#[derive(Clone)]
pub enum Check {
    /// At least one character
    Required,
    MaxLength(u64),
    /// Letters and digits only
    Alphanumeric,
    /// ISO-8601 date or date-time
    IsoDate,
    OneOf(Vec<&'static str>),
    /// Document identifier
    Identifier,
    Custom(Arc<dyn AsyncCheck>),
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::Required => f.write_str("Required"),
            Check::MaxLength(max) => write!(f, "MaxLength({})", max),
            Check::Alphanumeric => f.write_str("Alphanumeric"),
            Check::IsoDate => f.write_str("IsoDate"),
            Check::OneOf(values) => write!(f, "OneOf({:?})", values),
            Check::Identifier => f.write_str("Identifier"),
            Check::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Failure message: fixed text, or computed from the offending value
#[derive(Clone)]
pub enum Message {
    Text(Cow<'static, str>),
    Computed(fn(&str) -> String),
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Text(text) => write!(f, "Text({:?})", text),
            Message::Computed(_) => f.write_str("Computed"),
        }
    }
}

impl Message {
    fn render(&self, value: &str) -> String {
        match self {
            Message::Text(text) => text.to_string(),
            Message::Computed(f) => f(value),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Message::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(Cow::Owned(text))
    }
}

impl From<fn(&str) -> String> for Message {
    fn from(f: fn(&str) -> String) -> Self {
        Message::Computed(f)
    }
}

#[derive(Debug, Clone)]
enum Step {
    Sanitize(Sanitizer),
    Check(Check, Message),
}

/// Rule descriptor for one form field
#[derive(Debug, Clone)]
pub struct Rule {
    field: &'static str,
    steps: Vec<Step>,
    optional: bool,
    each: bool,
}

impl Rule {
    pub fn field(field: &'static str) -> Self {
        Self {
            field,
            steps: Vec::new(),
            optional: false,
            each: false,
        }
    }

    /// Skip checks when the value is empty
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Apply to every value of a repeated field (absent means no values)
    pub fn each(mut self) -> Self {
        self.each = true;
        self
    }

    pub fn trim(mut self) -> Self {
        self.steps.push(Step::Sanitize(Sanitizer::Trim));
        self
    }

    pub fn escape(mut self) -> Self {
        self.steps.push(Step::Sanitize(Sanitizer::Escape));
        self
    }

    pub fn check(mut self, check: Check, message: impl Into<Message>) -> Self {
        self.steps.push(Step::Check(check, message.into()));
        self
    }

    async fn apply(&self, value: &str) -> AppResult<(String, Option<String>)> {
        let mut current = value.to_string();
        let mut failure = None;

        for step in &self.steps {
            match step {
                Step::Sanitize(sanitizer) => current = sanitize(*sanitizer, &current),
                Step::Check(check, message) => {
                    if failure.is_some() || (self.optional && current.is_empty()) {
                        continue;
                    }
                    if !passes(check, &current).await? {
                        failure = Some(message.render(&current));
                    }
                }
            }
        }

        Ok((current, failure))
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: String,
}

/// Sanitized form plus the accumulated errors
#[derive(Debug, Clone)]
pub struct Validated {
    pub form: FormData,
    pub errors: Vec<FieldError>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Ordered rule list evaluated against a submitted form
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Vec<Rule>,
}

impl Pipeline {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Run every rule in order. Only a failing store round-trip inside a
    /// custom check is returned as `Err`.
    pub async fn run(&self, mut form: FormData) -> AppResult<Validated> {
        let mut errors = Vec::new();

        for rule in &self.rules {
            let values: Vec<String> = if rule.each {
                form.get_all(rule.field).to_vec()
            } else {
                vec![form.get(rule.field).to_string()]
            };

            let mut sanitized = Vec::with_capacity(values.len());
            for value in &values {
                let (value, failure) = rule.apply(value).await?;
                if let Some(message) = failure {
                    errors.push(FieldError {
                        field: rule.field.to_string(),
                        message,
                        value: value.clone(),
                    });
                }
                sanitized.push(value);
            }

            if rule.each {
                form.set_all(rule.field, sanitized);
            } else if let Some(value) = sanitized.into_iter().next() {
                form.set(rule.field, value);
            }
        }

        Ok(Validated { form, errors })
    }
}

// =============================================================================
// Sanitizers and predicates
// =============================================================================

fn sanitize(sanitizer: Sanitizer, value: &str) -> String {
    match sanitizer {
        Sanitizer::Trim => value.trim().to_string(),
        Sanitizer::Escape => escape(value),
    }
}

async fn passes(check: &Check, value: &str) -> AppResult<bool> {
    Ok(match check {
        Check::Required => !value.is_empty(),
        Check::MaxLength(max) => value.validate_length(None, Some(*max), None),
        Check::Alphanumeric => !value.is_empty() && value.chars().all(char::is_alphanumeric),
        Check::IsoDate => parse_date(value).is_some(),
        Check::OneOf(allowed) => allowed.iter().any(|candidate| *candidate == value),
        Check::Identifier => parse_id(value).is_some(),
        Check::Custom(check) => check.passes(value).await?,
    })
}

/// Replace HTML-significant characters with entities
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Parse an ISO-8601 calendar date, accepting a trailing time part
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a document identifier; malformed input yields `None`
pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}
