//! Declarative validation rules for form fields
//!
//! Every form declares a static table of [`FieldSpec`] entries; the table is
//! the whole rule set, so a form's constraints can be enumerated without
//! running it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text formats checked without a regex engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `local@domain.tld`
    Email,
    /// Optional leading `+`, then 10 to 15 digits
    Phone,
}

impl Pattern {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Email => is_email(value),
            Self::Phone => is_phone(value),
        }
    }

    fn message(&self, label: &str) -> String {
        match self {
            Self::Email => format!("{} doit être une adresse e-mail valide", label),
            Self::Phone => format!("{} doit contenir 10 à 15 chiffres", label),
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_phone(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Validation rules for a field
/// Copy trait for efficient passing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

impl ValidationRules {
    /// Create empty validation rules (all optional, no constraints)
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Create validation rules for required field
    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::none()
        }
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Exact length, expressed as equal min and max
    pub const fn exact_length(self, len: usize) -> Self {
        self.min_length(len).max_length(len)
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Validate a string value against the rules
    ///
    /// Optional blank values pass. Length and format are measured on `value`
    /// as given, since that is what the form sends.
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return if self.required {
                Err(format!("{} est obligatoire", field_label))
            } else {
                Ok(())
            };
        }

        let len = value.chars().count();
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min == max && len != min {
                return Err(format!("{} doit contenir exactement {} caractères", field_label, min));
            }
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(format!("{} doit contenir au moins {} caractères", field_label, min));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!("{} ne doit pas dépasser {} caractères", field_label, max));
            }
        }

        if let Some(pattern) = self.pattern {
            if !pattern.matches(value) {
                return Err(pattern.message(field_label));
            }
        }

        Ok(())
    }

    /// Validate a numeric value against required and min/max rules
    pub fn validate_number(&self, value: Option<f64>, field_label: &str) -> Result<(), String> {
        let Some(value) = value else {
            return if self.required {
                Err(format!("{} doit être un nombre", field_label))
            } else {
                Ok(())
            };
        };

        if !value.is_finite() {
            return Err(format!("{} doit être un nombre", field_label));
        }

        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} doit être supérieur ou égal à {}", field_label, min));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} doit être inférieur ou égal à {}", field_label, max));
            }
        }

        Ok(())
    }
}

/// One entry of a form's rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire name of the field, also the key used for error markers
    pub name: &'static str,
    pub label: &'static str,
    pub rules: ValidationRules,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, rules: ValidationRules) -> Self {
        Self { name, label, rules }
    }
}

/// Field-level error markers, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check a text value and record the first failing rule
    pub fn check_text(&mut self, spec: &FieldSpec, value: &str) {
        if let Err(message) = spec.rules.validate_string(value, spec.label) {
            self.insert(spec.name, message);
        }
    }

    /// Check a numeric value and record the first failing rule
    pub fn check_number(&mut self, spec: &FieldSpec, value: Option<f64>) {
        if let Err(message) = spec.rules.validate_number(value, spec.label) {
            self.insert(spec.name, message);
        }
    }

    /// Record a required reference (select box) that has no value
    pub fn check_selected<T>(&mut self, spec: &FieldSpec, value: Option<T>) {
        if spec.rules.required && value.is_none() {
            self.insert(spec.name, format!("{} est obligatoire", spec.label));
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
