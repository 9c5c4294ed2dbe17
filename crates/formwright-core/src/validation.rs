//! Field validators and the per-field validation rules.
//!
//! Rules are chosen by field key first (`name`, `age`, `email`, `address`)
//! and otherwise by input kind. Required-ness is a separate, submit-time
//! check: see [`missing_required`] and [`is_submit_eligible`].

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::FieldErrors;
use crate::field::{FieldDescriptor, InputKind};
use crate::registry::FieldRegistry;
use crate::values::FormValues;

/// ASCII-only `local@domain.tld`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z]{2,4}$")
        .expect("email pattern is valid")
});

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;
}

macro_rules! default_message {
    ($ty:ident, $default:expr) => {
        impl $ty {
            /// Creates the validator with its default message.
            #[must_use]
            pub fn new() -> Self {
                Self {
                    message: $default.to_string(),
                }
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Validator that requires a non-empty value. Whitespace counts as a value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

default_message!(RequiredValidator, "This field is required.");

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }
}

/// Validator that only admits ASCII letters and whitespace.
#[derive(Debug, Clone)]
pub struct LettersValidator {
    message: String,
}

default_message!(LettersValidator, "Name cannot contain special characters.");

impl Validator for LettersValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator for an integer inside an inclusive range.
#[derive(Debug, Clone)]
pub struct IntegerRangeValidator {
    min: i64,
    max: i64,
    message: String,
}

impl IntegerRangeValidator {
    /// Creates a validator for `min..=max` reporting `message`.
    pub fn new(min: i64, max: i64, message: impl Into<String>) -> Self {
        Self {
            min,
            max,
            message: message.into(),
        }
    }
}

impl Validator for IntegerRangeValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match value.trim().parse::<i64>() {
            Ok(n) if (self.min..=self.max).contains(&n) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Validator for `local@domain.tld` email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

default_message!(EmailValidator, "Please enter a valid email address.");

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_PATTERN.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator that rejects any digit.
#[derive(Debug, Clone)]
pub struct NoDigitsValidator {
    message: String,
}

default_message!(NoDigitsValidator, "Text fields cannot contain numbers.");

impl Validator for NoDigitsValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.chars().any(|c| c.is_ascii_digit()) {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }
}

/// Validator for a non-empty finite number.
#[derive(Debug, Clone)]
pub struct NumberValidator {
    message: String,
}

default_message!(NumberValidator, "This field requires a valid number.");

impl Validator for NumberValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Validator for `YYYY-MM-DD` dates. Empty values pass.
#[derive(Debug, Clone)]
pub struct DateValidator {
    message: String,
}

default_message!(DateValidator, "Please enter a date as YYYY-MM-DD.");

impl Validator for DateValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator that admits empty values or one of a fixed set of choices.
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
    choices: Vec<String>,
    message: String,
}

impl ChoiceValidator {
    /// Creates a new choice validator.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            message: "Please choose one of the available options.".to_string(),
        }
    }
}

impl Validator for ChoiceValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() || self.choices.iter().any(|c| c == value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Selects the validator for a field, or `None` when any value is accepted.
fn rule_for(descriptor: &FieldDescriptor) -> Option<Box<dyn Validator>> {
    match descriptor.key.as_str() {
        "name" => Some(Box::new(LettersValidator::new())),
        "age" => Some(Box::new(IntegerRangeValidator::new(
            1,
            120,
            "Please enter a valid age between 1 and 120.",
        ))),
        "email" => Some(Box::new(EmailValidator::new())),
        "address" => None,
        _ => match descriptor.kind {
            InputKind::Text => Some(Box::new(NoDigitsValidator::new())),
            InputKind::Number => Some(Box::new(NumberValidator::new())),
            InputKind::Date => Some(Box::new(DateValidator::new())),
            InputKind::Selection => Some(Box::new(ChoiceValidator::new(
                descriptor.options.iter().map(|o| o.value.clone()),
            ))),
        },
    }
}

/// Validates a candidate value for a field.
///
/// Pure: the same descriptor and value always give the same verdict.
/// Required-ness is not checked here.
#[must_use]
pub fn validate(descriptor: &FieldDescriptor, value: &str) -> Option<String> {
    rule_for(descriptor).and_then(|rule| rule.validate(value).err())
}

/// Returns a "required" error for every required field without a value.
#[must_use]
pub fn missing_required(registry: &FieldRegistry, values: &FormValues) -> FieldErrors {
    let required = RequiredValidator::new();
    let mut errors = FieldErrors::new();
    for field in registry.required() {
        if let Err(message) = required.validate(values.get(&field.key).unwrap_or("")) {
            errors.set(&field.key, message);
        }
    }
    errors
}

/// Returns whether the form may be submitted.
///
/// True iff no field holds an error and every required field has a value.
#[must_use]
pub fn is_submit_eligible(
    registry: &FieldRegistry,
    values: &FormValues,
    errors: &FieldErrors,
) -> bool {
    errors.is_empty() && missing_required(registry, values).is_empty()
}
