//! Input Validation Framework
//!
//! Bound request bodies are validated before the handler runs. A type opts in by
//! implementing [`Validate`]; the builder in [`ValidationRules`] covers the common
//! rules. Failures are rendered through the [`Translator`] for the configured
//! [`Locale`], unless the type supplies its own message for a `"field.tag"` key.
//!
//! # Example
//!
//! ```rust,ignore
//! use fast_web::validation::{Validate, ValidationResult, ValidationRules};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct CreateUserInput {
//!     name: String,
//!     email: String,
//!     age: i64,
//! }
//!
//! impl Validate for CreateUserInput {
//!     fn validate(&self) -> ValidationResult {
//!         ValidationRules::new()
//!             .required("name", &self.name)
//!             .max_length("name", &self.name, 100)
//!             .email("email", &self.email)
//!             .range("age", self.age, 0, 150)
//!             .build()
//!     }
//!
//!     fn messages(&self) -> &'static [(&'static str, &'static str)] {
//!         &[("name.required", "please tell us your name")]
//!     }
//! }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

/// Separator between rendered field errors.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Language of generic validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

/// Validation error for a single field.
///
/// `tag` names the failed rule (`required`, `email`, ...). `param` carries the
/// rule argument shown in the message, such as the minimum length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the field that failed validation
    pub field: String,
    /// Rule that failed
    pub tag: String,
    /// Rule argument, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: None,
        }
    }

    /// Attach the rule argument.
    pub fn with_param(mut self, param: impl ToString) -> Self {
        self.param = Some(param.to_string());
        self
    }

    /// Create a "required" field error
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "required")
    }

    /// Create a "min_length" field error
    pub fn min_length(field: impl Into<String>, min: usize) -> Self {
        Self::new(field, "min_length").with_param(min)
    }

    /// Create a "max_length" field error
    pub fn max_length(field: impl Into<String>, max: usize) -> Self {
        Self::new(field, "max_length").with_param(max)
    }

    /// Create a "range" field error
    pub fn range(field: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(field, "range").with_param(format!("{min}..={max}"))
    }

    /// Create a "pattern" field error
    pub fn pattern(field: impl Into<String>, pattern: &str) -> Self {
        Self::new(field, "pattern").with_param(pattern)
    }

    /// Create an "email" field error
    pub fn email(field: impl Into<String>) -> Self {
        Self::new(field, "email")
    }

    /// Create a "password" field error
    pub fn password(field: impl Into<String>) -> Self {
        Self::new(field, "password")
    }

    /// Create a custom field error; the message is used verbatim.
    pub fn custom(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, "custom").with_param(message.into())
    }

    /// Key used to look up a type's custom message.
    pub fn message_key(&self) -> String {
        format!("{}.{}", self.field, self.tag)
    }
}

/// Result of validating an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the input is valid
    pub valid: bool,
    /// List of field-level errors (empty if valid)
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Create a validation result from a list of errors.
    /// If the list is empty, the result is valid.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        if !errors.is_empty() {
            let field_names: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            debug!(
                error_count = errors.len(),
                fields = ?field_names,
                "Validation failed"
            );
        }
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get the errors
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Merge another validation result into this one
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.valid = self.errors.is_empty();
        self
    }

    /// Render every error, preferring `messages` over the translator, and join them.
    pub fn render(&self, messages: &[(&str, &str)], translator: &Translator) -> String {
        self.errors
            .iter()
            .map(|error| {
                let key = error.message_key();
                messages
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, message)| (*message).to_string())
                    .unwrap_or_else(|| translator.translate(error))
            })
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Trait for validatable input types.
///
/// The default implementation accepts everything, so types without rules can
/// opt in with an empty `impl Validate for MyInput {}`.
pub trait Validate {
    /// Validate the input and return a result with any errors
    fn validate(&self) -> ValidationResult {
        ValidationResult::ok()
    }

    /// Custom messages keyed `"field.tag"`, consulted before the translator.
    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

impl Validate for () {}

impl Validate for serde_json::Value {}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> ValidationResult {
        match self {
            Some(value) => value.validate(),
            None => ValidationResult::ok(),
        }
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Some(value) => value.messages(),
            None => &[],
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> ValidationResult {
        self.iter()
            .fold(ValidationResult::ok(), |acc, item| acc.merge(item.validate()))
    }
}

/// Validate `value` and render failures in `locale`.
pub fn check<T: Validate>(value: &T, locale: Locale) -> Result<(), String> {
    let result = value.validate();
    if result.is_valid() {
        return Ok(());
    }
    Err(result.render(value.messages(), &Translator::new(locale)))
}

/// Builder for validation rules.
///
/// # Example
///
/// ```rust,ignore
/// let result = ValidationRules::new()
///     .required("name", &input.name)
///     .min_length("name", &input.name, 2)
///     .email("email", &input.email)
///     .password("password", &input.password)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ValidationRules {
    errors: Vec<FieldError>,
}

impl ValidationRules {
    /// Create a new validation rules builder
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a custom error
    pub fn add_error(mut self, error: FieldError) -> Self {
        trace!(field = %error.field, tag = %error.tag, "Adding custom validation error");
        self.errors.push(error);
        self
    }

    /// Validate that a string field is not empty (required)
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            trace!(field = %field, "Required field is empty");
            self.errors.push(FieldError::required(field));
        }
        self
    }

    /// Validate that an optional value is present
    pub fn required_some<T>(mut self, field: &str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.errors.push(FieldError::required(field));
        }
        self
    }

    /// Validate minimum string length, in characters
    pub fn min_length(mut self, field: &str, value: &str, min: usize) -> Self {
        if value.chars().count() < min {
            self.errors.push(FieldError::min_length(field, min));
        }
        self
    }

    /// Validate maximum string length, in characters
    pub fn max_length(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            self.errors.push(FieldError::max_length(field, max));
        }
        self
    }

    /// Validate that a number is within a range (inclusive)
    pub fn range(mut self, field: &str, value: i64, min: i64, max: i64) -> Self {
        if value < min || value > max {
            trace!(field = %field, value = value, min = min, max = max, "Field outside valid range");
            self.errors.push(FieldError::range(field, min, max));
        }
        self
    }

    /// Validate that a string matches a regex pattern
    pub fn pattern(mut self, field: &str, value: &str, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(value) {
                    self.errors.push(FieldError::pattern(field, pattern));
                }
            }
            Err(e) => {
                warn!(field = %field, pattern = %pattern, error = %e, "Invalid validation regex pattern");
                self.errors.push(FieldError::pattern(field, pattern));
            }
        }
        self
    }

    /// Validate that a string is an email address. Empty strings are left to `required`.
    pub fn email(mut self, field: &str, value: &str) -> Self {
        if !value.is_empty() && !is_email(value) {
            self.errors.push(FieldError::email(field));
        }
        self
    }

    /// Password strength: at least 8 ASCII letters or digits, with a lowercase
    /// letter, an uppercase letter and a digit.
    pub fn password(mut self, field: &str, value: &str) -> Self {
        let strong = value.len() >= 8
            && value.chars().all(|c| c.is_ascii_alphanumeric())
            && value.chars().any(|c| c.is_ascii_lowercase())
            && value.chars().any(|c| c.is_ascii_uppercase())
            && value.chars().any(|c| c.is_ascii_digit());
        if !strong {
            self.errors.push(FieldError::password(field));
        }
        self
    }

    /// Run an arbitrary check.
    pub fn custom(mut self, field: &str, ok: bool, message: &str) -> Self {
        if !ok {
            self.errors.push(FieldError::custom(field, message));
        }
        self
    }

    /// Build the validation result
    pub fn build(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

static TRANSLATIONS: LazyLock<HashMap<(Locale, &'static str), &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ((Locale::En, "required"), "{field} is a required field"),
            (
                (Locale::En, "min_length"),
                "{field} must be at least {param} characters in length",
            ),
            (
                (Locale::En, "max_length"),
                "{field} must be a maximum of {param} characters in length",
            ),
            ((Locale::En, "range"), "{field} must be in the range {param}"),
            ((Locale::En, "email"), "{field} must be a valid email address"),
            ((Locale::En, "pattern"), "{field} has an invalid format"),
            ((Locale::En, "password"), "{field} is too weak"),
            ((Locale::Zh, "required"), "{field}为必填字段"),
            ((Locale::Zh, "min_length"), "{field}长度必须至少为{param}个字符"),
            ((Locale::Zh, "max_length"), "{field}长度不能超过{param}个字符"),
            ((Locale::Zh, "range"), "{field}必须在{param}范围内"),
            ((Locale::Zh, "email"), "{field}必须是一个有效的邮箱"),
            ((Locale::Zh, "pattern"), "{field}格式不正确"),
            ((Locale::Zh, "password"), "{field}复杂度太低!"),
        ])
    });

/// Renders [`FieldError`]s using the built-in message tables.
///
/// The tables are built on first use and read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    /// Translator for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Locale in use.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Localized text for one error.
    pub fn translate(&self, error: &FieldError) -> String {
        if error.tag == "custom" {
            return error.param.clone().unwrap_or_default();
        }
        let template = TRANSLATIONS
            .get(&(self.locale, error.tag.as_str()))
            .or_else(|| TRANSLATIONS.get(&(Locale::En, error.tag.as_str())));
        match template {
            Some(template) => template
                .replace("{field}", &error.field)
                .replace("{param}", error.param.as_deref().unwrap_or_default()),
            None => format!("{} failed on the '{}' rule", error.field, error.tag),
        }
    }
}
