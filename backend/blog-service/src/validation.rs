//! Untrusted input decoding and field validation
//!
//! Request bodies are decoded in two passes so that every violation is
//! reported at once:
//!
//! 1. structural: each declared field must be present and carry the right
//!    JSON type;
//! 2. rules: the `validator` derive rules of the typed request (email
//!    syntax, non-empty text).
//!
//! Path and query extraction failures are reported the same way.

use crate::error::AppError;
use actix_web::error::JsonPayloadError;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Field name, or `body` / `path` / `query` for whole-input failures
    pub field: String,
    /// Machine-readable rule name (`missing`, `type`, `length`, `email`, ...)
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, "missing", "field required")
    }

    fn wrong_type(field: &str, expected: FieldType) -> Self {
        Self::new(field, "type", format!("expected {}", expected.describe()))
    }

    fn body(message: impl Into<String>) -> Self {
        Self::new("body", "invalid", message)
    }

    fn from_rule(field: &str, error: &ValidationError) -> Self {
        let message = error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("failed {} check", error.code));
        Self::new(field, error.code.to_string(), message)
    }
}

/// JSON type a request field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.as_i64().is_some(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
        }
    }

    fn placeholder(self) -> Value {
        match self {
            FieldType::String => Value::String(String::new()),
            FieldType::Integer => Value::from(0),
        }
    }
}

/// Declared field of a request body
#[derive(Debug, Clone, Copy)]
pub struct ExpectedField {
    pub name: &'static str,
    pub ty: FieldType,
}

impl ExpectedField {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::String,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::Integer,
        }
    }
}

/// A typed request body with a declared set of required fields
pub trait RequestSchema: DeserializeOwned + Validate {
    const FIELDS: &'static [ExpectedField];
}

/// Decode an untyped JSON value into `T`, collecting every violation
pub fn parse_request<T: RequestSchema>(value: Value) -> Result<T, Vec<FieldViolation>> {
    let Value::Object(mut object) = value else {
        return Err(vec![FieldViolation::body("expected a JSON object")]);
    };

    let mut violations = Vec::new();
    for field in T::FIELDS {
        let violation = match object.get(field.name) {
            None | Some(Value::Null) => Some(FieldViolation::missing(field.name)),
            Some(value) if !field.ty.matches(value) => {
                Some(FieldViolation::wrong_type(field.name, field.ty))
            }
            Some(_) => None,
        };

        if let Some(violation) = violation {
            // Stand-in value lets the rule pass run over the remaining fields
            object.insert(field.name.to_string(), field.ty.placeholder());
            violations.push(violation);
        }
    }

    let request: T = match serde_json::from_value(Value::Object(object)) {
        Ok(request) => request,
        Err(e) => {
            violations.push(FieldViolation::body(e.to_string()));
            return Err(violations);
        }
    };

    if let Err(errors) = request.validate() {
        let field_errors = errors.field_errors();
        for field in T::FIELDS {
            if violations.iter().any(|v| v.field == field.name) {
                continue;
            }
            if let Some(errors) = field_errors.get(field.name) {
                violations.extend(errors.iter().map(|e| FieldViolation::from_rule(field.name, e)));
            }
        }
    }

    if violations.is_empty() {
        return Ok(request);
    }

    violations.sort_by_key(|v| {
        T::FIELDS
            .iter()
            .position(|field| field.name == v.field)
            .unwrap_or(usize::MAX)
    });
    Err(violations)
}

/// JSON body extractor that runs [`parse_request`]
///
/// Rejections surface as `422 Unprocessable Entity` listing every violation.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: RequestSchema + 'static> FromRequest for ValidatedJson<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let value = match body.await {
                Ok(web::Json(value)) => value,
                Err(err) => {
                    return match err.as_error::<JsonPayloadError>() {
                        Some(JsonPayloadError::Overflow { .. })
                        | Some(JsonPayloadError::OverflowKnownLength { .. }) => Err(err),
                        Some(payload_err) => Err(AppError::Validation(vec![
                            FieldViolation::body(payload_err.to_string()),
                        ])
                        .into()),
                        None => Err(err),
                    };
                }
            };

            parse_request::<T>(value)
                .map(ValidatedJson)
                .map_err(|violations| AppError::Validation(violations).into())
        })
    }
}

/// Path extractor config reporting bad segments (e.g. `/authors/abc`) as validation errors
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(vec![FieldViolation::new("path", "type", err.to_string())]).into()
    })
}

/// Query extractor config reporting bad parameters as validation errors
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(vec![FieldViolation::new("query", "type", err.to_string())]).into()
    })
}
