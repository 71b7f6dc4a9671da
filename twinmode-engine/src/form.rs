//! URL-encoded form bodies.

use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{0}' form field not found")]
    FieldNotFound(String),

    #[error("multiple '{0}' form fields found")]
    MultipleFields(String),
}

/// Extracts the single value of `name` from an `application/x-www-form-urlencoded`
/// body, percent- and plus-decoded.
pub fn parse_form_field(body: &str, name: &str) -> Result<String, ParseError> {
    let mut values = form_urlencoded::parse(body.as_bytes())
        .filter(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.into_owned());

    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        (None, _) => Err(ParseError::FieldNotFound(name.to_string())),
        (Some(_), Some(_)) => Err(ParseError::MultipleFields(name.to_string())),
    }
}
