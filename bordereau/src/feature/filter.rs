//! Attribute-equality filter for feature queries.

use std::fmt;
use thiserror::Error;

/// Errors raised while building a filter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The attribute name is not a plain identifier
    #[error("Invalid filter attribute '{0}'")]
    InvalidAttribute(String),

    /// The literal contains a quote; literals are never escaped
    #[error("Filter value contains a quote character: {0}")]
    QuotedValue(String),
}

/// `<attribute> = '<value>'` in CQL text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    attribute: String,
    value: String,
}

impl AttributeFilter {
    /// Builds an equality filter.
    ///
    /// The attribute must match `[A-Za-z_][A-Za-z0-9_.:]*` and the value must
    /// not contain `'`. Both are rejected rather than escaped.
    pub fn equals(attribute: &str, value: &str) -> Result<Self, FilterError> {
        if !is_identifier(attribute) {
            return Err(FilterError::InvalidAttribute(attribute.to_string()));
        }
        if value.contains('\'') {
            return Err(FilterError::QuotedValue(value.to_string()));
        }

        Ok(Self {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}'", self.attribute, self.value)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':'))
}
