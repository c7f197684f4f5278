use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors {
    #[schema(value_type = Object)]
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok(value)` if nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Trimmed, non-empty string of at most `max` characters.
pub fn required_string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
    };
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {field} field must not be greater than {max} characters."),
        );
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("amount", "first");
        errors.add("amount", "second");
        errors.add("product_name", "third");

        assert_eq!(errors.get("amount").unwrap().len(), 2);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["amount", "product_name"]);
        assert_eq!(
            errors.to_string(),
            "amount: first; amount: second; product_name: third"
        );
    }

    #[test]
    fn required_string_trims_and_bounds() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            required_string(&mut errors, "name", Some("  widget "), 255),
            Some("widget".to_string())
        );
        assert!(errors.is_empty());

        assert_eq!(required_string(&mut errors, "blank", Some("   "), 255), None);
        assert_eq!(required_string(&mut errors, "missing", None, 255), None);
        let long = "x".repeat(256);
        assert_eq!(required_string(&mut errors, "long", Some(&long), 255), None);

        assert_eq!(errors.fields().count(), 3);
    }

    #[test]
    fn character_limit_counts_chars_not_bytes() {
        let mut errors = ValidationErrors::new();
        let name = "é".repeat(255);
        assert!(required_string(&mut errors, "name", Some(&name), 255).is_some());
        assert!(errors.is_empty());
    }
}
