use crate::data::models::AppError;

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims `value`; blank or missing both become `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("Front", "  hola \n").unwrap(), "hola");
        match required_text("Front", " \t ") {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Front is required"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(Some(" tip ")), Some("tip".to_string()));
    }
}
