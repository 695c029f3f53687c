//! Input validation functions
//!
//! Field rules shared by the backend handlers and the client forms, so
//! both sides reject the same input with the same message.

use crate::errors::ValidationError;

/// Return the trimmed value, or an error naming the field when it is blank
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, format!("{} is required.", field)));
    }
    Ok(trimmed)
}

/// Validate the register form: username, password and name
pub fn validate_registration(
    username: &str,
    password: &str,
    name: &str,
) -> Result<(), ValidationError> {
    if username.trim().is_empty() || password.trim().is_empty() || name.trim().is_empty() {
        return Err(ValidationError::new(
            missing_field(&[("username", username), ("password", password), ("name", name)]),
            "All fields are required.",
        ));
    }
    Ok(())
}

/// Validate the profile update form: name and username
pub fn validate_profile(name: &str, username: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || username.trim().is_empty() {
        return Err(ValidationError::new(
            missing_field(&[("name", name), ("username", username)]),
            "Name and username are required.",
        ));
    }
    Ok(())
}

/// Validate a recipe: name plus at least one ingredient and instruction
pub fn validate_recipe(
    name: &str,
    ingredients: &[String],
    instructions: &[String],
) -> Result<(), ValidationError> {
    require("name", name)?;
    if !ingredients.iter().any(|i| !i.trim().is_empty()) {
        return Err(ValidationError::new(
            "ingredients",
            "At least one ingredient is required.",
        ));
    }
    if !instructions.iter().any(|i| !i.trim().is_empty()) {
        return Err(ValidationError::new(
            "instructions",
            "At least one instruction is required.",
        ));
    }
    Ok(())
}

fn missing_field(fields: &[(&'static str, &str)]) -> &'static str {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .unwrap_or("form")
}
