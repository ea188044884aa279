//! Utilidades de validación
//!
//! Este módulo contiene validadores custom para `validator` y la conversión
//! de `ValidationErrors` a la lista de incidencias que devuelve la API.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Longitud máxima del short code
pub const SHORT_CODE_MAX_LEN: usize = 4;

fn issue(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Validar que el short code no esté vacío y no supere la longitud máxima
pub fn validate_short_code(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(issue("missing_short_code", "missing short code"));
    }

    if value.chars().count() > SHORT_CODE_MAX_LEN {
        let mut error = issue("short_code_too_long", "short code too long");
        error.add_param("max".into(), &SHORT_CODE_MAX_LEN);
        return Err(error);
    }

    Ok(())
}

/// Validar el nivel de batería, de 0 a 100
pub fn validate_battery_level(value: i64) -> Result<(), ValidationError> {
    if !(0..=100).contains(&value) {
        let mut error = issue("range", "battery level must be > 0 and <= 100");
        error.add_param("value".into(), &value);
        return Err(error);
    }

    Ok(())
}

/// Aplanar los errores en el orden de `fields`, un mensaje por regla
pub fn collect_issues(errors: &ValidationErrors, fields: &[&'static str]) -> Vec<String> {
    let by_field = errors.field_errors();

    fields
        .iter()
        .filter_map(|field| by_field.get(field))
        .flat_map(|errors| errors.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .collect()
}
