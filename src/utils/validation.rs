//! Utilidades de validación
//!
//! Reglas que no se pueden expresar con los atributos de `validator`
//! (año máximo dinámico) y helpers para construir errores.

use chrono::{Datelike, Utc};
use validator::{ValidationError, ValidationErrors};

/// Año mínimo aceptado para un vehículo
pub const MIN_MODEL_YEAR: i32 = 1900;

/// Año actual (UTC)
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar el año del modelo contra el año actual
pub fn validate_model_year(year: i32, current_year: i32) -> Result<(), ValidationError> {
    validate_range(year, MIN_MODEL_YEAR, current_year)
}

/// Agregar un error de campo a un resultado previo de `validate()`
pub fn merge_field_error(
    result: Result<(), ValidationErrors>,
    field: &'static str,
    error: Option<ValidationError>,
) -> Result<(), ValidationErrors> {
    let Some(error) = error else {
        return result;
    };

    let mut errors = match result {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    errors.add(field, error);
    Err(errors)
}

/// Un texto vacío o solo con espacios cuenta como ausente
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
