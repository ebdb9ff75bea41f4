/// Input validation for data submitted through the form and JSON API
///
/// The form widgets carry min/max attributes, but nothing stops a client from
/// posting other values. These checks apply the same bounds on the server,
/// driven by the declarative field list in `schema::form`.
use std::collections::HashMap;

use crate::error::GuardianError;
use crate::schema::{
    form_fields, Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, FieldKind,
    PatientInput, RestingEcg, Sex, StSlope,
};

/// Check every numeric field against its form bounds.
///
/// # Returns
/// * `Ok(())` if all values are within bounds
/// * `Err` with one message per offending field
pub fn validate_patient(input: &PatientInput) -> std::result::Result<(), Vec<String>> {
    let value = match serde_json::to_value(input) {
        Ok(v) => v,
        Err(e) => return Err(vec![format!("cannot inspect input: {e}")]),
    };
    let errors = check_bounds(&value);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Bound-check the numeric fields of a serialized `PatientInput`.
fn check_bounds(value: &serde_json::Value) -> Vec<String> {
    let mut errors = Vec::new();

    for field in form_fields() {
        match field.kind {
            FieldKind::Integer { min, max, .. } => match value[field.name].as_i64() {
                Some(v) if v < min || v > max => errors.push(format!(
                    "{} must be between {} and {}, got {}",
                    field.label, min, max, v
                )),
                Some(_) => {}
                None => errors.push(format!("{} must be a whole number", field.label)),
            },
            FieldKind::Decimal { min, max, .. } => match value[field.name].as_f64() {
                Some(v) if v.is_finite() && (v < min || v > max) => errors.push(format!(
                    "{} must be between {:.1} and {:.1}, got {}",
                    field.label, min, max, v
                )),
                Some(v) if v.is_finite() => {}
                _ => errors.push(format!("{} must be a finite number", field.label)),
            },
            // Typed enums cannot hold an unknown option.
            FieldKind::Choice { .. } => {}
        }
    }

    errors
}

/// Build a `PatientInput` from urlencoded form fields.
///
/// Collects every problem instead of stopping at the first one so the page
/// can show them all.
pub fn parse_form(
    form: &HashMap<String, String>,
) -> std::result::Result<PatientInput, Vec<String>> {
    let mut errors = Vec::new();

    let age = parse_int(form, "age", &mut errors);
    let sex = parse_choice::<Sex>(form, &mut errors);
    let chest_pain_type = parse_choice::<ChestPainType>(form, &mut errors);
    let resting_bp = parse_int(form, "resting_bp", &mut errors);
    let cholesterol = parse_int(form, "cholesterol", &mut errors);
    let fasting_blood_sugar = parse_choice::<FastingBloodSugar>(form, &mut errors);
    let resting_ecg = parse_choice::<RestingEcg>(form, &mut errors);
    let max_heart_rate = parse_int(form, "max_heart_rate", &mut errors);
    let exercise_angina = parse_choice::<ExerciseAngina>(form, &mut errors);
    let oldpeak = parse_decimal(form, "oldpeak", &mut errors);
    let st_slope = parse_choice::<StSlope>(form, &mut errors);

    match (
        age,
        sex,
        chest_pain_type,
        resting_bp,
        cholesterol,
        fasting_blood_sugar,
        resting_ecg,
        max_heart_rate,
        exercise_angina,
        oldpeak,
        st_slope,
    ) {
        (
            Some(age),
            Some(sex),
            Some(chest_pain_type),
            Some(resting_bp),
            Some(cholesterol),
            Some(fasting_blood_sugar),
            Some(resting_ecg),
            Some(max_heart_rate),
            Some(exercise_angina),
            Some(oldpeak),
            Some(st_slope),
        ) if errors.is_empty() => {
            let input = PatientInput {
                age,
                sex,
                chest_pain_type,
                resting_bp,
                cholesterol,
                fasting_blood_sugar,
                resting_ecg,
                max_heart_rate,
                exercise_angina,
                oldpeak,
                st_slope,
            };
            validate_patient(&input)?;
            Ok(input)
        }
        _ => Err(errors),
    }
}

fn raw<'a>(
    form: &'a HashMap<String, String>,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    match form.get(name).map(|s| s.trim()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(format!("{name} is required"));
            None
        }
    }
}

fn parse_int(form: &HashMap<String, String>, name: &str, errors: &mut Vec<String>) -> Option<i64> {
    let v = raw(form, name, errors)?;
    match v.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(format!("{name} must be a whole number, got {v:?}"));
            None
        }
    }
}

fn parse_decimal(
    form: &HashMap<String, String>,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let v = raw(form, name, errors)?;
    match v.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(format!("{name} must be a number, got {v:?}"));
            None
        }
    }
}

fn parse_choice<C: Categorical>(
    form: &HashMap<String, String>,
    errors: &mut Vec<String>,
) -> Option<C> {
    let v = raw(form, C::FIELD, errors)?;
    match C::from_label(v) {
        Some(c) => Some(c),
        None => {
            errors.push(
                GuardianError::UnknownOption {
                    field: C::FIELD.to_string(),
                    value: v.to_string(),
                }
                .to_string(),
            );
            None
        }
    }
}
