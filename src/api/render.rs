//! Server-rendered HTML for the screening form.
//!
//! The page is generated from `schema::form_fields()`, so adding a field to
//! the schema is enough to put it on the form.

use std::collections::HashMap;

use crate::inference::{RiskOutcome, DISCLAIMER, FOOTER, HEALTH_TIPS};
use crate::schema::{form_fields, FieldKind, FormField, PatientInput, Section};

const STYLE: &str = include_str!("static/style.css");

/// Current form values keyed by field name.
pub type FormValues = HashMap<String, String>;

/// Values that prefill the form: the schema defaults.
pub fn default_values() -> FormValues {
    input_values(&PatientInput::default())
}

/// Form values that reproduce `input`.
pub fn input_values(input: &PatientInput) -> FormValues {
    let mut values = FormValues::new();
    if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(input) {
        for (name, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            values.insert(name, text);
        }
    }
    values
}

/// Defaults overlaid with whatever the client submitted.
pub fn submitted_values(form: &HashMap<String, String>) -> FormValues {
    let mut values = default_values();
    for field in form_fields() {
        if let Some(v) = form.get(field.name) {
            values.insert(field.name.to_string(), v.trim().to_string());
        }
    }
    values
}

/// Full page: header, optional errors, form, optional result card.
pub fn page(values: &FormValues, outcome: Option<RiskOutcome>, errors: &[String]) -> String {
    let mut body = String::new();
    body.push_str(
        "<header><h1>Heart Health Guardian</h1>\
         <p class=\"tagline\">Your personal heart health assessment tool</p>\
         <p>Fill in your health information below to check your heart disease risk. \
         This tool uses a machine learning model to estimate risk based on your inputs.</p></header>\n",
    );

    if !errors.is_empty() {
        body.push_str(
            "<section class=\"errors\" role=\"alert\">\
             <h2>Please correct the following</h2><ul>",
        );
        for e in errors {
            body.push_str(&format!("<li>{}</li>", escape(e)));
        }
        body.push_str("</ul></section>\n");
    }

    body.push_str(&form(values));

    if let Some(outcome) = outcome {
        body.push_str(&result_card(outcome));
        body.push_str(&tips());
    }

    body.push_str(&format!("<footer>{}</footer>\n", escape(FOOTER)));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Heart Health Guardian</title>\n<style>\n{STYLE}</style>\n</head>\n\
         <body>\n<main>\n{body}</main>\n</body>\n</html>\n"
    )
}

fn form(values: &FormValues) -> String {
    let fields = form_fields();
    let mut out = String::from("<form method=\"post\" action=\"/predict\">\n");
    for section in Section::ALL {
        out.push_str(&format!("<fieldset><legend>{}</legend>\n", escape(section.title())));
        for field in fields.iter().filter(|f| f.section == section) {
            let value = values.get(field.name).map(String::as_str);
            out.push_str(&field_html(field, value));
        }
        out.push_str("</fieldset>\n");
    }
    out.push_str("<button type=\"submit\">Check My Heart Health</button>\n</form>\n");
    out
}

fn field_html(field: &FormField, value: Option<&str>) -> String {
    let control = match &field.kind {
        FieldKind::Integer { min, max, default } => {
            let value = value
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string());
            format!(
                "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\" required>",
                name = field.name,
                value = escape(&value),
            )
        }
        FieldKind::Decimal {
            min,
            max,
            step,
            default,
        } => {
            let value = value
                .map(str::to_string)
                .unwrap_or_else(|| format!("{default:.1}"));
            format!(
                "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min:.1}\" max=\"{max:.1}\" step=\"{step}\" value=\"{value}\" required>",
                name = field.name,
                value = escape(&value),
            )
        }
        FieldKind::Choice { options, default } => {
            let selected = value.unwrap_or(*default);
            let mut select = format!("<select id=\"{0}\" name=\"{0}\">", field.name);
            for option in options {
                let attr = if *option == selected { " selected" } else { "" };
                select.push_str(&format!(
                    "<option value=\"{0}\"{attr}>{0}</option>",
                    escape(option)
                ));
            }
            select.push_str("</select>");
            select
        }
    };

    format!(
        "<div class=\"field\"><label for=\"{}\">{}</label>{}<small>{}</small></div>\n",
        field.name,
        escape(field.label),
        control,
        escape(field.help)
    )
}

fn result_card(outcome: RiskOutcome) -> String {
    let class = if outcome.is_risk() { "risk" } else { "healthy" };
    format!(
        "<section class=\"result {class}\" aria-live=\"polite\">\
         <h2>{}</h2><p>{}</p><p>{}</p><p><strong>{}</strong></p>\
         <p class=\"disclaimer\">{}</p></section>\n",
        escape(outcome.headline()),
        escape(outcome.summary()),
        escape(outcome.advice()),
        escape(outcome.closing()),
        escape(DISCLAIMER),
    )
}

fn tips() -> String {
    let mut out = String::from("<section class=\"tips\"><h2>Heart Health Tips</h2><ul>");
    for (title, text) in HEALTH_TIPS {
        out.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>",
            escape(title),
            escape(text)
        ));
    }
    out.push_str("</ul></section>\n");
    out
}

/// Escape text for HTML element and attribute content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FEATURE_NAMES;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b a="x">&'"#),
            "&lt;b a=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn form_has_every_feature_and_section() {
        let html = page(&default_values(), None, &[]);
        for name in FEATURE_NAMES {
            assert!(html.contains(&format!("name=\"{name}\"")), "missing {name}");
        }
        for section in Section::ALL {
            assert!(html.contains(section.title()));
        }
        assert!(html.contains("Check My Heart Health"));
        assert!(!html.contains("class=\"result"));
    }

    #[test]
    fn defaults_are_prefilled() {
        let values = default_values();
        assert_eq!(values["age"], "45");
        assert_eq!(values["oldpeak"], "1.0");
        assert_eq!(values["chest_pain_type"], "Typical Angina");

        let html = page(&values, None, &[]);
        assert!(html.contains("<option value=\"Female\" selected>"));
        assert!(html.contains("<option value=\"Upward\" selected>"));
        assert!(html.contains(
            "name=\"cholesterol\" min=\"100\" max=\"600\" step=\"1\" value=\"200\""
        ));
    }

    #[test]
    fn result_card_and_tips_follow_outcome() {
        let html = page(&default_values(), Some(RiskOutcome::RiskIndicators), &[]);
        assert!(html.contains("Potential Risk Detected"));
        assert!(html.contains("class=\"result risk\""));
        assert!(html.contains(&escape(DISCLAIMER)));
        assert!(html.contains("Heart Health Tips"));

        let html = page(&default_values(), Some(RiskOutcome::NoRiskIndicators), &[]);
        assert!(html.contains("Healthy Heart Indicators"));
        assert!(!html.contains("Potential Risk Detected"));
    }

    #[test]
    fn submitted_values_are_echoed_escaped() {
        let mut form = HashMap::new();
        form.insert("age".to_string(), "<script>".to_string());
        let values = submitted_values(&form);
        let html = page(&values, None, &["age must be a whole number".to_string()]);
        assert!(html.contains("value=\"&lt;script&gt;\""));
        assert!(!html.contains("<script>"));
        assert!(html.contains("age must be a whole number"));
    }
}
