//! Binding of the raw HTML form into a [`QuotationInput`].
//!
//! Every field arrives as text so that a non-numeric price or a malformed
//! item list becomes a validation message instead of a rejected request.
//! Field names match the form markup.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quotation::{normalize_optional, LineItemInput, QuotationInput};

/// Raw urlencoded quotation form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotationForm {
    #[serde(rename = "cliente")]
    pub client_name: String,
    #[serde(rename = "contacto")]
    pub contact_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "proyecto")]
    pub project_title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "dias_entrega")]
    pub delivery_days: String,
    #[serde(rename = "dias_validez")]
    pub validity_days: String,
    pub subtotal: String,
    /// JSON array of `{cantidad, detalle, precio, monto}`.
    pub items: String,
}

impl QuotationForm {
    /// Coerce every field into its typed form.
    ///
    /// Coercion problems are collected and reported together. Rule checks
    /// (required client, positive quantities, ...) happen later in
    /// [`QuotationInput::into_draft`].
    pub fn into_input(self) -> Result<QuotationInput, CoreError> {
        let mut errors = Vec::new();

        let delivery_days = parse_optional::<i32>(&self.delivery_days, "dias de entrega", &mut errors);
        let validity_days = parse_optional::<i32>(&self.validity_days, "dias de validez", &mut errors);
        let subtotal = parse_optional::<Decimal>(&self.subtotal, "subtotal", &mut errors);

        let items = match self.items.trim() {
            "" => Vec::new(),
            raw => match serde_json::from_str::<Vec<LineItemInput>>(raw) {
                Ok(items) => items,
                Err(e) => {
                    errors.push(format!("Lista de items invalida: {e}"));
                    Vec::new()
                }
            },
        };

        if !errors.is_empty() {
            return Err(CoreError::Validation(errors.join("; ")));
        }

        Ok(QuotationInput {
            client_name: self.client_name,
            contact_name: normalize_optional(Some(self.contact_name)),
            email: normalize_optional(Some(self.email)),
            phone: normalize_optional(Some(self.phone)),
            project_title: normalize_optional(Some(self.project_title)),
            description: self.description,
            delivery_days,
            validity_days,
            subtotal,
            items,
        })
    }
}

fn parse_optional<T: FromStr>(raw: &str, label: &str, errors: &mut Vec<String>) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(format!("El campo {label} debe ser numerico: '{raw}'"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form() -> QuotationForm {
        QuotationForm {
            client_name: "Soda Tica".into(),
            contact_name: "".into(),
            email: "soda@tica.cr".into(),
            phone: "8888-0000".into(),
            project_title: "Menu board".into(),
            description: "Pizarra de menu".into(),
            delivery_days: "10".into(),
            validity_days: " ".into(),
            subtotal: "".into(),
            items: r#"[{"cantidad": "1", "detalle": "Pizarra", "precio": 50000, "monto": 50000}]"#
                .into(),
        }
    }

    #[test]
    fn binds_all_fields() {
        let input = form().into_input().unwrap();
        assert_eq!(input.client_name, "Soda Tica");
        assert_eq!(input.contact_name, None);
        assert_eq!(input.delivery_days, Some(10));
        assert_eq!(input.validity_days, None);
        assert_eq!(input.subtotal, None);
        assert_eq!(input.items.len(), 1);
        assert_eq!(input.items[0].unit_price, Decimal::new(50_000, 0));
    }

    #[test]
    fn empty_items_field_means_no_items() {
        let mut f = form();
        f.items = String::new();
        f.subtotal = "2500.50".into();
        let input = f.into_input().unwrap();
        assert!(input.items.is_empty());
        assert_eq!(input.subtotal, Some(Decimal::new(250_050, 2)));
    }

    #[test]
    fn non_numeric_fields_are_reported_together() {
        let mut f = form();
        f.subtotal = "mil".into();
        f.delivery_days = "diez".into();
        assert_matches!(
            f.into_input(),
            Err(CoreError::Validation(msg)) if msg.contains("subtotal") && msg.contains("entrega")
        );
    }

    #[test]
    fn malformed_items_json_is_a_validation_error() {
        let mut f = form();
        f.items = "[{".into();
        assert_matches!(f.into_input(), Err(CoreError::Validation(msg)) if msg.contains("items"));
    }

    #[test]
    fn non_numeric_price_in_items_is_a_validation_error() {
        let mut f = form();
        f.items = r#"[{"cantidad": 1, "detalle": "x", "precio": "caro"}]"#.into();
        assert!(f.into_input().is_err());
    }

    #[test]
    fn deserializes_from_urlencoded_field_names() {
        let value = serde_json::json!({ "cliente": "Bazar", "telefono": "123" });
        let f: QuotationForm = serde_json::from_value(value).unwrap();
        assert_eq!(f.client_name, "Bazar");
        assert_eq!(f.phone, "123");
        assert!(f.items.is_empty());
    }
}
