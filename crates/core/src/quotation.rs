//! Quotation input validation and conversion into a priced draft.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::pricing::{PricedLineItem, Totals};

/// Maximum length of the client name.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

/// Maximum length of the phone field.
pub const MAX_PHONE_LEN: usize = 50;

/// Maximum length of short free-text fields (contact, project title).
pub const MAX_SHORT_TEXT_LEN: usize = 200;

/// Maximum number of line items on one quotation.
pub const MAX_LINE_ITEMS: usize = 100;

/// Upper bound for a single quantity.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Upper bound for a unit price or a submitted subtotal (one trillion colones).
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest total the `NUMERIC(14, 2)` money columns can hold (999,999,999,999.99).
pub const MAX_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// One line of the item table as submitted.
///
/// Field names follow the form's JSON payload. `monto` is accepted for
/// compatibility and ignored; the amount is always recomputed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItemInput {
    #[serde(rename = "cantidad")]
    pub quantity: Decimal,
    #[serde(rename = "detalle", default)]
    pub description: String,
    #[serde(rename = "precio")]
    pub unit_price: Decimal,
    #[serde(rename = "monto", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

/// Typed quotation input, shared by the HTML form and the JSON API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuotationInput {
    pub client_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub delivery_days: Option<i32>,
    pub validity_days: Option<i32>,
    /// Used only when `items` is empty.
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// A validated quotation ready to be numbered and persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationDraft {
    pub client_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_title: Option<String>,
    pub description: String,
    pub delivery_days: Option<i32>,
    pub validity_days: Option<i32>,
    pub items: Vec<PricedLineItem>,
    pub totals: Totals,
}

/// Trim and turn blank strings into `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl QuotationInput {
    /// Check every rule and return all problems found.
    ///
    /// Returns an empty `Vec` if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let client = self.client_name.trim();
        if client.is_empty() {
            errors.push("El nombre del cliente es obligatorio".to_string());
        } else if client.chars().count() > MAX_CLIENT_NAME_LEN {
            errors.push(format!(
                "El nombre del cliente no puede exceder {MAX_CLIENT_NAME_LEN} caracteres"
            ));
        }

        if let Some(phone) = self.phone.as_deref() {
            if phone.trim().chars().count() > MAX_PHONE_LEN {
                errors.push(format!(
                    "El telefono no puede exceder {MAX_PHONE_LEN} caracteres"
                ));
            }
        }

        if let Some(email) = self.email.as_deref().map(str::trim) {
            if !email.is_empty() && !email.to_string().validate_email() {
                errors.push(format!("Correo electronico invalido: '{email}'"));
            }
        }

        for (label, value) in [
            ("contacto", &self.contact_name),
            ("proyecto", &self.project_title),
        ] {
            if let Some(text) = value.as_deref() {
                if text.trim().chars().count() > MAX_SHORT_TEXT_LEN {
                    errors.push(format!(
                        "El campo {label} no puede exceder {MAX_SHORT_TEXT_LEN} caracteres"
                    ));
                }
            }
        }

        for (label, days) in [
            ("dias de entrega", self.delivery_days),
            ("dias de validez", self.validity_days),
        ] {
            if matches!(days, Some(d) if d < 0) {
                errors.push(format!("Los {label} no pueden ser negativos"));
            }
        }

        if let Some(subtotal) = self.subtotal {
            if subtotal < Decimal::ZERO {
                errors.push("El subtotal no puede ser negativo".to_string());
            } else if subtotal > MAX_PRICE {
                errors.push("El subtotal excede el maximo permitido".to_string());
            }
        }

        if self.items.len() > MAX_LINE_ITEMS {
            errors.push(format!(
                "Una cotizacion admite como maximo {MAX_LINE_ITEMS} lineas"
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            let line = index + 1;
            if item.description.trim().is_empty() {
                errors.push(format!("Linea {line}: el detalle es obligatorio"));
            }
            if item.quantity <= Decimal::ZERO {
                errors.push(format!("Linea {line}: la cantidad debe ser mayor que cero"));
            } else if item.quantity > MAX_QUANTITY {
                errors.push(format!("Linea {line}: la cantidad excede el maximo permitido"));
            }
            if item.unit_price < Decimal::ZERO {
                errors.push(format!("Linea {line}: el precio no puede ser negativo"));
            } else if item.unit_price > MAX_PRICE {
                errors.push(format!("Linea {line}: el precio excede el maximo permitido"));
            }
        }

        errors
    }

    /// Validate and convert into a priced [`QuotationDraft`].
    ///
    /// With line items the subtotal is their sum and any submitted subtotal
    /// is ignored; without items the submitted subtotal (or zero) is used.
    pub fn into_draft(self) -> Result<QuotationDraft, CoreError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors.join("; ")));
        }

        let items: Vec<PricedLineItem> = self
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                PricedLineItem::new(
                    position as i32,
                    item.quantity,
                    item.description.trim().to_string(),
                    item.unit_price,
                )
            })
            .collect();

        let totals = if items.is_empty() {
            Totals::from_subtotal(self.subtotal.unwrap_or(Decimal::ZERO))
        } else {
            Totals::from_items(&items)
        };

        if totals.total > MAX_TOTAL {
            return Err(CoreError::Validation(
                "El total de la cotizacion excede el maximo permitido".to_string(),
            ));
        }

        Ok(QuotationDraft {
            client_name: self.client_name.trim().to_string(),
            contact_name: normalize_optional(self.contact_name),
            email: normalize_optional(self.email),
            phone: normalize_optional(self.phone),
            project_title: normalize_optional(self.project_title),
            description: self.description.trim().to_string(),
            delivery_days: self.delivery_days,
            validity_days: self.validity_days,
            items,
            totals,
        })
    }
}
