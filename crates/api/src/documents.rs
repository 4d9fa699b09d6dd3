//! Conversion of stored quotations into printable documents.

use rotulos_db::models::line_item::LineItem;
use rotulos_db::models::quotation::Quotation;
use rotulos_document::{DocumentLine, QuotationDocument};

/// Build the printable view of a persisted quotation.
pub fn quotation_document(
    company_name: &str,
    quotation: &Quotation,
    items: &[LineItem],
) -> QuotationDocument {
    QuotationDocument {
        company_name: company_name.to_string(),
        sequence_number: quotation.sequence_number.clone(),
        date: quotation.contract_date,
        client_name: quotation.client_name.clone(),
        contact_name: quotation.contact_name.clone(),
        phone: quotation.phone.clone(),
        email: quotation.email.clone(),
        project_title: quotation.project_title.clone(),
        description: quotation.description.clone(),
        delivery_days: quotation.delivery_days,
        validity_days: quotation.validity_days,
        lines: items
            .iter()
            .map(|item| DocumentLine {
                quantity: item.quantity,
                description: item.description.clone(),
                unit_price: item.unit_price,
                amount: item.amount,
            })
            .collect(),
        subtotal: quotation.subtotal,
        tax: quotation.tax,
        total: quotation.total,
    }
}
