//! Object-store key and download filename conventions.
//!
//! Convention: `<CLIENT_FOLDER>/<sequence-number>/cotizacion.pdf`
//!
//! - `CLIENT_FOLDER` = client name reduced to alphanumerics, `_` and `-`,
//!   spaces turned into `_`, uppercased
//! - both path segments are percent-encoded so non-ASCII letters survive

/// Folder used when the client name has nothing usable left after cleaning.
pub const FALLBACK_CLIENT_FOLDER: &str = "CLIENTE_SIN_NOMBRE";

/// File name of the rendered quotation inside its folder.
pub const PDF_OBJECT_NAME: &str = "cotizacion.pdf";

/// MIME type of every stored document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Reduce a client name to a folder-safe form.
///
/// # Examples
///
/// ```
/// use rotulos_core::naming::safe_folder_name;
///
/// assert_eq!(safe_folder_name("Panaderia La Espiga"), "PANADERIA_LA_ESPIGA");
/// assert_eq!(safe_folder_name("  A/B & C  "), "AB__C");
/// assert_eq!(safe_folder_name("***"), "CLIENTE_SIN_NOMBRE");
/// ```
pub fn safe_folder_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let folder = kept.trim().replace(' ', "_").to_uppercase();
    if folder.is_empty() {
        FALLBACK_CLIENT_FOLDER.to_string()
    } else {
        folder
    }
}

/// Blob key for a quotation's PDF.
pub fn quotation_blob_key(client_name: &str, sequence_number: &str) -> String {
    let folder = safe_folder_name(client_name);
    format!(
        "{}/{}/{PDF_OBJECT_NAME}",
        urlencoding::encode(&folder),
        urlencoding::encode(sequence_number)
    )
}

/// Filename offered to the browser when downloading a quotation.
pub fn pdf_filename(sequence_number: &str) -> String {
    format!("cotizacion-{sequence_number}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_dash_and_underscore() {
        assert_eq!(safe_folder_name("rotulos_del-sur"), "ROTULOS_DEL-SUR");
    }

    #[test]
    fn spaces_become_underscores_without_collapsing() {
        assert_eq!(safe_folder_name("Taller  Mora"), "TALLER__MORA");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(safe_folder_name("Soda \"El Rinconcito\", S.A."), "SODA_EL_RINCONCITO_SA");
    }

    #[test]
    fn empty_name_uses_fallback() {
        assert_eq!(safe_folder_name(""), FALLBACK_CLIENT_FOLDER);
        assert_eq!(safe_folder_name("   "), FALLBACK_CLIENT_FOLDER);
    }

    #[test]
    fn blob_key_layout() {
        assert_eq!(
            quotation_blob_key("Ferreteria Central", "2024-05-01-0003"),
            "FERRETERIA_CENTRAL/2024-05-01-0003/cotizacion.pdf"
        );
    }

    #[test]
    fn blob_key_encodes_non_ascii() {
        assert_eq!(
            quotation_blob_key("Muñoz", "2024-00001"),
            "MU%C3%91OZ/2024-00001/cotizacion.pdf"
        );
    }

    #[test]
    fn blob_key_for_unnamed_client() {
        assert_eq!(
            quotation_blob_key("", "2024-05-01-0001"),
            "CLIENTE_SIN_NOMBRE/2024-05-01-0001/cotizacion.pdf"
        );
    }

    #[test]
    fn download_filename() {
        assert_eq!(pdf_filename("2024-05-01-0001"), "cotizacion-2024-05-01-0001.pdf");
    }
}
