//! Draws a [`DocumentLayout`] with `printpdf`.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt};

use crate::error::DocumentError;
use crate::layout::{DocumentLayout, PageLayout, PAGE_HEIGHT, PAGE_WIDTH};

const LAYER_NAME: &str = "Contenido";
const RULE_THICKNESS: f32 = 0.75;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render every page of `layout` into a PDF byte buffer.
pub fn render_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, DocumentError> {
    let width = Mm::from(Pt(PAGE_WIDTH));
    let height = Mm::from(Pt(PAGE_HEIGHT));
    let (doc, first_page, first_layer) =
        PdfDocument::new(title.to_string(), width, height, LAYER_NAME.to_string());

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DocumentError::Font(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DocumentError::Font(e.to_string()))?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME.to_string());
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    doc.save_to_bytes()
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn draw_page(layer: &PdfLayerReference, page: &PageLayout, fonts: &Fonts) {
    for run in &page.texts {
        let font = if run.bold { &fonts.bold } else { &fonts.regular };
        layer.use_text(
            run.text.clone(),
            run.size,
            Mm::from(Pt(run.x)),
            Mm::from(Pt(run.y)),
            font,
        );
    }

    layer.set_outline_thickness(RULE_THICKNESS);
    for rule in &page.rules {
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm::from(Pt(rule.x1)), Mm::from(Pt(rule.y))), false),
                (Point::new(Mm::from(Pt(rule.x2)), Mm::from(Pt(rule.y))), false),
            ],
            is_closed: false,
        });
    }
}
