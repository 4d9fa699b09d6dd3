//! Page layout for a quotation, in PDF points on US Letter.
//!
//! ```text
//! ROTULOS FREER S.A.                         No. 2024-05-01-0003
//! COTIZACION / CONTRATO                      Fecha: 01/05/2024
//! ----------------------------------------------------------------
//! Cliente / Contacto / Telefono / Correo / Proyecto
//! Descripcion:  (wrapped lines)
//! Cant.  Detalle                          Precio         Monto
//! ----------------------------------------------------------------
//! rows ...                                  (continue on next page)
//! ---------------------------------------------------------------- (y=300)
//!                                  Subtotal / IVA 13% / TOTAL
//! Entrega / Validez / Forma de pago / Pagadero en colones
//! Firma autorizada ______________________
//! ```
//!
//! The totals block always sits at a fixed position on the last page; body
//! rows that would run into it move to a new page.

use crate::format;
use crate::QuotationDocument;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const LEFT: f32 = 50.0;
const RIGHT: f32 = 550.0;
const RIGHT_COLUMN: f32 = 400.0;
const TOTALS_COLUMN: f32 = 350.0;

const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 12.0;
const LEADING: f32 = 12.0;
const FIELD_LEADING: f32 = 15.0;

const HEADER_TOP: f32 = 740.0;
const HEADER_RULE: f32 = 715.0;
const BODY_TOP: f32 = 690.0;
/// Lowest baseline for body rows on a page that does not carry the totals.
const BODY_BOTTOM: f32 = 72.0;
/// Lowest baseline for body rows on the page that carries the totals.
const FOOTER_TOP: f32 = 315.0;
const FOOTER_RULE: f32 = 300.0;
const PAGE_NUMBER_Y: f32 = 30.0;

/// Maximum characters per description line.
const DESCRIPTION_WIDTH: usize = 95;
/// Maximum characters of an item's detail per row.
const DETAIL_WIDTH: usize = 48;

const COL_QUANTITY: f32 = LEFT;
const COL_DETAIL: f32 = 95.0;
const COL_PRICE: f32 = 370.0;
const COL_AMOUNT: f32 = 465.0;

const TABLE_HEADER: [&str; 4] = ["Cant.", "Detalle", "Precio", "Monto"];

pub const PAYMENT_TERMS: &str = "Forma de pago: 50% prima / saldo contra entrega";
pub const EXCHANGE_TERMS: &str = "Pagadero en colones segun tipo de cambio BCCR";
pub const SIGNATURE_LINE: &str = "Firma autorizada __________________________";

/// A positioned piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub text: String,
}

/// A horizontal rule from `x1` to `x2` at height `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub texts: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

impl PageLayout {
    fn text(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.texts.push(TextRun {
            x,
            y,
            size: FONT_SIZE,
            bold: false,
            text: text.into(),
        });
    }

    fn bold(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.texts.push(TextRun {
            x,
            y,
            size,
            bold: true,
            text: text.into(),
        });
    }

    fn rule(&mut self, y: f32) {
        self.rules.push(Rule { x1: LEFT, x2: RIGHT, y });
    }

    /// Whether any text run on this page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|run| run.text.contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// Whether any page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|page| page.contains_text(needle))
    }
}

/// Body content that flows across pages.
enum BodyRow {
    Text { x: f32, text: String, bold: bool },
    Item { cells: [String; 4] },
    Gap(f32),
}

/// Cursor over the pages being filled.
struct Flow<'a> {
    document: &'a QuotationDocument,
    pages: Vec<PageLayout>,
    y: f32,
    table_open: bool,
}

impl<'a> Flow<'a> {
    fn new(document: &'a QuotationDocument) -> Self {
        let mut flow = Self {
            document,
            pages: Vec::new(),
            y: BODY_TOP,
            table_open: false,
        };
        flow.start_page();
        flow
    }

    fn page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn start_page(&mut self) {
        let doc = self.document;
        let continuation = !self.pages.is_empty();
        let mut page = PageLayout::default();

        page.bold(LEFT, HEADER_TOP, TITLE_SIZE, doc.company_name.clone());
        let title = if continuation {
            "COTIZACION / CONTRATO (continuacion)"
        } else {
            "COTIZACION / CONTRATO"
        };
        page.text(LEFT, HEADER_TOP - 15.0, title);
        page.bold(RIGHT_COLUMN, HEADER_TOP, FONT_SIZE, format!("No. {}", doc.sequence_number));
        page.text(
            RIGHT_COLUMN,
            HEADER_TOP - 15.0,
            format!("Fecha: {}", format::date(doc.date)),
        );
        page.rule(HEADER_RULE);

        self.pages.push(page);
        self.y = BODY_TOP;
        if self.table_open {
            self.table_header();
        }
    }

    /// Column titles and the rule under them, at the cursor.
    fn table_header(&mut self) {
        self.cells(TABLE_HEADER.map(String::from));
        // Just under the titles' descenders.
        let y = self.y + 8.0;
        self.page().rule(y);
        self.y -= 4.0;
    }

    /// Start the item table; its header repeats on every page it spans.
    fn open_table(&mut self) {
        self.ensure_room(2.0 * LEADING);
        self.table_open = true;
        self.table_header();
    }

    fn close_table(&mut self) {
        self.table_open = false;
    }

    fn cells(&mut self, cells: [String; 4]) {
        let y = self.y;
        let page = self.page();
        let [quantity, detail, price, amount] = cells;
        page.text(COL_QUANTITY, y, quantity);
        page.text(COL_DETAIL, y, detail);
        page.text(COL_PRICE, y, price);
        page.text(COL_AMOUNT, y, amount);
        self.y -= LEADING;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < BODY_BOTTOM {
            self.start_page();
        }
    }

    fn push(&mut self, row: BodyRow) {
        match row {
            BodyRow::Gap(height) => {
                self.y -= height;
            }
            BodyRow::Text { x, text, bold } => {
                self.ensure_room(0.0);
                let y = self.y;
                if bold {
                    self.page().bold(x, y, FONT_SIZE, text);
                } else {
                    self.page().text(x, y, text);
                }
                self.y -= LEADING;
            }
            BodyRow::Item { cells } => {
                self.ensure_room(0.0);
                self.cells(cells);
            }
        }
    }

    /// Draw totals, terms and signature at their fixed positions on the
    /// last page, starting a new page if the body reaches into them.
    fn finish(mut self) -> Vec<PageLayout> {
        if self.y < FOOTER_TOP {
            self.start_page();
        }
        let doc = self.document;
        let page = self.page();

        page.rule(FOOTER_RULE);
        page.text(TOTALS_COLUMN, 275.0, format!("Subtotal: {}", format::currency(doc.subtotal)));
        page.text(TOTALS_COLUMN, 260.0, format!("IVA 13%: {}", format::currency(doc.tax)));
        page.bold(TOTALS_COLUMN, 245.0, FONT_SIZE, format!("TOTAL: {}", format::currency(doc.total)));

        let mut y = 225.0;
        if let Some(days) = doc.delivery_days {
            page.text(LEFT, y, format!("Tiempo de entrega: {days} dias habiles"));
            y -= FIELD_LEADING;
        }
        if let Some(days) = doc.validity_days {
            page.text(LEFT, y, format!("Validez de la oferta: {days} dias"));
            y -= FIELD_LEADING;
        }
        page.text(LEFT, y.min(200.0), PAYMENT_TERMS);
        page.text(LEFT, y.min(200.0) - 20.0, EXCHANGE_TERMS);
        page.text(LEFT, 120.0, SIGNATURE_LINE);

        let total_pages = self.pages.len();
        if total_pages > 1 {
            for (index, page) in self.pages.iter_mut().enumerate() {
                page.text(
                    RIGHT_COLUMN + 60.0,
                    PAGE_NUMBER_Y,
                    format!("Pagina {} de {total_pages}", index + 1),
                );
            }
        }
        self.pages
    }
}

/// Lay out every page of a quotation.
pub fn build_layout(document: &QuotationDocument) -> DocumentLayout {
    let mut flow = Flow::new(document);

    let mut fields = vec![("Cliente", Some(document.client_name.clone()))];
    fields.push(("Contacto", document.contact_name.clone()));
    fields.push(("Telefono", document.phone.clone()));
    fields.push(("Correo", document.email.clone()));
    fields.push(("Proyecto", document.project_title.clone()));
    for (label, value) in fields {
        if let Some(value) = value {
            flow.push(BodyRow::Text {
                x: LEFT,
                text: format!("{label}: {value}"),
                bold: false,
            });
            flow.push(BodyRow::Gap(FIELD_LEADING - LEADING));
        }
    }

    if !document.description.trim().is_empty() {
        flow.push(BodyRow::Gap(LEADING));
        flow.push(BodyRow::Text {
            x: LEFT,
            text: "Descripcion:".to_string(),
            bold: true,
        });
        for source_line in document.description.lines() {
            for line in format::wrap(source_line, DESCRIPTION_WIDTH) {
                flow.push(BodyRow::Text {
                    x: LEFT,
                    text: line,
                    bold: false,
                });
            }
        }
    }

    if !document.lines.is_empty() {
        flow.push(BodyRow::Gap(LEADING));
        flow.open_table();
        for line in &document.lines {
            let detail = format::wrap(&line.description, DETAIL_WIDTH);
            let mut detail_rows = detail.into_iter();
            flow.push(BodyRow::Item {
                cells: [
                    format::quantity(line.quantity),
                    detail_rows.next().unwrap_or_default(),
                    format::money(line.unit_price),
                    format::money(line.amount),
                ],
            });
            for continued in detail_rows {
                flow.push(BodyRow::Item {
                    cells: [String::new(), continued, String::new(), String::new()],
                });
            }
        }
        flow.close_table();
    }

    DocumentLayout {
        pages: flow.finish(),
    }
}
