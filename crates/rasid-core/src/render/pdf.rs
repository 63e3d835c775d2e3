//! Native PDF rendering using lopdf: one A4 page per receipt.

use chrono::{Local, NaiveDateTime};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use super::layout::ReceiptLayout;
use super::{ReceiptRenderer, Result};
use crate::error::RenderError;
use crate::models::config::RenderConfig;
use crate::models::receipt::ReceiptRecord;

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 15.0;
// Helvetica averages about half an em per character.
const WRAP_CHARS: usize = 98;

/// Renders receipts into a paginated PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    config: RenderConfig,
    creation_date: Option<NaiveDateTime>,
    compress: bool,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl PdfRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            creation_date: None,
            compress: true,
        }
    }

    /// Fix the document creation date (default: now).
    pub fn with_creation_date(mut self, date: NaiveDateTime) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn page_content(&self, layout: &ReceiptLayout) -> Content {
        let mut page = PageWriter::new();

        page.rect(MARGIN - 12.0, MARGIN - 12.0, PAGE_WIDTH - 2.0 * (MARGIN - 12.0), PAGE_HEIGHT - 2.0 * (MARGIN - 12.0));

        page.centered("F2", 13.0, &layout.payable_to);
        page.centered("F2", 13.0, &layout.title);
        page.centered("F1", BODY_SIZE, &layout.rules_reference);
        page.centered("F1", BODY_SIZE, &layout.division);
        page.gap(LEADING);

        for line in &layout.voucher_lines {
            page.paragraph(line);
        }
        page.paragraph(&layout.work_line);
        page.paragraph(&layout.head_line);
        page.gap(LEADING);

        let signature_row: Vec<&str> = layout.signature_header.iter().map(String::as_str).collect();
        page.table_row(&signature_row);
        page.table_row(&[layout.cash_book_line.as_str(), "", ""]);
        page.gap(LEADING);

        for [left, right] in &layout.office_rows {
            page.table_row(&[left.as_str(), right.as_str()]);
        }
        page.gap(2.0 * LEADING);

        let box_top = page.y + LEADING;
        for line in &layout.passed_lines {
            page.paragraph(line);
        }
        page.gap(LEADING);
        let signatories: Vec<&str> = layout.passed_signatories.iter().map(String::as_str).collect();
        page.spread(&signatories);
        page.rect(MARGIN, page.y - 6.0, PAGE_WIDTH - 2.0 * MARGIN, box_top - page.y + 6.0);

        Content {
            operations: page.operations,
        }
    }

    fn build_document(&self, receipts: &[ReceiptRecord]) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font("Helvetica"));
        let bold_id = doc.add_object(font("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(receipts.len());
        for receipt in receipts {
            let layout = ReceiptLayout::new(receipt, &self.config);
            let encoded = self
                .page_content(&layout)
                .encode()
                .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => receipts.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let created = self.creation_date.unwrap_or_else(|| Local::now().naive_local());
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.config.title.as_str()),
            "Producer" => Object::string_literal(concat!("rasid ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created.format("D:%Y%m%d%H%M%S").to_string()),
        });
        doc.trailer.set("Info", info_id);

        if self.compress {
            doc.compress();
        }
        Ok(doc)
    }
}

impl ReceiptRenderer for PdfRenderer {
    fn render(&self, receipts: &[ReceiptRecord]) -> Result<Vec<u8>> {
        if receipts.is_empty() {
            return Err(RenderError::NoReceipts);
        }

        let mut doc = self.build_document(receipts)?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        debug!("Rendered {} pages, {} bytes", receipts.len(), buffer.len());
        Ok(buffer)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Characters outside Latin-1 have no WinAnsi code and print as '?'.
fn win_ansi(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Top-down cursor over one page's content stream.
struct PageWriter {
    operations: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            y: PAGE_HEIGHT - MARGIN - LEADING,
        }
    }

    fn text_at(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.operations.push(Operation::new("BT", vec![]));
        self.operations
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.operations.push(Operation::new("Tj", vec![win_ansi(text)]));
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.operations.push(Operation::new("S", vec![]));
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    /// Centered text, wrapped to the space between the margins.
    fn centered(&mut self, font: &str, size: f32, text: &str) {
        let chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (size * 0.5)) as usize;
        for line in wrap(text, chars) {
            let estimated = line.chars().count() as f32 * size * 0.5;
            let x = ((PAGE_WIDTH - estimated) / 2.0).max(MARGIN);
            self.text_at(font, size, x, self.y, &line);
            self.y -= size + 6.0;
        }
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, WRAP_CHARS) {
            self.text_at("F1", BODY_SIZE, MARGIN + 6.0, self.y, &line);
            self.y -= LEADING;
        }
    }

    /// Bordered row of equal-width cells.
    fn table_row(&mut self, cells: &[&str]) {
        let width = (PAGE_WIDTH - 2.0 * MARGIN) / cells.len() as f32;
        let chars = ((width - 8.0) / (BODY_SIZE * 0.5)) as usize;
        let wrapped: Vec<Vec<String>> = cells.iter().map(|c| wrap(c, chars)).collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let height = lines as f32 * LEADING + 8.0;

        let top = self.y + LEADING - 2.0;
        for (i, cell_lines) in wrapped.iter().enumerate() {
            let x = MARGIN + i as f32 * width;
            self.rect(x, top - height, width, height);
            for (j, line) in cell_lines.iter().enumerate() {
                self.text_at("F1", BODY_SIZE, x + 4.0, self.y - j as f32 * LEADING, line);
            }
        }
        self.y -= height;
    }

    /// Evenly spaced labels on one line.
    fn spread(&mut self, labels: &[&str]) {
        let slot = (PAGE_WIDTH - 2.0 * MARGIN) / labels.len() as f32;
        for (i, label) in labels.iter().enumerate() {
            let x = MARGIN + slot * i as f32 + slot / 2.0 - 10.0;
            self.text_at("F2", BODY_SIZE, x, self.y, label);
        }
        self.y -= LEADING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn receipt(payee: &str, amount: i64, words: &str) -> ReceiptRecord {
        let mut amount = Decimal::from(amount);
        amount.rescale(2);
        ReceiptRecord {
            payee: payee.to_string(),
            amount,
            amount_words: words.to_string(),
            work: "Electric Work".to_string(),
            row: 1,
        }
    }

    /// Text shown by `Tj` operators on each page, in page order.
    fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(bytes.iter().map(|b| *b as char).collect())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_one_page_per_receipt_in_order() {
        let pdf = PdfRenderer::default()
            .render(&[
                receipt("Alice", 1500, "One Thousand Five Hundred"),
                receipt("Carol", 3000, "Three Thousand"),
            ])
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-1.5"));

        let pages = page_texts(&pdf);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].iter().any(|t| t.contains("Payable to: - Alice")));
        assert!(pages[1].iter().any(|t| t.contains("Payable to: - Carol")));
        assert!(pages[1].iter().any(|t| t == "In Words Rupees Three Thousand Only"));
    }

    #[test]
    fn test_uncompressed_output() {
        let pdf = PdfRenderer::default()
            .with_compression(false)
            .with_creation_date(
                NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
            )
            .render(&[receipt("Alice", 10, "Ten")])
            .unwrap();

        let raw = String::from_utf8_lossy(&pdf);
        assert!(raw.contains("D:20240301093000"));
        assert!(raw.contains("Passed for Rs. 10.00"));
    }

    #[test]
    fn test_non_latin_text_is_replaced() {
        assert_eq!(
            win_ansi("Rs ₹5 é"),
            Object::String(b"Rs ?5 \xe9".to_vec(), StringFormat::Literal)
        );
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("averyverylongword", 4), vec!["averyverylongword"]);
    }

    #[test]
    fn test_long_payee_wraps_within_margins() {
        let payee = vec!["Shri Ramchandra Electricals and Sons"; 6].join(" ");
        let pdf = PdfRenderer::default()
            .render(&[receipt(&payee, 10, "Ten")])
            .unwrap();

        let pages = page_texts(&pdf);
        let heading: Vec<&String> = pages[0]
            .iter()
            .take_while(|t| !t.starts_with("HAND RECEIPT"))
            .collect();
        assert!(heading.len() > 1);
        assert!(heading[0].starts_with("Payable to: - Shri"));
        // 13pt bold fits 78 characters between the margins
        assert!(heading.iter().all(|t| t.chars().count() <= 78));
        let joined: Vec<&str> = heading.iter().map(|t| t.as_str()).collect();
        assert!(joined.join(" ").contains(&payee));
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(
            PdfRenderer::default().render(&[]),
            Err(RenderError::NoReceipts)
        ));
    }
}
