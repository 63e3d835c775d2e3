//! Printable HTML rendering of receipt batches.

use super::layout::ReceiptLayout;
use super::{ReceiptRenderer, Result};
use crate::error::RenderError;
use crate::models::config::RenderConfig;
use crate::models::receipt::ReceiptRecord;

const STYLE: &str = r#"
        body { font-family: sans-serif; margin: 0; }
        @page { size: A4; margin: 10mm; }
        .receipt {
            width: 190mm;
            min-height: 277mm;
            border: 2px solid #ccc;
            box-sizing: border-box;
            position: relative;
            padding: 4mm;
            page-break-after: always;
        }
        .receipt:last-child { page-break-after: auto; }
        .header { text-align: center; margin-bottom: 2px; }
        .amount-words { font-style: italic; }
        .work { border-bottom: 1px dotted #ccc; padding: 3px; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        td { border: 1px solid black; padding: 5px; text-align: left; word-wrap: break-word; }
        .passed {
            position: absolute; bottom: 40mm; left: 40mm;
            border: 2px solid blue; padding: 10px;
            width: 110mm; color: blue;
        }
        .passed p { margin: 3px 0; }
        .signatories { display: flex; justify-content: space-around; margin-top: 12mm; }
        @media print { .receipt { border: none; } }
"#;

/// Renders receipts as one HTML document, a page break after each receipt.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    config: RenderConfig,
}

impl HtmlRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render to a string.
    pub fn render_string(&self, receipts: &[ReceiptRecord]) -> Result<String> {
        if receipts.is_empty() {
            return Err(RenderError::NoReceipts);
        }

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(&format!("    <title>{}</title>\n", escape(&self.config.title)));
        html.push_str(&format!("    <style>{}    </style>\n", STYLE));
        html.push_str("</head>\n<body>\n");

        for receipt in receipts {
            self.write_receipt(&mut html, &ReceiptLayout::new(receipt, &self.config));
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn write_receipt(&self, html: &mut String, layout: &ReceiptLayout) {
        html.push_str("<div class=\"receipt\">\n");

        html.push_str("  <div class=\"header\">\n");
        html.push_str(&format!("    <h2>{}</h2>\n", escape(&layout.payable_to)));
        html.push_str(&format!("    <h2>{}</h2>\n", escape(&layout.title)));
        html.push_str(&format!("    <p>{}</p>\n", escape(&layout.rules_reference)));
        html.push_str(&format!("    <p>{}</p>\n", escape(&layout.division)));
        html.push_str("  </div>\n");

        html.push_str("  <div class=\"details\">\n");
        for line in &layout.voucher_lines {
            html.push_str(&format!("    <p>{}</p>\n", emphasize_words(&escape(line))));
        }
        html.push_str(&format!(
            "    <p class=\"work\">{}</p>\n",
            escape(&layout.work_line)
        ));
        html.push_str(&format!("    <p>{}</p>\n", escape(&layout.head_line)));
        html.push_str("  </div>\n");

        html.push_str("  <table class=\"signature-area\">\n    <tr>");
        for cell in &layout.signature_header {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str(&format!(
            "</tr>\n    <tr><td>{}</td><td></td><td></td></tr>\n",
            escape(&layout.cash_book_line)
        ));
        html.push_str("  </table>\n");

        html.push_str("  <table class=\"offices\">\n");
        for [left, right] in &layout.office_rows {
            html.push_str(&format!(
                "    <tr><td>{}</td><td>{}</td></tr>\n",
                escape(left),
                escape(right)
            ));
        }
        html.push_str("  </table>\n");

        html.push_str("  <div class=\"passed\">\n");
        for line in &layout.passed_lines {
            html.push_str(&format!("    <p>{}</p>\n", escape(line)));
        }
        html.push_str("    <div class=\"signatories\">");
        for name in &layout.passed_signatories {
            html.push_str(&format!("<span>{}</span>", escape(name)));
        }
        html.push_str("</div>\n  </div>\n");

        html.push_str("</div>\n");
    }
}

impl ReceiptRenderer for HtmlRenderer {
    fn render(&self, receipts: &[ReceiptRecord]) -> Result<Vec<u8>> {
        self.render_string(receipts).map(String::into_bytes)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Wrap the parenthesised "(Rupees ... Only)" phrase in an italic span.
fn emphasize_words(line: &str) -> String {
    match (line.rfind('('), line.ends_with(')')) {
        (Some(open), true) if line[open..].ends_with("Only)") => format!(
            "{}(<span class=\"amount-words\">{}</span>)",
            &line[..open],
            &line[open + 1..line.len() - 1]
        ),
        _ => line.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
