//! Text content of one RPWA 28 hand receipt, shared by all renderers.

use crate::models::config::RenderConfig;
use crate::models::receipt::ReceiptRecord;

/// "Rupees One Thousand Five Hundred Only".
pub fn amount_phrase(currency_words: &str, amount_words: &str) -> String {
    format!("{} {} Only", currency_words, amount_words)
}

/// All printable text of a single receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLayout {
    pub payable_to: String,
    pub title: String,
    pub rules_reference: String,
    pub division: String,
    /// Numbered voucher lines (1) to (5).
    pub voucher_lines: Vec<String>,
    pub work_line: String,
    pub head_line: String,
    /// Signature table: header cells, then the cash book row.
    pub signature_header: [String; 3],
    pub cash_book_line: String,
    /// Office-use table rows, two columns each.
    pub office_rows: Vec<[String; 2]>,
    /// Lines of the "passed for payment" box.
    pub passed_lines: Vec<String>,
    pub passed_signatories: [String; 3],
}

impl ReceiptLayout {
    pub fn new(receipt: &ReceiptRecord, config: &RenderConfig) -> Self {
        let amount = receipt.amount_display();
        let label = &config.currency_label;
        let words = amount_phrase(&config.currency_words, &receipt.amount_words);

        Self {
            payable_to: format!(
                "Payable to: - {} ({})",
                receipt.payee, config.payee_designation
            ),
            title: config.title.clone(),
            rules_reference: config.rules_reference.clone(),
            division: format!("Division - {}", config.division),
            voucher_lines: vec![
                "(1) Cash Book Voucher No.            Date".to_string(),
                "(2) Cheque No. and Date".to_string(),
                format!("(3) Pay for ECS {}{}/- ({})", label, amount, words),
                "(4) Paid by me".to_string(),
                format!(
                    "(5) Received from {} the sum of {} {}/- ({})",
                    config.payer, label, amount, words
                ),
            ],
            work_line: format!("Name of work for which payment is made: {}", receipt.work),
            head_line: format!("Chargeable to Head:- {}", config.chargeable_head),
            signature_header: [
                "Witness".to_string(),
                "Stamp".to_string(),
                "Signature of payee".to_string(),
            ],
            cash_book_line: "Cash Book No.            Page No.".to_string(),
            office_rows: vec![
                [
                    "For use in the Divisional Office".to_string(),
                    "For use in the Accountant General's office".to_string(),
                ],
                ["Checked".to_string(), "Audited/Reviewed".to_string()],
                [
                    "Accounts Clerk".to_string(),
                    "DA      Auditor      Supdt.      G.O.".to_string(),
                ],
            ],
            passed_lines: vec![
                format!("Passed for {} {}", label, amount),
                format!("In Words {}", words),
                format!("Chargeable to Head:- {}", config.chargeable_head),
            ],
            passed_signatories: ["Ar.".to_string(), "D.A.".to_string(), "E.E.".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_layout_text() {
        let receipt = ReceiptRecord {
            payee: "Alice".to_string(),
            amount: Decimal::from_str("1500.50").unwrap(),
            amount_words: "One Thousand Five Hundred".to_string(),
            work: "Cabling".to_string(),
            row: 1,
        };
        let layout = ReceiptLayout::new(&receipt, &RenderConfig::default());

        assert_eq!(layout.payable_to, "Payable to: - Alice (Electric Contractor)");
        assert_eq!(
            layout.voucher_lines[2],
            "(3) Pay for ECS Rs.1500.50/- (Rupees One Thousand Five Hundred Only)"
        );
        assert_eq!(layout.work_line, "Name of work for which payment is made: Cabling");
        assert_eq!(layout.passed_lines[0], "Passed for Rs. 1500.50");
        assert_eq!(layout.passed_lines[1], "In Words Rupees One Thousand Five Hundred Only");
    }
}
