//! Export data for document collaborators
//!
//! The engine does not render PDF or spreadsheet files. It hands renderers
//! plain rows ([`ScheduleExport`]) and receipt facts ([`ReceiptDocument`]),
//! plus the file-name conventions both surfaces share.

use crate::models::contract::Contract;
use crate::models::receipt::ReceiptEntry;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Issuer printed on every document
pub const ISSUER: &str = "FAST AND SURE TRAVEL SARL";

/// One schedule line, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub number: usize,
    pub due_date: NaiveDate,
    pub amount: i64,
    pub paid: i64,
    pub remaining: i64,
    pub closed: bool,
}

/// A client's full schedule, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub issuer: String,
    pub client_name: String,
    pub total_amount: i64,
    pub start_date: NaiveDate,
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleExport {
    /// Snapshot `contract` for `client_name`
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use echeancier_core_rs::export::ScheduleExport;
    /// use echeancier_core_rs::schedule::build_schedule;
    ///
    /// let contract = build_schedule(1_200_000, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    /// let export = ScheduleExport::from_contract("Awa Diop", &contract);
    ///
    /// assert_eq!(export.rows.len(), 12);
    /// assert_eq!(export.rows[0].number, 1);
    /// assert_eq!(export.rows[11].remaining, 100_000);
    /// ```
    pub fn from_contract(client_name: &str, contract: &Contract) -> Self {
        let rows = contract
            .schedule()
            .iter()
            .enumerate()
            .map(|(index, installment)| ScheduleRow {
                number: index + 1,
                due_date: installment.due_date(),
                amount: installment.amount(),
                paid: installment.paid(),
                remaining: installment.remaining(),
                closed: installment.is_closed(),
            })
            .collect();

        Self {
            issuer: ISSUER.to_string(),
            client_name: client_name.to_string(),
            total_amount: contract.total_amount(),
            start_date: contract.start_date(),
            rows,
        }
    }

    /// Default file name for this export with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("echeancier_{}.{}", safe_file_name(&self.client_name), extension)
    }
}

/// Facts printed on a payment receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDocument {
    pub issuer: String,
    pub receipt_id: String,
    pub client_name: String,
    pub issued_at: DateTime<Utc>,
    /// Installment number, from 1
    pub installment_number: usize,
    pub due_date: NaiveDate,
    /// Amount due on the installment; None when the installment no longer
    /// exists in the current schedule
    pub installment_amount: Option<i64>,
    pub paid_delta: i64,
    pub total_paid_to_date: i64,
    pub remaining_on_installment: i64,
}

impl ReceiptDocument {
    /// Assemble a receipt document from the recorded entry
    ///
    /// Paid figures come from the receipt itself, so a document re-issued
    /// after later payments or a rebuild still shows the values of the
    /// original operation. Only the installment amount is looked up in the
    /// current contract.
    pub fn from_receipt(
        client_name: &str,
        contract: Option<&Contract>,
        receipt: &ReceiptEntry,
    ) -> Self {
        let installment_amount = contract
            .and_then(|c| c.installment(receipt.installment_index()))
            .map(|installment| installment.amount());

        Self {
            issuer: ISSUER.to_string(),
            receipt_id: receipt.id().to_string(),
            client_name: client_name.to_string(),
            issued_at: receipt.timestamp(),
            installment_number: receipt.installment_index() + 1,
            due_date: receipt.due_date(),
            installment_amount,
            paid_delta: receipt.paid_delta(),
            total_paid_to_date: receipt.total_paid_after(),
            remaining_on_installment: receipt.remaining_after(),
        }
    }

    /// `recu_<client>_echeance<n>_<millis>.<ext>`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "recu_{}_echeance{}_{}.{}",
            safe_file_name(&self.client_name),
            self.installment_number,
            self.issued_at.timestamp_millis(),
            extension
        )
    }
}

/// Replace each whitespace run with `_`; empty names become "client"
pub fn safe_file_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        "client".to_string()
    } else {
        joined
    }
}

/// Format an amount in FCFA with space-grouped thousands
///
/// # Example
/// ```
/// use echeancier_core_rs::export::format_fcfa;
///
/// assert_eq!(format_fcfa(1_200_000), "1 200 000 FCFA");
/// assert_eq!(format_fcfa(950), "950 FCFA");
/// ```
pub fn format_fcfa(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{} FCFA", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::apply_partial_payment;
    use crate::schedule::build_schedule;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("Awa  Diop "), "Awa_Diop");
        assert_eq!(safe_file_name("   "), "client");
    }

    #[test]
    fn test_schedule_export_rows_track_payments() {
        let mut contract = build_schedule(1_200, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        apply_partial_payment(&mut contract, 1, 40).unwrap();

        let export = ScheduleExport::from_contract("Awa Diop", &contract);
        assert_eq!(export.rows[1].paid, 40);
        assert_eq!(export.rows[1].remaining, 60);
        assert!(!export.rows[1].closed);
        assert_eq!(export.file_name("csv"), "echeancier_Awa_Diop.csv");
    }

    #[test]
    fn test_receipt_document_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let receipt = ReceiptEntry::new(
            "r1".into(),
            "c1".into(),
            at,
            2,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            100,
            100,
            0,
        );

        let document = ReceiptDocument::from_receipt("Awa Diop", None, &receipt);
        assert_eq!(document.installment_number, 3);
        assert_eq!(document.installment_amount, None);
        assert_eq!(
            document.file_name("pdf"),
            format!("recu_Awa_Diop_echeance3_{}.pdf", at.timestamp_millis())
        );
    }

    #[test]
    fn test_format_fcfa_grouping() {
        assert_eq!(format_fcfa(0), "0 FCFA");
        assert_eq!(format_fcfa(1_000), "1 000 FCFA");
        assert_eq!(format_fcfa(-12_345), "-12 345 FCFA");
    }
}
