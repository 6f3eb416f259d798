//! CSV Export functionality
//!
//! One row per transaction, spreadsheet-friendly.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::models::Transaction;

const HEADER: [&str; 7] = [
    "ID",
    "Date",
    "Type",
    "Category",
    "Amount",
    "Payment Method",
    "Description",
];

pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> TallyResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .map_err(|e| TallyError::Export(e.to_string()))?;

    for txn in transactions {
        csv_writer
            .write_record([
                txn.id.to_string(),
                txn.date.format("%Y-%m-%d").to_string(),
                txn.kind.to_string(),
                txn.category.clone(),
                txn.amount.to_string(),
                txn.payment_method.clone(),
                txn.description.clone(),
            ])
            .map_err(|e| TallyError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}
