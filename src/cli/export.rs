//! CLI command for data export
//!
//! Writes the logged-in user's transactions (optionally narrowed by search
//! filters) as CSV, JSON or YAML to a file or stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{TallyError, TallyResult};
use crate::export::{export_json, export_transactions_csv, export_yaml, UserExport};
use crate::models::{Session, Transaction};
use crate::services::TransactionService;
use crate::storage::Storage;

use super::transaction::SearchArgs;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (transactions only)
    Csv,
    /// JSON format (transactions, budgets, goals and recurring rules)
    Json,
    /// YAML format (same content as JSON, human-readable)
    Yaml,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: SearchArgs,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    session: &Session,
    args: ExportArgs,
) -> TallyResult<()> {
    let transactions =
        TransactionService::new(storage).search(session, args.filter.to_request(session))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, session, args.format, transactions, &mut writer)?;
            writer
                .flush()
                .map_err(|e| TallyError::Export(e.to_string()))?;
            println!("Exported to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, session, args.format, transactions, &mut writer)?;
        }
    }

    Ok(())
}

/// Serialize `transactions` in `format`
pub fn write_export<W: Write>(
    storage: &Storage,
    session: &Session,
    format: ExportFormat,
    transactions: Vec<Transaction>,
    writer: &mut W,
) -> TallyResult<()> {
    match format {
        ExportFormat::Csv => export_transactions_csv(&transactions, writer),
        ExportFormat::Json => {
            let export = UserExport::new(storage, session, transactions)?;
            export_json(&export, writer)
        }
        ExportFormat::Yaml => {
            let export = UserExport::new(storage, session, transactions)?;
            export_yaml(&export, writer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Money, TransactionKind};
    use crate::services::{AuthService, CreateTransactionInput};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_write_export_csv_filters_by_session_user() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();

        let auth = AuthService::new(&storage);
        let ann = auth.register("Ann", "1234", "USD").unwrap();
        let bob = auth.register("Bob", "5678", "USD").unwrap();

        let service = TransactionService::new(&storage);
        for (session, category) in [(&ann, "Food"), (&bob, "Fuel")] {
            service
                .create(
                    session,
                    CreateTransactionInput {
                        kind: TransactionKind::Expense,
                        amount: Money::from_units(10),
                        category: category.into(),
                        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                        description: String::new(),
                        payment_method: String::new(),
                    },
                )
                .unwrap();
        }

        let txns = service.list(&ann).unwrap();
        let mut output = Vec::new();
        write_export(&storage, &ann, ExportFormat::Csv, txns, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Food"));
        assert!(!text.contains("Fuel"));
    }
}
