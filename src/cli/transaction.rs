//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management and search.

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::dates::{parse_date, parse_optional_date, today};
use crate::display::transaction::{format_transaction_details, format_transaction_table};
use crate::error::TallyResult;
use crate::models::Session;
use crate::services::{
    CreateTransactionInput, SearchRequest, TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{auto_backup, parse_amount, parse_kind};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// income or expense
        kind: String,
        /// Amount, e.g. "50" or "12.99"
        amount: String,
        /// Category name
        category: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Payment method, e.g. cash or card
        #[arg(short, long)]
        payment: Option<String>,
    },
    /// List transactions in the order they were added
    List {
        /// Show only the most recent N
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (full or short form)
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// New payment method
        #[arg(short, long)]
        payment: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Search and sort transactions
    Search(SearchArgs),
}

/// Search filters; every one is optional
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
    /// Exact category name
    #[arg(short, long)]
    pub category: Option<String>,
    /// income or expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,
    /// Minimum amount, inclusive
    #[arg(long)]
    pub min: Option<String>,
    /// Maximum amount, inclusive
    #[arg(long)]
    pub max: Option<String>,
    /// Sort by date, amount or category
    #[arg(short, long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl SearchArgs {
    pub fn to_request(&self, session: &Session) -> SearchRequest {
        SearchRequest {
            user_id: session.user_id.to_string(),
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            category: self.category.clone(),
            kind: self.kind.clone(),
            min_amount: self.min.clone(),
            max_amount: self.max.clone(),
            sort_by: self.sort.clone(),
            descending: self.desc,
        }
    }
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
            payment,
        } => {
            let input = CreateTransactionInput {
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                category,
                date: match date {
                    Some(date) => parse_date(&date, "date")?,
                    None => today(),
                },
                description: description.unwrap_or_default(),
                payment_method: payment.unwrap_or_default(),
            };

            let txn = service.create(session, input)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id.short());
            println!("  Date:     {}", txn.date);
            println!("  Type:     {}", txn.kind);
            println!("  Category: {}", txn.category);
            println!("  Amount:   {}", txn.amount.format_with_symbol(symbol));
        }

        TransactionCommands::List { limit } => {
            let transactions = service.list(session)?;
            let shown = match limit {
                Some(limit) if limit < transactions.len() => {
                    &transactions[transactions.len() - limit..]
                }
                _ => &transactions[..],
            };
            print!("{}", format_transaction_table(shown, symbol));
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(session, &id)?;
            print!("{}", format_transaction_details(&txn, symbol));
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            date,
            description,
            payment,
        } => {
            let input = UpdateTransactionInput {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                date: parse_optional_date(date.as_deref(), "date")?,
                description,
                payment_method: payment,
            };

            if input.is_empty() {
                println!("Nothing to change. Pass at least one of --type, --amount, --category, --date, --description, --payment");
                return Ok(());
            }

            let updated = service.update(session, &id, input)?;
            println!("Updated transaction: {}", updated.id.short());
            print!("{}", format_transaction_details(&updated, symbol));
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service.get(session, &id)?;

            if !force {
                println!("About to delete transaction:");
                print!("{}", format_transaction_details(&txn, symbol));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            auto_backup(storage, settings);
            let deleted = service.delete(session, &id)?;
            println!(
                "Deleted transaction: {} ({} {})",
                deleted.id.short(),
                deleted.date,
                deleted.category
            );
        }

        TransactionCommands::Search(args) => {
            let results = service.search(session, args.to_request(session))?;
            print!("{}", format_transaction_table(&results, symbol));
        }
    }

    Ok(())
}
