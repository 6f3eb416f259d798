//! Recurring rule CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::dates::{days_between, parse_date, parse_optional_date, today};
use crate::display::{format_rule_table, format_transaction_table};
use crate::error::{TallyError, TallyResult};
use crate::models::Session;
use crate::services::{CreateRuleInput, RecurringService};
use crate::storage::Storage;

use super::{auto_backup, ensure_feature, parse_amount, parse_kind};

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Add a recurring rule
    Add {
        /// income or expense
        kind: String,
        /// Amount of each instance
        amount: String,
        /// Category name
        category: String,
        /// Date of the first instance (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
        /// Days between instances
        #[arg(short, long, default_value = "30")]
        every: u32,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Payment method
        #[arg(short, long)]
        payment: Option<String>,
    },
    /// List recurring rules
    List,
    /// Remove a recurring rule
    Remove {
        /// Rule ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Generate every transaction that is due
    Process {
        /// Process as of this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
}

/// Handle a recurring command
pub fn handle_recurring_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: RecurringCommands,
) -> TallyResult<()> {
    ensure_feature(settings.features.enable_recurring, "Recurring transactions")?;

    let service = RecurringService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        RecurringCommands::Add {
            kind,
            amount,
            category,
            start,
            every,
            description,
            payment,
        } => {
            let input = CreateRuleInput {
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                category,
                description: description.unwrap_or_default(),
                payment_method: payment.unwrap_or_default(),
                next_date: parse_date(&start, "start date")?,
                interval_days: every,
            };

            let rule = service.add(session, input)?;
            println!("Created recurring rule: {}", rule.id.short());
            println!(
                "  {} {} every {} day(s), next on {}",
                rule.kind,
                rule.amount.format_with_symbol(symbol),
                rule.interval_days,
                rule.next_date
            );
            let until = days_between(today(), rule.next_date);
            if until <= 0 {
                println!("  Already due; run 'tally recurring process' to generate it.");
            } else {
                println!("  Due in {} day(s).", until);
            }
        }

        RecurringCommands::List => {
            let rules = service.list(session)?;
            print!("{}", format_rule_table(&rules, symbol));
        }

        RecurringCommands::Remove { id, force } => {
            if !force {
                let rules = service.list(session)?;
                let found: Vec<_> = rules.into_iter().filter(|r| r.id.matches(&id)).collect();
                if found.is_empty() {
                    return Err(TallyError::rule_not_found(&id));
                }
                print!("{}", format_rule_table(&found, symbol));
                println!("Use --force to confirm removal");
                return Ok(());
            }

            auto_backup(storage, settings);
            let removed = service.remove(session, &id)?;
            println!(
                "Removed recurring rule: {} ({})",
                removed.id.short(),
                removed.category
            );
        }

        RecurringCommands::Process { today: as_of } => {
            let as_of = parse_optional_date(as_of.as_deref(), "date")?.unwrap_or_else(today);
            let created = service.process(session, as_of)?;

            if created.is_empty() {
                println!("No recurring transactions due.");
            } else {
                println!("Generated {} transaction(s):", created.len());
                print!("{}", format_transaction_table(&created, symbol));
            }
        }
    }

    Ok(())
}
