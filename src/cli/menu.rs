//! Interactive numbered menu
//!
//! A welcome menu (log in, register, exit) leads to the main menu with
//! sub-menus for transactions, reports and the advanced features. Errors
//! from an action are printed and the menu carries on. End of input exits
//! cleanly.

use std::io::{self, BufRead, IsTerminal, Write};

use zeroize::Zeroizing;

use crate::config::settings::Settings;
use crate::dates::{parse_date, parse_optional_date, today};
use crate::display::{
    format_budget_alerts, format_goal_progress, format_health_score, format_rule_table,
    format_transaction_details, format_transaction_table,
};
use crate::error::{TallyError, TallyResult};
use crate::models::{Session, TransactionKind};
use crate::reports::{CategoryBreakdown, DashboardSummary, MonthlyReport, SpendingTrends};
use crate::services::{
    AuthService, BudgetService, CreateRuleInput, CreateTransactionInput, GoalService,
    HealthService, RecurringService, SearchRequest, TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{auto_backup, ensure_feature, parse_amount, parse_kind};

const HEADER_WIDTH: usize = 50;

const HELP_TEXT: &str = "\
Tally keeps track of your money in four areas:
1. Users: register, log in and out. Each user sees only their own data.
2. Transactions: add, view, edit, delete, search and sort.
3. Reports: a monthly dashboard, monthly totals, category breakdown
   and month-over-month spending trends.
4. Advanced features: budget limits, savings goals, recurring
   transactions and a financial health score.

Every menu action also exists as a command; run 'tally --help'.
Dates are written YYYY-MM-DD. Press Ctrl+D at any prompt to leave.";

/// What to do after an action returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Back,
    Exit,
}

/// Run the menu on the terminal
pub fn run_menu(storage: &Storage, settings: &Settings) -> TallyResult<()> {
    let stdin = io::stdin();
    let hide_pin = stdin.is_terminal();
    let mut menu = Menu::new(storage, settings, stdin.lock(), io::stdout());
    menu.hide_pin = hide_pin;
    menu.run()
}

/// The menu state machine, generic over its input and output
pub struct Menu<'a, R, W> {
    storage: &'a Storage,
    settings: &'a Settings,
    input: R,
    output: W,
    session: Option<Session>,
    hide_pin: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            storage,
            settings,
            input,
            output,
            session: None,
            hide_pin: false,
        }
    }

    pub fn run(&mut self) -> TallyResult<()> {
        self.session = AuthService::new(self.storage).current_session()?;

        loop {
            let flow = match self.session.clone() {
                None => self.welcome_menu()?,
                Some(session) => self.main_menu(&session)?,
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    // ----- input helpers -----

    /// Read one trimmed line; `None` at end of input
    fn ask(&mut self, prompt: &str) -> TallyResult<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_pin(&mut self, prompt: &str) -> TallyResult<Option<Zeroizing<String>>> {
        if self.hide_pin {
            self.output.flush()?;
            if let Ok(pin) = rpassword::prompt_password(prompt) {
                return Ok(Some(Zeroizing::new(pin)));
            }
        }
        Ok(self.ask(prompt)?.map(Zeroizing::new))
    }

    fn confirm(&mut self, prompt: &str) -> TallyResult<Option<bool>> {
        Ok(self
            .ask(&format!("{} (y/N): ", prompt))?
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes")))
    }

    fn header(&mut self, title: &str) -> TallyResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "=".repeat(HEADER_WIDTH))?;
        writeln!(self.output, "{:^width$}", title, width = HEADER_WIDTH)?;
        writeln!(self.output, "{}", "=".repeat(HEADER_WIDTH))?;
        Ok(())
    }

    fn options(&mut self, items: &[&str]) -> TallyResult<()> {
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, item)?;
        }
        Ok(())
    }

    /// Print an action's error and keep going
    fn settle(&mut self, result: TallyResult<Flow>) -> TallyResult<Flow> {
        match result {
            Ok(flow) => Ok(flow),
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    // ----- top-level menus -----

    fn welcome_menu(&mut self) -> TallyResult<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Welcome to Tally ===")?;
        self.options(&["Log in", "Register", "Exit"])?;

        let Some(choice) = self.ask("Choose: ")? else {
            return Ok(Flow::Exit);
        };
        match choice.as_str() {
            "1" => {
                let result = self.login();
                self.settle(result)
            }
            "2" => {
                let result = self.register();
                self.settle(result)
            }
            "3" => {
                writeln!(self.output, "Goodbye!")?;
                Ok(Flow::Exit)
            }
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn main_menu(&mut self, session: &Session) -> TallyResult<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Main Menu (logged in as {}) ===", session.name)?;
        self.options(&[
            "Transactions",
            "Reports",
            "Advanced Features",
            "Help",
            "Logout",
            "Exit",
        ])?;

        let Some(choice) = self.ask("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        match choice.as_str() {
            "1" => self.submenu(session, Self::transactions_menu),
            "2" => self.submenu(session, Self::reports_menu),
            "3" => self.submenu(session, Self::advanced_menu),
            "4" => {
                self.header("HELP")?;
                writeln!(self.output, "{}", HELP_TEXT)?;
                Ok(Flow::Continue)
            }
            "5" => {
                AuthService::new(self.storage).logout()?;
                self.session = None;
                writeln!(self.output, "You have been logged out.")?;
                Ok(Flow::Continue)
            }
            "6" => {
                writeln!(self.output, "Goodbye!")?;
                Ok(Flow::Exit)
            }
            _ => {
                writeln!(self.output, "Invalid option. Please try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Loop a sub-menu until it goes back or input ends
    fn submenu(
        &mut self,
        session: &Session,
        menu: fn(&mut Self, &Session) -> TallyResult<Flow>,
    ) -> TallyResult<Flow> {
        loop {
            match menu(self, session)? {
                Flow::Continue => continue,
                Flow::Back => return Ok(Flow::Continue),
                Flow::Exit => return Ok(Flow::Exit),
            }
        }
    }

    fn login(&mut self) -> TallyResult<Flow> {
        let Some(name) = self.ask("Username: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(pin) = self.ask_pin("PIN: ")? else {
            return Ok(Flow::Exit);
        };

        let session = AuthService::new(self.storage).login(&name, &pin)?;
        writeln!(self.output, "Welcome, {}!", session.name)?;
        self.session = Some(session);
        Ok(Flow::Continue)
    }

    fn register(&mut self) -> TallyResult<Flow> {
        let Some(name) = self.ask("Choose a username: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(pin) = self.ask_pin("Choose a PIN (4-8 digits): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(again) = self.ask_pin("Confirm PIN: ")? else {
            return Ok(Flow::Exit);
        };
        if *pin != *again {
            return Err(TallyError::Validation("PINs do not match".into()));
        }

        let session = AuthService::new(self.storage).register(
            &name,
            &pin,
            &self.settings.default_currency,
        )?;
        writeln!(self.output, "User '{}' registered successfully!", session.name)?;
        self.session = Some(session);
        Ok(Flow::Continue)
    }

    // ----- transactions -----

    fn transactions_menu(&mut self, session: &Session) -> TallyResult<Flow> {
        self.header("TRANSACTIONS")?;
        self.options(&[
            "Add Transaction",
            "View Transactions",
            "Edit Transaction",
            "Delete Transaction",
            "Search/Filter Transactions",
            "Back to Main Menu",
        ])?;

        let Some(choice) = self.ask("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        let result = match choice.as_str() {
            "1" => self.add_transaction(session),
            "2" => self.view_transactions(session),
            "3" => self.edit_transaction(session),
            "4" => self.delete_transaction(session),
            "5" => self.search_transactions(session),
            "6" => return Ok(Flow::Back),
            _ => {
                writeln!(self.output, "Invalid option.")?;
                return Ok(Flow::Continue);
            }
        };
        self.settle(result)
    }

    fn add_transaction(&mut self, session: &Session) -> TallyResult<Flow> {
        let Some(kind) = self.ask("Type (income/expense): ")? else {
            return Ok(Flow::Exit);
        };
        let kind = parse_kind(&kind)?;
        let Some(amount) = self.ask("Amount: ")? else {
            return Ok(Flow::Exit);
        };
        let amount = parse_amount(&amount)?;
        let Some(category) = self.ask("Category: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(date) = self.ask("Date (YYYY-MM-DD, blank for today): ")? else {
            return Ok(Flow::Exit);
        };
        let date = parse_optional_date(Some(&date), "date")?.unwrap_or_else(today);
        let Some(description) = self.ask("Description (optional): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(payment_method) = self.ask("Payment method (optional): ")? else {
            return Ok(Flow::Exit);
        };

        let txn = TransactionService::new(self.storage).create(
            session,
            CreateTransactionInput {
                kind,
                amount,
                category,
                date,
                description,
                payment_method,
            },
        )?;
        writeln!(self.output, "Transaction added: {}", txn.id.short())?;
        Ok(Flow::Continue)
    }

    fn view_transactions(&mut self, session: &Session) -> TallyResult<Flow> {
        let transactions = TransactionService::new(self.storage).list(session)?;
        let table = format_transaction_table(&transactions, &self.settings.currency_symbol);
        write!(self.output, "{}", table)?;
        Ok(Flow::Continue)
    }

    fn edit_transaction(&mut self, session: &Session) -> TallyResult<Flow> {
        let service = TransactionService::new(self.storage);
        let Some(id) = self.ask("Transaction ID: ")? else {
            return Ok(Flow::Exit);
        };
        let current = service.get(session, &id)?;
        let details = format_transaction_details(&current, &self.settings.currency_symbol);
        write!(self.output, "{}", details)?;
        writeln!(self.output, "Leave a field blank to keep it.")?;

        let mut input = UpdateTransactionInput::default();

        let Some(kind) = self.ask("Type: ")? else {
            return Ok(Flow::Exit);
        };
        if !kind.is_empty() {
            input.kind = Some(parse_kind(&kind)?);
        }
        let Some(amount) = self.ask("Amount: ")? else {
            return Ok(Flow::Exit);
        };
        if !amount.is_empty() {
            input.amount = Some(parse_amount(&amount)?);
        }
        let Some(category) = self.ask("Category: ")? else {
            return Ok(Flow::Exit);
        };
        if !category.is_empty() {
            input.category = Some(category);
        }
        let Some(date) = self.ask("Date: ")? else {
            return Ok(Flow::Exit);
        };
        input.date = parse_optional_date(Some(&date), "date")?;
        let Some(description) = self.ask("Description: ")? else {
            return Ok(Flow::Exit);
        };
        if !description.is_empty() {
            input.description = Some(description);
        }
        let Some(payment_method) = self.ask("Payment method: ")? else {
            return Ok(Flow::Exit);
        };
        if !payment_method.is_empty() {
            input.payment_method = Some(payment_method);
        }

        if input.is_empty() {
            writeln!(self.output, "Nothing changed.")?;
            return Ok(Flow::Continue);
        }

        let updated = service.update(session, &id, input)?;
        writeln!(self.output, "Transaction {} updated.", updated.id.short())?;
        Ok(Flow::Continue)
    }

    fn delete_transaction(&mut self, session: &Session) -> TallyResult<Flow> {
        let service = TransactionService::new(self.storage);
        let Some(id) = self.ask("Transaction ID: ")? else {
            return Ok(Flow::Exit);
        };
        let txn = service.get(session, &id)?;
        let details = format_transaction_details(&txn, &self.settings.currency_symbol);
        write!(self.output, "{}", details)?;

        match self.confirm("Delete this transaction?")? {
            None => Ok(Flow::Exit),
            Some(false) => {
                writeln!(self.output, "Cancelled.")?;
                Ok(Flow::Continue)
            }
            Some(true) => {
                auto_backup(self.storage, self.settings);
                service.delete(session, &id)?;
                writeln!(self.output, "Transaction deleted.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn search_transactions(&mut self, session: &Session) -> TallyResult<Flow> {
        writeln!(self.output, "Leave any filter blank to skip it.")?;
        let mut request = SearchRequest::for_user(session.user_id.to_string());

        let prompts = [
            "Start date (YYYY-MM-DD): ",
            "End date (YYYY-MM-DD): ",
            "Category: ",
            "Type (income/expense): ",
            "Minimum amount: ",
            "Maximum amount: ",
            "Sort by (date/amount/category): ",
        ];
        let mut answers = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(Flow::Exit);
            };
            answers.push(answer);
        }
        let mut answers = answers.into_iter();
        request.start_date = answers.next();
        request.end_date = answers.next();
        request.category = answers.next();
        request.kind = answers.next();
        request.min_amount = answers.next();
        request.max_amount = answers.next();
        request.sort_by = answers.next();

        if request.sort_by.as_deref().is_some_and(|s| !s.is_empty()) {
            let Some(descending) = self.confirm("Descending?")? else {
                return Ok(Flow::Exit);
            };
            request.descending = descending;
        }

        let results = TransactionService::new(self.storage).search(session, request)?;
        let table = format_transaction_table(&results, &self.settings.currency_symbol);
        write!(self.output, "{}", table)?;
        Ok(Flow::Continue)
    }

    // ----- reports -----

    fn reports_menu(&mut self, session: &Session) -> TallyResult<Flow> {
        self.header("REPORTS")?;
        self.options(&[
            "Dashboard Summary",
            "Monthly Report",
            "Category Breakdown",
            "Spending Trends",
            "Back to Main Menu",
        ])?;

        let Some(choice) = self.ask("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        let result = match choice.as_str() {
            "1" | "2" | "3" | "4" => self.show_report(session, &choice),
            "5" => return Ok(Flow::Back),
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                return Ok(Flow::Continue);
            }
        };
        self.settle(result)
    }

    fn show_report(&mut self, session: &Session, choice: &str) -> TallyResult<Flow> {
        let transactions = TransactionService::new(self.storage).list(session)?;
        let symbol = self.settings.currency_symbol.clone();

        let text = match choice {
            "1" => DashboardSummary::generate(&transactions, today()).format_terminal(&symbol),
            "2" => MonthlyReport::generate(&transactions).format_terminal(&symbol),
            "3" => {
                let Some(kind) = self.ask("Type (income/expense, blank for expense): ")? else {
                    return Ok(Flow::Exit);
                };
                let kind = if kind.is_empty() {
                    TransactionKind::Expense
                } else {
                    parse_kind(&kind)?
                };
                CategoryBreakdown::generate(&transactions, kind).format_terminal(&symbol)
            }
            _ => SpendingTrends::generate(&transactions).format_terminal(&symbol),
        };
        write!(self.output, "{}", text)?;
        Ok(Flow::Continue)
    }

    // ----- advanced features -----

    fn advanced_menu(&mut self, session: &Session) -> TallyResult<Flow> {
        self.header("ADVANCED FEATURES")?;
        self.options(&[
            "Set Budget Limit",
            "Check Budget Limits",
            "Set Goal",
            "View Goals Progress",
            "Process Recurring Transactions",
            "Calculate Financial Health Score",
            "Add Recurring Rule",
            "View Recurring Rules",
            "Remove Recurring Rule",
            "Back to Main Menu",
        ])?;

        let Some(choice) = self.ask("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        let result = match choice.as_str() {
            "1" => self.set_budget(session),
            "2" => self.check_budgets(session),
            "3" => self.set_goal(session),
            "4" => self.view_goals(session),
            "5" => self.process_recurring(session),
            "6" => self.health_score(session),
            "7" => self.add_rule(session),
            "8" => self.view_rules(session),
            "9" => self.remove_rule(session),
            "10" => return Ok(Flow::Back),
            _ => {
                writeln!(self.output, "Invalid choice, try again.")?;
                return Ok(Flow::Continue);
            }
        };
        self.settle(result)
    }

    fn set_budget(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_budgets, "Budgets")?;
        let Some(category) = self.ask("Category: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(limit) = self.ask("Monthly limit: ")? else {
            return Ok(Flow::Exit);
        };
        let limit = parse_amount(&limit)?;

        BudgetService::new(self.storage).set(session, &category, limit)?;
        writeln!(
            self.output,
            "Budget for '{}' set to {}.",
            category,
            limit.format_with_symbol(&self.settings.currency_symbol)
        )?;
        Ok(Flow::Continue)
    }

    fn check_budgets(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_budgets, "Budgets")?;
        let alerts = BudgetService::new(self.storage).check(session)?;
        let text = format_budget_alerts(&alerts, &self.settings.currency_symbol);
        write!(self.output, "{}", text)?;
        Ok(Flow::Continue)
    }

    fn set_goal(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_goals, "Goals")?;
        let Some(name) = self.ask("Goal name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(target) = self.ask("Target amount: ")? else {
            return Ok(Flow::Exit);
        };
        let target = parse_amount(&target)?;

        GoalService::new(self.storage).set(session, &name, target)?;
        writeln!(
            self.output,
            "Goal '{}' set to {}.",
            name,
            target.format_with_symbol(&self.settings.currency_symbol)
        )?;
        Ok(Flow::Continue)
    }

    fn view_goals(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_goals, "Goals")?;
        let progress = GoalService::new(self.storage).progress(session)?;
        let text = format_goal_progress(&progress, &self.settings.currency_symbol);
        write!(self.output, "{}", text)?;
        Ok(Flow::Continue)
    }

    fn process_recurring(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_recurring, "Recurring transactions")?;
        let created = RecurringService::new(self.storage).process(session, today())?;
        if created.is_empty() {
            writeln!(self.output, "No recurring transactions due.")?;
        } else {
            writeln!(self.output, "Generated {} transaction(s):", created.len())?;
            let table = format_transaction_table(&created, &self.settings.currency_symbol);
            write!(self.output, "{}", table)?;
        }
        Ok(Flow::Continue)
    }

    fn health_score(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_goals, "Goals")?;
        let score = HealthService::new(self.storage).score(session)?;
        write!(self.output, "{}", format_health_score(score))?;
        Ok(Flow::Continue)
    }

    fn add_rule(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_recurring, "Recurring transactions")?;
        let Some(kind) = self.ask("Type (income/expense): ")? else {
            return Ok(Flow::Exit);
        };
        let kind = parse_kind(&kind)?;
        let Some(amount) = self.ask("Amount: ")? else {
            return Ok(Flow::Exit);
        };
        let amount = parse_amount(&amount)?;
        let Some(category) = self.ask("Category: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(start) = self.ask("First date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };
        let next_date = parse_date(&start, "first date")?;
        let Some(every) = self.ask("Repeat every N days: ")? else {
            return Ok(Flow::Exit);
        };
        let interval_days: u32 = every.parse().map_err(|_| {
            TallyError::Validation(format!("'{}' is not a whole number of days", every))
        })?;
        let Some(description) = self.ask("Description (optional): ")? else {
            return Ok(Flow::Exit);
        };

        let rule = RecurringService::new(self.storage).add(
            session,
            CreateRuleInput {
                kind,
                amount,
                category,
                description,
                payment_method: String::new(),
                next_date,
                interval_days,
            },
        )?;
        writeln!(self.output, "Recurring rule added: {}", rule.id.short())?;
        Ok(Flow::Continue)
    }

    fn view_rules(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_recurring, "Recurring transactions")?;
        let rules = RecurringService::new(self.storage).list(session)?;
        let table = format_rule_table(&rules, &self.settings.currency_symbol);
        write!(self.output, "{}", table)?;
        Ok(Flow::Continue)
    }

    fn remove_rule(&mut self, session: &Session) -> TallyResult<Flow> {
        ensure_feature(self.settings.features.enable_recurring, "Recurring transactions")?;
        let Some(id) = self.ask("Rule ID: ")? else {
            return Ok(Flow::Exit);
        };
        match self.confirm("Remove this rule?")? {
            None => Ok(Flow::Exit),
            Some(false) => {
                writeln!(self.output, "Cancelled.")?;
                Ok(Flow::Continue)
            }
            Some(true) => {
                auto_backup(self.storage, self.settings);
                let removed = RecurringService::new(self.storage).remove(session, &id)?;
                writeln!(self.output, "Removed rule {}.", removed.id.short())?;
                Ok(Flow::Continue)
            }
        }
    }
}
