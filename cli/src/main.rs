//! `echeancier` command line
//!
//! Drives a [`ScheduleBook`] against a JSON snapshot file. Each invocation
//! loads the store (or starts empty), runs one command and saves the store
//! back when the command changed it.
//!
//! Installment numbers on the command line start at 1.

mod csv_export;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use echeancier_core_rs::export::format_fcfa;
use echeancier_core_rs::schedule::coerce_amount_str;
use echeancier_core_rs::{
    ClientConfig, DueFilter, InMemoryStore, NoOpReason, PaymentOutcome, ScheduleBook,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "echeancier", version, about = "Twelve-month payment schedules")]
struct Cli {
    /// Snapshot file holding clients, contracts and receipts
    #[arg(long, env = "ECHEANCIER_STORE", default_value = "echeancier.json")]
    store: PathBuf,

    /// Log filter (e.g. `info`, `debug`, `echeancier_core_rs=debug`)
    #[arg(long, env = "ECHEANCIER_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a client and its twelve-month contract
    CreateClient {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Contract total in FCFA
        #[arg(long)]
        amount: String,
        /// Due date of the first installment (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
    },

    /// Create clients from a JSON list of client configs
    Import { file: PathBuf },

    /// Change a contract's total (resets payment progress)
    SetAmount { client_id: String, amount: String },

    /// Change a contract's start date (resets payment progress)
    SetStart { client_id: String, start: NaiveDate },

    /// Record a partial payment on installment NUMBER
    Pay {
        client_id: String,
        number: usize,
        amount: String,
    },

    /// Pay installment NUMBER in full
    PayFull { client_id: String, number: usize },

    /// Lock or unlock installment NUMBER
    ToggleLock { client_id: String, number: usize },

    /// Print a client's schedule
    Show {
        client_id: String,
        /// all, overdue or this-week
        #[arg(long, default_value_t = DueFilter::All)]
        filter: DueFilter,
    },

    /// Print a client's receipts, newest first
    Receipts { client_id: String },

    /// Print totals across every contract
    Portfolio,

    /// Write a client's schedule as CSV
    ExportCsv {
        client_id: String,
        /// Output path (defaults to echeancier_<client>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a client's full statement as JSON
    Statement { client_id: String },
}

impl Command {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::CreateClient { .. }
                | Command::Import { .. }
                | Command::SetAmount { .. }
                | Command::SetStart { .. }
                | Command::Pay { .. }
                | Command::PayFull { .. }
                | Command::ToggleLock { .. }
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mutates = cli.command.mutates();
    let mut book = ScheduleBook::new(load_store(&cli.store)?);
    run(&mut book, cli.command)?;

    for event in book.take_events().events() {
        debug!(
            event = event.event_type(),
            client_id = event.client_id(),
            index = ?event.installment_index(),
            at = %event.at(),
            "book event"
        );
    }

    if mutates {
        book.store()
            .save_snapshot(&cli.store, Utc::now())
            .with_context(|| format!("saving {}", cli.store.display()))?;
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_store(path: &Path) -> Result<InMemoryStore> {
    if !path.exists() {
        info!(path = %path.display(), "no store yet, starting empty");
        return Ok(InMemoryStore::new());
    }
    InMemoryStore::load_snapshot(path).with_context(|| format!("loading {}", path.display()))
}

/// 1-based installment number to schedule index
fn index_of(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("installment numbers start at 1"),
    }
}

fn run(book: &mut ScheduleBook<InMemoryStore>, command: Command) -> Result<()> {
    match command {
        Command::CreateClient {
            name,
            email,
            amount,
            start,
        } => {
            let client_id = book.create_client(ClientConfig {
                name,
                email,
                total_amount: coerce_amount_str(&amount),
                start_date: start,
            })?;
            println!("{}", client_id);
        }
        Command::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let configs: Vec<ClientConfig> = serde_json::from_str(&json)
                .with_context(|| format!("parsing {}", file.display()))?;
            for config in configs {
                println!("{}", book.create_client(config)?);
            }
        }
        Command::SetAmount { client_id, amount } => {
            let contract = book.update_total_amount(&client_id, coerce_amount_str(&amount))?;
            println!("Montant total: {}", format_fcfa(contract.total_amount()));
        }
        Command::SetStart { client_id, start } => {
            let contract = book.update_start_date(&client_id, start)?;
            println!("Date de départ: {}", contract.start_date());
        }
        Command::Pay {
            client_id,
            number,
            amount,
        } => {
            let outcome = book.add_payment(&client_id, index_of(number)?, coerce_amount_str(&amount))?;
            print_outcome(&outcome);
        }
        Command::PayFull { client_id, number } => {
            let outcome = book.pay_in_full(&client_id, index_of(number)?)?;
            print_outcome(&outcome);
        }
        Command::ToggleLock { client_id, number } => {
            let closed = book.toggle_lock(&client_id, index_of(number)?)?;
            println!("Échéance {}: {}", number, if closed { "close" } else { "ouverte" });
        }
        Command::Show { client_id, filter } => {
            let rows = book.filtered_schedule(&client_id, filter)?;
            println!(
                "{:>3}  {:<10}  {:>16}  {:>16}  {:>16}  {}",
                "#", "Échéance", "Montant", "Payé", "Reste", "Clos"
            );
            for (index, installment) in rows {
                println!(
                    "{:>3}  {:<10}  {:>16}  {:>16}  {:>16}  {}",
                    index + 1,
                    installment.due_date(),
                    format_fcfa(installment.amount()),
                    format_fcfa(installment.paid()),
                    format_fcfa(installment.remaining()),
                    if installment.is_closed() { "Oui" } else { "Non" }
                );
            }
        }
        Command::Receipts { client_id } => {
            for receipt in book.receipts_newest_first(&client_id)? {
                println!(
                    "{}  {}  échéance {}  {}  (reste {})",
                    receipt.timestamp().format("%Y-%m-%d %H:%M:%S"),
                    receipt.id(),
                    receipt.installment_index() + 1,
                    format_fcfa(receipt.paid_delta()),
                    format_fcfa(receipt.remaining_after())
                );
            }
        }
        Command::Portfolio => {
            let summary = book.portfolio();
            println!("Contrats: {}", summary.contracts);
            println!("Montant:  {}", format_fcfa(summary.amount));
            println!("Payé:     {}", format_fcfa(summary.paid));
            println!("Reste:    {}", format_fcfa(summary.remaining));
        }
        Command::ExportCsv { client_id, output } => {
            let export = book.schedule_export(&client_id)?;
            let path = output.unwrap_or_else(|| PathBuf::from(export.file_name("csv")));
            csv_export::write_schedule(&path, &export)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
        }
        Command::Statement { client_id } => {
            let statement = book.client_statement(&client_id)?;
            println!("{}", serde_json::to_string_pretty(&statement)?);
        }
    }
    Ok(())
}

fn print_outcome(outcome: &PaymentOutcome) {
    match outcome {
        PaymentOutcome::Applied { applied, receipt } => {
            println!(
                "Échéance {}: +{} (payé {}, reste {})",
                applied.index + 1,
                format_fcfa(applied.delta),
                format_fcfa(applied.paid_after),
                format_fcfa(applied.remaining_after)
            );
            if let Some(receipt) = receipt {
                println!("Reçu {}", receipt.id());
            }
        }
        PaymentOutcome::NoOp(reason) => println!("Aucun changement: {}", describe_noop(reason)),
    }
}

/// No-op message using the 1-based installment numbers of the command line
fn describe_noop(reason: &NoOpReason) -> String {
    match reason {
        NoOpReason::ZeroAmount => "montant nul".to_string(),
        NoOpReason::InstallmentClosed { index } => format!("échéance {} close", index + 1),
        NoOpReason::AlreadyPaid { index } => format!("échéance {} déjà payée", index + 1),
        NoOpReason::IndexOutOfRange { index } => {
            format!("échéance {} inexistante (1 à 12)", index + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pay_command() {
        let cli = Cli::try_parse_from([
            "echeancier", "--store", "book.json", "pay", "id_1", "3", "25000.75",
        ])
        .unwrap();

        assert_eq!(cli.store, PathBuf::from("book.json"));
        match cli.command {
            Command::Pay {
                client_id,
                number,
                amount,
            } => {
                assert_eq!(client_id, "id_1");
                assert_eq!(index_of(number).unwrap(), 2);
                assert_eq!(coerce_amount_str(&amount), 25_000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_filter() {
        let cli = Cli::try_parse_from(["echeancier", "show", "id_1", "--filter", "this-week"]).unwrap();

        match cli.command {
            Command::Show { filter, .. } => assert_eq!(filter, DueFilter::ThisWeek),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["echeancier", "show", "id_1", "--filter", "soon"]).is_err());
    }

    #[test]
    fn test_noop_messages_use_command_line_numbers() {
        assert_eq!(
            describe_noop(&NoOpReason::IndexOutOfRange { index: 12 }),
            "échéance 13 inexistante (1 à 12)"
        );
        assert_eq!(
            describe_noop(&NoOpReason::InstallmentClosed { index: 0 }),
            "échéance 1 close"
        );
        assert_eq!(
            describe_noop(&NoOpReason::AlreadyPaid { index: 4 }),
            "échéance 5 déjà payée"
        );
        assert_eq!(describe_noop(&NoOpReason::ZeroAmount), "montant nul");
    }

    #[test]
    fn test_installment_zero_is_rejected() {
        assert!(index_of(0).is_err());
        assert_eq!(index_of(12).unwrap(), 11);
    }

    #[test]
    fn test_only_writes_mutate() {
        let show = Cli::try_parse_from(["echeancier", "portfolio"]).unwrap();
        let pay = Cli::try_parse_from(["echeancier", "pay-full", "id_1", "1"]).unwrap();

        assert!(!show.command.mutates());
        assert!(pay.command.mutates());
    }
}
