use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{AppState, LedgerService, SummaryReport};
use crate::domain::{
    format_cents, Cents, EditDatePolicy, Expense, ExpenseId, ExpenseInput, FilterWindow,
};
use crate::io::{write_csv, write_summary_csv, Exporter};

/// Width in characters of the longest bar in the category chart.
const CHART_WIDTH: usize = 40;

/// Outlay - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Record expenses and see where the money goes")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "outlay.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keep an expense's original date when editing it (default: re-date to today)
    #[arg(long, global = true)]
    pub keep_date: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an expense dated today
    Add {
        /// Amount spent (e.g., "12.50")
        amount: String,

        /// Category (e.g., "Food", "Groceries")
        #[arg(short, long)]
        category: String,

        /// Optional note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Edit an expense; omitted fields keep their current value
    Edit {
        /// Expense ID
        id: ExpenseId,

        /// New amount
        amount: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New note (pass "" to clear it)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// List expenses, newest first
    List {
        /// Time window: all, week, month
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show totals per category with a bar chart
    Summary {
        /// Time window: all, week, month
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Time window: all, week, month
        #[arg(long, default_value = "all")]
        filter: String,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    /// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("outlay={default_level}")));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    fn edit_policy(&self) -> EditDatePolicy {
        if self.keep_date {
            EditDatePolicy::KeepOriginal
        } else {
            EditDatePolicy::ResetToToday
        }
    }

    pub async fn run(self) -> Result<()> {
        let service = LedgerService::init(&self.database)
            .await?
            .with_edit_policy(self.edit_policy());

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                note,
            } => {
                let mut state = AppState {
                    form: ExpenseInput::new(amount, category, note),
                    ..AppState::default()
                };
                let expense = service.submit(&mut state).await?;
                println!(
                    "Recorded expense #{}: {} {}",
                    expense.id,
                    expense.formatted_amount(),
                    expense.category
                );
                print_totals_line(&state);
            }

            Commands::Edit {
                id,
                amount,
                category,
                note,
            } => {
                run_edit_command(&service, id, amount, category, note).await?;
            }

            Commands::Delete { id } => {
                let mut state = AppState::default();
                service.remove(&mut state, id).await?;
                println!("Deleted expense #{}", id);
                print_totals_line(&state);
            }

            Commands::List { filter, format } => {
                let filter = parse_filter(&filter)?;
                run_list_command(&service, filter, &format).await?;
            }

            Commands::Summary { filter, format } => {
                let filter = parse_filter(&filter)?;
                let report = service.summary(filter).await?;
                print_summary(&report, &format)?;
            }

            Commands::Export {
                filter,
                format,
                output,
            } => {
                let filter = parse_filter(&filter)?;
                run_export_command(&service, filter, &format, output).await?;
            }
        }

        Ok(())
    }
}

fn parse_filter(s: &str) -> Result<FilterWindow> {
    FilterWindow::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid filter '{}'. Use: all, week, month", s))
}

async fn run_edit_command(
    service: &LedgerService,
    id: ExpenseId,
    amount: Option<String>,
    category: Option<String>,
    note: Option<String>,
) -> Result<()> {
    let current = service.get_expense(id).await?;

    let mut state = AppState::default();
    state.start_edit(&current);
    if let Some(amount) = amount {
        state.form.amount = amount;
    }
    if let Some(category) = category {
        state.form.category = category;
    }
    if let Some(note) = note {
        state.form.note = note;
    }

    let expense = service.submit(&mut state).await?;
    println!(
        "Updated expense #{}: {} {} ({})",
        expense.id,
        expense.formatted_amount(),
        expense.category,
        expense.date
    );
    print_totals_line(&state);
    Ok(())
}

async fn run_list_command(
    service: &LedgerService,
    filter: FilterWindow,
    format: &str,
) -> Result<()> {
    let mut state = AppState::new(filter);
    service.refresh(&mut state).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&state.expenses)?);
        }
        "csv" => {
            write_csv(&state.expenses, std::io::stdout().lock())?;
        }
        _ => {
            println!("Expenses ({})", state.filter_label());
            if state.expenses.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!(
                "{:<6} {:<10} {:>10}  {:<20} {}",
                "ID", "DATE", "AMOUNT", "CATEGORY", "NOTE"
            );
            println!("{}", "-".repeat(70));
            for expense in &state.expenses {
                print_expense_row(expense);
            }
            println!("{}", "-".repeat(70));
            println!(
                "{:<17} {:>10}",
                "TOTAL",
                format_cents(state.totals.overall_total)
            );
        }
    }
    Ok(())
}

fn print_expense_row(expense: &Expense) {
    println!(
        "{:<6} {:<10} {:>10}  {:<20} {}",
        expense.id,
        expense.date,
        expense.formatted_amount(),
        truncate(&expense.category, 20),
        expense.note.as_deref().unwrap_or("")
    );
}

fn print_totals_line(state: &AppState) {
    println!(
        "{} total: {} across {} expense(s)",
        state.filter_label(),
        format_cents(state.totals.overall_total),
        state.expenses.len()
    );
}

fn print_summary(report: &SummaryReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        "csv" => {
            write_summary_csv(report, std::io::stdout().lock())?;
        }
        _ => {
            println!("Spending by Category ({})", report.filter.label());
            match report.from_date {
                Some(from) => println!("Period: {} to {}", from, report.as_of),
                None => println!("Period: all time"),
            }
            println!();

            if report.categories.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!(
                "{:<20} {:>12} {:>6} {:>8}",
                "CATEGORY", "TOTAL", "COUNT", "PERCENT"
            );
            println!("{}", "-".repeat(49));
            for cat in &report.categories {
                println!(
                    "{:<20} {:>12} {:>6} {:>7.1}%",
                    truncate(&cat.category, 20),
                    format_cents(cat.total),
                    cat.count,
                    cat.percentage
                );
            }
            println!("{}", "-".repeat(49));
            println!("{:<20} {:>12} {:>6}", "TOTAL", format_cents(report.total), report.count);

            println!();
            let bars: Vec<(String, Cents)> = report
                .categories
                .iter()
                .map(|cat| (cat.category.clone(), cat.total))
                .collect();
            for line in render_bar_chart(&bars, CHART_WIDTH) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    filter: FilterWindow,
    format: &str,
    output: Option<String>,
) -> Result<()> {
    let writer: Box<dyn std::io::Write> = match &output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let exporter = Exporter::new(service);
    let count = match format {
        "csv" => exporter.export_csv(filter, writer).await?,
        "json" => exporter.export_json(filter, writer).await?.expenses.len(),
        other => anyhow::bail!("Unsupported export format '{}'. Use: csv, json", other),
    };

    if let Some(path) = output {
        eprintln!("Exported {} expense(s) to {}", count, path);
    }
    Ok(())
}

/// Render horizontal bars scaled so the largest value spans `width` cells.
fn render_bar_chart(bars: &[(String, Cents)], width: usize) -> Vec<String> {
    let max = bars.iter().map(|(_, value)| *value).max().unwrap_or(0);
    if max <= 0 {
        return Vec::new();
    }

    bars.iter()
        .map(|(label, value)| {
            let len = ((*value).max(0) as f64 / max as f64 * width as f64).round() as usize;
            format!(
                "{:<20} {:<width$} {}",
                truncate(label, 20),
                "#".repeat(len),
                format_cents(*value),
                width = width
            )
        })
        .collect()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_scales_to_largest() {
        let bars = vec![("Books".to_string(), 4000), ("Food".to_string(), 1000)];
        let lines = render_bar_chart(&bars, 8);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("########"));
        assert!(lines[0].ends_with("40.00"));
        assert!(lines[1].contains("## "));
        assert!(!lines[1].contains("###"));
    }

    #[test]
    fn test_bar_chart_empty() {
        assert!(render_bar_chart(&[], 10).is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Food", 20), "Food");
        assert_eq!(truncate("Groceries and household", 10), "Groceri...");
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("month").unwrap(), FilterWindow::ThisMonth);
        assert!(parse_filter("decade").is_err());
    }
}
