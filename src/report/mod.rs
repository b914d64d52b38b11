//! Plain-text daily and weekly reports.

use std::fmt::Write;

use chrono::{Local, NaiveDate};
use daybook_domain::{DailyLog, Settings, Transaction, WeeklySummary};

use crate::currency::format_amount;

const RULE_WIDTH: usize = 60;

/// Suggested file name for an exported report.
pub fn daily_report_file_name(day: NaiveDate) -> String {
    format!("daybook-daily-report-{day}.txt")
}

pub fn weekly_report_file_name(week: &WeeklySummary) -> String {
    format!("daybook-weekly-report-{}.txt", week.week_id)
}

/// `transactions` are listed in the order given.
pub fn daily_report(log: &DailyLog, transactions: &[Transaction], settings: &Settings) -> String {
    let money = |amount: f64| format_amount(amount, &settings.currency);
    let mut out = String::new();

    push_line(&mut out, &format!("Daily Report: {}", log.id.format("%A, %B %d, %Y")));
    push_line(&mut out, &format!("Business: {}", settings.profile.business_name));
    push_line(&mut out, &format!("Status: {}", log.status));
    push_line(&mut out, &"=".repeat(RULE_WIDTH));

    let profit = log.profit.unwrap_or_else(|| log.live_profit());
    let closing = log.closing_cash.unwrap_or_else(|| log.live_closing_cash());
    for (label, amount) in [
        ("Opening Cash", log.opening_cash),
        ("Total Income", log.total_income),
        ("Total Expenses", log.total_expenses),
        ("Profit", profit),
        ("Closing Cash", closing),
    ] {
        push_line(&mut out, &format!("{label:<20}{:>20}", money(amount)));
    }

    push_line(&mut out, "");
    push_line(&mut out, "Transactions");
    push_line(&mut out, &"-".repeat(RULE_WIDTH));
    if transactions.is_empty() {
        push_line(&mut out, "No transactions recorded.");
    } else {
        push_transaction_table(&mut out, transactions, settings);
    }
    out
}

/// Transactions are grouped under the day of the log that recorded them.
pub fn weekly_report(week: &WeeklySummary, settings: &Settings) -> String {
    let money = |amount: f64| format_amount(amount, &settings.currency);
    let mut out = String::new();

    push_line(
        &mut out,
        &format!(
            "Weekly Report: {} - {}",
            week.start.format("%b %-d"),
            week.end.format("%-d, %Y")
        ),
    );
    push_line(&mut out, &format!("Week: {}", week.week_id));
    push_line(&mut out, &format!("Business: {}", settings.profile.business_name));
    push_line(&mut out, &"=".repeat(RULE_WIDTH));
    for (label, amount) in [
        ("Total Income", week.total_income),
        ("Total Expenses", week.total_expenses),
        ("Net Profit", week.profit),
    ] {
        push_line(&mut out, &format!("{label:<20}{:>20}", money(amount)));
    }

    if !week.days.is_empty() {
        push_line(&mut out, "");
        push_line(&mut out, "Transactions by Day");
    }
    for (day, transactions) in &week.days {
        push_line(&mut out, "");
        push_line(&mut out, &day.format("%A, %B %d, %Y").to_string());
        push_line(&mut out, &"-".repeat(RULE_WIDTH));
        push_transaction_table(&mut out, transactions, settings);
    }
    out
}

fn push_transaction_table(out: &mut String, transactions: &[Transaction], settings: &Settings) {
    push_line(
        out,
        &format!("{:<6} {:<22} {:<8} {:<9} {:>12}", "Time", "Description", "Type", "Method", "Amount"),
    );
    for txn in transactions {
        push_line(
            out,
            &format!(
                "{:<6} {:<22} {:<8} {:<9} {:>12}",
                txn.timestamp.with_timezone(&Local).format("%H:%M"),
                truncate(&txn.description, 22),
                txn.kind,
                txn.payment_method,
                format_amount(txn.amount, &settings.currency)
            ),
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn push_line(out: &mut String, line: &str) {
    let _ = writeln!(out, "{line}");
}
