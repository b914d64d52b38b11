use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block as output_block, section as output_section};
use crate::report;

const SAVE_FLAG: &str = "--save";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "weekly",
            "List past weeks, or print one week's report",
            "weekly [YYYY-Www] [--save]",
            cmd_weekly,
        ),
        CommandDefinition::new(
            "report",
            "Print the daily report for today or a given day",
            "report [YYYY-MM-DD] [--save]",
            cmd_report,
        ),
    ]
}

/// Splits off the `--save` flag, wherever it appears.
fn split_save_flag<'a>(args: &[&'a str]) -> (bool, Vec<&'a str>) {
    let save = args.iter().any(|arg| *arg == SAVE_FLAG);
    let rest = args.iter().copied().filter(|arg| *arg != SAVE_FLAG).collect();
    (save, rest)
}

fn cmd_weekly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (save, rest) = split_save_flag(args);
    let weeks = context.store.weekly_summaries();

    let Some(wanted) = rest.first() else {
        output_section("Weekly summaries");
        if weeks.is_empty() {
            io::print_info("No completed days yet.");
        }
        for week in &weeks {
            io::print_info(format!(
                "  {}  {} .. {}  income {}  expenses {}  profit {}",
                week.week_id,
                week.start,
                week.end,
                context.money(week.total_income),
                context.money(week.total_expenses),
                context.money(week.profit)
            ));
        }
        return Ok(());
    };

    let week = weeks
        .iter()
        .find(|week| week.week_id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CommandError::Message(format!("no summary for week `{wanted}`")))?;
    let settings = context.store.state().settings.clone();
    let text = report::weekly_report(week, &settings);
    output_block(&text);
    if save {
        write_report(context, &report::weekly_report_file_name(week), &text)?;
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (save, rest) = split_save_flag(args);
    let day = match rest.first() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date"))
        })?,
        None => context.store.today(),
    };

    let state = context.store.state();
    let log = state
        .log(day)
        .ok_or_else(|| CommandError::Message(format!("no log for {day}")))?;
    let mut transactions = context.store.transactions_for(day);
    transactions.sort_by_key(|txn| txn.timestamp);

    let text = report::daily_report(log, &transactions, &state.settings);
    output_block(&text);
    if save {
        write_report(context, &report::daily_report_file_name(day), &text)?;
    }
    Ok(())
}

fn write_report(context: &ShellContext, file_name: &str, text: &str) -> CommandResult {
    let dir: PathBuf = context.config.resolve_data_dir().join("reports");
    fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    fs::write(&path, text)?;
    io::print_success(format!("Report written to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_flag_is_removed_from_positional_args() {
        let (save, rest) = split_save_flag(&["--save", "2024-02-19"]);
        assert!(save);
        assert_eq!(rest, vec!["2024-02-19"]);

        let (save, rest) = split_save_flag(&["2024-W08"]);
        assert!(!save);
        assert_eq!(rest, vec!["2024-W08"]);
    }
}
