use crate::cli::commands::{require_args, CommandDefinition};
use crate::cli::core::{parse_amount, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

const START_USAGE: &str = "start-day <opening-cash>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("status", "Show today's log", "status", cmd_status),
        CommandDefinition::new(
            "start-day",
            "Open today's log with the cash on hand",
            START_USAGE,
            cmd_start_day,
        ),
        CommandDefinition::new(
            "end-day",
            "Close today's log and freeze its figures",
            "end-day",
            cmd_end_day,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.store.state();
    let today = context.store.today();
    output_section(format!(
        "{} ({})",
        state.settings.profile.business_name, state.settings.currency
    ));

    let Some(log) = state.log(today) else {
        io::print_info(format!("{today}: day not started."));
        return Ok(());
    };
    io::print_info(format!("{today}: {}", log.status));
    io::print_info(format!("  Opening cash  : {}", context.money(log.opening_cash)));
    io::print_info(format!("  Income        : {}", context.money(log.total_income)));
    io::print_info(format!("  Expenses      : {}", context.money(log.total_expenses)));
    let profit = log.profit.unwrap_or_else(|| log.live_profit());
    let closing = log.closing_cash.unwrap_or_else(|| log.live_closing_cash());
    io::print_info(format!("  Profit        : {}", context.money(profit)));
    io::print_info(format!("  Cash on hand  : {}", context.money(closing)));
    io::print_info(format!("  Transactions  : {}", log.transaction_ids.len()));
    Ok(())
}

fn cmd_start_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, START_USAGE)?;
    let cash = parse_amount(args[0])?;
    if context.store.start_day(cash)? {
        io::print_success(format!(
            "Day started with {} in the till.",
            context.money(cash)
        ));
        context.warn_if_unsaved();
    } else {
        io::print_warning("Today's log already exists; nothing changed.");
    }
    Ok(())
}

fn cmd_end_day(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.store.end_day() {
        Some(log) => {
            io::print_success(format!(
                "Day closed. Profit {}, closing cash {}.",
                context.money(log.profit.unwrap_or_default()),
                context.money(log.closing_cash.unwrap_or_default())
            ));
            context.warn_if_unsaved();
        }
        None => io::print_warning("No open day to close."),
    }
    Ok(())
}
