use chrono::{Local, NaiveDate};
use daybook_domain::{NewTransaction, PaymentMethod, Transaction, TransactionKind, TransactionPatch};

use crate::cli::commands::{require_args, CommandDefinition};
use crate::cli::core::{
    parse_amount, parse_assignments, short_id, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;

const ADD_USAGE: &str = "add <income|expense> <amount> <cash|card|transfer> <description...>";
const EDIT_USAGE: &str = "edit <id> [kind=..] [amount=..] [method=..] [desc=..]";
const DELETE_USAGE: &str = "delete <id>";
const SUGGEST_USAGE: &str = "suggest <text...>";
const SUGGESTION_LIMIT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record a transaction for today", ADD_USAGE, cmd_add),
        CommandDefinition::new("edit", "Change a recorded transaction", EDIT_USAGE, cmd_edit),
        CommandDefinition::new("delete", "Remove a transaction", DELETE_USAGE, cmd_delete),
        CommandDefinition::new(
            "list",
            "List today's transactions, or those of a given day",
            "list [YYYY-MM-DD]",
            cmd_list,
        ),
        CommandDefinition::new(
            "suggest",
            "Suggest past descriptions similar to the text",
            SUGGEST_USAGE,
            cmd_suggest,
        ),
    ]
}

fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    raw.parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))
}

fn parse_method(raw: &str) -> Result<PaymentMethod, CommandError> {
    raw.parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, ADD_USAGE)?;
    let kind = parse_kind(args[0])?;
    let amount = parse_amount(args[1])?;
    let method = parse_method(args[2])?;
    let description = args[3..].join(" ");

    let entry = NewTransaction::new(kind, amount, method, description);
    let id = context.store.add_transaction(entry)?;
    io::print_success(format!(
        "Recorded {kind} of {} ({}).",
        context.money(amount),
        short_id(id)
    ));
    context.warn_if_unsaved();
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, EDIT_USAGE)?;
    let id = context.resolve_transaction(args[0])?;

    let mut patch = TransactionPatch::default();
    for (key, value) in parse_assignments(&args[1..])? {
        match key.as_str() {
            "kind" | "type" => patch.kind = Some(parse_kind(value)?),
            "amount" => patch.amount = Some(parse_amount(value)?),
            "method" => patch.payment_method = Some(parse_method(value)?),
            "desc" | "description" => patch.description = Some(value.to_string()),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}`; expected kind, amount, method or desc"
                )))
            }
        }
    }

    if context.store.update_transaction(id, &patch)? {
        io::print_success(format!("Updated transaction {}.", short_id(id)));
        context.warn_if_unsaved();
    } else {
        io::print_warning("Transaction not found; nothing changed.");
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, DELETE_USAGE)?;
    let id = context.resolve_transaction(args[0])?;
    if !context.confirm(&format!("Delete transaction {}?", short_id(id)))? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    if context.store.delete_transaction(id) {
        io::print_success(format!("Deleted transaction {}.", short_id(id)));
        context.warn_if_unsaved();
    } else {
        io::print_warning("Transaction not found; nothing changed.");
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (day, transactions) = match args.first() {
        Some(raw) => {
            let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date"))
            })?;
            (day, context.store.transactions_for(day))
        }
        None => (context.store.today(), context.store.todays_transactions()),
    };

    output_section(format!("Transactions for {day}"));
    if transactions.is_empty() {
        io::print_info("No transactions.");
        return Ok(());
    }
    for txn in &transactions {
        io::print_info(render_row(context, txn));
    }
    Ok(())
}

fn render_row(context: &ShellContext, txn: &Transaction) -> String {
    format!(
        "  {} {} {:<7} {:<8} {:>14}  {}",
        short_id(txn.id),
        txn.timestamp.with_timezone(&Local).format("%H:%M"),
        txn.kind,
        txn.payment_method,
        context.money(txn.amount),
        txn.description
    )
}

fn cmd_suggest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, SUGGEST_USAGE)?;
    let input = args.join(" ");
    let suggestions = context.store.suggest_descriptions(&input, SUGGESTION_LIMIT);
    if suggestions.is_empty() {
        io::print_info("No suggestions.");
    }
    for suggestion in suggestions {
        io::print_info(format!("  {suggestion}"));
    }
    Ok(())
}
