use daybook_domain::{DebtKind, DebtPatch, NewDebt};

use crate::cli::commands::{require_args, CommandDefinition};
use crate::cli::core::{
    parse_amount, parse_assignments, short_id, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;

const ADD_USAGE: &str = "debt-add <owed_to_me|i_owe> <amount> <name> [notes...]";
const EDIT_USAGE: &str = "debt-edit <id> [name=..] [amount=..] [type=..] [notes=..]";
const DELETE_USAGE: &str = "debt-delete <id>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("debt-add", "Track money owed", ADD_USAGE, cmd_debt_add),
        CommandDefinition::new("debt-edit", "Change a tracked debt", EDIT_USAGE, cmd_debt_edit),
        CommandDefinition::new("debt-delete", "Stop tracking a debt", DELETE_USAGE, cmd_debt_delete),
        CommandDefinition::new("debts", "List debts and their totals", "debts", cmd_debts),
    ]
}

fn parse_kind(raw: &str) -> Result<DebtKind, CommandError> {
    raw.parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))
}

fn cmd_debt_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, ADD_USAGE)?;
    let kind = parse_kind(args[0])?;
    let amount = parse_amount(args[1])?;
    let mut entry = NewDebt::new(args[2], amount, kind);
    if args.len() > 3 {
        entry = entry.with_notes(args[3..].join(" "));
    }

    let id = context.store.add_debt(entry)?;
    io::print_success(format!(
        "Tracking {} with {} ({}).",
        context.money(amount),
        args[2],
        short_id(id)
    ));
    context.warn_if_unsaved();
    Ok(())
}

fn cmd_debt_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, EDIT_USAGE)?;
    let id = context.resolve_debt(args[0])?;

    let mut patch = DebtPatch::default();
    for (key, value) in parse_assignments(&args[1..])? {
        match key.as_str() {
            "name" => patch.contact_name = Some(value.to_string()),
            "amount" => patch.amount = Some(parse_amount(value)?),
            "type" | "kind" => patch.kind = Some(parse_kind(value)?),
            "notes" => {
                patch.notes = Some(Some(value.to_string()).filter(|notes| !notes.trim().is_empty()))
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}`; expected name, amount, type or notes"
                )))
            }
        }
    }

    if context.store.update_debt(id, &patch)? {
        io::print_success(format!("Updated debt {}.", short_id(id)));
        context.warn_if_unsaved();
    } else {
        io::print_warning("Debt not found; nothing changed.");
    }
    Ok(())
}

fn cmd_debt_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, DELETE_USAGE)?;
    let id = context.resolve_debt(args[0])?;
    if !context.confirm(&format!("Delete debt {}?", short_id(id)))? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    if context.store.delete_debt(id) {
        io::print_success(format!("Deleted debt {}.", short_id(id)));
        context.warn_if_unsaved();
    } else {
        io::print_warning("Debt not found; nothing changed.");
    }
    Ok(())
}

fn cmd_debts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.store.state();
    output_section("Debts");
    if state.debts.is_empty() {
        io::print_info("No debts tracked.");
    }
    for debt in &state.debts {
        let notes = debt.notes.as_deref().unwrap_or("");
        io::print_info(format!(
            "  {} {:<10} {:<20} {:>14}  {}",
            short_id(debt.id),
            debt.kind,
            debt.contact_name,
            context.money(debt.amount),
            notes
        ));
    }

    let totals = context.store.debt_totals();
    io::print_info(format!("Owed to me : {}", context.money(totals.owed_to_me)));
    io::print_info(format!("I owe      : {}", context.money(totals.i_owe)));
    io::print_info(format!("Net        : {}", context.money(totals.net)));
    Ok(())
}
