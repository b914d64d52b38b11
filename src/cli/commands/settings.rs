use daybook_core::StaticRateTable;
use daybook_domain::{CurrencyCode, SettingsPatch};

use crate::cli::commands::{require_args, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::currency::{currency_name, symbol_for};

const PROFILE_USAGE: &str = "profile <name> <business>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "currency",
            "Show supported currencies or switch the active one",
            "currency [CODE]",
            cmd_currency,
        ),
        CommandDefinition::new(
            "profile",
            "Set the owner and business names",
            PROFILE_USAGE,
            cmd_profile,
        ),
        CommandDefinition::new(
            "reset",
            "Erase all data except the profile",
            "reset",
            cmd_reset,
        ),
        CommandDefinition::new(
            "audit",
            "Check stored totals against their transactions",
            "audit",
            cmd_audit,
        ),
    ]
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let table = StaticRateTable::new();
    let Some(raw) = args.first() else {
        let active = context.store.state().settings.currency.clone();
        output_section(format!("Currency: {active}"));
        for code in table.supported_codes() {
            let marker = if code == active { "*" } else { " " };
            io::print_info(format!(
                " {marker} {:<4} {:<3} {}",
                code,
                symbol_for(code.as_str()),
                currency_name(code.as_str()).unwrap_or("")
            ));
        }
        return Ok(());
    };

    let code = CurrencyCode::new(*raw);
    if !table.supports(&code) {
        io::print_warning(format!(
            "No exchange rate for {code}; amounts keep their current values."
        ));
    }
    context.store.update_settings(&SettingsPatch::currency(code.clone()));
    io::print_success(format!("Currency set to {code}."));
    context.warn_if_unsaved();
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, PROFILE_USAGE)?;
    let business = args[1..].join(" ");
    context
        .store
        .update_settings(&SettingsPatch::profile(args[0], business.clone()));
    io::print_success(format!("Profile saved for {} ({business}).", args[0]));
    context.warn_if_unsaved();
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Erase all logs, transactions and debts?")? {
        io::print_info("Reset cancelled.");
        return Ok(());
    }
    context.store.reset_data();
    io::print_success("All data cleared. Your profile was kept.");
    context.warn_if_unsaved();
    Ok(())
}

fn cmd_audit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let findings = context.store.audit();
    output_section("Audit");
    if findings.is_empty() {
        io::print_success("No inconsistencies found.");
    }
    for finding in findings {
        io::print_warning(finding);
    }
    Ok(())
}
