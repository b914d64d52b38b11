use std::{
    fmt,
    io::{self, BufRead},
};

use daybook_core::StaticRateTable;
use daybook_domain::{CurrencyCode, DailyLog, DayStatus};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::commands::CommandRegistry;
use crate::cli::core::{short_id, CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::info as output_info;
use crate::currency::format_amount;

/// Set to run commands read from stdin without prompts or confirmations.
pub const SCRIPT_MODE_ENV: &str = "DAYBOOK_CLI_SCRIPT";

const TRANSACTION_KINDS: &[&str] = &["income", "expense"];
const PAYMENT_METHODS: &[&str] = &["cash", "card", "transfer"];
const DEBT_KINDS: &[&str] = &["owed_to_me", "i_owe"];
const TRANSACTION_FIELDS: &[&str] = &["kind=", "amount=", "method=", "desc="];
const DEBT_FIELDS: &[&str] = &["name=", "amount=", "type=", "notes="];
const REPORT_FLAGS: &[&str] = &["--save"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        // Ids change with every command, so completion is rebuilt per line.
        if let Some(helper) = editor.helper_mut() {
            helper.refresh(context);
        }
        let today = context.store.todays_log();
        let currency = context.store.state().settings.currency.clone();
        let prompt = shell_prompt(today.as_ref(), &currency);

        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(log) = context.store.todays_log() {
        if log.status == DayStatus::Open {
            cli_io::print_hint(format!(
                "Day {} is still open; run `end-day` to close it.",
                log.id
            ));
        }
    }
    context.warn_if_unsaved();
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// `daybook (no day)> ` until today is started, then the date with the live
/// cash on hand, or `closed` once the day is ended.
fn shell_prompt(today: Option<&DailyLog>, currency: &CurrencyCode) -> String {
    match today {
        None => "daybook (no day)> ".to_string(),
        Some(log) if log.status == DayStatus::Closed => {
            format!("daybook {} closed> ", log.id)
        }
        Some(log) => format!(
            "daybook {} {}> ",
            log.id,
            format_amount(log.live_closing_cash(), currency)
        ),
    }
}

/// Completes command names, then each command's arguments: enum words,
/// `key=` fields, currency codes, and the short ids of today's transactions
/// and of tracked debts.
struct CommandHelper {
    commands: Vec<&'static str>,
    usages: Vec<(&'static str, &'static str)>,
    currencies: Vec<String>,
    transaction_ids: Vec<String>,
    debt_ids: Vec<String>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<&'static str> = registry.names().collect();
        commands.sort_unstable();
        commands.dedup();
        let usages = registry.iter().map(|def| (def.name, def.usage)).collect();
        let mut currencies: Vec<String> = StaticRateTable::new()
            .supported_codes()
            .into_iter()
            .map(|code| code.as_str().to_string())
            .collect();
        currencies.sort();
        Self {
            commands,
            usages,
            currencies,
            transaction_ids: Vec::new(),
            debt_ids: Vec::new(),
        }
    }

    fn refresh(&mut self, context: &ShellContext) {
        self.transaction_ids = context
            .store
            .todays_transactions()
            .into_iter()
            .map(|txn| short_id(txn.id))
            .collect();
        self.debt_ids = context
            .store
            .state()
            .debts
            .iter()
            .map(|debt| short_id(debt.id))
            .collect();
    }

    /// Words allowed at argument `position` (0 is the command itself).
    fn words_for(&self, command: &str, position: usize) -> Vec<&str> {
        match (command, position) {
            (_, 0) => self.commands.clone(),
            ("add", 1) => TRANSACTION_KINDS.to_vec(),
            ("add", 3) => PAYMENT_METHODS.to_vec(),
            ("edit" | "delete", 1) => as_strs(&self.transaction_ids),
            ("edit", _) => TRANSACTION_FIELDS.to_vec(),
            ("debt-add", 1) => DEBT_KINDS.to_vec(),
            ("debt-edit" | "debt-delete", 1) => as_strs(&self.debt_ids),
            ("debt-edit", _) => DEBT_FIELDS.to_vec(),
            ("currency", 1) => as_strs(&self.currencies),
            ("report" | "weekly", _) => REPORT_FLAGS.to_vec(),
            ("help", 1) => self.commands.clone(),
            _ => Vec::new(),
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let finished: Vec<&str> = prefix[..start].split_whitespace().collect();
        let command = finished
            .first()
            .map(|word| word.to_ascii_lowercase())
            .unwrap_or_default();

        let raw = &prefix[start..];
        let (needle, case_folded) = if finished.is_empty() || command == "currency" {
            (raw.to_ascii_lowercase(), true)
        } else {
            (raw.to_string(), false)
        };
        let matches = self
            .words_for(&command, finished.len())
            .into_iter()
            .filter(|word| {
                if case_folded {
                    word.to_ascii_lowercase().starts_with(&needle)
                } else {
                    word.starts_with(&needle)
                }
            })
            .map(str::to_string)
            .collect();
        (start, matches)
    }

    /// Remaining usage text once the command name and a space are typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        let command = command.to_ascii_lowercase();
        self.usages
            .iter()
            .find(|(name, _)| *name == command)
            .and_then(|(_, usage)| usage.strip_prefix(command.as_str()))
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

fn as_strs(words: &[String]) -> Vec<&str> {
    words.iter().map(String::as_str).collect()
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
