use daybook::cli::run_cli;

fn main() {
    // Tracing starts inside the shell once the config's log filter is known.
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
