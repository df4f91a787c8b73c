use clap::Parser;
use tracing_subscriber::EnvFilter;

use titanvault::cli::commands;
use titanvault::cli::{output, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Add(ref args) => commands::add::execute(&cli, args),
        Commands::List {
            kind,
            ref category,
            favorites,
        } => commands::list::execute(&cli, kind, category.as_deref(), favorites),
        Commands::Show { ref query, reveal } => commands::show::execute(&cli, query, reveal),
        Commands::Delete { ref query, force } => commands::delete::execute(&cli, query, force),
        Commands::Passwd => commands::passwd::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::Export { ref output_dir } => {
            commands::export::execute(&cli, output_dir.as_deref())
        }
        Commands::Import { ref file, force } => commands::import_cmd::execute(&cli, file, force),
        Commands::Purge { force } => commands::purge::execute(&cli, force),
        Commands::Generate(ref args) => commands::generate::execute(args),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        if e.is_corruption() {
            output::tip("The stored vault is damaged. Restore a backup with `titanvault import <FILE>`.");
        }
        std::process::exit(1);
    }
}

/// Log to stderr.  `RUST_LOG` overrides; otherwise `--verbose` shows every
/// seal/open step and the default shows warnings only.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("titanvault={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
