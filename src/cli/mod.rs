pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::CaseLawError;

/// NSW Caselaw search and download tool
#[derive(Parser, Debug)]
#[command(
    name = "nswcaselaw",
    about = "Search and download decisions from NSW Caselaw (https://www.caselaw.nsw.gov.au)",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors, and hide progress spinners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (defaults depend on the command)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List courts or tribunals with the index numbers used by search
    #[command(alias = "l")]
    List(args::ListArgs),

    /// Search decisions and write the results, optionally downloading each decision
    #[command(alias = "s")]
    Search(args::SearchArgs),

    /// Download decisions listed in a CSV file
    #[command(alias = "f")]
    Fetch(args::FetchArgs),

    /// Parse a saved decision page and print the result
    #[command(alias = "p")]
    Parse(args::ParseArgs),

    /// Show the court and tribunal lists, optionally refreshed from the site
    Courts(args::CourtsArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    fn init_logging(&self) {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp_secs()
            .init();
    }

    /// Run the CLI application
    pub fn run() -> crate::error::Result<()> {
        let cli = Self::parse();
        cli.init_logging();

        let quiet = cli.quiet;
        let verbose = cli.verbose > 0;
        let result = match cli.command {
            Commands::List(args) => commands::list::execute(args, cli.format),
            Commands::Search(args) => commands::search::execute(args, cli.format, quiet, verbose),
            Commands::Fetch(args) => commands::fetch::execute(args, quiet, verbose),
            Commands::Parse(args) => commands::parse::execute(args, cli.format),
            Commands::Courts(args) => commands::courts::execute(args, cli.format),
            Commands::Config(args) => commands::config::execute(args),
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::generate_completions(shell);
                Ok(())
            }
        };

        if let Err(e) = &result {
            eprint!("{}", error_report(e, verbose));
        }
        result
    }
}

/// What the user sees on stderr when a command fails
pub fn error_report(error: &CaseLawError, verbose: bool) -> String {
    let mut report = String::new();
    match error {
        CaseLawError::Transport { url, page, .. } if verbose => {
            report.push_str(&format!("Error: {}\n", error));
            report.push_str(&format!("URL: {}\n", url));
            if let Some(page) = page {
                report.push_str(&format!("Result page: {}\n", page));
            }
        }
        CaseLawError::Parse(msg) => {
            report.push_str(&format!("Error parsing page: {}\n", msg));
            if !verbose {
                report.push_str("\nRun with --verbose for more details.\n");
            }
        }
        _ => report.push_str(&format!("Error: {}\n", error)),
    }
    if let Some(hint) = error.hint() {
        report.push_str(&format!("\nHint: {}\n", hint));
    }
    report
}
