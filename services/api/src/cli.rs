use crate::report::{run_list, run_show, ListArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_tracker::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Job Application Tracker",
    about = "Serve and inspect the job application tracker from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect tracked applications without starting the server
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// Print one summary line per application
    List(ListArgs),
    /// Print every field of a single application
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the JSON document holding the applications
    #[arg(long)]
    pub(crate) data_file: Option<PathBuf>,
    /// Keep applications in memory only; nothing is written to disk
    #[arg(long, conflicts_with = "data_file")]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Applications {
            command: ApplicationsCommand::List(args),
        } => run_list(args),
        Command::Applications {
            command: ApplicationsCommand::Show(args),
        } => run_show(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_tracker::applications::YearMonth;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["job-tracker-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_accepts_month_filter() {
        let cli = Cli::try_parse_from([
            "job-tracker-api",
            "applications",
            "list",
            "--month",
            "2024-03",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Applications {
                command: ApplicationsCommand::List(args),
            }) => assert_eq!(args.month, YearMonth::new(2024, 3)),
            other => panic!("expected list command, got {other:?}"),
        }
    }

    #[test]
    fn list_rejects_month_together_with_all() {
        let result = Cli::try_parse_from([
            "job-tracker-api",
            "applications",
            "list",
            "--month",
            "2024-03",
            "--all",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_rejects_in_memory_with_data_file() {
        let result = Cli::try_parse_from([
            "job-tracker-api",
            "serve",
            "--in-memory",
            "--data-file",
            "apps.json",
        ]);
        assert!(result.is_err());
    }
}
