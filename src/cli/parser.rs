use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for qrattend
#[derive(Parser)]
#[command(
    name = "qrattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "Student attendance by classroom QR code: validate session tokens and record one attendance per day",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where scanned payloads come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PayloadSource {
    /// Decoded QR payload (repeat for several codes found in one frame)
    #[arg(long = "payload", value_name = "TEXT")]
    pub payloads: Vec<String>,

    /// File with one decoded payload per line ("-" reads stdin)
    #[arg(long = "payload-file", value_name = "FILE")]
    pub payload_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Log in as a registered student
    Login {
        #[arg(long = "name", help = "Student name as registered")]
        name: String,

        #[arg(long = "email", help = "Parent's Gmail address")]
        email: String,
    },

    /// Log out and clear the saved session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Validate scanned QR payloads and record today's attendance
    Scan {
        #[arg(long = "session-id", help = "Session id announced by the teacher")]
        session_id: Option<String>,

        #[command(flatten)]
        source: PayloadSource,
    },

    /// Check a payload without recording anything
    Verify {
        payload: String,

        #[arg(long = "session-id", help = "Session id announced by the teacher")]
        session_id: Option<String>,
    },

    /// List the logged-in student's attendance
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "today", help = "Show only today's record")]
        today: bool,
    },

    /// Personal attendance statistics
    Stats {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export the logged-in student's attendance
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["qrattend", "scan", "--session-id", "A"]).is_err());
        assert!(
            Cli::try_parse_from([
                "qrattend",
                "scan",
                "--payload",
                "x",
                "--payload-file",
                "f"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from([
            "qrattend", "scan", "--session-id", "A", "--payload", "x", "--payload", "y",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan { session_id, source } => {
                assert_eq!(session_id.as_deref(), Some("A"));
                assert_eq!(source.payloads, vec!["x", "y"]);
                assert!(source.payload_file.is_none());
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn global_db_override() {
        let cli = Cli::try_parse_from(["qrattend", "whoami", "--db", "/tmp/x.sqlite"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/x.sqlite"));
    }
}
