use crate::export::SheetFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for almoco
/// Daily lunch attendance form: web server and admin tools
#[derive(Parser)]
#[command(
    name = "almoco",
    version = env!("CARGO_PKG_VERSION"),
    about = "Lunch attendance form: students answer SIM/NAO per day, admins export reports",
    long_about = None
)]
pub struct Cli {
    /// Override the SQLite database path (useful for tests or a custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, help = "Bind address (overrides HOST)")]
        host: Option<String>,

        #[arg(long, help = "Port (overrides PORT)")]
        port: Option<u16>,
    },

    /// Create the data directory, the configuration file and the database
    Init,

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration (token masked)")]
        print_config: bool,
    },

    /// Import the student roster from a CSV file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export responses as CSV
    Export {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        #[arg(
            long,
            value_name = "DATE",
            help = "Day to export (YYYY-MM-DD) or 'all'; defaults to today"
        )]
        date: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Generate the weekly spreadsheet of one class
    Planilha {
        #[arg(long, help = "Class, e.g. 'TIN I' or 'Informática 1'")]
        turma: String,

        #[arg(long, value_name = "DATE", help = "Any day of the week; defaults to today")]
        week: Option<String>,

        #[arg(long, value_enum, default_value = "ods")]
        format: SheetFormat,

        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export the weekly board (SIM counts per class and weekday)
    Quadro {
        #[arg(long, value_name = "DATE", help = "Any day of the week; defaults to today")]
        week: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: SheetFormat,

        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database, or an XLSX snapshot
    Backup {
        #[arg(long, value_name = "FILE", required_unless_present = "xlsx")]
        file: Option<PathBuf>,

        #[arg(long)]
        compress: bool,

        #[arg(long, help = "Write the XLSX snapshot into <data_dir>/backups instead")]
        xlsx: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Copy the SQLite database into PostgreSQL (DATABASE_URL)
    Migrate,

    /// Database maintenance (integrity checks, info, vacuum)
    Db {
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

        #[arg(long, default_value_t = 200, help = "Number of newest rows to show")]
        limit: i64,
    },
}
