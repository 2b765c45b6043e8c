use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for kiemke
#[derive(Parser)]
#[command(
    name = "kiemke",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inventory check-in tracker: report your count status, follow per-department progress",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (roster, ledger, audit log and session files)
    #[arg(global = true, long = "data-dir")]
    pub data_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and data directory
    Init {
        /// Secret used to sign session tokens
        #[arg(long = "secret")]
        secret: Option<String>,
    },

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Editor to use (overrides $EDITOR/$VISUAL)
        #[arg(long = "editor")]
        editor: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal audit log")]
        print: bool,
    },

    /// Import or inspect the employee roster
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Log in with employee id and password
    Login {
        #[arg(long = "id")]
        id: String,

        #[arg(long = "password")]
        password: String,
    },

    /// Close the current session
    Logout,

    /// Show the identity of the current session
    Whoami,

    /// Show your current inventory-count status
    Status,

    /// Report your inventory-count status
    Checkin {
        /// IN_PROGRESS, CROSS_CHECKING or COMPLETED
        status: String,
    },

    /// Show your check-in history
    History,

    /// Per-department progress (administrators)
    Dashboard {
        /// Print the stats as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export check-in records (administrators)
    Export {
        /// Restrict the export to one department
        #[arg(long, short = 'd', value_name = "DEPARTMENT")]
        department: Option<String>,

        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (default: KQ_<department>.<ext> in the working directory)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        /// Export only the latest event of each employee
        #[arg(long)]
        latest: bool,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Listening port (overrides config and $PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// Replace the roster with a CSV file or an XLSX workbook (first sheet)
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// List employees with their current status (administrators)
    List {
        #[arg(long, short = 'd', value_name = "DEPARTMENT")]
        department: Option<String>,
    },
}
