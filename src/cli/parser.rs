use crate::core::calendar::CalendarView;
use crate::export::{ExportFormat, ExportKind};
use crate::models::EventType;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeboard
/// CLI application to track time per client, with a local SQLite cache
/// mirrored to a hosted table store
#[derive(Parser)]
#[command(
    name = "rtimeboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track time per client: sessions, a stopwatch and a calendar, cached locally and synced to a remote table store",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Work on the local cache only, without contacting the remote store
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local cache and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "check",
            help = "Report which settings are present or missing"
        )]
        check: bool,

        #[arg(long = "migrate", help = "Add missing keys to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage clients
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Log, edit or delete time sessions of a client
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage calendar events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Show the calendar
    Calendar {
        #[arg(long, value_enum, default_value = "month")]
        view: CalendarView,

        /// Reference date (YYYY-MM-DD, today, yesterday, tomorrow)
        #[arg(long)]
        date: Option<String>,

        /// Views to move forward (negative: backward) from the reference date
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },

    /// Interactive stopwatch bound to one client
    Timer {
        /// Client id or name to select
        #[arg(long)]
        client: Option<String>,

        /// Restart the client of the last saved timer session
        #[arg(long = "restart-last", conflicts_with = "client")]
        restart_last: bool,
    },

    /// Reload from the local cache and the remote store, then report
    Sync,

    /// Export sessions or calendar events
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, default_value = "sessions")]
        kind: ExportKind,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        /// Only rows of this client (id or name)
        #[arg(long)]
        client: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the local cache
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum ClientAction {
    /// Create a client
    Add { name: String },

    /// Rename a client
    Rename {
        /// Client id or current name
        client: String,
        name: String,
    },

    /// Delete a client (its calendar events are kept)
    Del {
        client: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List clients with their total hours
    List,

    /// Show a client's sessions and linked calendar events
    Show { client: String },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Log hours against a client (dated today)
    Add {
        client: String,

        #[arg(long)]
        hours: f64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change hours and description of a session
    Edit {
        client: String,

        /// Session position as shown by `client show` (1 = newest)
        #[arg(long)]
        pos: usize,

        #[arg(long)]
        hours: f64,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a session
    Del {
        client: String,

        #[arg(long)]
        pos: usize,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a calendar event
    Add {
        /// Date of the event (YYYY-MM-DD, today, yesterday, tomorrow)
        date: String,

        #[arg(long)]
        hours: f64,

        #[arg(long)]
        description: String,

        /// Linked client (id or name)
        #[arg(long)]
        client: Option<String>,

        #[arg(long = "start", help = "Start time (HH:MM)")]
        start_time: Option<String>,

        #[arg(long = "end", help = "End time (HH:MM)")]
        end_time: Option<String>,

        #[arg(long = "type", value_enum, default_value = "session")]
        kind: EventType,
    },

    /// Replace fields of an event; omitted options keep their value
    Edit {
        id: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        hours: Option<f64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        client: Option<String>,

        #[arg(long = "start")]
        start_time: Option<String>,

        #[arg(long = "end")]
        end_time: Option<String>,

        #[arg(long = "type", value_enum)]
        kind: Option<EventType>,
    },

    /// Delete an event
    Del { id: String },

    /// List events, optionally for one date or client
    List {
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        client: Option<String>,
    },
}
