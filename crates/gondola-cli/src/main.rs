mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gondola",
    version,
    about = "Label audit tool for retail price verification"
)]
struct Cli {
    /// Path to the audit database file
    #[arg(long, global = true, default_value = "gondola.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a vendor price spreadsheet (CSV) into a new audit
    Ingest {
        /// Path to the exported CSV file
        file: PathBuf,

        /// Audit title
        #[arg(short, long)]
        title: String,

        /// Reference date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// User requesting the audit
        #[arg(short, long)]
        user: String,

        /// Store identifier
        #[arg(long)]
        store_id: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List and inspect audits
    Audits {
        #[command(subcommand)]
        action: AuditsAction,
    },
    /// Record the shelf check result for one item
    Verify {
        /// Item id
        item_id: i64,

        /// Outcome: correct or divergent
        #[arg(short, long)]
        status: String,

        /// User who checked the shelf
        #[arg(short, long = "by")]
        by: String,

        /// Optional note (kept from the previous check when omitted)
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Mark an audit as completed
    Complete {
        /// Audit id
        audit_id: i64,
    },
    /// Aggregate divergence figures across audits in a date range
    Aggregate {
        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Filter items by exact product description
        #[arg(short, long)]
        product: Option<String>,

        /// Filter items by verifying user
        #[arg(short, long)]
        auditor: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Produce the report for one audit
    Report {
        /// Audit id
        audit_id: i64,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

#[derive(Subcommand)]
enum AuditsAction {
    /// List all audits with progress counters
    List,
    /// Show one audit with all its items
    Show {
        /// Audit id
        audit_id: i64,
    },
    /// Show only the items still waiting for a shelf check
    Pending {
        /// Audit id
        audit_id: i64,
    },
    /// Delete an audit and all its items
    Delete {
        /// Audit id
        audit_id: i64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ingest {
            file,
            title,
            date,
            user,
            store_id,
            notes,
        } => commands::ingest::run(&cli.db, file, title, &date, user, store_id, notes).await,
        Commands::Audits { action } => match action {
            AuditsAction::List => commands::audits::list(&cli.db).await,
            AuditsAction::Show { audit_id } => commands::audits::show(&cli.db, audit_id).await,
            AuditsAction::Pending { audit_id } => {
                commands::audits::pending(&cli.db, audit_id).await
            }
            AuditsAction::Delete { audit_id } => {
                commands::audits::delete(&cli.db, audit_id).await
            }
        },
        Commands::Verify {
            item_id,
            status,
            by,
            note,
        } => commands::verify::run(&cli.db, item_id, &status, &by, note.as_deref()).await,
        Commands::Complete { audit_id } => commands::verify::complete(&cli.db, audit_id).await,
        Commands::Aggregate {
            from,
            to,
            product,
            auditor,
            output,
        } => commands::aggregate::run(&cli.db, &from, &to, product, auditor, &output).await,
        Commands::Report { audit_id, output } => {
            commands::report::run(&cli.db, audit_id, &output).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
