use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use servicedesk::commands;
use servicedesk::commands::list::Filters;
use servicedesk::persist::DataFiles;
use servicedesk::store::RequestStore;

// Simple static gate for admin commands; nothing stronger by design.
const ADMIN_PIN: &str = "1234";

#[derive(Parser)]
#[command(name = "servicedesk")]
#[command(about = "A service request tracker with flat-file persistence")]
#[command(version)]
struct Cli {
    /// Directory holding the catalog files
    #[arg(long, env = "SERVICEDESK_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new service request
    Submit {
        /// Submitter email (account is created on first submission)
        #[arg(long)]
        email: String,
        /// Submitter name
        #[arg(long)]
        name: String,
        /// Submitter department
        #[arg(long, default_value = "")]
        department: String,
        /// Submitter phone
        #[arg(long, default_value = "")]
        phone: String,
        /// Request category
        #[arg(short, long)]
        category: String,
        /// Priority (CRITICAL, HIGH, MEDIUM, LOW)
        #[arg(short, long, default_value = "MEDIUM")]
        priority: String,
        /// Subject line
        #[arg(short, long)]
        subject: String,
        /// Free-text description (may be multi-line)
        #[arg(short, long)]
        description: String,
    },

    /// List requests
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
        /// Filter by submitter email
        #[arg(long)]
        user: Option<String>,
        /// Filter by assigned agent
        #[arg(long)]
        agent: Option<String>,
        /// Created on or after (yyyy-MM-dd or yyyy-MM-dd HH:mm:ss)
        #[arg(long)]
        from: Option<String>,
        /// Created on or before
        #[arg(long)]
        to: Option<String>,
        /// Sort order (created, priority, status, none)
        #[arg(long, default_value = "created")]
        sort: String,
    },

    /// Search requests by keyword or ticket id
    Search {
        /// Keyword, or a REQ-NNN ticket id
        query: String,
        /// Limit results to one submitter's requests
        #[arg(long)]
        user: Option<String>,
    },

    /// Show full details for one ticket
    Show {
        /// Ticket id
        ticket_id: String,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket id
        ticket_id: String,
        /// Comment text
        text: String,
        /// Name recorded with the comment
        #[arg(long, default_value = "Admin")]
        author: String,
    },

    /// Assign a ticket to an agent (admin)
    Assign {
        /// Ticket id
        ticket_id: String,
        /// Agent name
        agent: String,
        /// Admin PIN
        #[arg(long, env = "SERVICEDESK_PIN")]
        pin: String,
    },

    /// Update a ticket's status (admin)
    Status {
        /// Ticket id
        ticket_id: String,
        /// New status (OPEN, IN_PROGRESS, RESOLVED, CLOSED)
        status: String,
        /// Name recorded in the audit comment
        #[arg(long, default_value = "ADMIN")]
        actor: String,
        /// Resolution note, recorded when resolving
        #[arg(long)]
        note: Option<String>,
        /// Admin PIN
        #[arg(long, env = "SERVICEDESK_PIN")]
        pin: String,
    },

    /// Delete a ticket (admin)
    Delete {
        /// Ticket id
        ticket_id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
        /// Admin PIN
        #[arg(long, env = "SERVICEDESK_PIN")]
        pin: String,
    },

    /// Print the ticket id the next submission will receive
    NextId,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },

    /// Export the catalog
    Export {
        #[command(subcommand)]
        action: ExportCommands,
    },

    /// Manage catalog backups
    Backup {
        #[command(subcommand)]
        action: BackupCommands,
    },

    /// Populate an empty catalog with sample data
    Seed,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user (admin)
    Add {
        /// Full name
        name: String,
        /// Email address
        email: String,
        /// Department
        #[arg(long, default_value = "")]
        department: String,
        /// Role (ADMIN, AGENT, USER)
        #[arg(long, default_value = "USER")]
        role: String,
        /// Phone
        #[arg(long, default_value = "")]
        phone: String,
        /// Admin PIN
        #[arg(long, env = "SERVICEDESK_PIN")]
        pin: String,
    },
    /// List users
    List,
    /// Delete a user by email; refused while the user has tickets (admin)
    Delete {
        /// Email address
        email: String,
        /// Admin PIN
        #[arg(long, env = "SERVICEDESK_PIN")]
        pin: String,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Totals by status
    Summary,
    /// Request counts per category
    Category,
    /// Request counts per priority
    Priority,
    /// Average resolution time over resolved requests
    Resolution,
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Export all requests as CSV
    Csv {
        /// Output path (default: exports/requests.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the catalog as JSON (stdout without --output)
    Json {
        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one ticket as plain text
    Ticket {
        /// Ticket id
        ticket_id: String,
        /// Output path (default: exports/<ID>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// Snapshot the catalog files into a timestamped directory
    Create,
    /// Restore the latest snapshot and reload the catalog
    Restore,
}

fn check_pin(pin: &str) -> Result<()> {
    if pin != ADMIN_PIN {
        bail!("Invalid admin PIN");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let files = DataFiles::new(&cli.data_dir);
    let mut store = RequestStore::new();
    files.load(&mut store)?;

    match cli.command {
        Commands::Submit {
            email,
            name,
            department,
            phone,
            category,
            priority,
            subject,
            description,
        } => commands::submit::run(
            &mut store,
            &email,
            &name,
            &department,
            &phone,
            &category,
            &priority,
            &subject,
            &description,
        )?,

        Commands::List {
            status,
            category,
            priority,
            user,
            agent,
            from,
            to,
            sort,
        } => {
            let filters = Filters {
                status: status.as_deref(),
                category: category.as_deref(),
                priority: priority.as_deref(),
                user: user.as_deref(),
                agent: agent.as_deref(),
                from: from.as_deref(),
                to: to.as_deref(),
            };
            commands::list::run(&store, &filters, &sort)?
        }

        Commands::Search { query, user } => {
            commands::search::run(&store, &query, user.as_deref())?
        }

        Commands::Show { ticket_id } => commands::show::run(&store, &ticket_id)?,

        Commands::Comment {
            ticket_id,
            text,
            author,
        } => commands::comment::run(&mut store, &ticket_id, &text, &author)?,

        Commands::Assign {
            ticket_id,
            agent,
            pin,
        } => {
            check_pin(&pin)?;
            commands::assign::run(&mut store, &ticket_id, &agent)?
        }

        Commands::Status {
            ticket_id,
            status,
            actor,
            note,
            pin,
        } => {
            check_pin(&pin)?;
            commands::status::run(&mut store, &ticket_id, &status, &actor, note.as_deref())?
        }

        Commands::Delete {
            ticket_id,
            force,
            pin,
        } => {
            check_pin(&pin)?;
            commands::delete::run(&mut store, &ticket_id, force)?
        }

        Commands::NextId => commands::next_id::run(&store)?,

        Commands::User { action } => match action {
            UserCommands::Add {
                name,
                email,
                department,
                role,
                phone,
                pin,
            } => {
                check_pin(&pin)?;
                commands::user::add(&mut store, &name, &department, &role, &email, &phone)?
            }
            UserCommands::List => commands::user::list(&store)?,
            UserCommands::Delete { email, pin } => {
                check_pin(&pin)?;
                commands::user::delete(&mut store, &email)?
            }
        },

        Commands::Report { action } => match action {
            ReportCommands::Summary => commands::report::summary(&store)?,
            ReportCommands::Category => commands::report::by_category(&store)?,
            ReportCommands::Priority => commands::report::by_priority(&store)?,
            ReportCommands::Resolution => commands::report::resolution_time(&store)?,
        },

        Commands::Export { action } => match action {
            ExportCommands::Csv { output } => {
                commands::export::run_csv(&store, output.as_deref())?
            }
            ExportCommands::Json { output } => {
                commands::export::run_json(&store, output.as_deref())?
            }
            ExportCommands::Ticket { ticket_id, output } => {
                commands::export::run_ticket(&store, &ticket_id, output.as_deref())?
            }
        },

        Commands::Backup { action } => match action {
            BackupCommands::Create => commands::backup::create(&files)?,
            BackupCommands::Restore => commands::backup::restore(&files, &mut store)?,
        },

        Commands::Seed => commands::seed::run(&mut store)?,
    }

    if store.is_dirty() {
        files.save(&mut store)?;
    }
    Ok(())
}
