pub mod add;
pub mod check;
pub mod list;
pub mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

use crate::{
    identity::{Identity, LocalIdentity, UserSession},
    model::details::WorkStatus,
    segments::{routine, work},
    store::activity_store::{ActivityStore, JournalStore},
    utils::{clock::DefaultClock, dir::resolve_application_path, logging::enable_logging},
};

use add::AddCommand;
use list::ListCommand;
use report::ReportCommand;

#[derive(Parser, Debug)]
#[command(name = "Lifelog", version, long_about = None)]
#[command(about = "Command line journal for tracking everyday activities", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_DATA_HOME or $HOME/.local/share"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a new activity")]
    Add {
        #[command(subcommand)]
        command: AddCommand,
    },
    #[command(about = "List recorded activities of a category, newest first")]
    List {
        #[command(flatten)]
        command: ListCommand,
    },
    #[command(about = "Show an activity report over a trailing window of days")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Toggle a routine between done and not done")]
    Toggle {
        #[arg(help = "Id of the routine, as shown by lifelog list routine")]
        id: Uuid,
    },
    #[command(about = "Move a work entry to another status")]
    Status {
        #[arg(help = "Id of the work entry, as shown by lifelog list work")]
        id: Uuid,
        status: WorkStatus,
    },
    #[command(about = "Delete an activity")]
    Delete {
        #[arg(help = "Id of the activity, as shown by lifelog list")]
        id: Uuid,
    },
    #[command(about = "Create the local profile this journal belongs to")]
    Signup {
        #[arg(long)]
        email: String,
        #[arg(
            long,
            help = "Accepted for parity with hosted backends, the local profile never stores it"
        )]
        password: Option<String>,
    },
    #[command(about = "Show the current profile")]
    Whoami,
    #[command(about = "Remove the local profile. Recorded activities stay in the journal")]
    Signout,
    #[command(about = "Verify the journal directory is usable")]
    Check,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = resolve_application_path(args.dir.clone())?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&dir, logging_level, args.log)?;

    let store = JournalStore::new(dir.clone(), Box::new(DefaultClock))?;
    let identity = LocalIdentity::new(dir.clone())?;

    match args.commands {
        Commands::Add { command } => {
            let session = require_session(&identity).await?;
            add::process_add_command(command, &store, session.user_id).await
        }
        Commands::List { command } => {
            let session = require_session(&identity).await?;
            list::process_list_command(command, &store, session.user_id).await
        }
        Commands::Report { command } => {
            let session = require_session(&identity).await?;
            report::process_report_command(command, &store, session.user_id).await
        }
        Commands::Toggle { id } => {
            let session = require_session(&identity).await?;
            let details = routine::toggle_completion(&store, session.user_id, id).await?;
            let state = if details.completed { "done" } else { "not done" };
            println!("{} is now {state}, streak {}", details.title, details.streak);
            Ok(())
        }
        Commands::Status { id, status } => {
            let session = require_session(&identity).await?;
            let details = work::set_status(&store, session.user_id, id, status).await?;
            println!("{} is now {}", details.title, details.status);
            Ok(())
        }
        Commands::Delete { id } => {
            let session = require_session(&identity).await?;
            store.delete(session.user_id, id).await?;
            println!("Deleted {id}");
            Ok(())
        }
        Commands::Signup { email, password } => {
            let session = identity
                .sign_up(&email, password.as_deref().unwrap_or(""))
                .await?;
            println!("Signed up as {} ({})", session.email, session.user_id);
            Ok(())
        }
        Commands::Whoami => {
            match identity.current_session().await? {
                Some(session) => println!("{} ({})", session.email, session.user_id),
                None => println!("No profile yet. Run lifelog signup --email <email>"),
            }
            Ok(())
        }
        Commands::Signout => {
            identity.sign_out().await?;
            println!("Signed out");
            Ok(())
        }
        Commands::Check => check::process_check_command(&dir, &store, &identity).await,
    }
}

async fn require_session(identity: &impl Identity) -> Result<UserSession> {
    match identity.current_session().await? {
        Some(session) => Ok(session),
        None => bail!("No profile yet. Run lifelog signup --email <email> first"),
    }
}
