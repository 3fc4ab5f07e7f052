mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AddressBook, AddressBookSession, BookError, HttpLookupClient, LookupForm, LookupOutcome,
};
use shared::domain::{BookEntry, CandidateAddress};
use storage::{SlotBookPersistence, Storage};
use tracing_subscriber::EnvFilter;

use settings::{load_settings, ClientSettings, DEFAULT_SETTINGS_FILE};

#[derive(Parser, Debug)]
#[command(name = "address-book", about = "Look up addresses and keep them in a local book")]
struct Cli {
    /// Settings file; a missing file is skipped.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the candidate addresses for a postcode and house number.
    Lookup {
        #[arg(long)]
        postcode: String,
        #[arg(long)]
        house_number: String,
    },
    /// Look up an address and add it to the book for a person.
    Add {
        #[arg(long)]
        postcode: String,
        #[arg(long)]
        house_number: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Candidate id to add when the lookup finds more than one.
        #[arg(long)]
        select: Option<String>,
    },
    List,
    Remove {
        id: String,
    },
    Clear,
}

type Session = AddressBookSession<HttpLookupClient, SlotBookPersistence>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(Some(&cli.config))?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }

    match cli.command {
        Command::Lookup {
            postcode,
            house_number,
        } => {
            let client = HttpLookupClient::new(&settings.server_url)?;
            let mut form = LookupForm::new();
            form.lookup_fields.post_code = postcode;
            form.lookup_fields.house_number = house_number;
            let outcome = form.submit_lookup(&client).await;
            expect_found(&form, outcome)?;
            print_candidates(form.addresses());
        }
        Command::Add {
            postcode,
            house_number,
            first_name,
            last_name,
            select,
        } => {
            let mut session = open_session(&settings).await?;
            let form = session.form_mut();
            form.lookup_fields.post_code = postcode;
            form.lookup_fields.house_number = house_number;
            form.person.first_name = first_name;
            form.person.last_name = last_name;

            let outcome = session.submit_lookup().await;
            expect_found(session.form(), outcome)?;

            let selected = match (select, session.form().addresses()) {
                (Some(id), _) => id,
                (None, [only]) => only.id.clone(),
                (None, candidates) => {
                    print_candidates(candidates);
                    bail!(
                        "{} addresses found, choose one with --select ID",
                        candidates.len()
                    );
                }
            };
            session.select_candidate(selected);

            let entry = session.add_selected().await?;
            println!("added {}", format_entry(&entry));
        }
        Command::List => {
            let session = open_session(&settings).await?;
            let entries = session.entries();
            if entries.is_empty() {
                println!("address book is empty");
            }
            for entry in &entries {
                println!("{}", format_entry(entry));
            }
        }
        Command::Remove { id } => {
            let mut session = open_session(&settings).await?;
            if session.remove_entry(&id).await? {
                println!("removed {id}");
            } else {
                bail!("no entry with id {id}");
            }
        }
        Command::Clear => {
            // Skips loading so an unreadable book can still be discarded.
            AddressBook::reset(open_persistence(&settings).await?).await?;
            println!("address book cleared");
        }
    }

    Ok(())
}

async fn open_persistence(settings: &ClientSettings) -> Result<SlotBookPersistence> {
    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database_url))?;
    Ok(SlotBookPersistence::new(storage, &settings.book_slot))
}

async fn open_session(settings: &ClientSettings) -> Result<Session> {
    let book = match AddressBook::open(open_persistence(settings).await?).await {
        Ok(book) => book,
        Err(err @ BookError::Load(_)) => {
            return Err(anyhow::Error::new(err)
                .context("saved address book is unreadable, `address-book clear` discards it"))
        }
        Err(err) => return Err(err.into()),
    };
    let client = HttpLookupClient::new(&settings.server_url)?;
    Ok(AddressBookSession::new(client, book))
}

fn expect_found(form: &LookupForm, outcome: LookupOutcome) -> Result<()> {
    match outcome {
        LookupOutcome::Found(_) => Ok(()),
        _ => bail!("{}", form.error().unwrap_or("lookup did not complete")),
    }
}

fn print_candidates(candidates: &[CandidateAddress]) {
    for candidate in candidates {
        println!("{}  {}", candidate.id, candidate.one_line());
    }
}

fn format_entry(entry: &BookEntry) -> String {
    format!(
        "{}  {}  {}  (added {})",
        entry.id(),
        entry.display_name(),
        entry.address.one_line(),
        entry.added_at.format("%Y-%m-%d %H:%M")
    )
}
