//! `weft` — operator tool for a Weft federation node store.
//!
//! Reads `weft.toml` (or the path given with `--config`), opens the node's
//! SQLite store, and either feeds pre-verified, pre-parsed messages
//! (unwrapped-envelope JSON files, i.e. the output of the external envelope
//! verifier and payload parser) through the validation pipeline, or
//! inspects and maintains the store.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use weft_core::{
  envelope::UnwrappedEnvelope,
  identity::Handle,
  object::ObjectType,
  store::NodeStore,
};
use weft_store_sqlite::SqliteStore;
use weft_validate::{ProcessError, Validator};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime node configuration, deserialised from `weft.toml`.
#[derive(Deserialize, Clone)]
struct NodeConfig {
  store_path:   PathBuf,
  /// The handle of the local recipient this node receives for.
  local_handle: String,
}

// ─── CLI surface ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Weft federation node operator tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "weft.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run unwrapped-envelope JSON files through the validation pipeline.
  Ingest {
    /// One file per message; processed in order.
    files: Vec<PathBuf>,
  },
  /// Manage locally known people.
  #[command(subcommand)]
  Person(PersonCmd),
  /// Manage the local recipient's contacts.
  #[command(subcommand)]
  Contact(ContactCmd),
  /// Inspect the object store.
  #[command(subcommand)]
  Object(ObjectCmd),
}

#[derive(Subcommand)]
enum PersonCmd {
  /// Record a remote identity as locally known.
  Add { handle: String },
}

#[derive(Subcommand)]
enum ContactCmd {
  /// Record that the local recipient accepts messages from a person.
  Add {
    handle: String,
    /// Optional aspect (grouping) name.
    #[arg(long)]
    aspect: Option<String>,
  },
  /// List the local recipient's contacts.
  List,
}

#[derive(Subcommand)]
enum ObjectCmd {
  /// Show a stored object by guid.
  Show {
    guid:        String,
    /// Restrict to one object type discriminant (e.g. `status_message`).
    #[arg(long)]
    object_type: Option<String>,
  },
  /// Count stored objects.
  Count {
    #[arg(long)]
    object_type: Option<String>,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WEFT"))
    .build()
    .context("failed to read config file")?;

  let node_cfg: NodeConfig = settings
    .try_deserialize()
    .context("failed to deserialise NodeConfig")?;

  let local = Handle::parse(&node_cfg.local_handle)
    .context("local_handle in config is not a valid handle")?;

  let store = SqliteStore::open(&node_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", node_cfg.store_path)
    })?;

  match cli.command {
    Command::Ingest { files } => ingest(&store, &local, &files).await,
    Command::Person(cmd) => person(&store, cmd).await,
    Command::Contact(cmd) => contact(&store, &local, cmd).await,
    Command::Object(cmd) => object(&store, cmd).await,
  }
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

async fn ingest(
  store: &SqliteStore,
  local: &Handle,
  files: &[PathBuf],
) -> anyhow::Result<()> {
  let mut rejected = 0usize;

  for path in files {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read {path:?}"))?;
    let envelope: UnwrappedEnvelope = serde_json::from_str(&raw)
      .with_context(|| format!("{path:?} is not an unwrapped envelope"))?;

    let sender = envelope.sender.clone();
    let guid = envelope.object.guid().to_owned();

    match Validator::from_envelope(envelope, local.clone())
      .process(store)
      .await
    {
      Ok(Some(persisted)) => {
        println!(
          "accepted {guid} ({}) from {sender}",
          persisted.object.object_type()
        );
      }
      Ok(None) => println!("no-op    {guid} from {sender}"),
      Err(ProcessError::Rejected(rejection)) => {
        rejected += 1;
        println!("rejected {guid} from {sender}: {rejection}");
      }
      Err(e @ ProcessError::Store(_)) => {
        return Err(e).context("store failure during ingest");
      }
    }
  }

  if rejected > 0 {
    anyhow::bail!("{rejected} message(s) rejected");
  }
  Ok(())
}

async fn person(store: &SqliteStore, cmd: PersonCmd) -> anyhow::Result<()> {
  match cmd {
    PersonCmd::Add { handle } => {
      let handle = Handle::parse(&handle).context("invalid handle")?;
      let person = store.add_person(&handle).await?;
      println!("{} ({})", person.handle, person.person_guid);
    }
  }
  Ok(())
}

async fn contact(
  store: &SqliteStore,
  local: &Handle,
  cmd: ContactCmd,
) -> anyhow::Result<()> {
  match cmd {
    ContactCmd::Add { handle, aspect } => {
      let person = Handle::parse(&handle).context("invalid handle")?;
      let contact = store.add_contact(local, &person, aspect).await?;
      println!(
        "{} -> {} ({})",
        contact.recipient,
        contact.person,
        contact.aspect.as_deref().unwrap_or("no aspect"),
      );
    }
    ContactCmd::List => {
      for contact in store.list_contacts(local).await? {
        println!(
          "{} ({})",
          contact.person,
          contact.aspect.as_deref().unwrap_or("no aspect"),
        );
      }
    }
  }
  Ok(())
}

async fn object(store: &SqliteStore, cmd: ObjectCmd) -> anyhow::Result<()> {
  match cmd {
    ObjectCmd::Show { guid, object_type } => {
      let object_type = parse_type(object_type.as_deref())?;
      match store.lookup_by_guid(&guid, object_type).await? {
        Some(persisted) => {
          println!("{}", serde_json::to_string_pretty(&persisted)?);
        }
        None => anyhow::bail!("no object with guid {guid}"),
      }
    }
    ObjectCmd::Count { object_type } => {
      let object_type = parse_type(object_type.as_deref())?;
      println!("{}", store.count_objects(object_type).await?);
    }
  }
  Ok(())
}

fn parse_type(raw: Option<&str>) -> anyhow::Result<Option<ObjectType>> {
  raw
    .map(|s| ObjectType::from_discriminant(s).context("unknown object type"))
    .transpose()
}
