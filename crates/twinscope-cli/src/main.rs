mod prompt;

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use twinscope_core::error::ExitCode;
use twinscope_core::{
    AppConfig, CardLibrary, CoreError, Creator, LibraryLock, MutationSink, RecordCard,
    RecordSummaryView, ScopeSelector,
};
use twinscope_dedup::{DedupError, DedupRun, Interaction, MatchMode, RunSummary, Threshold};

use prompt::TerminalPrompt;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "twinscope",
    about = "Find and reconcile duplicate bibliographic records",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting TWINSCOPE_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect duplicate records or similar creator names and resolve them interactively.
    Dedup {
        /// Compare creator names instead of whole records.
        #[arg(long)]
        names: bool,

        /// Default offered at the threshold prompt.
        #[arg(long)]
        threshold: Option<f64>,

        /// Run over these record ids.
        #[arg(long, num_args = 1.., conflicts_with_all = ["collection", "filter"])]
        ids: Vec<String>,

        /// Run over a collection.
        #[arg(long, conflicts_with = "filter")]
        collection: Option<String>,

        /// Run over a saved filter from the config.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Add a record to the library.
    Add {
        #[arg(long)]
        title: String,
        /// Personal creator, "First Last".
        #[arg(long, action = clap::ArgAction::Append)]
        author: Vec<String>,
        /// Single-field creator such as an organization.
        #[arg(long, action = clap::ArgAction::Append)]
        org: Vec<String>,
        #[arg(long = "type")]
        item_type: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, action = clap::ArgAction::Append)]
        collection: Vec<String>,
        /// Any other field, as name=value.
        #[arg(long, action = clap::ArgAction::Append)]
        field: Vec<String>,
    },

    /// List records.
    List {
        /// Include trashed records.
        #[arg(long)]
        trashed: bool,
    },

    /// Show a record card.
    Show { id: String },

    /// Set one field of a record.
    Set {
        id: String,
        field: String,
        value: String,
    },

    /// Take a record out of the trash.
    Restore { id: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Show effective config values.
    Show,
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("TWINSCOPE_JSON").as_deref() == Ok("1");

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command, json_output) {
        let code = exit_code(&err);
        if json_output {
            let body = serde_json::json!({"status":"error","message":format!("{err:#}")});
            println!("{body:#}");
        } else {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(code as i32);
    }
}

fn run(command: Commands, json_output: bool) -> Result<()> {
    let start = Instant::now();

    let mut config = AppConfig::load()?;
    if let Ok(lib_path) = std::env::var("TWINSCOPE_LIBRARY_PATH") {
        config.set_library_path(lib_path.into());
    }
    let mut library = CardLibrary::from_config(&config);

    match command {
        // ── Dedup ──────────────────────────────────────────────────────────
        Commands::Dedup {
            names,
            threshold,
            ids,
            collection,
            filter,
        } => {
            let mut ui = TerminalPrompt::new();
            let scope = match (ids.is_empty(), collection, filter) {
                (false, _, _) => ScopeSelector::Selection(parse_ids(&ids)?),
                (true, Some(name), _) => ScopeSelector::Collection(name),
                (true, None, Some(name)) => ScopeSelector::SavedFilter(name),
                (true, None, None) => match prompt_scope(&mut ui)? {
                    Some(scope) => scope,
                    None => {
                        println!("No items to process.");
                        return Ok(());
                    }
                },
            };
            let mode = if names {
                MatchMode::Names
            } else {
                MatchMode::Records
            };

            let mut dedup_run = DedupRun::new(&config.dedup, mode);
            if let Some(value) = threshold {
                dedup_run = dedup_run.with_default_threshold(Threshold::new(value)?.value());
            }

            let lock = LibraryLock::acquire(&config.lock_path())?;
            tracing::debug!("holding run lock {}", lock.path().display());
            let summary = dedup_run.execute(&library.clone(), &scope, &mut library, &mut ui)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": summary_json(mode, &summary),
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_summary(&summary);
            }
        }

        // ── Records ────────────────────────────────────────────────────────
        Commands::Add {
            title,
            author,
            org,
            item_type,
            date,
            collection,
            field,
        } => {
            let mut card = RecordCard::new(title);
            card.creators = author
                .iter()
                .map(|a| Creator::parse_personal(a))
                .chain(org.into_iter().map(Creator::single))
                .collect();
            if let Some(t) = item_type {
                card.set_field("itemType", &t);
            }
            if let Some(d) = date {
                card.set_field("date", &d);
            }
            card.organization.collections = collection;
            for pair in &field {
                let Some((name, value)) = pair.split_once('=') else {
                    bail!("invalid --field '{pair}', expected name=value");
                };
                card.set_field(name.trim(), value.trim());
            }

            library.insert(&card)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":card,"meta":{"duration_ms":dur}}))?;
            } else {
                println!("Added: {}  {}", card.id, card.title());
            }
        }

        Commands::List { trashed } => {
            let cards = library.list(trashed)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                let items: Vec<RecordSummaryView> = cards.iter().map(RecordSummaryView::from).collect();
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": items, "total": items.len() },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if cards.is_empty() {
                println!("No records in library. Use `twinscope add` to add records.");
            } else {
                for card in &cards {
                    let view = RecordSummaryView::from(card);
                    println!(
                        "{id}  {title:<40}  {authors:<25}  {date}{trashed}",
                        id = &view.id.to_string()[..8],
                        title = view.title,
                        authors = view.creators.join(", "),
                        date = view.date.unwrap_or_default(),
                        trashed = if view.trashed { "  [trashed]" } else { "" },
                    );
                }
            }
        }

        Commands::Show { id } => {
            let card = library.get(&parse_id(&id)?)?;
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":card,"meta":{"duration_ms":dur}}))?;
            } else {
                println!("{}", serde_json::to_string_pretty(&card)?);
            }
        }

        Commands::Set { id, field, value } => {
            let card = library.get(&parse_id(&id)?)?;
            library.set_field(&card, &field, &value)?;
            let updated = library.get(&card.id)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":updated,"meta":{"duration_ms":dur}}))?;
            } else {
                println!(
                    "Updated {field} of {}: {}",
                    updated.title(),
                    updated.field(&field).unwrap_or("(cleared)")
                );
            }
        }

        Commands::Restore { id } => {
            let card = library.restore(&parse_id(&id)?)?;
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"restored":card.id},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("Restored: {}", card.title());
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => match action {
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    println!("library_path        = {}", config.library_path().display());
                    println!("cards_dir           = {}", config.cards_dir().display());
                    println!("default_threshold   = {}", config.dedup.default_threshold);
                    println!("marker_prefix       = {}", config.dedup.marker_prefix);
                    println!("batch_size          = {}", config.dedup.batch_size);
                    println!("skip_trashed_in_pass = {}", config.dedup.skip_trashed_in_pass);
                    for (name, query) in &config.filters {
                        println!("filter.{name} = {query}");
                    }
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(CoreError::from)
        .with_context(|| format!("invalid record id: {raw}"))
}

fn parse_ids(raw: &[String]) -> Result<Vec<Uuid>> {
    raw.iter().map(|id| parse_id(id)).collect()
}

/// Ask which records to run over when no scope flag was given.
fn prompt_scope(ui: &mut TerminalPrompt) -> Result<Option<ScopeSelector>> {
    let Some(choice) = ui.prompt_choice(
        "Enter '1' to search selected items, '2' for items in a collection, \
         or '3' for items in a saved filter:",
    )?
    else {
        return Ok(None);
    };

    let (selection, name) = match choice.trim() {
        "1" => {
            let Some(ids) = ui.prompt_text("Record ids, separated by spaces:", None)? else {
                return Ok(None);
            };
            let ids: Vec<String> = ids.split_whitespace().map(str::to_string).collect();
            (parse_ids(&ids)?, String::new())
        }
        "2" | "3" => {
            let what = if choice.trim() == "2" { "Collection" } else { "Saved filter" };
            let Some(name) = ui.prompt_text(&format!("{what} name:"), None)? else {
                return Ok(None);
            };
            (Vec::new(), name)
        }
        other => {
            ui.notify(&format!("Unknown option '{other}'."));
            return Ok(None);
        }
    };

    Ok(ScopeSelector::from_menu_choice(&choice, selection, &name))
}

fn summary_json(mode: MatchMode, summary: &RunSummary) -> serde_json::Value {
    serde_json::json!({
        "mode": mode.to_string(),
        "outcome": format!("{:?}", summary.outcome).to_lowercase(),
        "working_set": summary.working_set,
        "candidates": summary.candidates,
        "tagged": summary.tagged,
        "trashed": summary.trashed,
        "ignored": summary.ignored,
        "skipped": summary.skipped,
        "renamed": summary.renamed,
        "failures": summary.failures,
        "passes": summary.passes,
    })
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} record(s), {} candidate(s) over {} pass(es): {} tagged, {} trashed, {} ignored, {} skipped, {} renamed, {} failed",
        summary.working_set,
        summary.candidates,
        summary.passes,
        summary.tagged,
        summary.trashed,
        summary.ignored,
        summary.skipped,
        summary.renamed,
        summary.failures,
    );
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let core = err.downcast_ref::<CoreError>().or_else(|| match err.downcast_ref::<DedupError>() {
        Some(DedupError::Core(core)) => Some(core),
        _ => None,
    });
    match core {
        Some(CoreError::LibraryLocked(_)) => ExitCode::Conflict,
        Some(CoreError::InvalidField(_) | CoreError::InvalidId(_)) => ExitCode::InvalidArgs,
        Some(e) if e.is_not_found() => ExitCode::NotFound,
        Some(_) => ExitCode::GeneralError,
        None => match err.downcast_ref::<DedupError>() {
            Some(
                DedupError::InvalidThreshold(_)
                | DedupError::InvalidWeights(_)
                | DedupError::UnknownField(_),
            ) => ExitCode::InvalidArgs,
            _ => ExitCode::GeneralError,
        },
    }
}
