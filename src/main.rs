mod config;
mod display;
mod fetch;
mod lookup;
mod notch;
mod parser;
mod session;

use std::future::Future;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::config::Settings;
use crate::fetch::HttpFetcher;
use crate::lookup::{ErrorKind, Lookup, LookupError, PhoneView, SearchOutcome};
use crate::notch::{classify, NotchCategory};
use crate::session::{override_notch, select_phone, submit_search, ViewState};

#[derive(Parser)]
#[command(
    name = "phone_lookup",
    about = "Display size, screen-to-body ratio and notch type for any phone, via GSMArena"
)]
struct Cli {
    /// Upstream site (default: https://www.gsmarena.com, or PHONE_LOOKUP_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search phones by name
    Search {
        /// Free-text query, e.g. "galaxy s24"
        #[arg(required = true)]
        query: Vec<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Display specs and notch type for one phone
    Specs {
        /// Identifier from a search result, e.g. apple_iphone_15_pro-12557
        slug: String,
        /// Show this notch type instead of the detected one
        #[arg(long)]
        notch: Option<NotchCategory>,
        /// Print JSON instead of a card
        #[arg(long)]
        json: bool,
    },
    /// Classify a device name offline
    Classify {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List the notch types
    Notches,
    /// Interactive search → pick → specs → notch override
    Lookup {
        /// Initial query (prompted for when omitted)
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { name } => {
            let notch = classify(&name.join(" "));
            println!("{} ({})", notch.label(), notch.id());
            println!("{}", notch.description());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Notches => {
            for n in NotchCategory::ALL {
                println!("{:<15} {:<15} {}", n.id(), n.label(), n.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Search { query, json } => {
            let lookup = connect(cli.base_url)?;
            let outcome = match with_spinner(!json, lookup.search(&query.join(" "))).await? {
                Ok(outcome) => outcome,
                Err(e) => return Ok(report(&e, json)),
            };
            match (outcome, json) {
                (SearchOutcome::Found(results), true) => {
                    let body = serde_json::json!({ "results": results });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                (SearchOutcome::Found(results), false) => display::print_candidates(&results),
                (outcome @ SearchOutcome::NoResults, true) => {
                    println!("{}", serde_json::json!({ "error": outcome.message() }));
                }
                (outcome @ SearchOutcome::NoResults, false) => {
                    println!("{}", outcome.message().unwrap_or_default());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Specs { slug, notch, json } => {
            let lookup = connect(cli.base_url)?;
            let view = match with_spinner(!json, lookup.phone(&slug)).await? {
                Ok(view) => view,
                Err(e) => return Ok(report(&e, json)),
            };
            let detected = view.notch;
            let view = PhoneView {
                notch: notch.unwrap_or(detected),
                ..view
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                display::print_phone(&view.spec, view.notch, detected);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lookup { query } => {
            let lookup = connect(cli.base_url)?;
            interactive(&lookup, query.join(" ")).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn connect(base_url: Option<String>) -> Result<Lookup<HttpFetcher>> {
    let settings = Settings::load()?.with_base_url(base_url)?;
    let fetcher = HttpFetcher::new(&settings)?;
    Ok(Lookup::new(fetcher, settings.base_url))
}

fn report(err: &LookupError, json: bool) -> ExitCode {
    if json {
        let body = serde_json::json!({
            "error": err.to_string(),
            "kind": err.kind(),
            "status": err.status_code(),
        });
        println!("{}", body);
    } else {
        eprintln!("{}", err);
    }
    match err.kind() {
        ErrorKind::InvalidInput => ExitCode::from(2),
        ErrorKind::UpstreamUnavailable => ExitCode::FAILURE,
    }
}

async fn with_spinner<T>(show: bool, fut: impl Future<Output = T>) -> Result<T> {
    if !show {
        return Ok(fut.await);
    }
    let pb = display::spinner()?;
    let out = fut.await;
    pb.finish_and_clear();
    Ok(out)
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

async fn interactive(lookup: &Lookup<HttpFetcher>, initial: String) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = ViewState::default();
    let mut pending = Some(initial).filter(|q| !q.trim().is_empty());

    loop {
        let query = match pending.take() {
            Some(q) => q,
            None => match prompt(
                &mut lines,
                "\nEnter phone name (e.g., iPhone 15 Pro, Samsung S24 Ultra), or q to quit: ",
            )
            .await?
            {
                Some(q) if q != "q" => q,
                _ => return Ok(()),
            },
        };
        state.query = query;
        with_spinner(true, submit_search(&mut state, lookup)).await?;
        display::print_status(&state);
        if state.error.is_some() {
            continue;
        }

        while state.selected.is_none() && !state.results.is_empty() {
            display::print_candidates(&state.results);
            let text = format!("Pick a phone [1-{}], blank to search again: ", state.results.len());
            let Some(pick) = prompt(&mut lines, &text).await? else {
                return Ok(());
            };
            if pick.is_empty() {
                break;
            }
            match pick.parse::<usize>() {
                Ok(n) if (1..=state.results.len()).contains(&n) => {
                    with_spinner(true, select_phone(&mut state, lookup, n - 1)).await?;
                    display::print_status(&state);
                }
                _ => println!("Invalid selection: {}", pick),
            }
        }

        let Some(spec) = state.selected.clone() else {
            continue;
        };
        let detected = classify(&spec.name);
        println!();
        display::print_phone(&spec, state.notch, detected);

        loop {
            println!();
            display::print_notch_options(state.notch);
            let Some(pick) = prompt(&mut lines, "Notch type [1-6], blank to continue: ").await?
            else {
                return Ok(());
            };
            if pick.is_empty() {
                break;
            }
            let choice = pick
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| NotchCategory::ALL.get(i).copied())
                .or_else(|| pick.parse::<NotchCategory>().ok());
            match choice {
                Some(n) => {
                    override_notch(&mut state, n);
                    println!();
                    display::print_phone(&spec, state.notch, detected);
                }
                None => println!("Invalid notch type: {}", pick),
            }
        }
    }
}
