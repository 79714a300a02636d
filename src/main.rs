// Entry point and high-level CLI flow.
//
// The binary loads the district list once, then loops over a numbered menu:
// pick a district, view its performance, compare it, hear a summary, export
// the records, or switch language. Every request failure is rendered inline
// and the loop carries on.
use anyhow::Result;
use clap::Parser;
use mgnrega_report::client::{ApiClient, PerformanceOutcome};
use mgnrega_report::config::{AppConfig, Cli, Profile};
use mgnrega_report::geo::{match_district, spawn_lookup, Geocoder};
use mgnrega_report::labels::Locale;
use mgnrega_report::output::{self, Failing};
use mgnrega_report::speech::{summary_text, ConsoleSpeaker, Narrator};
use mgnrega_report::state::{update, Action, AppState, Endpoint, Slot};
use mgnrega_report::util::format_int;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Everything one run of the program owns.
struct Session {
    cfg: AppConfig,
    client: ApiClient,
    state: AppState,
    narrator: Narrator,
    lookup: Option<JoinHandle<Option<String>>>,
}

impl Session {
    fn dispatch(&mut self, action: Action) {
        self.state = update(&self.state, action);
    }

    fn locale(&self) -> Locale {
        self.state.locale
    }
}

/// One trimmed line from `input`; `None` once input is closed or unreadable.
fn next_line(input: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    next_line(&mut io::stdin().lock())
}

/// Ask for a 1-based position in `names`.
fn pick(names: &[String], title: &str) -> Option<String> {
    println!("\n{}", title);
    for (i, name) in names.iter().enumerate() {
        println!("[{}] {}", i + 1, name);
    }
    let choice = read_choice()?;
    let idx: usize = choice.parse().ok()?;
    names.get(idx.checked_sub(1)?).cloned()
}

/// Apply the background geolocation result once it is available.
async fn poll_lookup(session: &mut Session) {
    let finished = session.lookup.as_ref().is_some_and(|h| h.is_finished());
    if !finished {
        return;
    }
    let Some(handle) = session.lookup.take() else { return };
    let Ok(Some(place)) = handle.await else { return };
    let districts = session.state.districts.ready().cloned().unwrap_or_default();
    match match_district(&place, &districts) {
        Some(d) => {
            tracing::info!(%place, district = %d.name, "preselecting district from position");
            session.dispatch(Action::Suggest(d.name.clone()));
        }
        None => tracing::debug!(%place, "no district matches position"),
    }
}

async fn handle_load_districts(session: &mut Session) {
    let token = session.state.issue();
    session.dispatch(Action::Started(Endpoint::Districts, token));
    let result = session.client.districts().await.map_err(|e| {
        output::describe_error(&e, Failing::Districts, session.locale(), session.client.base())
    });
    session.dispatch(Action::DistrictsLoaded(token, result));
    match &session.state.districts {
        Slot::Ready(ds) => println!("Loaded {} districts.\n", format_int(ds.len() as i64)),
        Slot::Failed(msg) => eprintln!("{}", msg),
        _ => {}
    }
}

fn handle_select(session: &mut Session) {
    let names = session.state.district_names();
    let title = session.locale().phrases().heading;
    match pick(&names, title) {
        Some(name) => session.dispatch(Action::Select(name)),
        None => println!("{}\n", session.locale().phrases().invalid_choice),
    }
}

async fn handle_performance(session: &mut Session) {
    let Some(district) = session.state.selected.clone() else {
        println!("{}\n", session.locale().phrases().no_district_selected);
        return;
    };
    let token = session.state.issue();
    session.dispatch(Action::Started(Endpoint::Performance, token));
    let result = session
        .client
        .performance(&session.cfg.state, &district, session.cfg.limit)
        .await
        .map_err(|e| output::describe_error(&e, Failing::Performance, session.locale(), session.client.base()));
    session.dispatch(Action::PerformanceLoaded(token, result));
    match &session.state.performance {
        Slot::Ready(outcome) => println!("{}", output::render_performance(outcome, session.locale())),
        Slot::Failed(msg) => println!("{}", msg),
        _ => {}
    }
}

async fn handle_compare(session: &mut Session, with_district: bool) {
    let p = session.locale().phrases();
    let Some(district) = session.state.selected.clone() else {
        println!("{}\n", p.no_district_selected);
        return;
    };
    let other = if with_district {
        let names: Vec<String> = session.state.district_names().into_iter().filter(|n| *n != district).collect();
        match pick(&names, p.select_district) {
            Some(name) => {
                session.dispatch(Action::SelectComparison(name.clone()));
                Some(name)
            }
            None => {
                println!("{}\n", p.invalid_choice);
                return;
            }
        }
    } else {
        None
    };

    let token = session.state.issue();
    session.dispatch(Action::Started(Endpoint::Comparison, token));
    let state_name = session.cfg.state.clone();
    let result = match &other {
        Some(d2) => session.client.district_comparison(&state_name, &district, d2).await,
        None => session.client.state_average(&state_name, &district).await,
    }
    .map_err(|e| output::describe_error(&e, Failing::Comparison, session.locale(), session.client.base()));
    session.dispatch(Action::ComparisonLoaded(token, result));
    match &session.state.comparison {
        Slot::Ready(cmp) => println!("{}", output::render_comparison(cmp, session.locale())),
        Slot::Failed(msg) => println!("{}", msg),
        _ => {}
    }
}

async fn handle_speak(session: &mut Session) {
    let locale = session.locale();
    let Some(PerformanceOutcome::Records { records, .. }) = session.state.performance.ready() else {
        println!("{}\n", locale.phrases().no_data_found);
        return;
    };
    let Some(latest) = records.first() else { return };
    let fallback = session.state.selected.clone().unwrap_or_default();
    let text = summary_text(latest, locale, &fallback);
    println!("{}", locale.phrases().speaking);
    session.narrator.play(text, locale);
    session.narrator.finish().await;
    println!();
}

/// Write the detailed table to CSV and the newest record's cards to JSON.
fn handle_export(session: &Session) {
    let Some(PerformanceOutcome::Records { records, .. }) = session.state.performance.ready() else {
        println!("{}\n", session.locale().phrases().no_data_found);
        return;
    };
    let file1 = "performance_records.csv";
    if let Err(e) = output::write_csv(file1, &output::record_rows(records)) {
        eprintln!("Write error: {}", e);
    }
    let file2 = "latest_month.json";
    if let Some(latest) = records.first() {
        if let Err(e) = output::write_json(file2, &output::card_rows(latest, session.locale())) {
            eprintln!("Write error: {}", e);
        }
    }
    println!("Outputs saved to {} and {}\n", file1, file2);
}

fn print_menu(session: &Session) {
    let p = session.locale().phrases();
    let selected = session.state.selected.as_deref().unwrap_or("-");
    println!("{}: {}", p.selected, selected);
    println!("[1] {}", p.heading);
    println!("[2] {}", p.view);
    println!("[3] {}", p.compare_state);
    println!("[4] {}", p.compare_district);
    println!("[5] {}", p.speak);
    println!("[6] {}", p.export);
    println!("[7] {}", p.glossary_title);
    println!("[8] {}", p.toggle_language);
    println!("[0] {}\n", p.exit);
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let cfg = AppConfig::from_cli(&cli, Profile::current());
    tracing::info!(api_base = %cfg.api_base, "starting");

    let client = match ApiClient::from_config(&cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", output::describe_error(&e, Failing::Districts, cfg.locale, &cfg.api_base));
            return Ok(());
        }
    };

    // The position lookup runs alongside the district load and never delays it.
    let lookup = match cfg.position {
        Some((lat, lon)) => match Geocoder::new(&cfg.geocoder_url, Duration::from_secs(cfg.timeout_secs)) {
            Ok(g) => Some(spawn_lookup(g, lat, lon)),
            Err(e) => {
                tracing::debug!(error = %e, "geocoder unavailable");
                None
            }
        },
        None => None,
    };

    let mut session = Session {
        state: AppState::new(cfg.locale),
        narrator: Narrator::new(Arc::new(ConsoleSpeaker)),
        cfg,
        client,
        lookup,
    };

    handle_load_districts(&mut session).await;

    loop {
        poll_lookup(&mut session).await;
        print_menu(&session);
        let Some(choice) = read_choice() else {
            tracing::debug!("input closed");
            break;
        };
        match choice.as_str() {
            "1" => handle_select(&mut session),
            "2" => handle_performance(&mut session).await,
            "3" => handle_compare(&mut session, false).await,
            "4" => handle_compare(&mut session, true).await,
            "5" => handle_speak(&mut session).await,
            "6" => handle_export(&session),
            "7" => println!("{}", output::render_glossary(session.locale())),
            "8" => {
                let next = session.locale().toggled();
                session.dispatch(Action::SetLocale(next));
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("{}\n", session.locale().phrases().invalid_choice),
        }
    }

    if let Some(handle) = session.lookup.take() {
        handle.abort();
    }
    session.narrator.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn lines_are_trimmed() {
        let mut input = Cursor::new("  3 \n0\n");
        assert_eq!(next_line(&mut input).as_deref(), Some("3"));
        assert_eq!(next_line(&mut input).as_deref(), Some("0"));
    }

    #[test]
    fn closed_input_ends_the_menu() {
        let mut input = Cursor::new("");
        assert_eq!(next_line(&mut input), None);
        let mut input = Cursor::new("\n");
        assert_eq!(next_line(&mut input).as_deref(), Some(""));
        assert_eq!(next_line(&mut input), None);
    }
}
