//! Interactive session: `scout watch`.
//!
//! Owns a [`SessionState`] and drives it from two event sources, multiplexed
//! with `select!`:
//!
//! - lines typed on stdin (selection changes, uploads, refreshes);
//! - completions of spawned fetch tasks, posted back over an `mpsc` channel
//!   as reducer events.
//!
//! Fetches are dispatched without blocking the loop; a concept fetch carries
//! the material id it was issued for, and the reducer discards results for a
//! material that is no longer selected. Upload completion refreshes the
//! materials list with the created id recorded as the preferred selection,
//! so the new material wins even if the user wandered off meanwhile.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use crate::advisory::build_advisories;
use crate::api::BackendClient;
use crate::config::Config;
use crate::models::{SourceKind, UploadPayload};
use crate::session::{SessionEvent, SessionState};

enum WatchEvent {
    /// A fetch task resolved; apply its reducer event.
    Fetched(SessionEvent),
    /// An upload task finished, successfully or not.
    UploadFinished(Result<i64, String>),
}

pub async fn run_watch(config: &Config) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        println!("scout watch reads commands from a terminal; piping stdin ends the session at EOF.");
    }

    let client = Arc::new(BackendClient::new(&config.backend)?);
    let (tx, mut rx) = mpsc::unbounded_channel::<WatchEvent>();

    let mut state = SessionState::default();
    let mut status = String::from("Idle");
    let mut last_upload: Option<Instant> = None;

    dispatch_materials(&client, &tx, None);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&state, &status, last_upload, config);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    WatchEvent::Fetched(session_event) => {
                        let before = state.selected_material_id();
                        state.apply(session_event);
                        let after = state.selected_material_id();
                        if after != before {
                            if let Some(id) = after {
                                dispatch_concepts(&client, &tx, id);
                            }
                        }
                    }
                    WatchEvent::UploadFinished(Ok(id)) => {
                        status = "Material received. Agents are extracting concepts.".to_string();
                        last_upload = Some(Instant::now());
                        state.apply(SessionEvent::UploadCompleted { material_id: id });
                        dispatch_materials(&client, &tx, None);
                    }
                    WatchEvent::UploadFinished(Err(message)) => {
                        status = message;
                    }
                }
                render(&state, &status, last_upload, config);
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_command(
                    line.trim(),
                    &mut state,
                    &mut status,
                    &client,
                    &tx,
                ) {
                    break;
                }
                render(&state, &status, last_upload, config);
            }
        }
    }

    Ok(())
}

/// Parse and execute one command line. Returns `false` on quit.
fn handle_command(
    line: &str,
    state: &mut SessionState,
    status: &mut String,
    client: &Arc<BackendClient>,
    tx: &UnboundedSender<WatchEvent>,
) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "q" | "quit" => return false,
        "r" | "refresh" => {
            *status = "Refreshing...".to_string();
            dispatch_materials(client, tx, None);
            if let Some(id) = state.selected_material_id() {
                dispatch_concepts(client, tx, id);
            }
        }
        "m" => match rest.parse::<i64>() {
            Ok(id) => {
                let before = state.selected_material_id();
                state.apply(SessionEvent::MaterialSelected(id));
                let after = state.selected_material_id();
                if after != before {
                    if let Some(id) = after {
                        dispatch_concepts(client, tx, id);
                    }
                }
            }
            Err(_) => *status = "Usage: m <material-id>".to_string(),
        },
        "c" => match rest.parse::<i64>() {
            Ok(id) => state.apply(SessionEvent::ConceptSelected(id)),
            Err(_) => *status = "Usage: c <concept-id>".to_string(),
        },
        "v" => match rest.parse::<i64>() {
            Ok(id) => match state.matches().iter().find(|m| m.id == id).cloned() {
                Some(m) => state.apply(SessionEvent::MatchSelected(m)),
                None => *status = format!("No match {} in the current list", id),
            },
            Err(_) => *status = "Usage: v <match-id>".to_string(),
        },
        "u" => {
            if rest.is_empty() {
                *status = "Usage: u <title>".to_string();
            } else {
                *status = "Uploading material and queuing AI agents...".to_string();
                dispatch_upload(client, tx, rest.to_string());
            }
        }
        _ => {
            *status = "Commands: m <id> | c <id> | v <id> | u <title> | r | q".to_string();
        }
    }

    true
}

fn dispatch_materials(
    client: &Arc<BackendClient>,
    tx: &UnboundedSender<WatchEvent>,
    preferred: Option<i64>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let materials = client.list_materials().await.into_data();
        let _ = tx.send(WatchEvent::Fetched(SessionEvent::MaterialsLoaded {
            materials,
            preferred,
        }));
    });
}

fn dispatch_concepts(client: &Arc<BackendClient>, tx: &UnboundedSender<WatchEvent>, material_id: i64) {
    debug!("Dispatching concept fetch for material {}", material_id);
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let concepts = client.list_concepts(material_id).await.into_data();
        let _ = tx.send(WatchEvent::Fetched(SessionEvent::ConceptsLoaded {
            material_id,
            concepts,
        }));
    });
}

fn dispatch_upload(client: &Arc<BackendClient>, tx: &UnboundedSender<WatchEvent>, title: String) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let payload = UploadPayload {
            title,
            notes: None,
            source: SourceKind::Upload,
            file: None,
        };
        let result = client
            .upload_material(&payload)
            .await
            .map_err(|e| format!("{:#}", e));
        let _ = tx.send(WatchEvent::UploadFinished(result));
    });
}

fn render(state: &SessionState, status: &str, last_upload: Option<Instant>, config: &Config) {
    println!();
    println!("================ study scout ================");
    println!("Status: {}", status);

    println!();
    println!("Materials:");
    if state.materials().is_empty() {
        println!("  (none yet — `u <title>` to upload)");
    }
    for material in state.materials() {
        let marker = if state.selected_material_id() == Some(material.id) {
            '*'
        } else {
            ' '
        };
        println!(
            "{} [{}] {}  {}  {}",
            marker,
            material.id,
            material.title,
            material.status.as_str(),
            material.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    println!();
    println!("Concepts ({} extracted):", state.concepts().len());
    for concept in state.concepts() {
        let marker = if state.selected_concept_id() == Some(concept.id) {
            '*'
        } else {
            ' '
        };
        let coverage = if concept.matches.is_empty() {
            "no matches".to_string()
        } else {
            format!("{} matches", concept.matches.len())
        };
        println!("{} [{}] {} ({})", marker, concept.id, concept.title, coverage);
    }

    println!();
    let matches = state.matches();
    println!("Matches ({}):", matches.len());
    for m in matches.iter().take(config.watch.max_matches_shown) {
        let marker = if state.selected_match().map(|s| s.id) == Some(m.id) {
            '*'
        } else {
            ' '
        };
        println!(
            "{} [{}] {} — {}  {:.0}s–{:.0}s  {:.2}",
            marker, m.id, m.video_title, m.channel_title, m.start_seconds, m.end_seconds, m.similarity
        );
    }
    if matches.len() > config.watch.max_matches_shown {
        println!("  ... {} more", matches.len() - config.watch.max_matches_shown);
    }

    if let Some(m) = state.selected_match() {
        println!();
        println!("Preview: {}", m.watch_url());
        println!("  \"{}\"", m.segment_text);
    }

    let advisories = build_advisories(&state.signals(upload_minutes(last_upload)));
    if !advisories.is_empty() {
        println!();
        println!("Advisories:");
        for advisory in &advisories {
            println!("  [{}] {} — {}", advisory.id, advisory.agent, advisory.message);
        }
    }

    println!();
    println!("Commands: m <id> | c <id> | v <id> | u <title> | r | q");
}

fn upload_minutes(last_upload: Option<Instant>) -> Option<f64> {
    last_upload.map(|at| at.elapsed().as_secs_f64() / 60.0)
}
