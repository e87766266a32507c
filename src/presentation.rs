//! Terminal presentation layer
//!
//! Reads intents from stdin, forwards them to the session store and renders
//! snapshots. It never mutates session state itself.

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::config::Config;
use crate::error::ExplorerError;
use crate::models::{Connectivity, RetrievalMode, Role, SearchRequest, SearchResult, SessionState};
use crate::services::SessionStore;

const HELP: &str = "\
Type a question to search. Commands:
  :mode <dense|sparse|hybrid>     set retrieval mode
  :role <intern|employee|manager|executive>
  :rerank <on|off>                toggle reranking
  :topk <n>                       number of chunks to retrieve
  :results                        show current results (and history while open)
  :history / :close               open or close search history
  :replay <n>                     bring history entry n back to the top
  :dismiss                        dismiss the error banner
  :status                         service and session status
  :help / :quit";

/// User intents recognised at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    SetMode(RetrievalMode),
    SetRole(Role),
    SetRerank(bool),
    SetTopK(u32),
    Results,
    History,
    CloseHistory,
    Replay(usize),
    Dismiss,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Some(Command::Search(line.to_string())));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let command = match name.as_str() {
        "mode" => RetrievalMode::from_str(arg).map(Command::SetMode).ok_or_else(|| {
            let known: Vec<&str> = RetrievalMode::ALL.iter().map(|m| m.as_str()).collect();
            format!("Unknown retrieval mode '{}' ({})", arg, known.join(", "))
        })?,
        "role" => Role::from_str(arg).map(Command::SetRole).ok_or_else(|| {
            let known: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
            format!("Unknown role '{}' ({})", arg, known.join(", "))
        })?,
        "rerank" => match arg.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => Command::SetRerank(true),
            "off" | "false" | "no" => Command::SetRerank(false),
            _ => return Err(format!("Expected on or off, got '{}'", arg)),
        },
        "topk" => match arg.parse::<u32>() {
            Ok(k) if k >= 1 => Command::SetTopK(k),
            _ => return Err(format!("top_k must be a positive integer, got '{}'", arg)),
        },
        "replay" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Replay(n),
            _ => return Err(format!("Expected a history entry number, got '{}'", arg)),
        },
        "results" => Command::Results,
        "history" => Command::History,
        "close" => Command::CloseHistory,
        "dismiss" => Command::Dismiss,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command ':{}', try :help", other)),
    };

    Ok(Some(command))
}

/// The settings a new search is submitted with
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub mode: RetrievalMode,
    pub role: Role,
    pub rerank: bool,
    pub top_k: u32,
}

impl SearchForm {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.default_mode,
            role: config.default_role,
            rerank: config.default_rerank,
            top_k: config.default_top_k,
        }
    }

    pub fn request(&self, query: &str) -> SearchRequest {
        SearchRequest::new(query, self.mode, self.role, self.rerank).with_top_k(self.top_k)
    }

    pub fn describe(&self) -> String {
        format!(
            "mode={} role={} rerank={} top_k={}",
            self.mode,
            self.role,
            if self.rerank { "on" } else { "off" },
            self.top_k
        )
    }
}

pub fn render_result(index: usize, result: &SearchResult) -> String {
    let mut out = format!(
        "#{} \"{}\"  [{} | {} | rerank {}]  {}\n",
        index,
        result.query,
        result.mode,
        result.role,
        if result.rerank { "on" } else { "off" },
        result.timestamp.with_timezone(&Local).format("%H:%M:%S"),
    );
    out.push_str(&format!("  Answer: {}\n", result.answer_text));

    if result.chunks.is_empty() {
        out.push_str("  (no supporting chunks)\n");
    }
    for chunk in &result.chunks {
        out.push_str(&format!(
            "  - {} (score {:.2})\n    {}\n",
            chunk.source, chunk.score, chunk.content
        ));
    }
    out
}

pub fn render_results(state: &SessionState) -> String {
    if state.active_results.is_empty() {
        return "No results yet. Type a question to search.".to_string();
    }
    state
        .active_results
        .iter()
        .enumerate()
        .map(|(i, r)| render_result(i + 1, r))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current results, followed by the history while the history view is open
pub fn render_session(state: &SessionState) -> String {
    let results = render_results(state);
    if state.history_open {
        format!("{}\n\n{}", results, render_history(state))
    } else {
        results
    }
}

pub fn render_history(state: &SessionState) -> String {
    if state.history.is_empty() {
        return "No searches yet. Your search history will appear here.".to_string();
    }

    let mut out = String::from("Search History\n");
    for (i, result) in state.history.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {}  [{} | {}]  {}\n",
            i + 1,
            result.query,
            result.mode,
            result.role,
            result.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        ));
    }
    let n = state.history.len();
    out.push_str(&format!(
        "{} search{} in this session",
        n,
        if n == 1 { "" } else { "es" }
    ));
    out
}

pub fn render_status(state: &SessionState) -> String {
    let connectivity = match state.connectivity {
        Connectivity::Healthy => "Connected",
        Connectivity::Unreachable => "Disconnected",
        Connectivity::Unknown => "Checking...",
    };

    let mut out = format!("API status: {}", connectivity);
    if state.is_loading {
        out.push_str("\nSearching your knowledge base...");
    }
    if let Some(error) = &state.last_error {
        out.push('\n');
        out.push_str(&render_error(error));
    }
    out
}

pub fn render_error(error: &str) -> String {
    format!("Error: {}  (:dismiss to clear)", error)
}

/// Interactive loop; returns when stdin closes or the user quits
pub async fn run(store: SessionStore, config: &Config) -> anyhow::Result<()> {
    let mut form = SearchForm::from_config(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Explore your knowledge base ({}). :help for commands.", form.describe());

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        debug!(?command, "Dispatching intent");

        match command {
            Command::Search(query) => {
                if store.snapshot().await.is_loading {
                    println!("A search is already running; wait for it to finish.");
                    continue;
                }
                spawn_search(store.clone(), form.request(&query));
            }
            Command::SetMode(mode) => {
                form.mode = mode;
                println!("{}", form.describe());
            }
            Command::SetRole(role) => {
                form.role = role;
                println!("{}", form.describe());
            }
            Command::SetRerank(rerank) => {
                form.rerank = rerank;
                println!("{}", form.describe());
            }
            Command::SetTopK(top_k) => {
                form.top_k = top_k;
                println!("{}", form.describe());
            }
            Command::Results => println!("{}", render_session(&store.snapshot().await)),
            Command::History => {
                store.open_history().await;
                println!("{}", render_history(&store.snapshot().await));
            }
            Command::CloseHistory => {
                if store.snapshot().await.history_open {
                    store.close_history().await;
                    println!("History closed.");
                } else {
                    println!("History is not open.");
                }
            }
            Command::Replay(n) => {
                let snapshot = store.snapshot().await;
                let id = snapshot.history.get(n - 1).map(|r| r.id.clone());
                match id {
                    Some(id) => match store.replay(&id).await {
                        Ok(result) => {
                            if snapshot.history_open {
                                println!("History closed.");
                            }
                            println!("{}", render_result(1, &result));
                        }
                        Err(e) => println!("{}", e),
                    },
                    None => println!("No history entry #{}", n),
                }
            }
            Command::Dismiss => store.dismiss_error().await,
            Command::Status => {
                println!("{}", render_status(&store.snapshot().await));
                println!("{}", form.describe());
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn spawn_search(store: SessionStore, request: SearchRequest) {
    println!("Searching your knowledge base...");
    tokio::spawn(async move {
        match store.submit(request).await {
            Ok(result) => println!("{}", render_result(1, &result)),
            Err(ExplorerError::Validation(message)) => println!("{}", message),
            Err(ExplorerError::Busy) => {
                println!("A search is already running; wait for it to finish.")
            }
            Err(_) => {
                if let Some(error) = store.snapshot().await.last_error {
                    println!("{}", render_error(&error));
                }
            }
        }
    });
}
