//! Line-oriented terminal front end.
//!
//! Renders one [`Screen`] built from the server's [`SessionView`], the last
//! error message and the heartbeat flag. Commands:
//!
//! - four digits: submit a guess
//! - `new [10|15|20|0]`: start a new game
//! - `history`: refresh the guess log
//! - `reset`: discard the current game
//! - `quit`: exit

use crate::client::RestGameClient;
use crate::heartbeat::Heartbeat;
use crate::view::{Phase, SessionView};
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use strictly_bulls_cows::{AttemptLimit, Code};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a guess as typed.
    Guess(String),
    /// Start a new game, optionally with a new limit.
    New(Option<u32>),
    /// Refresh the history.
    History,
    /// Discard the current game.
    Reset,
    /// Exit.
    Quit,
    /// A command that could not be understood, with the message to show.
    Invalid(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let first = words.next()?;
        Some(match first.to_lowercase().as_str() {
            "new" | "start" => match words.next() {
                None => Command::New(None),
                Some(w) => match w.parse() {
                    Ok(limit) => Command::New(Some(limit)),
                    Err(_) => Command::Invalid(format!(
                        "Attempt limit must be one of 10, 15, 20 or 0 (unlimited), got {w:?}"
                    )),
                },
            },
            "history" | "h" => Command::History,
            "reset" => Command::Reset,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Guess(first.to_string()),
        })
    }
}

/// Everything the terminal shows, derived from one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Session view from the server.
    pub view: SessionView,
    /// Last error to show, cleared by the next accepted intent.
    pub error: Option<String>,
    /// Heartbeat status.
    pub connected: bool,
}

impl Screen {
    /// Empty screen before any game.
    pub fn new() -> Self {
        Self {
            view: SessionView::not_started(),
            error: None,
            connected: false,
        }
    }

    /// Renders the screen as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "== Which Number Am I? ==  [{}]\n",
            if self.connected { "Connected" } else { "Offline" }
        ));

        match self.view.phase {
            Phase::NotStarted => {
                let menu: Vec<String> = AttemptLimit::menu().map(AttemptLimit::label).collect();
                out.push_str(&format!(
                    "No game running. Type `new <limit>` with limit one of {} (0 = ∞).\n",
                    menu.join(", ")
                ));
            }
            Phase::Playing | Phase::Finished => {
                if let Some(remaining) = self.view.attempts_remaining {
                    out.push_str(&format!("Attempts remaining: {remaining}\n"));
                }
                for (i, record) in self.view.guesses.iter().enumerate() {
                    out.push_str(&format!(
                        "{:>3}. {}  digits: {}  positions: {}\n",
                        i + 1,
                        record.guess,
                        record.digits_correct,
                        record.positions_correct
                    ));
                }
            }
        }

        if let Some(result) = &self.view.result {
            out.push_str(&format!("{result}\n"));
        }
        if let Some(secret) = &self.view.secret {
            out.push_str(&format!("The number was {secret}\n"));
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        out
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the interactive loop against `client` until `quit` or end of input.
#[instrument(skip(client), fields(server = %client.base_url()))]
pub async fn run(client: RestGameClient, limit: AttemptLimit, heartbeat_every: Duration) -> Result<()> {
    let heartbeat = Heartbeat::spawn(format!("{}/", client.base_url()), heartbeat_every);
    let mut screen = Screen::new();
    let mut limit = limit;

    match client.start(limit).await {
        Ok(_) => refresh(&client, &mut screen).await,
        Err(e) => {
            debug!(error = %e, "Start failed");
            screen.error = Some("Failed to start game. Please try again.".to_string());
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        screen.connected = heartbeat.is_connected();
        print!("{}> ", screen.render());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Invalid(message) => screen.error = Some(message),
            Command::New(requested) => {
                if let Some(raw) = requested {
                    match AttemptLimit::try_from(raw) {
                        Ok(l) => limit = l,
                        Err(e) => {
                            screen.error = Some(e.to_string());
                            continue;
                        }
                    }
                }
                match client.start(limit).await {
                    Ok(_) => {
                        screen.error = None;
                        refresh(&client, &mut screen).await;
                    }
                    Err(e) => screen.error = Some(describe(&e, "start game")),
                }
            }
            Command::Guess(raw) => {
                // Catch typos locally before a round trip.
                if let Err(e) = Code::parse(&raw) {
                    screen.error = Some(e.to_string());
                    continue;
                }
                match client.guess(&raw).await {
                    Ok(response) => {
                        info!(outcome = %response.outcome, "Guess accepted");
                        screen.error = None;
                        refresh(&client, &mut screen).await;
                    }
                    Err(e) => screen.error = Some(describe(&e, "submit guess")),
                }
            }
            Command::History => refresh(&client, &mut screen).await,
            Command::Reset => match client.reset().await {
                Ok(()) => {
                    screen.error = None;
                    screen.view = SessionView::not_started();
                }
                Err(e) => screen.error = Some(describe(&e, "reset game")),
            },
        }
    }

    info!("Leaving game");
    Ok(())
}

async fn refresh(client: &RestGameClient, screen: &mut Screen) {
    match client.state().await {
        Ok(view) => screen.view = view,
        Err(e) => screen.error = Some(describe(&e, "refresh game")),
    }
}

fn describe(err: &crate::client::ClientError, action: &str) -> String {
    if err.is_transport() {
        format!("Failed to {action}. Please try again.")
    } else {
        err.to_string()
    }
}
