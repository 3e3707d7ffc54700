//! Line-oriented terminal front end
//!
//! Input, planning state changes and chat replies are multiplexed so a
//! pending call never blocks typing.

use crate::chat::{ChatMessage, ChatSession, Role};
use crate::config::PlannerConfig;
use crate::itinerary::{self, ExportFormat, PlanSections, EXAMPLE_REQUESTS};
use crate::planning::{PlanState, PlanningController};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

const HELP: &str = "\
Commands:
  /plan <description>     plan a trip
  /chat <message>         chat (bare text also chats)
  /examples               list example requests
  /example <n>            plan example n
  /history [n]            show recent requests
  /sections               show the current plan by section
  /steps                  show the agent's intermediate steps
  /export txt|json [dir]  save the latest plan
  /dismiss                clear the current result
  /transcript             show the chat so far
  /status                 show what is in flight
  /help                   show this help
  /quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Plan(String),
    Chat(String),
    Examples,
    Example(usize),
    History(Option<usize>),
    Sections,
    Steps,
    Export { format: ExportFormat, dir: PathBuf },
    Dismiss,
    Transcript,
    Status,
    Help,
    Quit,
    Nothing,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Nothing);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Chat(line.to_string()));
        };

        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(n, a)| (n, a.trim()));

        match name {
            "plan" => Ok(Command::Plan(arg.to_string())),
            "chat" => Ok(Command::Chat(arg.to_string())),
            "examples" => Ok(Command::Examples),
            "example" => arg
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=EXAMPLE_REQUESTS.len()).contains(n))
                .map(Command::Example)
                .ok_or_else(|| format!("Pick an example between 1 and {}", EXAMPLE_REQUESTS.len())),
            "history" if arg.is_empty() => Ok(Command::History(None)),
            "history" => arg
                .parse()
                .map(|n| Command::History(Some(n)))
                .map_err(|_| format!("Not a number: {arg}")),
            "sections" => Ok(Command::Sections),
            "steps" => Ok(Command::Steps),
            "export" => {
                let mut parts = arg.split_whitespace();
                let format = parts
                    .next()
                    .and_then(ExportFormat::parse)
                    .ok_or_else(|| "Usage: /export txt|json [dir]".to_string())?;
                let dir = parts.next().map_or_else(|| PathBuf::from("."), PathBuf::from);
                Ok(Command::Export { format, dir })
            }
            "dismiss" => Ok(Command::Dismiss),
            "transcript" => Ok(Command::Transcript),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command /{other}. Type /help.")),
        }
    }
}

/// What the user sees after a planning state change
pub fn render_state(state: &PlanState) -> Option<String> {
    match state {
        PlanState::Idle => None,
        PlanState::Pending { request, .. } => Some(format!("Planning your trip: {request} ...")),
        PlanState::Success { trip_plan, .. } => {
            Some(format!("Trip planned successfully!\n\n{trip_plan}"))
        }
        PlanState::Error { message, .. } => {
            let label = state.error_label().map_or("Error", |l| l.title());
            Some(format!("{label}: {message}"))
        }
    }
}

pub fn render_chat(message: &ChatMessage) -> Option<String> {
    match message.role {
        Role::Assistant => Some(format!("assistant> {}", message.content)),
        Role::User => None,
    }
}

pub struct Repl {
    config: PlannerConfig,
    controller: PlanningController,
    chat: ChatSession,
}

enum Flow {
    Continue,
    Quit,
}

impl Repl {
    pub fn new(config: PlannerConfig, controller: PlanningController, chat: ChatSession) -> Self {
        Self {
            config,
            controller,
            chat,
        }
    }

    pub async fn run(self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut plan_rx = self.controller.subscribe();
        let mut chat_rx = self.chat.subscribe();

        println!("AI Travel Planner ({})", self.config.endpoint);
        println!("Describe your trip with /plan, or just chat. /help for more.");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if matches!(self.handle_line(&line), Flow::Quit) {
                        break;
                    }
                }
                changed = plan_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = plan_rx.borrow_and_update().clone();
                    if let Some(text) = render_state(&state) {
                        println!("{text}");
                    }
                }
                message = chat_rx.recv() => match message {
                    Ok(message) => {
                        if let Some(text) = render_chat(&message) {
                            println!("{text}");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Chat display fell behind");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        Ok(())
    }

    fn handle_line(&self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(command) => self.execute(command),
            Err(message) => {
                println!("{message}");
                Flow::Continue
            }
        }
    }

    fn execute(&self, command: Command) -> Flow {
        match command {
            Command::Plan(text) => self.plan(&text),
            Command::Example(n) => {
                let (_, request) = EXAMPLE_REQUESTS[n - 1];
                self.plan(request);
            }
            Command::Chat(text) => {
                if let Err(e) = self.chat.send(&text) {
                    println!("{e}");
                }
            }
            Command::Examples => {
                for (i, (title, request)) in EXAMPLE_REQUESTS.iter().enumerate() {
                    println!("  {}. {title}: {request}", i + 1);
                }
            }
            Command::History(limit) => {
                let history = self.controller.history();
                if history.is_empty() {
                    println!("No planning history yet.");
                }
                for line in history.numbered(limit.unwrap_or(self.config.history_view)) {
                    println!("{line}");
                }
            }
            Command::Sections => match self.controller.state() {
                PlanState::Success { trip_plan, .. } => {
                    for (section, text) in PlanSections::parse(&trip_plan).non_empty() {
                        println!("== {} ==\n{}", section.title(), text.trim_end());
                    }
                }
                _ => println!("No plan to show."),
            },
            Command::Steps => match self.controller.state() {
                PlanState::Success { steps, .. } => {
                    println!("{}", itinerary::render_steps(steps.as_deref().unwrap_or_default()));
                }
                _ => println!("No plan to show."),
            },
            Command::Export { format, dir } => match self.controller.history().latest() {
                Some(entry) => match itinerary::write_export(&dir, format, &entry) {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(e) => println!("Export failed: {e}"),
                },
                None => println!("Nothing to export yet."),
            },
            Command::Dismiss => {
                if let Err(e) = self.controller.dismiss() {
                    println!("{e}");
                }
            }
            Command::Transcript => {
                if self.chat.is_empty() {
                    println!("No messages yet.");
                }
                for message in self.chat.transcript() {
                    let who = match message.role {
                        Role::User => "you",
                        Role::Assistant => "assistant",
                    };
                    println!("{who}> {}", message.content);
                }
            }
            Command::Status => {
                println!(
                    "plan: {}{} | chat: {} messages{} | history: {} plans",
                    self.controller.state().name(),
                    if self.controller.is_pending() { " (waiting)" } else { "" },
                    self.chat.len(),
                    if self.chat.is_loading() { " (waiting)" } else { "" },
                    self.controller.history().len(),
                );
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
            Command::Nothing => {}
        }
        Flow::Continue
    }

    fn plan(&self, text: &str) {
        // The JoinHandle is dropped; the outcome arrives through the watch channel
        if let Err(e) = self.controller.submit(text) {
            println!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/plan  Plan a 3-day trip to Goa ").unwrap(),
            Command::Plan("Plan a 3-day trip to Goa".to_string())
        );
        assert_eq!(Command::parse("hello there").unwrap(), Command::Chat("hello there".to_string()));
        assert_eq!(Command::parse("/chat hi").unwrap(), Command::Chat("hi".to_string()));
        assert_eq!(Command::parse("   ").unwrap(), Command::Nothing);
        assert_eq!(Command::parse("/history").unwrap(), Command::History(None));
        assert_eq!(Command::parse("/history 3").unwrap(), Command::History(Some(3)));
        assert_eq!(Command::parse("/example 2").unwrap(), Command::Example(2));
        assert_eq!(Command::parse("/quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("/status").unwrap(), Command::Status);
        assert_eq!(Command::parse("/transcript").unwrap(), Command::Transcript);
        assert_eq!(
            Command::parse("/export json /tmp/out").unwrap(),
            Command::Export {
                format: ExportFormat::Json,
                dir: PathBuf::from("/tmp/out")
            }
        );
        assert_eq!(
            Command::parse("/export txt").unwrap(),
            Command::Export {
                format: ExportFormat::Text,
                dir: PathBuf::from(".")
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("/example 9").is_err());
        assert!(Command::parse("/history lots").is_err());
        assert!(Command::parse("/export pdf").is_err());
        assert!(Command::parse("/teleport").is_err());
    }

    #[test]
    fn test_plan_with_no_text_reaches_guard() {
        // Blank text is left for the controller to reject
        assert_eq!(Command::parse("/plan").unwrap(), Command::Plan(String::new()));
    }

    #[test]
    fn test_render_state() {
        assert_eq!(render_state(&PlanState::Idle), None);
        assert_eq!(
            render_state(&PlanState::Error {
                request: "Goa".to_string(),
                message: "GROQ_API_KEY missing".to_string()
            })
            .unwrap(),
            "Agent unavailable: GROQ_API_KEY missing"
        );
        assert_eq!(
            render_state(&PlanState::Error {
                request: "Goa".to_string(),
                message: "Request failed (500)".to_string()
            })
            .unwrap(),
            "Error: Request failed (500)"
        );
        assert!(render_state(&PlanState::Success {
            request: "Goa".to_string(),
            trip_plan: "Day 1: Arrive...".to_string(),
            steps: None,
        })
        .unwrap()
        .ends_with("Day 1: Arrive..."));
    }

    #[test]
    fn test_render_chat_only_assistant() {
        assert_eq!(render_chat(&ChatMessage::user("hi")), None);
        assert_eq!(
            render_chat(&ChatMessage::assistant("hello")).unwrap(),
            "assistant> hello"
        );
    }
}
