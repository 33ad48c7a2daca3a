//! Interactive command loop
//!
//! Reads lines from the user, cleans them into words and dispatches the first
//! word through a `CommandRegistry`. Command failures are printed and the loop
//! keeps going; only `exit` or end of input stop it.

use std::collections::BTreeMap;
use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::data::{Boundary, CatalogClient, CatalogError, Cursor, LocationAreaPage, Navigation};

/// Prompt printed before each line of input
pub const PROMPT: &str = "Pokedex > ";

/// Trims, lowercases and splits a line of input into words
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Which handler a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
}

/// A named command available at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

/// Table of the commands accepted at the prompt, keyed by name
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Command>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a registry holding every built-in command
    pub fn new() -> Self {
        let commands = [
            Command {
                name: "help",
                description: "Displays a help message",
                kind: CommandKind::Help,
            },
            Command {
                name: "exit",
                description: "Exit the Pokedex",
                kind: CommandKind::Exit,
            },
            Command {
                name: "map",
                description: "Displays the next 20 location areas",
                kind: CommandKind::Map,
            },
            Command {
                name: "mapb",
                description: "Displays the previous 20 location areas",
                kind: CommandKind::MapBack,
            },
            Command {
                name: "explore",
                description: "Lists the Pokemon found in a location area: explore <area>",
                kind: CommandKind::Explore,
            },
        ];

        Self {
            commands: commands.into_iter().map(|c| (c.name, c)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Commands in name order
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

/// Errors a command handler can report to the loop
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command was called with the wrong arguments
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Writing to the output failed
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Whether the loop should keep reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Mutable state shared by every command of one interactive session
#[derive(Debug)]
pub struct Session {
    pub client: CatalogClient,
    pub cursor: Cursor,
}

impl Session {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            cursor: Cursor::new(),
        }
    }

    /// Runs one command with its arguments, writing user-facing text to `out`
    pub async fn execute<W: Write>(
        &mut self,
        registry: &CommandRegistry,
        command: &Command,
        args: &[String],
        out: &mut W,
    ) -> Result<Outcome, CommandError> {
        match command.kind {
            CommandKind::Help => {
                writeln!(out, "Welcome to the Pokedex!")?;
                writeln!(out, "Usage:")?;
                writeln!(out)?;
                for command in registry.iter() {
                    writeln!(out, "{}: {}", command.name, command.description)?;
                }
                Ok(Outcome::Continue)
            }
            CommandKind::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                Ok(Outcome::Exit)
            }
            CommandKind::Map => {
                let navigation = self.client.advance(&mut self.cursor).await?;
                print_navigation(&navigation, out)?;
                Ok(Outcome::Continue)
            }
            CommandKind::MapBack => {
                let navigation = self.client.rewind(&mut self.cursor).await?;
                print_navigation(&navigation, out)?;
                Ok(Outcome::Continue)
            }
            CommandKind::Explore => {
                let [area] = args else {
                    return Err(CommandError::Usage("explore <area>"));
                };
                writeln!(out, "Exploring {area}...")?;
                let detail = self.client.get_area(area).await?;
                writeln!(out, "Found Pokemon:")?;
                for (name, _) in detail.pokemon() {
                    writeln!(out, " - {name}")?;
                }
                Ok(Outcome::Continue)
            }
        }
    }
}

fn print_navigation<W: Write>(navigation: &Navigation, out: &mut W) -> io::Result<()> {
    match navigation {
        Navigation::Page(page) => print_page(page, out),
        Navigation::Boundary(Boundary::FirstPage) => writeln!(out, "you're on the first page"),
        Navigation::Boundary(Boundary::LastPage) => writeln!(out, "you're on the last page"),
    }
}

fn print_page<W: Write>(page: &LocationAreaPage, out: &mut W) -> io::Result<()> {
    for name in page.names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Reads commands from `input` until `exit` or end of input
///
/// # Errors
/// Returns an error only if reading input or writing the prompt fails; command
/// failures are printed and the loop continues.
pub async fn run<R, W>(
    registry: &CommandRegistry,
    session: &mut Session,
    mut input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            // End of input (ctrl+d)
            writeln!(out)?;
            return Ok(());
        }

        // Undecodable bytes become U+FFFD rather than ending the session
        let line = String::from_utf8_lossy(&buf);
        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };

        let Some(command) = registry.get(name) else {
            writeln!(out, "Unknown command")?;
            continue;
        };

        match session.execute(registry, command, args, out).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => return Ok(()),
            Err(err) => {
                debug!(command = command.name, error = %err, "command failed");
                writeln!(out, "Error: {err}")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::data::HttpFetcher;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn create_session(base_url: &str) -> Session {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let fetcher = HttpFetcher::new(cache).expect("client should build");
        Session::new(CatalogClient::with_base_url(fetcher, base_url))
    }

    async fn run_script(session: &mut Session, script: &str) -> String {
        run_script_bytes(session, script.as_bytes()).await
    }

    async fn run_script_bytes(session: &mut Session, script: &[u8]) -> String {
        let registry = CommandRegistry::new();
        let mut out = Vec::new();
        run(&registry, session, script, &mut out)
            .await
            .expect("loop should not fail");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn test_clean_input() {
        let cases = [
            ("  hello  world  ", vec!["hello", "world"]),
            ("Charmander Bulbasaur PIKACHU", vec!["charmander", "bulbasaur", "pikachu"]),
            ("   Mixed   CASE   Words   ", vec!["mixed", "case", "words"]),
            ("", vec![]),
            ("\t \n", vec![]),
        ];

        for (input, expected) in cases {
            assert_eq!(clean_input(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let registry = CommandRegistry::new();

        assert_eq!(registry.get("map").map(|c| c.kind), Some(CommandKind::Map));
        assert_eq!(registry.get("mapb").map(|c| c.kind), Some(CommandKind::MapBack));
        assert!(registry.get("catch").is_none());

        let names: Vec<_> = registry.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["exit", "explore", "help", "map", "mapb"]);
    }

    #[tokio::test]
    async fn test_help_lists_all_commands_then_exit() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "HELP\nexit\nhelp\n").await;

        assert!(output.starts_with(PROMPT));
        assert!(output.contains("Welcome to the Pokedex!"));
        for name in ["help", "exit", "map", "mapb", "explore"] {
            assert!(output.contains(&format!("{name}: ")), "missing {name}");
        }
        assert!(output.contains("Goodbye!"));
        assert_eq!(output.matches("Welcome").count(), 1, "loop must stop at exit");
    }

    #[tokio::test]
    async fn test_unknown_and_empty_input() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "\n   \ncatch pikachu\n").await;

        assert_eq!(output.matches("Unknown command").count(), 1);
        assert_eq!(output.matches(PROMPT).count(), 4);
    }

    #[tokio::test]
    async fn test_mapb_before_map_reports_first_page() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "mapb\nexit\n").await;

        assert!(output.contains("you're on the first page"));
        assert!(!output.contains("Error"));
    }

    #[tokio::test]
    async fn test_explore_without_area_is_usage_error() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "explore\nexit\n").await;

        assert!(output.contains("Error: usage: explore <area>"));
        assert!(output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_map_and_explore_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": [
                    {"name": "canalave-city-area", "url": "u1"},
                    {"name": "eterna-city-area", "url": "u2"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/location-area/canalave-city-area"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pokemon_encounters": [
                    {"pokemon": {"name": "tentacool", "url": "p1"}}
                ]
            })))
            .mount(&server)
            .await;
        let mut session = create_session(&server.uri());

        let output = run_script(
            &mut session,
            "map\nmap\nexplore Canalave-City-Area\nexit\n",
        )
        .await;

        assert!(output.contains("canalave-city-area\neterna-city-area\n"));
        assert!(output.contains("you're on the last page"));
        assert!(output.contains("Exploring canalave-city-area..."));
        assert!(output.contains(" - tentacool"));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_printed_and_loop_continues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let mut session = create_session(&server.uri());

        let output = run_script(&mut session, "map\nhelp\n").await;

        assert!(output.contains("Error: bad status: 503"));
        assert!(output.contains("Welcome to the Pokedex!"));
        assert!(!session.cursor.is_loaded());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_loop() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script_bytes(&mut session, b"\xff\xfe\nhelp\nexit\n").await;

        assert!(output.contains("Unknown command"));
        assert!(output.contains("Welcome to the Pokedex!"));
        assert!(output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_last_line_without_newline_still_runs() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "exit").await;

        assert!(output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_loop() {
        let mut session = create_session("http://127.0.0.1:9");

        let output = run_script(&mut session, "").await;

        assert_eq!(output, format!("{PROMPT}\n"));
    }
}
