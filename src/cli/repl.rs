// Terminal front end.
//
// **Notice the pattern:**
// 1. Read a line from stdin
// 2. Call the chat session
// 3. Print whatever changed
//
// This layer is THIN - no business logic, just translation.

use crate::core::ai::{AiProvider, ChatSession, SubmitOutcome};
use crate::core::drive::DriveApi;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/link <url>` - load a different folder or document.
    Link(String),
    /// `/files` - list what the assistant can see.
    Files,
    /// `/quit` or `/exit`.
    Quit,
    /// Anything else is a question.
    Ask(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some(("/link", rest)) => Command::Link(rest.trim().to_string()),
        _ => match trimmed {
            "/link" => Command::Link(String::new()),
            "/files" => Command::Files,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Ask(line.to_string()),
        },
    }
}

fn prompt(label: &str) {
    print!("{}", label);
    let _ = std::io::stdout().flush();
}

async fn print_files<P: AiProvider, A: DriveApi + ?Sized>(session: &ChatSession<P, A>) {
    let files = session.files().await;
    if files.is_empty() {
        println!("No files loaded. The link may be invalid or inaccessible.");
        return;
    }

    for file in files.iter() {
        let marker = if file.is_full_content { "" } else { " (preview)" };
        println!(
            "  {} [{}] {} chars{}",
            file.name(),
            file.descriptor.mime_type,
            file.content.chars().count(),
            marker
        );
    }
}

async fn load<P: AiProvider, A: DriveApi + ?Sized>(session: &ChatSession<P, A>, link: &str) {
    println!("Loading {} ...", link);
    let count = session.load_link(link).await;
    println!("Loaded {} file(s).", count);
}

/// Runs the interactive loop until EOF or `/quit`.
pub async fn run<P: AiProvider, A: DriveApi + ?Sized>(
    session: &ChatSession<P, A>,
    initial_link: Option<String>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match initial_link {
        Some(link) => load(session, &link).await,
        None => loop {
            prompt("Paste a Google Drive folder or document link: ");
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            if !line.trim().is_empty() {
                load(session, line.trim()).await;
                break;
            }
        },
    }

    println!("Ask a question about your files. Commands: /link <url>, /files, /quit");

    loop {
        prompt("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Files => print_files(session).await,
            Command::Link(link) if link.is_empty() => println!("Usage: /link <url>"),
            Command::Link(link) => load(session, &link).await,
            Command::Ask(text) => {
                if session.submit(&text).await == SubmitOutcome::Ignored {
                    continue;
                }
                if let Some(reply) = session.history().await.last() {
                    println!("\n{}\n", reply.content);
                }
            }
        }
    }

    Ok(())
}
