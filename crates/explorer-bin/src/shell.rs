// Line-oriented front end: a tiny command shell, or JSON lines with --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use explorer_core::handler::RequestHandler;
use explorer_core::listing::{DirectoryNode, EntryKind};
use explorer_core::protocol::{Request, Response};

const HELP: &str = "\
commands:
  ls [path]        list a directory (default: current)
  open <name>      enter a directory or view a file (alias: cd)
  back             return to the previous directory
  refresh          re-read the current directory
  touch <name>     create an empty file
  mkdir <name>     create a directory
  rm <name>        delete a file or a directory tree
  rmfile <name>    delete a file
  rmdir <name>     delete a directory tree
  pwd              show the session status (alias: status)
  help             show this text
  quit             leave (alias: exit)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Request(Request),
    Help,
    Quit,
}

/// Parse one shell line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let name = || {
        if rest.is_empty() {
            Err(format!("{word}: missing name"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word {
        "ls" => Command::Request(Request::List {
            path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "open" | "cd" => Command::Request(Request::Open { name: name()? }),
        "back" => Command::Request(Request::Back),
        "refresh" => Command::Request(Request::Refresh),
        "touch" => Command::Request(Request::CreateFile { name: name()? }),
        "mkdir" => Command::Request(Request::CreateDirectory { name: name()? }),
        "rm" => Command::Request(Request::Delete { name: name()? }),
        "rmfile" => Command::Request(Request::DeleteFile { name: name()? }),
        "rmdir" => Command::Request(Request::DeleteDirectory { name: name()? }),
        "pwd" | "status" => Command::Request(Request::Status),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn render_listing(node: &DirectoryNode) -> String {
    let mut out = format!("{}\n", node.path.display());
    for entry in &node.children {
        match entry.kind {
            EntryKind::Directory => out.push_str(&format!("  d {}/\n", entry.name)),
            EntryKind::File => out.push_str(&format!("  - {}\n", entry.name)),
        }
    }
    for bad in &node.degraded {
        out.push_str(&format!(
            "  ? {} ({})\n",
            bad.name.as_deref().unwrap_or("<unreadable>"),
            bad.reason
        ));
    }
    if node.children.is_empty() && node.degraded.is_empty() {
        out.push_str("  (empty)\n");
    }
    out
}

/// Human-readable rendering of a response
pub fn render(response: &Response) -> String {
    match response {
        Response::Listing { node } => render_listing(node),
        Response::EnteredDirectory { path } => format!("entered {}\n", path.display()),
        Response::FileToView { path } => format!("file: {}\n", path.display()),
        Response::NewDirectory { path } => format!("back in {}\n", path.display()),
        Response::NoHistory => "no previous directory\n".to_string(),
        Response::Created { path } => format!("created {}\n", path.display()),
        Response::Deleted { path } => format!("deleted {}\n", path.display()),
        Response::DeletedCount {
            path,
            deleted_count,
        } => format!("deleted {} ({} entries)\n", path.display(), deleted_count),
        Response::Status { status } => format!(
            "root:    {}\ncurrent: {}\nhistory: {}\n{}",
            status.root.display(),
            status.current.display(),
            status.history_depth,
            render_listing(&status.snapshot)
        ),
        Response::Error { message, .. } => format!("error: {message}\n"),
    }
}

pub async fn run_interactive(handler: &RequestHandler) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let status = handler.handle(Request::Status).await;
    stdout.write_all(render(&status).as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let output = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => format!("{HELP}\n"),
            Ok(Some(Command::Request(request))) => render(&handler.handle(request).await),
            Err(message) => format!("{message}\n"),
        };
        stdout.write_all(output.as_bytes()).await?;
    }

    Ok(())
}

pub async fn run_json(handler: &RequestHandler) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match Request::parse_json(&line) {
            Ok(request) => handler.handle(request).await,
            Err(e) => {
                warn!("invalid request: {}", e);
                Response::error(format!("invalid request: {e}"), "bad_request")
            }
        };

        let mut encoded = response.to_json()?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
