//! Ferry file transfer client

mod args;
mod constants;
mod session;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::net::TcpStream;

use args::Args;
use constants::*;
use session::{Session, ServerReply, sanitize_file_name};

/// The interactive session type over a TCP stream
type TcpSession = Session<
    BufReader<tokio::net::tcp::OwnedReadHalf>,
    tokio::net::tcp::OwnedWriteHalf,
>;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!("Ferry client v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = std::fs::create_dir_all(&args.downloads) {
        eprintln!("{}{}: {}", ERR_CREATE_DOWNLOAD_DIR, args.downloads.display(), e);
        process::exit(1);
    }

    let addr = format!("{}:{}", args.host, args.port);
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("{}{}: {}", ERR_CONNECT, addr, e);
            process::exit(1);
        }
    };
    let _ = stream.set_nodelay(true);
    println!("{}{}", MSG_CONNECTED, addr);

    let (read_half, write_half) = stream.into_split();
    let mut session = Session::new(BufReader::new(read_half), write_half);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(PROMPT_MENU);
        let Some(choice) = read_line(&mut lines).await else {
            // stdin closed; leave cleanly
            let _ = session.disconnect().await;
            break;
        };

        let result = match choice.trim() {
            "1" => download(&mut session, &mut lines, &args.downloads).await,
            "2" => upload(&mut session, &mut lines, args.debug).await,
            "3" => list(&mut session).await,
            "4" => {
                let result = session.disconnect().await;
                if let Err(e) = result {
                    eprintln!("Disconnect error: {}", e);
                }
                println!("{}", MSG_GOODBYE);
                break;
            }
            other => {
                println!("Unknown option: '{}'", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("Session error: {}", e);
            break;
        }
    }
}

/// Download one file into the downloads directory
///
/// The local overwrite decision happens before anything goes on the wire,
/// so a declined overwrite costs the server nothing.
async fn download(
    session: &mut TcpSession,
    lines: &mut Lines<BufReader<Stdin>>,
    downloads: &Path,
) -> std::io::Result<()> {
    prompt(PROMPT_REMOTE_NAME);
    let Some(input) = read_line(lines).await else {
        return Ok(());
    };
    let name = input.trim();
    if name.is_empty() {
        println!("No file name given.");
        return Ok(());
    }

    let target = downloads.join(sanitize_file_name(name));
    if target.exists() {
        prompt(&format!("'{}' {}", target.display(), PROMPT_OVERWRITE_LOCAL));
        let Some(answer) = read_line(lines).await else {
            return Ok(());
        };
        if !is_yes(&answer) {
            println!("{}", MSG_DOWNLOAD_CANCELLED);
            return Ok(());
        }
    }

    match session.request_download(name).await? {
        ServerReply::Ready => {
            let bytes = session.receive_file(&target).await?;
            println!("Downloaded '{}' ({} bytes) to {}", name, bytes, target.display());
        }
        ServerReply::Status(status) => println!("{}", status),
        ServerReply::Exists => println!("Unexpected reply from server"),
    }
    Ok(())
}

/// Upload one local file under its sanitized base name
async fn upload(
    session: &mut TcpSession,
    lines: &mut Lines<BufReader<Stdin>>,
    debug: bool,
) -> std::io::Result<()> {
    prompt(PROMPT_LOCAL_PATH);
    let Some(input) = read_line(lines).await else {
        return Ok(());
    };
    let source = PathBuf::from(input.trim());

    let is_file = std::fs::metadata(&source)
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        println!("{}{}", ERR_LOCAL_FILE, source.display());
        return Ok(());
    }

    let Some(base_name) = source.file_name() else {
        println!("{}{}", ERR_LOCAL_FILE, source.display());
        return Ok(());
    };
    let file_name = sanitize_file_name(&base_name.to_string_lossy());

    let reply = session.request_upload(&file_name).await?;
    let reply = match reply {
        ServerReply::Exists => {
            prompt(&format!("'{}' {}", file_name, PROMPT_OVERWRITE_REMOTE));
            let confirmed = match read_line(lines).await {
                Some(answer) => is_yes(&answer),
                None => false,
            };
            if confirmed {
                session.confirm_overwrite().await?
            } else {
                let notice = session.decline_overwrite().await?;
                println!("{} ({})", MSG_UPLOAD_DECLINED, notice);
                return Ok(());
            }
        }
        reply => reply,
    };

    match reply {
        ServerReply::Ready => {
            let (bytes, status) = session.send_file(&source).await?;
            if debug {
                println!("Sent {} payload byte(s)", bytes);
            }
            println!("{}", status);
        }
        ServerReply::Status(status) => println!("{}", status),
        ServerReply::Exists => println!("Unexpected reply from server"),
    }
    Ok(())
}

/// Print the server's file listing
async fn list(session: &mut TcpSession) -> std::io::Result<()> {
    let listing = session.list().await?;
    println!("\n{}", listing);
    Ok(())
}

/// Print a prompt without a trailing newline
fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

/// Read one line from stdin, mapping close and errors to `None`
async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    lines.next_line().await.ok().flatten()
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
