//! Ferry file server

mod args;

use std::net::SocketAddr;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::sleep;

use args::Args;
use ferry_server::connection::{ConnectionParams, handle_connection};
use ferry_server::connection_tracker::ConnectionTracker;
use ferry_server::constants::*;
use ferry_server::files::init_storage_root;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Print banner first
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    // Setup storage root
    let storage_root = match init_storage_root(&args.root) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    // The root lives for the whole process; leaking it gives every session
    // task a 'static borrow without reference counting
    let storage_root: &'static Path = Box::leak(storage_root.into_boxed_path());
    println!("{}{}", MSG_STORAGE_ROOT, storage_root.display());

    // Setup network
    let bind_addr = SocketAddr::new(args.bind, args.port);
    let listener = match create_listener(bind_addr, args.backlog) {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("{}{}: {}", ERR_BIND, bind_addr, e);
            process::exit(1);
        }
    };
    println!("{}{}", MSG_LISTENING, bind_addr);

    let tracker = Arc::new(ConnectionTracker::new(args.max_sessions_per_ip));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let shutdown_signal = setup_shutdown_signal();

    tokio::select! {
        _ = shutdown_signal => {
            println!("{}", MSG_SHUTDOWN_RECEIVED);
        }

        // Accept loop
        _ = async {
            loop {
                match listener.accept().await {
                    Ok((socket, peer_addr)) => {
                        // Check the per-IP limit before spawning
                        let Some(guard) = tracker.try_acquire(peer_addr.ip()) else {
                            if args.debug {
                                eprintln!("{}{}", ERR_SESSION_LIMIT, peer_addr.ip());
                            }
                            continue;
                        };

                        // Control frames are small; don't batch them
                        let _ = socket.set_nodelay(true);

                        let params = ConnectionParams {
                            peer_addr,
                            storage_root,
                            debug: args.debug,
                            shutdown: shutdown_rx.clone(),
                        };

                        tokio::spawn(async move {
                            let _guard = guard;
                            handle_connection(socket, params).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("{}{}", ERR_ACCEPT, e);
                    }
                }
            }
        } => {}
    }

    // Stop accepting, tell sessions to wind down, then wait for the drain
    drop(listener);
    let _ = shutdown_tx.send(true);

    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while tracker.total_sessions() > 0 && Instant::now() < deadline {
        sleep(SHUTDOWN_POLL_INTERVAL).await;
    }

    if tracker.total_sessions() > 0 {
        eprintln!("{}", WARN_SHUTDOWN_FORCED);
    }
    println!("{}", MSG_SHUTDOWN_COMPLETE);
}

/// Create the TCP listener with an explicit accept backlog
fn create_listener(addr: SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    let domain = Domain::for_address(addr);
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    // Tokio requires the socket in non-blocking mode
    socket.set_nonblocking(true)?;
    TcpListener::from_std(socket.into())
}

/// Setup graceful shutdown signal handling (Ctrl+C)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect(ERR_SIGNAL_SIGTERM);
        let mut sigint = signal(SignalKind::interrupt()).expect(ERR_SIGNAL_SIGINT);

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect(ERR_SIGNAL_CTRLC);
    }
}
