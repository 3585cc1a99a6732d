mod cli;

use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};

use clap::Parser;
use futures_lite::StreamExt;
use futures_util::sink::SinkExt;
use parley::event::TelnetEvent;
use parley::option::TelnetOption;
use parley::session::{Session, SessionConfig};
use parley::stream::Role;
use parley::TelnetCodec;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{error, info, warn};

const WELCOME: &str = "\nWelcome to the parley demo MUD server!\nType \"help\" for a list of commands.\n";
const HELP: &str = "Commands: help, echo <text>, quit\n";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args = cli::Args::parse();
    let addr = args.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "mud_server listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(async move {
            info!(%peer, "connection accepted");
            if let Err(err) = handle_connection(stream).await {
                warn!(%peer, %err, "connection ended with an error");
            }
        });
    }
}

async fn handle_connection(stream: TcpStream) -> Result<(), Box<dyn Error>> {
    let mut frame = Framed::new(stream, TelnetCodec::new(4096));
    let mut session = Session::new(Role::Server, SessionConfig::default());

    // Announce what we support; the peer's replies drive the rest of
    // negotiation through `Session::feed`.
    session.stream_mut().request_will(TelnetOption::Echo);
    session.stream_mut().request_will(TelnetOption::SuppressGoAhead);
    session.stream_mut().request_do(TelnetOption::Naws);
    session.stream_mut().request_do(TelnetOption::Ttype);
    session.stream_mut().request_do(TelnetOption::Linemode);
    session.stream_mut().request_do(TelnetOption::NewEnviron);
    flush_outbound(&mut frame, &mut session).await?;

    let pending = Arc::new(Mutex::new(VecDeque::new()));
    {
        let pending = pending.clone();
        session.set_line_callback(move |line| {
            pending.lock().unwrap().push_back(line.to_string());
        });
    }

    frame.send(TelnetEvent::Message(WELCOME.to_string())).await?;

    while let Some(event) = frame.next().await {
        let event = event?;
        if let Err(err) = session.feed(event) {
            // A role violation here means the peer sent us something only a
            // client should send (e.g. NEW-ENVIRON SEND); log and carry on.
            warn!(%err, "dropping malformed event");
            continue;
        }
        flush_outbound(&mut frame, &mut session).await?;

        let lines: Vec<String> = pending.lock().unwrap().drain(..).collect();
        for line in lines {
            if dispatch_command(&mut frame, line.trim()).await? {
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Handles one completed line. Returns `Ok(true)` if the connection should
/// close.
async fn dispatch_command(
    frame: &mut Framed<TcpStream, TelnetCodec>,
    line: &str,
) -> Result<bool, Box<dyn Error>> {
    match line.split_once(' ') {
        Some(("echo", rest)) => {
            frame.send(TelnetEvent::Message(format!("{rest}\n"))).await?;
        }
        _ => match line {
            "quit" => {
                frame.send(TelnetEvent::Message("Goodbye!\n".to_string())).await?;
                return Ok(true);
            }
            "help" => {
                frame.send(TelnetEvent::Message(HELP.to_string())).await?;
            }
            "echo" => {
                frame.send(TelnetEvent::Message("\n".to_string())).await?;
            }
            "" => {}
            other => {
                frame
                    .send(TelnetEvent::Message(format!(
                        "Unknown command: {other}. Type \"help\" for a list of commands.\n"
                    )))
                    .await?;
            }
        },
    }

    Ok(false)
}

async fn flush_outbound(
    frame: &mut Framed<TcpStream, TelnetCodec>,
    session: &mut Session,
) -> Result<(), Box<dyn Error>> {
    for event in session.drain_outbound() {
        if let Err(err) = frame.send(event).await {
            error!(%err, "failed writing outbound telnet event");
            return Err(err.into());
        }
    }
    Ok(())
}
