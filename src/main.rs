//! EnviroControl dashboard: host entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  serial-rx thread ──┐                                        │
//! │  (SerialLink +      │  mpsc::Sender<Input>                   │
//! │   LineDecoder)      ├──────────────────▶  main loop          │
//! │  console thread ────┘                     CommandSource      │
//! │  (ConsoleRecognizer)                      SqliteStore        │
//! │                                           LogEventSink       │
//! │                                           SerialLink (tx)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Console input is either a dashboard command (`reconnect`, `latest [n]`,
//! `export <path>`, `status`, `quit`) or a phrase handled like speech.

use std::fmt::Debug;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};

use envirocontrol::adapters::config_file;
use envirocontrol::adapters::console::{ConsoleRecognizer, LogSpeaker};
use envirocontrol::adapters::log_sink::LogEventSink;
use envirocontrol::adapters::serial::SerialLink;
use envirocontrol::app::CommandSource;
use envirocontrol::app::ports::Recognizer;
use envirocontrol::config::SystemConfig;
use envirocontrol::error::{LineError, LinkError};
use envirocontrol::protocol::{LineDecoder, Transport};
use envirocontrol::store::SqliteStore;

/// Reader poll period while the port is idle.
const IDLE_POLL: Duration = Duration::from_millis(20);
/// Main loop wake-up period with no input.
const MAIN_TICK: Duration = Duration::from_millis(500);

// ── Messages into the main loop ───────────────────────────────

enum Input {
    /// From the reader of connection number `generation`.
    Serial {
        generation: u64,
        event: SerialEvent,
    },
    Console(String),
    ConsoleClosed,
}

#[derive(Debug, PartialEq)]
enum SerialEvent {
    Line(String),
    Garbled(LineError),
    Failed(LinkError),
}

// ── Console commands ──────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    Reconnect,
    Latest(Option<usize>),
    Export(String),
    Status,
    Quit,
    Phrase(String),
}

fn parse_console(text: &str) -> ConsoleCommand {
    let mut words = text.split_whitespace();
    let head = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();
    match (head.as_str(), rest.as_slice()) {
        ("reconnect", []) => ConsoleCommand::Reconnect,
        ("latest", []) => ConsoleCommand::Latest(None),
        ("latest", [n]) if n.parse::<usize>().is_ok() => ConsoleCommand::Latest(n.parse().ok()),
        ("export", [path]) => ConsoleCommand::Export((*path).to_string()),
        ("status", []) => ConsoleCommand::Status,
        ("quit" | "exit", []) => ConsoleCommand::Quit,
        _ => ConsoleCommand::Phrase(text.to_string()),
    }
}

// ── Serial reader thread ──────────────────────────────────────

/// Stops its reader thread when dropped, and waits for it to release
/// its half of the port.
struct ReaderHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("LINK | serial reader panicked");
            }
        }
    }
}

fn spawn_reader<P>(mut port: P, name: String, generation: u64, tx: Sender<Input>) -> Result<ReaderHandle>
where
    P: Transport + Send + 'static,
    P::Error: Debug,
{
    let stop = Arc::new(AtomicBool::new(false));
    let stopped = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("serial-rx".into())
        .spawn(move || {
            let send = |event| {
                tx.send(Input::Serial { generation, event }).is_ok()
            };
            let mut decoder = LineDecoder::new();
            let mut buf = [0u8; 64];
            while !stopped.load(Ordering::Relaxed) {
                let n = match port.read(&mut buf) {
                    Ok(0) => {
                        thread::sleep(IDLE_POLL);
                        continue;
                    }
                    Ok(n) => n,
                    Err(e) => {
                        warn!("LINK | read from {} failed: {:?}", name, e);
                        send(SerialEvent::Failed(LinkError::ReadFailed));
                        return;
                    }
                };
                let mut hung_up = false;
                decoder.feed(&buf[..n], |item| {
                    let event = match item {
                        Ok(line) => SerialEvent::Line(line.to_string()),
                        Err(e) => SerialEvent::Garbled(e),
                    };
                    hung_up |= !send(event);
                });
                if hung_up {
                    return;
                }
            }
        })
        .context("spawning serial reader")?;
    Ok(ReaderHandle {
        stop,
        thread: Some(thread),
    })
}

// ── Console thread ────────────────────────────────────────────

fn spawn_console(tx: Sender<Input>) -> Result<()> {
    thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            let mut recognizer = ConsoleRecognizer::new(io::stdin().lock());
            loop {
                match recognizer.listen() {
                    Ok(Some(text)) => {
                        if tx.send(Input::Console(text)).is_err() {
                            return;
                        }
                    }
                    Ok(None) if recognizer.is_closed() => {
                        let _ = tx.send(Input::ConsoleClosed);
                        return;
                    }
                    Ok(None) => {}
                    Err(e) => warn!("console: {}", e),
                }
            }
        })
        .context("spawning console reader")?;
    Ok(())
}

// ── Link lifecycle ────────────────────────────────────────────

/// Open the port, wait for the board to settle, start its reader.
fn connect(
    config: &SystemConfig,
    generation: u64,
    tx: &Sender<Input>,
) -> Result<(SerialLink, ReaderHandle), LinkError> {
    let link = SerialLink::open(
        &config.link.port,
        config.link.baud_rate,
        Duration::from_millis(config.link.read_timeout_ms),
    )?;
    // Opening the port resets most USB boards.
    thread::sleep(Duration::from_millis(config.link.settle_ms));
    let rx_half = link.try_clone()?;
    let name = rx_half.name().to_string();
    let reader = spawn_reader(rx_half, name, generation, tx.clone()).map_err(|e| {
        error!("LINK | {:#}", e);
        LinkError::OpenFailed
    })?;
    Ok((link, reader))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("EnviroControl dashboard v{}", env!("CARGO_PKG_VERSION"));

    let cli_config = std::env::args().nth(1);
    let config = config_file::resolve(cli_config.as_deref()).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let mut store = SqliteStore::open(&config.store.path)
        .with_context(|| format!("opening store {}", config.store.path))?;
    let mut source = CommandSource::new(&config);
    let mut sink = LogEventSink::new();
    let mut speaker = LogSpeaker;

    let (tx, rx) = mpsc::channel();

    let mut link: Option<SerialLink> = None;
    let mut reader: Option<ReaderHandle> = None;
    let mut generation = 0;
    match connect(&config, generation, &tx) {
        Ok((l, r)) => {
            link = Some(l);
            reader = Some(r);
        }
        Err(e) => source.link_lost(e, &mut sink),
    }

    if config.voice.enabled {
        if let Some(index) = config.voice.microphone_index {
            warn!("voice: microphone {} configured; phrases are read from the console", index);
        }
        info!("voice: type a phrase (\"lights on\", \"it's too hot\", \"good night\")");
    }
    spawn_console(tx.clone())?;

    info!("Ready. Commands: reconnect | latest [n] | export <path> | status | quit");

    loop {
        let input = match rx.recv_timeout(MAIN_TICK) {
            Ok(input) => input,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match input {
            Input::Serial { generation: from, .. } if from != generation => {
                debug!("LINK | dropping input from closed connection #{}", from);
            }
            Input::Serial { event, .. } => match event {
                SerialEvent::Line(line) => {
                    if source
                        .handle_line(&line, &mut store, &mut link, &mut sink)
                        .is_ok()
                    {
                        info!("{}", source.dashboard().card(source.threshold()));
                    }
                }
                SerialEvent::Garbled(e) => source.reject("", e, &mut sink),
                SerialEvent::Failed(e) => {
                    reader = None;
                    link = None;
                    source.link_lost(e, &mut sink);
                }
            },
            Input::ConsoleClosed => break,
            Input::Console(text) => match parse_console(&text) {
                ConsoleCommand::Quit => break,
                ConsoleCommand::Reconnect => {
                    // Reader first: it holds a clone of the port.
                    drop(reader.take());
                    drop(link.take());
                    generation += 1;
                    match connect(&config, generation, &tx) {
                        Ok((l, r)) => {
                            link = Some(l);
                            reader = Some(r);
                            source.link_restored(&mut sink);
                        }
                        Err(e) => {
                            source.link_lost(e, &mut sink);
                            warn!("LINK | still disconnected: {}", e);
                        }
                    }
                }
                ConsoleCommand::Latest(n) => {
                    match store.latest(n.unwrap_or(config.store.latest_limit)) {
                        Ok(rows) => {
                            for row in rows {
                                info!(
                                    "#{} {} | {:.2}\u{00b0}C {:.2}% light {}",
                                    row.id, row.timestamp, row.temperature, row.humidity, row.light
                                );
                            }
                        }
                        Err(e) => error!("latest: {}", e),
                    }
                }
                ConsoleCommand::Export(path) => match store.export_csv(&path) {
                    Ok(rows) => info!("exported {} rows to {}", rows, path),
                    Err(e) => error!("export to {} failed: {}", path, e),
                },
                ConsoleCommand::Status => {
                    let (accepted, rejected) = source.dashboard().counters();
                    info!("{}", source.dashboard().card(source.threshold()));
                    info!(
                        "lines accepted={} rejected={} | stored={} | manual fan={} | cooling={}",
                        accepted,
                        rejected,
                        store.count().map_or_else(|e| e.to_string(), |n| n.to_string()),
                        source.manual_fan(),
                        source.is_cooling()
                    );
                }
                ConsoleCommand::Phrase(phrase) => {
                    if config.voice.enabled {
                        source.handle_phrase(&phrase, &mut link, &mut speaker, &mut sink);
                    } else {
                        info!("voice disabled; ignoring {:?}", phrase);
                    }
                }
            },
        }
    }

    drop(reader);
    info!("Shutting down");
    Ok(())
}
