use std::io;
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use surface::DemoModel;
use tracing::{debug, info, trace, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Error as WsError, Message, WebSocket};

use crate::error::{LinkError, Result};
use crate::protocol::{
    Inbound, REQ_DEMO_INFO, REQ_SYSTEM_FPS, TimeInfo, decode_inbound, encode_demo, encode_time,
};
use crate::retry::{RETRY_BUDGET, RETRY_DELAY, RetryPolicy};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 8;
const FPS_POLL_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_SLEEP: Duration = Duration::from_millis(5);

/// Sender used by the surface side to push local mutations out.
pub type LinkCommandSender = mpsc::SyncSender<LinkCommand>;

/// Receiver for events surfaced by the link worker.
pub type LinkEventReceiver = mpsc::Receiver<LinkEvent>;

/// Outbound requests the surface issues to the engine. Sent
/// immediately and in issue order; no batching, no acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkCommand {
    SendTime(TimeInfo),
    SendDemo(DemoModel),
    Shutdown,
}

/// Events the link worker reports back to the surface side.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    /// Engine frame time in seconds.
    FrameTime(f64),
    /// Full effect-list snapshot; replaces the local model wholesale.
    Snapshot(DemoModel),
}

/// Connection parameters. The defaults match the engine's stock
/// configuration; tests shrink the retry timings.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub url: String,
    pub fps_poll_interval: Duration,
    pub retry_delay: Duration,
    pub retry_budget: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            url: String::from("ws://127.0.0.1:9002"),
            fps_poll_interval: FPS_POLL_INTERVAL,
            retry_delay: RETRY_DELAY,
            retry_budget: RETRY_BUDGET,
        }
    }
}

type WsSocket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Fixed-interval deadline for the frame-time poll. Re-anchors from
/// the current time on every fire, so a stalled socket never produces
/// a catch-up burst of queued polls.
#[derive(Debug, Clone, Copy)]
struct PollTicker {
    next: Instant,
    interval: Duration,
}

impl PollTicker {
    fn new(now: Instant, interval: Duration) -> Self {
        Self {
            next: now + interval,
            interval,
        }
    }

    fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.interval;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The engine side closed or the socket failed.
    Closed,
    /// The caller asked for shutdown or went away.
    Shutdown,
}

/// Spawns the link worker that owns the engine socket and returns the
/// command/event channel pair bridging it to the caller.
///
/// The worker drives the whole connection lifecycle: bounded
/// first-connect retry, the one-shot snapshot request on open, and
/// fixed-interval frame-time polling. Once the retry budget runs out,
/// or an established connection closes, the worker exits and the
/// event channel disconnects; reopening means spawning a new link.
pub fn spawn_link(config: LinkConfig) -> (LinkCommandSender, LinkEventReceiver) {
    let (command_tx, command_rx) = mpsc::sync_channel::<LinkCommand>(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<LinkEvent>(EVENT_CHANNEL_CAPACITY);

    thread::spawn(move || run_link(config, command_rx, event_tx));

    (command_tx, event_rx)
}

fn run_link(config: LinkConfig, command_rx: Receiver<LinkCommand>, event_tx: SyncSender<LinkEvent>) {
    let mut retry = RetryPolicy::new(config.retry_budget);

    loop {
        match connect_socket(&config.url) {
            Ok(mut socket) => {
                retry.note_open();
                info!(url = %config.url, "engine connected");
                if event_tx.send(LinkEvent::Connected).is_err() {
                    let _ = socket.close(None);
                    return;
                }

                let end = serve_connection(&mut socket, &command_rx, &event_tx, &config);
                let _ = event_tx.send(LinkEvent::Disconnected);
                match end {
                    Ok(SessionEnd::Shutdown) => return,
                    Ok(SessionEnd::Closed) => {}
                    Err(error) => warn!(%error, "engine session ended"),
                }
            }
            Err(error) => {
                warn!(%error, "engine connect failed");
                if event_tx.send(LinkEvent::Disconnected).is_err() {
                    return;
                }
            }
        }

        let Some(delay) = retry.next_delay(config.retry_delay) else {
            info!(url = %config.url, "engine link staying closed");
            return;
        };
        debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");
        match command_rx.recv_timeout(delay) {
            Ok(LinkCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
            Ok(command) => debug!(?command, "dropped command while disconnected"),
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

fn connect_socket(url: &str) -> Result<WsSocket> {
    let (mut socket, _response) =
        tungstenite::connect(url).map_err(|source| LinkError::Connect {
            url: url.to_string(),
            source,
        })?;
    if let MaybeTlsStream::Plain(stream) = socket.get_mut() {
        stream
            .set_nonblocking(true)
            .map_err(|err| LinkError::Socket(WsError::Io(err)))?;
    }
    Ok(socket)
}

/// Pumps one open connection: outbound commands first (in issue
/// order), then the frame-time poll, then inbound messages.
fn serve_connection(
    socket: &mut WsSocket,
    command_rx: &Receiver<LinkCommand>,
    event_tx: &SyncSender<LinkEvent>,
    config: &LinkConfig,
) -> Result<SessionEnd> {
    send_text(socket, REQ_DEMO_INFO.to_string())?;
    let mut poll = PollTicker::new(Instant::now(), config.fps_poll_interval);

    loop {
        loop {
            match command_rx.try_recv() {
                Ok(LinkCommand::SendTime(info)) => send_text(socket, encode_time(info)?)?,
                Ok(LinkCommand::SendDemo(model)) => send_text(socket, encode_demo(&model)?)?,
                Ok(LinkCommand::Shutdown) | Err(TryRecvError::Disconnected) => {
                    let _ = socket.close(None);
                    return Ok(SessionEnd::Shutdown);
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if poll.due(Instant::now()) {
            send_text(socket, REQ_SYSTEM_FPS.to_string())?;
        }

        match socket.read() {
            Ok(Message::Text(text)) => {
                let forwarded = match decode_inbound(text.as_str()) {
                    Some(Inbound::FrameTime(ms)) => event_tx.send(LinkEvent::FrameTime(ms)),
                    Some(Inbound::Snapshot(model)) => event_tx.send(LinkEvent::Snapshot(model)),
                    None => {
                        trace!(payload = text.as_str(), "ignored inbound message");
                        Ok(())
                    }
                };
                if forwarded.is_err() {
                    let _ = socket.close(None);
                    return Ok(SessionEnd::Shutdown);
                }
            }
            Ok(Message::Close(_)) => return Ok(SessionEnd::Closed),
            Ok(_) => {}
            Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {
                flush_pending(socket)?;
                thread::sleep(IDLE_SLEEP);
            }
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                return Ok(SessionEnd::Closed);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Sends one text frame. On a nonblocking socket the frame may stay
/// queued on `WouldBlock`; [`flush_pending`] drains it on the next
/// idle iteration.
fn send_text(socket: &mut WsSocket, text: String) -> Result<()> {
    match socket.send(Message::text(text)) {
        Ok(()) => Ok(()),
        Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn flush_pending(socket: &mut WsSocket) -> Result<()> {
    match socket.flush() {
        Ok(()) => Ok(()),
        Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => Ok(()),
        Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
