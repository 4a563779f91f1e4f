//! Streams pipeline positions to a TCP consumer
//!
//! A producer thread ticks the pipeline and queues one text line per fix; a
//! sender thread drains the queue in order and writes the lines to the
//! transport. Losing the transport stops the sender only: the producer keeps
//! ticking and drops what it can no longer deliver.

use anyhow::Context;
use balltrack_core::Position3D;
use balltrack_cv::StereoTargetPipeline;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::Result;

/// Queue element: either a line to deliver or the request to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Data(String),
    Shutdown,
}

/// Streaming client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Messages buffered between producer and sender
    pub queue_capacity: usize,
    /// How long shutdown waits for each thread
    pub join_timeout_ms: u64,
    /// Stop producing after this many ticks; run forever when unset
    pub max_ticks: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "10.249.222.198".to_string(),
            port: 55000,
            queue_capacity: 256,
            join_timeout_ms: 2000,
            max_ticks: None,
        }
    }
}

impl ClientConfig {
    pub fn local(port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port,
            ..Default::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Wire text for one position, without the trailing newline.
pub fn format_position(position: &Position3D) -> String {
    format!("{:.2},{:.2},{:.2}", position.x, position.y, position.z)
}

/// Open the transport connection with Nagle disabled.
pub fn connect(config: &ClientConfig) -> Result<TcpStream> {
    let address = config.address();
    info!("Connecting to {}", address);
    let stream = TcpStream::connect(&address)
        .with_context(|| format!("Failed to connect to {}", address))?;
    stream
        .set_nodelay(true)
        .context("Failed to disable Nagle on transport")?;
    info!("Connected to server.");
    Ok(stream)
}

/// Outcome of [`ClientHandle::shutdown`]
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub ticks: Option<u64>,
    pub messages_sent: Option<u64>,
    /// Threads that did not finish within the join timeout
    pub timed_out: Vec<String>,
}

/// Running producer and sender threads
pub struct ClientHandle {
    running: Arc<AtomicBool>,
    queue: Sender<Message>,
    producer: Worker<u64>,
    sender: Worker<Result<u64>>,
    join_timeout: Duration,
}

impl ClientHandle {
    /// True while the producer has not been asked to stop or run out of ticks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// True once the sender thread has exited, e.g. after a transport error.
    pub fn transport_closed(&self) -> bool {
        self.sender.is_finished()
    }

    /// True once the producer thread has exited, e.g. after `max_ticks`.
    pub fn producer_finished(&self) -> bool {
        self.producer.is_finished()
    }

    /// Stop producing, let the sender drain, and join both threads.
    pub fn shutdown(self) -> ShutdownReport {
        self.running.store(false, Ordering::SeqCst);

        info!("Sending shutdown signal to message queue...");
        if let Err(TrySendError::Full(_)) = self.queue.try_send(Message::Shutdown) {
            debug!("Queue full; sender exits once drained");
        }
        drop(self.queue);

        let mut report = ShutdownReport::default();

        match self.producer.join(self.join_timeout) {
            Some(ticks) => report.ticks = ticks,
            None => report.timed_out.push("producer".to_string()),
        }
        match self.sender.join(self.join_timeout) {
            Some(Some(Ok(sent))) => report.messages_sent = Some(sent),
            Some(Some(Err(e))) => error!("Sender stopped with error: {:#}", e),
            Some(None) => {}
            None => report.timed_out.push("sender".to_string()),
        }

        info!("Client shut down.");
        report
    }
}

/// A named thread that reports completion on its own channel.
struct Worker<T> {
    name: String,
    handle: JoinHandle<T>,
    done: Receiver<()>,
}

impl<T: Send + 'static> Worker<T> {
    fn spawn<F>(name: &str, work: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (done_tx, done) = crossbeam_channel::bounded(1);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let value = work();
                // Nobody waiting is fine
                let _ = done_tx.send(());
                value
            })
            .with_context(|| format!("Failed to spawn {} thread", name))?;

        Ok(Self {
            name: name.to_string(),
            handle,
            done,
        })
    }

    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// `None` when the thread is still running after `timeout`; `Some(None)`
    /// when it panicked.
    fn join(self, timeout: Duration) -> Option<Option<T>> {
        info!("Waiting for {} to finish...", self.name);
        match self.done.recv_timeout(timeout) {
            // A panicking worker drops its sender without signalling.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                warn!("{} did not finish in time.", self.name);
                return None;
            }
        }

        match self.handle.join() {
            Ok(value) => Some(Some(value)),
            Err(_) => {
                error!("{} panicked", self.name);
                Some(None)
            }
        }
    }
}

/// Spawn the producer and sender threads over an already open transport.
pub fn start<W>(
    pipeline: StereoTargetPipeline,
    transport: W,
    config: &ClientConfig,
) -> Result<ClientHandle>
where
    W: Write + Send + 'static,
{
    let running = Arc::new(AtomicBool::new(true));
    let (queue, inbox) = crossbeam_channel::bounded(config.queue_capacity.max(1));

    let producer = {
        let running = Arc::clone(&running);
        let queue = queue.clone();
        let max_ticks = config.max_ticks;
        Worker::spawn("producer", move || produce(pipeline, queue, running, max_ticks))?
    };

    let sender = {
        let running = Arc::clone(&running);
        Worker::spawn("sender", move || send_messages(inbox, transport, running))?
    };

    Ok(ClientHandle {
        running,
        queue,
        producer,
        sender,
        join_timeout: Duration::from_millis(config.join_timeout_ms),
    })
}

fn produce(
    mut pipeline: StereoTargetPipeline,
    queue: Sender<Message>,
    running: Arc<AtomicBool>,
    max_ticks: Option<u64>,
) -> u64 {
    info!("Data producer thread started.");
    let mut ticks = 0;
    let mut delivering = true;

    while running.load(Ordering::SeqCst) {
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        let start = Instant::now();
        let position = pipeline.tick();
        let elapsed = start.elapsed().as_secs_f64();
        let fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };
        ticks += 1;

        let Some(position) = position else {
            debug!("FPS: {:.2} | No target found. Nothing to send.", fps);
            continue;
        };

        let message = format_position(&position);
        info!(
            "FPS: {:.2} | Target found {:.1} cm away. Queued for sending: \"{}\"",
            fps,
            position.distance(),
            message
        );

        if !delivering {
            continue;
        }
        match queue.try_send(Message::Data(message)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("Send queue full, dropping position"),
            Err(TrySendError::Disconnected(_)) => {
                error!("Sender is gone; positions will no longer be delivered");
                delivering = false;
            }
        }
    }

    running.store(false, Ordering::SeqCst);
    info!("Data producer loop stopped after {} ticks.", ticks);
    ticks
}

fn send_messages<W: Write>(inbox: Receiver<Message>, mut transport: W, running: Arc<AtomicBool>) -> Result<u64> {
    let mut sent = 0;

    loop {
        match inbox.recv_timeout(Duration::from_millis(100)) {
            Ok(Message::Data(line)) => {
                write_line(&mut transport, &line)?;
                sent += 1;
            }
            Ok(Message::Shutdown) => {
                info!("Sender received shutdown signal.");
                sent += drain(&inbox, &mut transport)?;
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if !running.load(Ordering::SeqCst) {
                    sent += drain(&inbox, &mut transport)?;
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("Sender thread stopped after {} messages.", sent);
    Ok(sent)
}

/// Deliver whatever is still queued without waiting for more.
fn drain<W: Write>(inbox: &Receiver<Message>, transport: &mut W) -> Result<u64> {
    let mut sent = 0;
    while let Ok(message) = inbox.try_recv() {
        if let Message::Data(line) = message {
            write_line(transport, &line)?;
            sent += 1;
        }
    }
    Ok(sent)
}

fn write_line<W: Write>(transport: &mut W, line: &str) -> Result<()> {
    let result = transport
        .write_all(format!("{}\n", line).as_bytes())
        .and_then(|_| transport.flush());
    if let Err(e) = result {
        error!("Transport failed: {}", e);
        return Err(e).context("Failed to send position");
    }
    debug!("Sent: '{}'", line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(&Position3D::new(1.0, -2.5, 24.999)), "1.00,-2.50,25.00");
    }

    #[test]
    fn test_sender_preserves_order_and_drains() -> Result<()> {
        let (queue, inbox) = crossbeam_channel::bounded(8);
        let buffer = SharedBuffer::default();
        let running = Arc::new(AtomicBool::new(true));

        queue.send(Message::Data("1.00,2.00,3.00".to_string()))?;
        queue.send(Message::Data("4.00,5.00,6.00".to_string()))?;
        queue.send(Message::Shutdown)?;

        let sent = send_messages(inbox, buffer.clone(), running)?;
        assert_eq!(sent, 2);

        let text = String::from_utf8(buffer.0.lock().unwrap().clone())?;
        assert_eq!(text, "1.00,2.00,3.00\n4.00,5.00,6.00\n");
        Ok(())
    }

    #[test]
    fn test_sender_stops_on_transport_error() -> Result<()> {
        let (queue, inbox) = crossbeam_channel::bounded(8);
        queue.send(Message::Data("1.00,2.00,3.00".to_string()))?;

        let result = send_messages(inbox, BrokenPipe, Arc::new(AtomicBool::new(true)));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_worker_join_returns_value() -> Result<()> {
        let worker = Worker::spawn("answer", || 7)?;
        assert_eq!(worker.join(Duration::from_secs(5)), Some(Some(7)));
        Ok(())
    }

    #[test]
    fn test_worker_join_gives_up_after_timeout() -> Result<()> {
        let worker = Worker::spawn("slow", || thread::sleep(Duration::from_secs(2)))?;
        let start = Instant::now();
        assert_eq!(worker.join(Duration::from_millis(50)), None);
        assert!(start.elapsed() < Duration::from_secs(1));
        Ok(())
    }

    #[test]
    fn test_worker_join_reports_panic() -> Result<()> {
        let worker: Worker<u32> = Worker::spawn("doomed", || panic!("boom"))?;
        assert_eq!(worker.join(Duration::from_secs(5)), Some(None));
        Ok(())
    }

    #[test]
    fn test_sender_exits_when_stopped_and_idle() -> Result<()> {
        let (_queue, inbox) = crossbeam_channel::bounded::<Message>(8);
        let sent = send_messages(inbox, SharedBuffer::default(), Arc::new(AtomicBool::new(false)))?;
        assert_eq!(sent, 0);
        Ok(())
    }
}
