//! Hub session: connect, receive, reconnect.
//!
//! One [`Session`] owns the device cache, the subscriber slots and the
//! outbound half of the current link. [`Session::start`] spawns a single
//! long-lived task that:
//!
//! 1. connects through the [`Transport`] port,
//! 2. sends the on-connect sequence (`LDI`, `GSF`/`WSF` per settings, `SU3`),
//! 3. decodes and dispatches every inbound message in order,
//! 4. waits [`RECONNECT_DELAY`] after any failure and starts over.
//!
//! Outbound frames never wait on the socket: they are queued to a writer task
//! owned by the current link, and fail at once when no link is up or the
//! queue is full. The loop only stops once [`Session::close`] was called.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use avebridge_domain::device::{Device, DeviceKind, UniqueId};
use avebridge_domain::error::BridgeError;
use avebridge_domain::event::DeviceChange;
use avebridge_domain::family::Family;
use avebridge_domain::protocol::{Request, SwitchOp, decode};
use avebridge_domain::settings::Settings;
use chrono::Utc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;

use crate::cache::DeviceCache;
use crate::dispatcher::{Action, dispatch};
use crate::ports::{FrameReader, FrameWriter, NameRegistry, NoCustomNames, Transport};
use crate::subscriber::SubscriberSlot;

/// Flat delay between two connection attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Frames that may wait for the writer task before sends start failing.
const OUTBOUND_QUEUE: usize = 32;

/// Link state as seen by the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => Self::Disconnected,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connecting => 1,
            Self::Connected => 2,
        }
    }
}

/// Requests sent right after a link is established.
#[must_use]
pub fn on_connect_requests(settings: &Settings) -> Vec<Request> {
    let mut requests = vec![Request::ListDevices];
    if settings.fetch_lights {
        requests.push(Request::StatusByFamily(Family::Light));
    }
    if settings.fetch_sensor_areas {
        requests.push(Request::StatusByFamily(Family::AntitheftArea));
        requests.push(Request::WatchFamily(Family::AntitheftArea));
    }
    requests.push(Request::StartUpdates);
    requests
}

/// Handle on a hub session. Cheap to clone; all clones share one state.
pub struct Session<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T: Transport> {
    transport: T,
    settings: Settings,
    names: Arc<dyn NameRegistry>,
    cache: RwLock<DeviceCache>,
    outbound: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
    state: AtomicU8,
    started: AtomicBool,
    closed: AtomicBool,
    shutdown: Notify,
    binary_sensor_subscriber: SubscriberSlot,
    switch_subscriber: SubscriberSlot,
}

impl<T: Transport> Session<T> {
    /// Create a session for a host without user-editable names.
    #[must_use]
    pub fn new(transport: T, settings: Settings) -> Self {
        Self::with_name_registry(transport, settings, Arc::new(NoCustomNames))
    }

    #[must_use]
    pub fn with_name_registry(
        transport: T,
        settings: Settings,
        names: Arc<dyn NameRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                cache: RwLock::new(DeviceCache::new(settings.clone())),
                settings,
                names,
                outbound: Mutex::new(None),
                state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
                started: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                shutdown: Notify::new(),
                binary_sensor_subscriber: SubscriberSlot::default(),
                switch_subscriber: SubscriberSlot::default(),
            }),
        }
    }

    /// Spawn the run loop on the current tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        tokio::spawn(self.clone().run())
    }

    /// Drive the session until [`close`](Self::close) is called.
    ///
    /// Only the first call runs the loop; any later call returns at once.
    pub async fn run(self) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("session already running");
            return;
        }
        self.inner.run().await;
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    /// Whether a link to the hub is currently established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Queue a request on the current link.
    ///
    /// Returns once the frame is queued; it never waits for the socket.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] when no link is established or
    /// the link's writer stopped, and [`BridgeError::Transport`] when the
    /// outbound queue is full.
    pub fn send(&self, request: Request) -> Result<(), BridgeError> {
        self.inner.send(request)
    }

    /// Switch a light on.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn turn_on(&self, device_id: u32) -> Result<(), BridgeError> {
        self.switch(device_id, SwitchOp::On)
    }

    /// Switch a light off.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn turn_off(&self, device_id: u32) -> Result<(), BridgeError> {
        self.switch(device_id, SwitchOp::Off)
    }

    /// Toggle a light.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn toggle(&self, device_id: u32) -> Result<(), BridgeError> {
        self.switch(device_id, SwitchOp::Toggle)
    }

    fn switch(&self, device_id: u32, op: SwitchOp) -> Result<(), BridgeError> {
        tracing::debug!(device_id, ?op, "sending switch command");
        self.send(Request::Switch { device_id, op })
    }

    /// Stop the session and close the current link, if any.
    ///
    /// The writer task sends a close frame once the frames already queued are
    /// written. The run loop exits at its next await point. Closing twice is
    /// a no-op.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.shutdown.notify_waiters();
        self.inner.drop_link();
        tracing::info!("session closed");
    }

    /// Register the callback receiving binary-sensor changes.
    ///
    /// Returns `false` when a callback was already registered; the new one
    /// is then dropped.
    pub fn subscribe_binary_sensor_changes<F>(&self, callback: F) -> bool
    where
        F: Fn(&DeviceChange) + Send + Sync + 'static,
    {
        self.inner.binary_sensor_subscriber.set(callback)
    }

    /// Register the callback receiving switch changes.
    ///
    /// Returns `false` when a callback was already registered; the new one
    /// is then dropped.
    pub fn subscribe_switch_changes<F>(&self, callback: F) -> bool
    where
        F: Fn(&DeviceChange) + Send + Sync + 'static,
    {
        self.inner.switch_subscriber.set(callback)
    }

    /// Seed the cache with a device the host already knows.
    ///
    /// Returns `true` when a new entry was created. The matching subscriber
    /// is notified of the creation.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidUniqueId`] when `unique_id` cannot be
    /// parsed.
    pub fn adopt(&self, unique_id: &str, name: Option<String>) -> Result<bool, BridgeError> {
        let unique_id: UniqueId = unique_id.parse()?;
        let change = self.inner.write_cache().adopt(unique_id, name);
        let Some(change) = change else {
            return Ok(false);
        };
        self.inner.notify(&change);
        Ok(true)
    }

    /// Snapshot of every tracked binary sensor.
    #[must_use]
    pub fn binary_sensors(&self) -> Vec<Device> {
        self.inner.read_cache().binary_sensors().cloned().collect()
    }

    /// Snapshot of every tracked switch.
    #[must_use]
    pub fn switches(&self) -> Vec<Device> {
        self.inner.read_cache().switches().cloned().collect()
    }

    #[must_use]
    pub fn device(&self, unique_id: &UniqueId) -> Option<Device> {
        self.inner.read_cache().get(unique_id).cloned()
    }
}

impl<T: Transport> Inner<T> {
    async fn run(&self) {
        tracing::info!(host = %self.settings.host, "session started");
        loop {
            if self.is_closed() {
                break;
            }

            tracing::debug!("connecting to hub");
            self.set_state(ConnectionState::Connecting);
            let attempt = tokio::select! {
                attempt = self.transport.connect() => attempt,
                () = self.wait_closed() => break,
            };

            match attempt {
                Ok((writer, reader)) => {
                    self.on_connected(writer);
                    self.receive(reader).await;
                    self.drop_link();
                    if self.is_closed() {
                        break;
                    }
                    tracing::warn!(
                        delay_secs = RECONNECT_DELAY.as_secs(),
                        "connection lost, reconnecting"
                    );
                }
                Err(err) => {
                    self.set_state(ConnectionState::Disconnected);
                    tracing::warn!(
                        %err,
                        delay_secs = RECONNECT_DELAY.as_secs(),
                        "failed to connect to hub, retrying"
                    );
                }
            }

            tokio::select! {
                () = tokio::time::sleep(RECONNECT_DELAY) => {}
                () = self.wait_closed() => break,
            }
        }
        self.set_state(ConnectionState::Disconnected);
        tracing::info!("session stopped");
    }

    fn on_connected(&self, writer: T::Writer) {
        let (sender, frames) = mpsc::channel(OUTBOUND_QUEUE);
        tokio::spawn(write_loop(writer, frames));
        *self.outbound() = Some(sender);
        self.set_state(ConnectionState::Connected);
        tracing::info!(host = %self.settings.host, "connected to hub");

        for request in on_connect_requests(&self.settings) {
            if let Err(err) = self.send(request) {
                tracing::warn!(
                    %err,
                    command = request.command(),
                    "failed to send on-connect request"
                );
                break;
            }
        }
    }

    async fn receive(&self, mut reader: T::Reader) {
        loop {
            let message = tokio::select! {
                message = reader.recv() => message,
                () = self.wait_closed() => return,
            };

            match message {
                Ok(Some(raw)) => self.handle_message(&raw),
                Ok(None) => {
                    tracing::info!("hub closed the connection");
                    return;
                }
                Err(err) => {
                    tracing::warn!(%err, "connection to hub failed");
                    return;
                }
            }
        }
    }

    fn handle_message(&self, raw: &[u8]) {
        for frame in decode(raw) {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::warn!(%err, "dropping undecodable frame");
                    continue;
                }
            };
            tracing::trace!(
                command = %frame.command,
                parameters = ?frame.parameters,
                "received frame"
            );

            for action in dispatch(&frame, &self.settings) {
                self.apply(action);
            }
        }
    }

    fn apply(&self, action: Action) {
        let change = match action {
            Action::Reply(request) => {
                if let Err(err) = self.send(request) {
                    tracing::warn!(%err, command = request.command(), "failed to send reply");
                }
                return;
            }
            Action::UpdateSwitch(update) => {
                let mut cache = self.write_cache();
                cache.update_switch(update, self.names.as_ref(), Utc::now())
            }
            Action::UpdateBinarySensor(update) => {
                let mut cache = self.write_cache();
                cache.update_binary_sensor(update, self.names.as_ref(), Utc::now())
            }
        };

        if let Some(change) = change {
            self.notify(&change);
        }
    }

    fn notify(&self, change: &DeviceChange) {
        let slot = match change.unique_id().kind {
            DeviceKind::Motion => &self.binary_sensor_subscriber,
            DeviceKind::Switch => &self.switch_subscriber,
        };
        slot.notify(change);
    }

    fn send(&self, request: Request) -> Result<(), BridgeError> {
        let outbound = self.outbound();
        let Some(sender) = outbound.as_ref() else {
            return Err(BridgeError::NotConnected);
        };
        tracing::debug!(command = request.command(), "sending request");
        match sender.try_send(request.encode()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(BridgeError::NotConnected),
            Err(err @ TrySendError::Full(_)) => Err(BridgeError::Transport(Box::new(err))),
        }
    }

    /// Detach the current link. Its writer task drains and closes the socket.
    fn drop_link(&self) {
        self.set_state(ConnectionState::Disconnected);
        self.outbound().take();
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    fn outbound(&self) -> MutexGuard<'_, Option<mpsc::Sender<Vec<u8>>>> {
        self.outbound.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Resolve once the session is closed.
    async fn wait_closed(&self) {
        let mut notified = pin!(self.shutdown.notified());
        notified.as_mut().enable();
        if self.is_closed() {
            return;
        }
        notified.await;
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, DeviceCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, DeviceCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write queued frames until the link is dropped, then close it.
async fn write_loop<W: FrameWriter>(mut writer: W, mut frames: mpsc::Receiver<Vec<u8>>) {
    while let Some(frame) = frames.recv().await {
        if let Err(err) = writer.send(frame).await {
            tracing::warn!(%err, "failed to write to hub");
            return;
        }
    }
    if let Err(err) = writer.close().await {
        tracing::debug!(%err, "failed to close link");
    }
}
