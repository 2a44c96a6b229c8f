use crate::{
    backend::AvailabilityBackend,
    error::SyncError,
    types::AvailabilityPayload,
    widget::{DatePicker, PickerConfig, SelectOption, TimeSelector},
};
use axum::Router;
use std::{
    collections::VecDeque,
    io,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::task::JoinHandle;

pub fn payload(json: &str) -> AvailabilityPayload {
    serde_json::from_str(json).unwrap()
}

/// Binds `app` to a free local port and returns its base url.
pub async fn spawn_fake_server(app: Router) -> (String, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{address}"), server)
}

struct ScriptedResponse {
    delay: Duration,
    result: Result<AvailabilityPayload, String>,
}

pub struct FakeBackendInner {
    pub calls_to_fetch: AtomicU64,
    responses: Mutex<VecDeque<ScriptedResponse>>,
}

/// Answers fetches with scripted responses in the order they were pushed.
#[derive(Clone)]
pub struct FakeBackend(pub Arc<FakeBackendInner>);

impl FakeBackend {
    pub fn new() -> Self {
        Self(Arc::new(FakeBackendInner {
            calls_to_fetch: AtomicU64::default(),
            responses: Mutex::default(),
        }))
    }

    fn script(&self, delay: Duration, result: Result<AvailabilityPayload, String>) {
        self.0
            .responses
            .lock()
            .unwrap()
            .push_back(ScriptedResponse { delay, result });
    }

    pub fn push(&self, payload: AvailabilityPayload) {
        self.script(Duration::ZERO, Ok(payload));
    }

    pub fn push_delayed(&self, payload: AvailabilityPayload, delay: Duration) {
        self.script(delay, Ok(payload));
    }

    pub fn push_failure(&self, message: &str) {
        self.script(Duration::ZERO, Err(message.into()));
    }

    pub fn calls_to_fetch(&self) -> u64 {
        self.0.calls_to_fetch.load(Ordering::SeqCst)
    }
}

impl AvailabilityBackend for FakeBackend {
    async fn fetch(&self) -> Result<AvailabilityPayload, SyncError> {
        self.0.calls_to_fetch.fetch_add(1, Ordering::SeqCst);
        let scripted = self.0.responses.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Err(SyncError::Io(io::Error::other("No scripted response left")));
        };

        tokio::time::sleep(scripted.delay).await;
        scripted
            .result
            .map_err(|message| SyncError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, message)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickerCall {
    Initialize(PickerConfig),
    Update(PickerConfig),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPicker {
    calls: Arc<Mutex<Vec<PickerCall>>>,
}

impl RecordingPicker {
    pub fn calls(&self) -> Vec<PickerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DatePicker for RecordingPicker {
    fn initialize(&mut self, config: PickerConfig) {
        self.calls.lock().unwrap().push(PickerCall::Initialize(config));
    }

    fn update(&mut self, config: PickerConfig) {
        self.calls.lock().unwrap().push(PickerCall::Update(config));
    }
}

#[derive(Debug, Default)]
struct SelectorState {
    options: Vec<SelectOption>,
    disabled: bool,
    renders: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTimeSelector {
    state: Arc<Mutex<SelectorState>>,
}

impl RecordingTimeSelector {
    pub fn current(&self) -> (Vec<SelectOption>, bool) {
        let state = self.state.lock().unwrap();
        (state.options.clone(), state.disabled)
    }

    pub fn render_count(&self) -> u64 {
        self.state.lock().unwrap().renders
    }
}

impl TimeSelector for RecordingTimeSelector {
    fn replace_options(&mut self, options: Vec<SelectOption>) {
        let mut state = self.state.lock().unwrap();
        state.options = options;
        state.renders += 1;
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.state.lock().unwrap().disabled = disabled;
    }
}
