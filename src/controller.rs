use crate::{
    backend::AvailabilityBackend,
    types::{parse_date, Snapshot, Variant},
    widget::{DateBounds, DatePicker, DateRule, PickerConfig, PickerState, TimeSelection, TimeSelector},
};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh was applied while this one was in flight.
    Stale,
    Failed,
}

struct SyncState<P, T> {
    picker: P,
    time_selector: T,
    phase: PickerPhase,
    picker_state: Option<PickerState>,
    snapshot: Option<Snapshot>,
    last_issued: u64,
    last_applied: u64,
}

/// Keeps the date picker and the time selector in line with the latest
/// availability snapshot.
pub struct AvailabilitySync<P, T> {
    state: Arc<Mutex<SyncState<P, T>>>,
    sender: Arc<Sender<Option<Snapshot>>>,
    variant: Variant,
    bounds: DateBounds,
}

impl<P, T> Clone for AvailabilitySync<P, T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            sender: self.sender.clone(),
            variant: self.variant,
            bounds: self.bounds,
        }
    }
}

impl<P, T> AvailabilitySync<P, T>
where
    P: DatePicker + Send + 'static,
    T: TimeSelector + Send + 'static,
{
    pub fn new(picker: P, time_selector: T, variant: Variant, bounds: DateBounds) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            state: Arc::new(Mutex::new(SyncState {
                picker,
                time_selector,
                phase: PickerPhase::Uninitialized,
                picker_state: None,
                snapshot: None,
                last_issued: 0,
                last_applied: 0,
            })),
            sender: Arc::new(sender),
            variant,
            bounds,
        }
    }

    fn state(&self) -> MutexGuard<'_, SyncState<P, T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> PickerPhase {
        self.state().phase
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state().snapshot.clone()
    }

    /// Yields the current snapshot first, then every newly applied one.
    pub fn subscribe(&self) -> WatchStream<Option<Snapshot>> {
        WatchStream::new(self.sender.subscribe())
    }

    /// Fetches and applies a new snapshot. Errors are logged and leave the
    /// previous snapshot in place.
    pub async fn refresh<B: AvailabilityBackend>(&self, backend: &B) -> RefreshOutcome {
        let sequence = self.issue_sequence();

        let snapshot = match backend.fetch().await {
            Ok(payload) => Snapshot::normalize(payload, self.variant),
            Err(err) => Err(err),
        };

        match snapshot {
            Ok(snapshot) => self.apply(sequence, snapshot),
            Err(err) => {
                warn!(%err, sequence, "Failed to refresh availability, keeping previous snapshot");
                RefreshOutcome::Failed
            }
        }
    }

    fn issue_sequence(&self) -> u64 {
        let mut state = self.state();
        state.last_issued += 1;
        state.last_issued
    }

    fn apply(&self, sequence: u64, snapshot: Snapshot) -> RefreshOutcome {
        let mut state = self.state();
        if sequence <= state.last_applied {
            debug!(
                sequence,
                last_applied = state.last_applied,
                "Dropping availability response superseded by a newer one"
            );
            return RefreshOutcome::Stale;
        }

        let rule = match &snapshot {
            Snapshot::Slots(available) => DateRule::Enable(available.dates()),
            Snapshot::Blocked(disabled) => DateRule::Disable(disabled.dates().to_vec()),
        };
        let config = PickerConfig::new(rule, self.bounds);

        match state.phase {
            PickerPhase::Uninitialized => {
                state.picker.initialize(config.clone());
                state.phase = PickerPhase::Ready;
                info!(sequence, "Date picker initialized");
            }
            PickerPhase::Ready => {
                state.picker.update(config.clone());
                debug!(sequence, "Date picker updated");
            }
        }
        state.picker_state = Some(PickerState::new(config));
        state.snapshot = Some(snapshot.clone());
        state.last_applied = sequence;

        // Published under the lock so subscribers see snapshots in apply order.
        self.sender.send_replace(Some(snapshot));
        RefreshOutcome::Applied
    }

    /// Change notification of the date picker. Re-renders the time selector
    /// with the slots of `date`.
    pub fn on_date_selected(&self, date: &str) {
        if self.variant == Variant::Disable {
            debug!(date, "No time slots in disable mode, ignoring date selection");
            return;
        }

        let date = match parse_date(date) {
            Ok(date) => Some(date),
            Err(err) => {
                warn!(%err, "Selected date can't be looked up");
                None
            }
        };

        let mut state = self.state();
        let selectable = |date: NaiveDate| {
            state
                .picker_state
                .as_ref()
                .is_some_and(|picker_state| picker_state.is_selectable(date))
        };
        let selection = match (&state.snapshot, date) {
            (Some(Snapshot::Slots(available)), Some(date)) if selectable(date) => {
                TimeSelection::for_times(available.times(date))
            }
            _ => TimeSelection::for_times(&[]),
        };
        selection.render(&mut state.time_selector);
    }

    /// Dates in `from..=to` the picker currently lets the user select.
    /// Empty until the first snapshot was applied.
    pub fn selectable_dates(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        self.state()
            .picker_state
            .as_ref()
            .map(|picker_state| picker_state.selectable_between(from, to))
            .unwrap_or_default()
    }
}
