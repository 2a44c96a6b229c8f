use crate::{
    controller::{AvailabilitySync, PickerPhase},
    error::SyncError,
    types::{Snapshot, ISO_DATE_FORMAT},
    widget::{DatePicker, PickerConfig, PickerState, SelectOption, TimeSelector},
};
use chrono::{Days, Local, NaiveDate};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

pub const DEFAULT_HORIZON_DAYS: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Calendar widget that prints the selectable dates of the coming `horizon_days`.
#[derive(Debug)]
pub struct TerminalPicker {
    state: Option<PickerState>,
    horizon_days: u32,
}

impl TerminalPicker {
    pub fn new(horizon_days: u32) -> Self {
        Self {
            state: None,
            horizon_days,
        }
    }

    fn show(&mut self, config: PickerConfig) {
        let state = PickerState::new(config);
        let (from, to) = window(self.horizon_days);
        print_dates(&state.selectable_between(from, to), to);
        self.state = Some(state);
    }
}

/// Today and the last day of the listed horizon.
fn window(horizon_days: u32) -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    let last = today
        .checked_add_days(Days::new(horizon_days.into()))
        .unwrap_or(NaiveDate::MAX);
    (today, last)
}

fn print_dates(dates: &[NaiveDate], until: NaiveDate) {
    if dates.is_empty() {
        println!("No selectable dates until {until}");
        return;
    }
    let dates: Vec<String> = dates
        .iter()
        .map(|date| date.format(ISO_DATE_FORMAT).to_string())
        .collect();
    println!("Selectable dates: {}", dates.join(", "));
}

impl DatePicker for TerminalPicker {
    fn initialize(&mut self, config: PickerConfig) {
        info!(date_format = config.date_format, "Calendar ready, type a date to see its times");
        self.show(config);
    }

    fn update(&mut self, config: PickerConfig) {
        if self.state.as_ref().map(PickerState::config) == Some(&config) {
            debug!("Calendar configuration unchanged");
            return;
        }
        self.show(config);
    }
}

#[derive(Debug, Default)]
pub struct TerminalTimeSelector {
    options: Vec<SelectOption>,
    disabled: bool,
}

impl TimeSelector for TerminalTimeSelector {
    fn replace_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;

        let labels: Vec<&str> = self
            .options
            .iter()
            .filter(|option| !option.disabled)
            .map(|option| option.label.as_str())
            .collect();
        match (self.disabled, self.options.first()) {
            (true, Some(placeholder)) => println!("{}", placeholder.label),
            (true, None) => println!("Time selection disabled"),
            (false, _) => println!("Times: {}", labels.join(", ")),
        }
    }
}

/// Feeds every date typed on stdin to the controller's change notification.
/// `dates` lists the selectable dates again. Returns when stdin is closed.
pub async fn run_selection_loop<P, T>(
    sync: AvailabilitySync<P, T>,
    horizon_days: u32,
) -> Result<(), SyncError>
where
    P: DatePicker + Send + 'static,
    T: TimeSelector + Send + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let date = line.trim();
        if date.is_empty() {
            continue;
        }
        if sync.phase() == PickerPhase::Uninitialized {
            println!("Calendar not loaded yet, try again in a moment");
            continue;
        }
        if date == "dates" {
            let (from, to) = window(horizon_days);
            print_dates(&sync.selectable_dates(from, to), to);
            continue;
        }
        sync.on_date_selected(date);
    }
    Ok(())
}

pub async fn log_snapshots(mut snapshots: WatchStream<Option<Snapshot>>) {
    while let Some(snapshot) = snapshots.next().await {
        match snapshot {
            Some(Snapshot::Slots(available)) => {
                info!(dates = available.dates().len(), "Availability updated")
            }
            Some(Snapshot::Blocked(disabled)) => {
                info!(disabled = disabled.dates().len(), "Blocked dates updated")
            }
            None => {}
        }
    }
}
