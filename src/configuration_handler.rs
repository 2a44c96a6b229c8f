use crate::{
    booking::{BookingRequest, DEFAULT_BOOKING_URL},
    configuration::Configuration,
    http::DEFAULT_ENDPOINT,
    poller::DEFAULT_REFRESH_INTERVAL,
    terminal::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS},
    types::Variant,
    widget::DateBounds,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, time::Duration};
use tracing::debug;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Keeps a booking calendar in sync with the availability endpoint")]
pub struct ConfigurationHandler {
    /// Availability endpoint
    #[arg(long, env = "AVAILABILITY_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Endpoint receiving booking requests
    #[arg(long, env = "AVAILABILITY_BOOKING_URL", default_value = DEFAULT_BOOKING_URL, global = true)]
    booking_url: String,

    /// Seconds between two refreshes
    #[arg(long, env = "AVAILABILITY_REFRESH_SECS", default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs(), global = true)]
    refresh_secs: u64,

    /// Seconds until a request to the backend is given up
    #[arg(long, env = "AVAILABILITY_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Whether fetched dates are the only selectable ones or blocked ones
    #[arg(long, env = "AVAILABILITY_VARIANT", value_enum, default_value_t = Variant::Enable, global = true)]
    variant: Variant,

    /// Earliest date the calendar offers
    #[arg(long, env = "AVAILABILITY_MIN_DATE", global = true)]
    min_date: Option<NaiveDate>,

    /// Latest date the calendar offers
    #[arg(long, env = "AVAILABILITY_MAX_DATE", global = true)]
    max_date: Option<NaiveDate>,

    /// Number of days the terminal calendar lists
    #[arg(long, env = "AVAILABILITY_HORIZON_DAYS", default_value_t = DEFAULT_HORIZON_DAYS, global = true)]
    horizon_days: u32,

    /// Read availability from this JSON file instead of the endpoint
    #[arg(long, env = "AVAILABILITY_FIXTURE", global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Poll the endpoint and show the times of dates typed on stdin
    Watch,
    /// Book a slot
    Book(BookArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    day: NaiveDate,
    #[arg(long)]
    time: String,
    #[arg(long)]
    message: Option<String>,
}

impl From<BookArgs> for BookingRequest {
    fn from(args: BookArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            day: args.day,
            time: args.time,
            message: args.message,
        }
    }
}

impl ConfigurationHandler {
    /// Loads `.env` from the working directory, then parses the command line.
    pub fn parse_arguments() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            debug!(%err, "No .env file loaded");
        }
        Self::parse()
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }
}

impl Configuration for ConfigurationHandler {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn booking_url(&self) -> String {
        self.booking_url.clone()
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn date_bounds(&self) -> DateBounds {
        DateBounds {
            min: self.min_date,
            max: self.max_date,
        }
    }

    fn horizon_days(&self) -> u32 {
        self.horizon_days.min(MAX_HORIZON_DAYS)
    }

    fn fixture_path(&self) -> Option<PathBuf> {
        self.fixture.clone()
    }
}
