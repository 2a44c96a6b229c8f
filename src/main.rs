use crate::{
    backend::AvailabilityBackend,
    booking::{BookingClient, BookingRequest},
    configuration::Configuration,
    configuration_handler::{Command, ConfigurationHandler},
    controller::AvailabilitySync,
    error::SyncError,
    http::HttpBackend,
    local_availability::LocalAvailability,
    poller::spawn_refresh_loop,
    terminal::{log_snapshots, run_selection_loop, TerminalPicker, TerminalTimeSelector},
    types::{AvailabilityMap, AvailabilityPayload},
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking;
mod configuration;
mod configuration_handler;
mod controller;
mod error;
mod http;
mod local_availability;
mod poller;
mod terminal;
#[cfg(test)]
mod testutils;
mod types;
mod widget;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("availability_sync=info")),
        )
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let result = match configuration.command() {
        Command::Watch => watch(configuration).await,
        Command::Book(args) => book(configuration, args.into()).await,
    };

    if let Err(err) = result {
        error!(%err, "Exiting");
        std::process::exit(1);
    }
}

async fn watch<C: Configuration>(configuration: C) -> Result<(), SyncError> {
    println!("######################");
    println!("# Availability Sync  #");
    println!("######################");

    if let Some(path) = configuration.fixture_path() {
        info!(path = %path.display(), "Reading availability from fixture");
        run_watch(LocalAvailability::new(path), configuration).await
    } else {
        info!(endpoint = %configuration.endpoint(), "Reading availability from endpoint");
        let backend = HttpBackend::new(configuration.endpoint(), configuration.request_timeout())?;
        run_watch(backend, configuration).await
    }
}

async fn run_watch<B, C>(backend: B, configuration: C) -> Result<(), SyncError>
where
    B: AvailabilityBackend,
    C: Configuration,
{
    let sync = AvailabilitySync::new(
        TerminalPicker::new(configuration.horizon_days()),
        TerminalTimeSelector::default(),
        configuration.variant(),
        configuration.date_bounds(),
    );
    let announcer = tokio::spawn(log_snapshots(sync.subscribe()));
    let refresh_loop = spawn_refresh_loop(sync.clone(), backend, configuration.refresh_interval());

    tokio::select! {
        result = run_selection_loop(sync, configuration.horizon_days()) => {
            result?;
            info!("Input closed, refreshing until interrupted");
            signal::ctrl_c().await?;
        }
        result = signal::ctrl_c() => result?,
    }

    info!("Shutting down");
    refresh_loop.abort();
    announcer.abort();
    Ok(())
}

async fn fetch_once<C: Configuration>(configuration: &C) -> Result<AvailabilityPayload, SyncError> {
    match configuration.fixture_path() {
        Some(path) => LocalAvailability::new(path).fetch().await,
        None => {
            HttpBackend::new(configuration.endpoint(), configuration.request_timeout())?
                .fetch()
                .await
        }
    }
}

async fn book<C: Configuration>(configuration: C, request: BookingRequest) -> Result<(), SyncError> {
    let available = AvailabilityMap::from_payload(fetch_once(&configuration).await?)?;
    let client = BookingClient::new(configuration.booking_url(), configuration.request_timeout())?;
    client.submit(&request, &available).await?;

    println!("Booked {} at {}", request.day, request.time);
    Ok(())
}
