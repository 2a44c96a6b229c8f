use crate::{types::Variant, widget::DateBounds};
use std::{path::PathBuf, time::Duration};

pub trait Configuration: Clone + Send + Sync + 'static {
    fn endpoint(&self) -> String;
    fn booking_url(&self) -> String;
    fn refresh_interval(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn variant(&self) -> Variant;
    fn date_bounds(&self) -> DateBounds;
    fn horizon_days(&self) -> u32;
    fn fixture_path(&self) -> Option<PathBuf>;
}
