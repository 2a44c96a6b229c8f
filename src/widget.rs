//! Ports towards the two UI surfaces: the calendar widget and the time selector.

use chrono::NaiveDate;

/// Format string handed to the calendar widget. Matches `ISO_DATE_FORMAT`.
pub const PICKER_DATE_FORMAT: &str = "Y-m-d";
pub const TIME_PLACEHOLDER: &str = "Select a time";
pub const NO_TIMES_AVAILABLE: &str = "No times available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
    /// Only these dates can be picked.
    Enable(Vec<NaiveDate>),
    /// Every date except these can be picked.
    Disable(Vec<NaiveDate>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerConfig {
    pub date_format: &'static str,
    pub rule: DateRule,
    pub bounds: DateBounds,
}

impl PickerConfig {
    pub fn new(rule: DateRule, bounds: DateBounds) -> Self {
        Self {
            date_format: PICKER_DATE_FORMAT,
            rule,
            bounds,
        }
    }
}

/// The calendar widget. `initialize` is called exactly once, every later
/// configuration change goes through `update`.
#[cfg_attr(test, mockall::automock)]
pub trait DatePicker {
    fn initialize(&mut self, config: PickerConfig);
    fn update(&mut self, config: PickerConfig);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

impl SelectOption {
    fn time(time: &str) -> Self {
        Self {
            value: time.to_string(),
            label: time.to_string(),
            disabled: false,
            selected: false,
        }
    }

    fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
            disabled: true,
            selected: true,
        }
    }
}

/// The list control the user picks a time from.
#[cfg_attr(test, mockall::automock)]
pub trait TimeSelector {
    fn replace_options(&mut self, options: Vec<SelectOption>);
    fn set_disabled(&mut self, disabled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSelection {
    pub options: Vec<SelectOption>,
    pub disabled: bool,
}

impl TimeSelection {
    pub fn for_times(times: &[String]) -> Self {
        if times.is_empty() {
            return Self {
                options: vec![SelectOption::placeholder(NO_TIMES_AVAILABLE)],
                disabled: true,
            };
        }

        let options = std::iter::once(SelectOption::placeholder(TIME_PLACEHOLDER))
            .chain(times.iter().map(|time| SelectOption::time(time)))
            .collect();
        Self {
            options,
            disabled: false,
        }
    }

    pub fn render<T: TimeSelector + ?Sized>(self, selector: &mut T) {
        selector.replace_options(self.options);
        selector.set_disabled(self.disabled);
    }
}

/// What the calendar widget would let the user click, given the last configuration it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    config: PickerConfig,
}

impl PickerState {
    pub fn new(config: PickerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        if !self.config.bounds.contains(date) {
            return false;
        }
        match &self.config.rule {
            DateRule::Enable(enabled) => enabled.contains(&date),
            DateRule::Disable(disabled) => !disabled.contains(&date),
        }
    }

    /// Selectable dates in `from..=to`.
    pub fn selectable_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        from.iter_days()
            .take_while(|date| *date <= to)
            .filter(|date| self.is_selectable(*date))
            .collect()
    }
}
