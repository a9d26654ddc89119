//! Activation thresholds for each hardfork and the activation predicate.

use std::collections::BTreeMap;
use std::str::FromStr;

use opfork_protocol::TimePointSec;
use serde_json::Value as JsonValue;
use toml::Value as TomlValue;
use tracing::debug;

use crate::error::ScheduleError;
use crate::groups::ActivationGroup;
use crate::hardfork::Hardfork;

/// Section name recognised when a schedule is embedded in a larger config file.
pub const SCHEDULE_SECTION: &str = "HardforkSchedule";

const PROTOCOL_5_0: TimePointSec = TimePointSec::from_secs(1_604_584_800); // 2020-11-05T14:00:00
const PROTOCOL_5_1: TimePointSec = TimePointSec::from_secs(1_611_324_000); // 2021-01-22T14:00:00
const PROTOCOL_7_0: TimePointSec = TimePointSec::from_secs(1_680_098_400); // 2023-03-29T14:00:00

static MAINNET: ActivationSchedule = ActivationSchedule::mainnet();

/// The activation time of every hardfork.
///
/// A hardfork is active at any reference time greater than or equal to its
/// threshold, so activation is monotonic in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationSchedule {
    thresholds: [TimePointSec; Hardfork::COUNT],
}

impl ActivationSchedule {
    /// A schedule where every hardfork activates at `activation`.
    #[must_use]
    pub const fn uniform(activation: TimePointSec) -> Self {
        Self {
            thresholds: [activation; Hardfork::COUNT],
        }
    }

    /// MainNet activation times. Tanks and taps are not scheduled.
    #[must_use]
    pub const fn mainnet() -> Self {
        Self {
            // Indexed in `Hardfork` declaration order.
            thresholds: [
                PROTOCOL_5_0,
                PROTOCOL_7_0,
                TimePointSec::MAXIMUM,
                PROTOCOL_5_0,
                PROTOCOL_5_1,
                PROTOCOL_7_0,
                PROTOCOL_7_0,
                PROTOCOL_7_0,
                PROTOCOL_7_0,
            ],
        }
    }

    /// The process-wide MainNet schedule.
    #[must_use]
    pub fn shared_mainnet() -> &'static Self {
        &MAINNET
    }

    /// MainNet defaults with `entries` overriding individual thresholds.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Hardfork, TimePointSec)>,
    {
        entries
            .into_iter()
            .fold(Self::mainnet(), |schedule, (hardfork, activation)| {
                schedule.with_threshold(hardfork, activation)
            })
    }

    #[must_use]
    pub const fn threshold(&self, hardfork: Hardfork) -> TimePointSec {
        self.thresholds[hardfork.index()]
    }

    #[must_use]
    pub fn with_threshold(mut self, hardfork: Hardfork, activation: TimePointSec) -> Self {
        self.set_threshold(hardfork, activation);
        self
    }

    pub fn set_threshold(&mut self, hardfork: Hardfork, activation: TimePointSec) {
        self.thresholds[hardfork.index()] = activation;
    }

    /// Checks whether `hardfork` has taken effect at `now`.
    #[must_use]
    pub fn is_active(&self, hardfork: Hardfork, now: TimePointSec) -> bool {
        now >= self.threshold(hardfork)
    }

    /// Evaluates the activation predicate of `group` at `now`.
    #[must_use]
    pub fn evaluate(&self, group: ActivationGroup, now: TimePointSec) -> bool {
        match group {
            ActivationGroup::AlwaysOn => true,
            ActivationGroup::Gated(hardfork) => self.is_active(hardfork, now),
        }
    }

    /// Iterates over `(hardfork, threshold)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Hardfork, TimePointSec)> + '_ {
        Hardfork::ALL
            .into_iter()
            .map(move |hardfork| (hardfork, self.threshold(hardfork)))
    }

    /// Loads MainNet defaults overridden by a JSON map of hardfork code to
    /// timestamp, optionally nested under a `HardforkSchedule` key.
    pub fn from_json_str(input: &str) -> Result<Self, ScheduleError> {
        let value: JsonValue =
            serde_json::from_str(input).map_err(|err| ScheduleError::JsonError(err.to_string()))?;
        let entries: BTreeMap<String, TimePointSec> =
            serde_json::from_value(extract_json_section(value))
                .map_err(|err| ScheduleError::JsonError(err.to_string()))?;
        Self::mainnet().apply_overrides(entries)
    }

    /// Loads MainNet defaults overridden by a TOML table of hardfork code to
    /// timestamp, optionally nested under a `[HardforkSchedule]` table.
    ///
    /// Timestamps must be quoted strings or integer seconds.
    pub fn from_toml_str(input: &str) -> Result<Self, ScheduleError> {
        let table: toml::Table =
            toml::from_str(input).map_err(|err| ScheduleError::TomlError(err.to_string()))?;
        let entries: BTreeMap<String, TimePointSec> =
            extract_toml_section(TomlValue::Table(table))
                .try_into()
                .map_err(|err: toml::de::Error| ScheduleError::TomlError(err.to_string()))?;
        Self::mainnet().apply_overrides(entries)
    }

    fn apply_overrides(
        mut self,
        entries: BTreeMap<String, TimePointSec>,
    ) -> Result<Self, ScheduleError> {
        for (name, activation) in entries {
            let hardfork = Hardfork::from_str(&name)?;
            debug!(
                %hardfork,
                default = %self.threshold(hardfork),
                %activation,
                "activation threshold overridden"
            );
            self.set_threshold(hardfork, activation);
        }
        Ok(self)
    }
}

impl Default for ActivationSchedule {
    fn default() -> Self {
        Self::mainnet()
    }
}

fn extract_json_section(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(mut map) => map
            .remove(SCHEDULE_SECTION)
            .unwrap_or(JsonValue::Object(map)),
        other => other,
    }
}

fn extract_toml_section(value: TomlValue) -> TomlValue {
    match value {
        TomlValue::Table(mut table) => table
            .remove(SCHEDULE_SECTION)
            .unwrap_or(TomlValue::Table(table)),
        other => other,
    }
}
