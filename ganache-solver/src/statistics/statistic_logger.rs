use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Logs statistics under a accumulated name prefix, e.g. the statistics of a
/// propagator under the propagator's name.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// Attach `addition` to the stored prefix and return the result as a new
    /// [`StatisticLogger`].
    pub fn attach_to_prefix(&self, addition: impl Display) -> Self {
        if self.name_prefix.is_empty() {
            Self {
                name_prefix: addition.to_string(),
            }
        } else {
            Self {
                name_prefix: format!("{}_{addition}", self.name_prefix),
            }
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}
