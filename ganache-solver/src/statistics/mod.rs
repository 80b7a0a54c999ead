//! Plumbing for logging statistics of the solving process in a uniform
//! `prefix name=value` format.
//!
//! The displaying of statistics is left to the embedding application; this
//! module only provides the writer configuration, the [`Statistic`] trait
//! and the [`create_statistics_struct!`] macro that derives it.

mod statistic_logger;
mod statistic_logging;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;

/// A set of statistics that can be logged through a [`StatisticLogger`].
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

/// Creates a statistics struct whose fields all implement
/// [`std::fmt::Display`], together with a [`Statistic`] implementation that
/// logs every field under its own name.
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident {
        $($(#[$field_documentation:meta])* $field:ident: $type:ty),+ $(,)?
    }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub struct $name {
            $($(#[$field_documentation])* pub(crate) $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $(statistic_logger
                    .attach_to_prefix(stringify!($field))
                    .log_statistic(self.$field);)+
            }
        }
    };
}
