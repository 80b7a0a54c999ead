use crate::basic_types::sequence_generators::ConstantSequence;
use crate::basic_types::sequence_generators::GeometricSequence;
use crate::basic_types::sequence_generators::LubySequence;
use crate::basic_types::sequence_generators::SequenceGenerator;
use crate::basic_types::sequence_generators::SequenceGeneratorType;

/// Options determining when the search restarts from the root.
#[derive(Debug, Clone, Copy)]
pub struct RestartOptions {
    /// The sequence which paces the restarts, in combination with
    /// [`RestartOptions::base_interval`].
    pub sequence_generator_type: SequenceGeneratorType,
    /// The multiplier of the restart sequence; e.g. constant restarts with
    /// base interval 100 restart every 100 conflicts.
    pub base_interval: u64,
    /// The number of conflicts before the first restart is considered.
    pub min_num_conflicts_before_first_restart: u64,
    /// The factor of the geometric sequence; only read when
    /// [`RestartOptions::sequence_generator_type`] is
    /// [`SequenceGeneratorType::Geometric`].
    pub geometric_coefficient: Option<f64>,
}

impl Default for RestartOptions {
    fn default() -> Self {
        RestartOptions {
            sequence_generator_type: SequenceGeneratorType::Constant,
            base_interval: 50,
            min_num_conflicts_before_first_restart: 10_000,
            geometric_coefficient: None,
        }
    }
}

/// Decides when the search loop restarts: after the configured number of
/// conflicts since the previous restart, where that number follows the
/// configured sequence.
#[derive(Debug)]
pub(crate) struct RestartStrategy {
    sequence_generator: Box<dyn SequenceGenerator>,
    num_conflicts_until_restart: u64,
    num_conflicts_since_restart: u64,
    min_num_conflicts_before_first_restart: u64,
    num_restarts: u64,
}

impl Default for RestartStrategy {
    fn default() -> Self {
        RestartStrategy::new(RestartOptions::default())
    }
}

impl RestartStrategy {
    pub(crate) fn new(options: RestartOptions) -> RestartStrategy {
        let mut sequence_generator: Box<dyn SequenceGenerator> =
            match options.sequence_generator_type {
                SequenceGeneratorType::Constant => {
                    Box::new(ConstantSequence::new(options.base_interval as i64))
                }
                SequenceGeneratorType::Geometric => Box::new(GeometricSequence::new(
                    options.base_interval as i64,
                    options.geometric_coefficient.expect(
                        "a geometric restart sequence requires the geometric coefficient option",
                    ),
                )),
                SequenceGeneratorType::Luby => {
                    Box::new(LubySequence::new(options.base_interval as i64))
                }
            };

        RestartStrategy {
            num_conflicts_until_restart: sequence_generator.next() as u64,
            sequence_generator,
            num_conflicts_since_restart: 0,
            min_num_conflicts_before_first_restart: options
                .min_num_conflicts_before_first_restart,
            num_restarts: 0,
        }
    }

    pub(crate) fn notify_conflict(&mut self) {
        self.num_conflicts_since_restart += 1;
    }

    pub(crate) fn should_restart(&self) -> bool {
        if self.num_restarts == 0
            && self.num_conflicts_since_restart < self.min_num_conflicts_before_first_restart
        {
            return false;
        }
        self.num_conflicts_since_restart >= self.num_conflicts_until_restart
    }

    pub(crate) fn notify_restart(&mut self) {
        self.num_restarts += 1;
        self.num_conflicts_since_restart = 0;
        self.num_conflicts_until_restart = self.sequence_generator.next() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eager_options(sequence: SequenceGeneratorType) -> RestartOptions {
        RestartOptions {
            sequence_generator_type: sequence,
            base_interval: 2,
            min_num_conflicts_before_first_restart: 0,
            geometric_coefficient: None,
        }
    }

    #[test]
    fn no_restart_before_the_interval_is_reached() {
        let mut strategy = RestartStrategy::new(eager_options(SequenceGeneratorType::Constant));

        assert!(!strategy.should_restart());
        strategy.notify_conflict();
        assert!(!strategy.should_restart());
        strategy.notify_conflict();
        assert!(strategy.should_restart());
    }

    #[test]
    fn the_conflict_count_resets_on_restart() {
        let mut strategy = RestartStrategy::new(eager_options(SequenceGeneratorType::Constant));

        strategy.notify_conflict();
        strategy.notify_conflict();
        strategy.notify_restart();
        assert!(!strategy.should_restart());
    }

    #[test]
    fn the_first_restart_waits_for_the_configured_minimum() {
        let mut strategy = RestartStrategy::new(RestartOptions {
            min_num_conflicts_before_first_restart: 5,
            base_interval: 2,
            ..RestartOptions::default()
        });

        for _ in 0..4 {
            strategy.notify_conflict();
        }
        assert!(!strategy.should_restart());
        strategy.notify_conflict();
        assert!(strategy.should_restart());

        // Subsequent restarts follow the sequence without the minimum.
        strategy.notify_restart();
        strategy.notify_conflict();
        strategy.notify_conflict();
        assert!(strategy.should_restart());
    }
}
