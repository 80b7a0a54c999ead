use super::TerminationCondition;

/// A [`TerminationCondition`] which never fires; the solver runs until it has
/// a definitive conclusion.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
