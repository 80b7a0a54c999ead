use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::TerminationCondition;

/// A stop criterion backed by a shared atomic flag.
///
/// The only legitimate way for another thread (a wall-clock watchdog, an OS
/// signal handler) to interrupt a run: the thread sets the flag, and the
/// search loop observes it at the next node. The flag owner never touches
/// solver state.
#[derive(Clone, Debug, Default)]
pub struct SignalFlag {
    flag: Arc<AtomicBool>,
}

impl SignalFlag {
    pub fn new() -> SignalFlag {
        SignalFlag::default()
    }

    /// The flag to hand to the signalling thread.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl TerminationCondition for SignalFlag {
    fn should_stop(&mut self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
