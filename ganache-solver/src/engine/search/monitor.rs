use super::Decision;
use crate::basic_types::Solution;

/// Observer of the search loop, called around every transition of the
/// per-node state machine.
///
/// Monitors are strictly observational: they receive no mutable access to the
/// engine, which keeps any number of them composable. Statistics displays and
/// external visualisations are implemented as monitors.
#[allow(unused_variables, reason = "default implementations ignore their arguments")]
pub trait SearchMonitor {
    /// Called before the root propagation of a (re)started solve.
    fn before_initialize(&mut self) {}

    /// Called after the root propagation of a (re)started solve.
    fn after_initialize(&mut self) {}

    /// Called before `decision` is applied one level deeper.
    fn before_down_branch(&mut self, decision: &Decision) {}

    /// Called after `decision` has been applied.
    fn after_down_branch(&mut self, decision: &Decision) {}

    /// Called before the search rolls back to `target_world`.
    fn before_up_branch(&mut self, target_world: usize) {}

    /// Called after the search has rolled back to `target_world`.
    fn after_up_branch(&mut self, target_world: usize) {}

    /// Called with every solution the search encounters.
    fn on_solution(&mut self, solution: &Solution) {}

    /// Called when propagation raises a contradiction, before it is analysed.
    fn on_contradiction(&mut self) {}

    /// Called before the search restarts from the root.
    fn before_restart(&mut self) {}

    /// Called after the search has restarted.
    fn after_restart(&mut self) {}

    /// Called when the search concludes, before the final state is reported.
    fn before_close(&mut self) {}

    /// Called when the search has concluded.
    fn after_close(&mut self) {}
}

/// The monitors attached to an engine, notified in attachment order.
#[derive(Default)]
pub(crate) struct Monitors {
    monitors: Vec<Box<dyn SearchMonitor>>,
}

impl Monitors {
    pub(crate) fn attach(&mut self, monitor: Box<dyn SearchMonitor>) {
        self.monitors.push(monitor);
    }

    pub(crate) fn notify(&mut self, mut event: impl FnMut(&mut dyn SearchMonitor)) {
        for monitor in self.monitors.iter_mut() {
            event(monitor.as_mut());
        }
    }
}

impl std::fmt::Debug for Monitors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitors")
            .field("num_monitors", &self.monitors.len())
            .finish()
    }
}
