use enumset::EnumSet;

use super::IntDomainEvent;
use crate::containers::KeyedVec;
use crate::engine::propagation::PropagatorVarId;
use crate::engine::variables::DomainId;

/// For each variable, the propagators to awaken per event kind.
#[derive(Debug, Default)]
pub(crate) struct WatchLists {
    watchers: KeyedVec<DomainId, DomainWatchers>,
}

#[derive(Debug, Default)]
struct DomainWatchers {
    assign: Vec<PropagatorVarId>,
    lower_bound: Vec<PropagatorVarId>,
    upper_bound: Vec<PropagatorVarId>,
    removal: Vec<PropagatorVarId>,
}

impl DomainWatchers {
    fn for_event(&self, event: IntDomainEvent) -> &Vec<PropagatorVarId> {
        match event {
            IntDomainEvent::Assign => &self.assign,
            IntDomainEvent::LowerBound => &self.lower_bound,
            IntDomainEvent::UpperBound => &self.upper_bound,
            IntDomainEvent::Removal => &self.removal,
        }
    }

    fn for_event_mut(&mut self, event: IntDomainEvent) -> &mut Vec<PropagatorVarId> {
        match event {
            IntDomainEvent::Assign => &mut self.assign,
            IntDomainEvent::LowerBound => &mut self.lower_bound,
            IntDomainEvent::UpperBound => &mut self.upper_bound,
            IntDomainEvent::Removal => &mut self.removal,
        }
    }
}

impl WatchLists {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(DomainWatchers::default());
    }

    pub(crate) fn watch(
        &mut self,
        watcher: PropagatorVarId,
        domain: DomainId,
        events: EnumSet<IntDomainEvent>,
    ) {
        for event in events {
            let list = self.watchers[domain].for_event_mut(event);
            if !list.contains(&watcher) {
                list.push(watcher);
            }
        }
    }

    pub(crate) fn watchers(&self, domain: DomainId, event: IntDomainEvent) -> &[PropagatorVarId] {
        self.watchers[domain].for_event(event)
    }
}
