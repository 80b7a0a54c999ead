use enumset::EnumSet;

use super::EventCause;
use super::IntDomainEvent;

/// One change record of a variable: the events it raised, the removed value
/// if the change was a removal, and the causing propagator.
#[derive(Debug, Clone, Copy)]
pub struct DeltaEntry {
    pub events: EnumSet<IntDomainEvent>,
    pub removed_value: Option<i32>,
    pub(crate) cause: EventCause,
}

/// A consumer's position in a variable's delta. Incremental propagators keep
/// one marker per watched variable; reading through the marker yields only
/// the records since the previous read ("delta since last freeze").
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaMarker {
    era: u64,
    index: usize,
}

/// The accumulated change records of one variable for the current era.
///
/// An era ends whenever a world is pushed or rolled back; records of an
/// earlier era are stale. Staleness is detected and wiped on the first record
/// in the new era rather than eagerly on backtrack.
#[derive(Debug, Default)]
pub(crate) struct Delta {
    era: u64,
    entries: Vec<DeltaEntry>,
}

impl Delta {
    pub(crate) fn record(
        &mut self,
        era: u64,
        events: EnumSet<IntDomainEvent>,
        removed_value: Option<i32>,
        cause: EventCause,
    ) {
        if self.era != era {
            self.entries.clear();
            self.era = era;
        }
        self.entries.push(DeltaEntry {
            events,
            removed_value,
            cause,
        });
    }

    pub(crate) fn entries_since(&self, era: u64, marker: &mut DeltaMarker) -> &[DeltaEntry] {
        if self.era != era {
            // Nothing was recorded in the current era yet.
            *marker = DeltaMarker { era, index: 0 };
            return &[];
        }

        if marker.era != era {
            *marker = DeltaMarker { era, index: 0 };
        }

        let from = marker.index.min(self.entries.len());
        marker.index = self.entries.len();
        &self.entries[from..]
    }
}
