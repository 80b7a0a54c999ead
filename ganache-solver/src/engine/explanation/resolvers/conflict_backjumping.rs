use super::deepest_refutable_level;
use super::ConflictResolver;
use super::Resolution;
use super::ResolutionContext;
use crate::containers::HashMap;
use crate::engine::explanation::Explanation;

/// Conflict-based backjumping: the explanation of a contradiction names the
/// decisions it depends on, and the search jumps directly above the deepest
/// of them, discarding the provably irrelevant levels in between.
///
/// The explanation that justified a refutation is stored, keyed by the path
/// position of the refuted decision. When a later conflict depends on that
/// refutation, the stored justification is substituted during analysis
/// instead of treating the refutation as a free decision.
#[derive(Debug, Default)]
pub(crate) struct ConflictBackjumping {
    refutations: HashMap<usize, Explanation>,
}

impl ConflictResolver for ConflictBackjumping {
    fn resolve(&mut self, context: ResolutionContext<'_>) -> Resolution {
        let ResolutionContext {
            conflict,
            engine,
            path,
            analyser,
        } = context;

        let mut explanation = analyser.analyse(conflict, engine, path, &self.refutations, None);
        if !explanation.is_complete() {
            // A merged stored justification can be partial; a sound jump
            // target requires it fully expanded.
            analyser.extend(&mut explanation, engine, path, &self.refutations, None);
        }

        let Some(deepest) = explanation.deepest_level() else {
            return Resolution {
                target_level: 0,
                decisions_to_force: Vec::new(),
            };
        };

        let target = deepest_refutable_level(path, deepest);
        self.refutations.retain(|&level, _| level < target);
        if target > 0 && target == deepest {
            // The conflict directly justifies this refutation; keep the
            // justification for reuse if the refutation itself fails later.
            let _ = self.refutations.insert(target, explanation);
        }

        Resolution {
            target_level: target,
            decisions_to_force: Vec::new(),
        }
    }

    fn synchronise(&mut self, level: usize) {
        self.refutations.retain(|&position, _| position <= level);
    }
}
