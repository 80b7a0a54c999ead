use super::deepest_refutable_level;
use super::ConflictResolver;
use super::Resolution;
use super::ResolutionContext;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::engine::explanation::Explanation;
use crate::engine::search::Branch;
use crate::engine::search::Decision;

/// Dynamic backtracking: like conflict-based backjumping, but the decisions
/// between the jump target and the failing level that the explanation proves
/// independent of the conflict are not discarded. They are handed back to
/// the search loop as decisions to force, replayed (at shifted world indices)
/// ahead of the main brancher, so their sub-trees are never re-explored from
/// scratch.
#[derive(Debug, Default)]
pub(crate) struct DynamicBacktracking {
    refutations: HashMap<usize, Explanation>,
}

impl ConflictResolver for DynamicBacktracking {
    fn resolve(&mut self, context: ResolutionContext<'_>) -> Resolution {
        let ResolutionContext {
            conflict,
            engine,
            path,
            analyser,
        } = context;

        let mut explanation = analyser.analyse(conflict, engine, path, &self.refutations, None);
        if !explanation.is_complete() {
            analyser.extend(&mut explanation, engine, path, &self.refutations, None);
        }

        let Some(deepest) = explanation.deepest_level() else {
            return Resolution {
                target_level: 0,
                decisions_to_force: Vec::new(),
            };
        };

        let target = deepest_refutable_level(path, deepest);

        // Decisions the conflict does not depend on are preserved; entangled
        // ones (in the explanation, or the refuted target itself) are
        // discarded and freshly explored.
        let entangled: HashSet<usize> = explanation
            .decision_levels()
            .filter(|&level| level > target)
            .collect();

        let mut decisions_to_force = Vec::new();
        for level in target + 1..=path.level() {
            if entangled.contains(&level) {
                continue;
            }
            let entry = path.entry(level);
            let decision = match entry.branch {
                Branch::Applied => entry.decision,
                // An exhausted first branch is not replayed; the in-effect
                // refutation becomes the first branch of the replay.
                Branch::Refuted => Decision::binary(entry.in_effect()),
            };
            decisions_to_force.push(decision);
        }

        self.refutations.retain(|&level, _| level < target);
        if target > 0 && target == deepest {
            let _ = self.refutations.insert(target, explanation);
        }

        Resolution {
            target_level: target,
            decisions_to_force,
        }
    }

    fn synchronise(&mut self, level: usize) {
        self.refutations.retain(|&position, _| position <= level);
    }
}
