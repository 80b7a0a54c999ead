use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::search::Decision;
use crate::engine::variables::DomainId;

/// A [`Brancher`] which makes its decisions by asking a
/// [`VariableSelector`] for a variable and a [`ValueSelector`] for the split,
/// with no communication between the two.
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<VarSelector, ValSelector> {
    variable_selector: VarSelector,
    value_selector: ValSelector,
}

impl<VarSelector, ValSelector> IndependentVariableValueBrancher<VarSelector, ValSelector> {
    pub fn new(variable_selector: VarSelector, value_selector: ValSelector) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
        }
    }
}

impl<VarSelector, ValSelector> Brancher
    for IndependentVariableValueBrancher<VarSelector, ValSelector>
where
    VarSelector: VariableSelector,
    ValSelector: ValueSelector,
{
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        self.variable_selector
            .select_variable(context)
            .map(|variable| {
                Decision::binary(self.value_selector.select_value(context, variable))
            })
    }

    fn on_unassign_integer(&mut self, variable: DomainId, value: i32) {
        self.value_selector.on_unassign_integer(variable, value);
    }

    fn is_restart_pointless(&mut self) -> bool {
        self.variable_selector.is_restart_pointless()
            && self.value_selector.is_restart_pointless()
    }
}
