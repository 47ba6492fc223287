//! The search driver's decision policy (spec §4.6): pick an unfixed variable, pick a value for
//! it, post the corresponding order/equality literal as a decision.

pub mod value_selection;
pub mod variable_selection;

use crate::engine::domains::IntegerDomains;
use crate::engine::sat::AssignmentsPropositional;
use crate::variables::DomainId;
use crate::variables::Literal;

pub use value_selection::ValueSelector;
pub use variable_selection::VariableSelector;

/// Read-only view handed to selectors: every variable still in scope, plus the domains/sat state
/// needed to judge them.
pub struct SelectionContext<'a> {
    pub domains: &'a IntegerDomains,
    pub sat: &'a AssignmentsPropositional,
    pub variables: &'a [DomainId],
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        domains: &'a IntegerDomains,
        sat: &'a AssignmentsPropositional,
        variables: &'a [DomainId],
    ) -> Self {
        SelectionContext {
            domains,
            sat,
            variables,
        }
    }

    pub fn unfixed_variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.variables
            .iter()
            .copied()
            .filter(|&id| !self.domains.is_fixed(id))
    }
}

/// Combines a variable selector and a value selector into the single decision the search driver
/// needs each node: "which literal should I branch on next?".
pub struct Brancher<VS, ValS> {
    pub variable_selector: VS,
    pub value_selector: ValS,
}

impl<VS: VariableSelector, ValS: ValueSelector> Brancher<VS, ValS> {
    pub fn new(variable_selector: VS, value_selector: ValS) -> Self {
        Brancher {
            variable_selector,
            value_selector,
        }
    }

    /// Returns `None` once every variable is fixed (the search has found a solution).
    pub fn next_decision(&mut self, context: &SelectionContext) -> Option<Literal> {
        let variable = self.variable_selector.select_variable(context)?;
        Some(self.value_selector.select_value(context, variable))
    }
}
