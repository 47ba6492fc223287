//! Value-selection heuristics: given a chosen variable, which literal does the search branch on.

use crate::branching::SelectionContext;
use crate::variables::DomainId;
use crate::variables::Literal;

pub trait ValueSelector {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Literal;
}

/// Branches `x <= midpoint` first, the standard domain-splitting decision for bounds-only search.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bisect;

impl ValueSelector for Bisect {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Literal {
        let lb = context.domains.lower_bound(variable);
        let ub = context.domains.upper_bound(variable);
        let midpoint = lb + (ub - lb) / 2;
        context
            .domains
            .order_literal(variable, midpoint)
            .expect("midpoint between current bounds must have a materialised order literal")
    }
}

/// Branches `x == lower_bound` first, useful for enumeration-style search (e.g. scenario F's set
/// variable, where every solution needs every candidate value actually decided).
#[derive(Debug, Default, Clone, Copy)]
pub struct IndomainMin;

impl ValueSelector for IndomainMin {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Literal {
        let lb = context.domains.lower_bound(variable);
        context
            .domains
            .equality_literal(variable, lb)
            .expect("lower bound must have a materialised equality literal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clause::ClauseAllocator;
    use crate::engine::domains::IntegerDomains;
    use crate::engine::sat::AssignmentsPropositional;

    #[test]
    fn bisect_branches_on_midpoint() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x = domains.create_domain(&mut sat, &mut allocator, 0, 9);
        let variables = [x];
        let context = SelectionContext::new(&domains, &sat, &variables);

        let mut selector = Bisect;
        let decision = selector.select_value(&context, x);
        assert_eq!(decision, domains.order_literal(x, 4).unwrap());
    }
}
