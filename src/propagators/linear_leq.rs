//! Bounds-consistent weighted linear inequality: `Σ wᵢ·xᵢ + c ≤ 0` (spec §4.7).
//!
//! Grounded on `minicsp`'s `cons_lin_le::wake` (`examples/original_source/core/cons.cpp`): for
//! each term, the "optimistic" contribution is the lower bound times the weight when the weight
//! is positive, or the upper bound times the weight when it is negative — whichever makes the sum
//! as small as possible. If even the fully optimistic sum exceeds `0`, the constraint is violated;
//! otherwise the slack left over after fixing every *other* term at its optimistic value bounds
//! how far this term's own bound can be pushed.

use crate::basic_types::PropagationStatusCP;
use crate::engine::propagation::context::ReadDomains;
use crate::engine::propagation::events;
use crate::engine::propagation::propagator::Propagator;
use crate::engine::propagation::propagator::PropagatorInitialisationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::variables::IntegerVariable;
use crate::variables::Predicate;
use crate::variables::PropositionalConjunction;

#[derive(Debug, Clone)]
pub struct Term<Var> {
    pub weight: i32,
    pub variable: Var,
}

#[derive(Debug)]
pub struct LinearLeqPropagator<Var> {
    terms: Box<[Term<Var>]>,
    constant: i32,
}

impl<Var: IntegerVariable> LinearLeqPropagator<Var> {
    pub fn new(terms: Box<[Term<Var>]>, constant: i32) -> Self {
        LinearLeqPropagator { terms, constant }
    }

    fn optimistic_contribution(context: &impl ReadDomains, term: &Term<Var>) -> i32 {
        if term.weight >= 0 {
            term.weight * context.lower_bound(&term.variable)
        } else {
            term.weight * context.upper_bound(&term.variable)
        }
    }

    /// The bound fact that justifies `term`'s optimistic contribution: its current lower bound
    /// if the weight is non-negative, its current upper bound otherwise.
    fn optimistic_bound_predicate(context: &impl ReadDomains, term: &Term<Var>) -> Predicate {
        let id = term.variable.domain_id();
        if term.weight >= 0 {
            Predicate::LowerBound {
                id,
                bound: context.lower_bound(&term.variable),
            }
        } else {
            Predicate::UpperBound {
                id,
                bound: context.upper_bound(&term.variable),
            }
        }
    }

    fn optimistic_sum(&self, context: &impl ReadDomains) -> i32 {
        self.constant
            + self
                .terms
                .iter()
                .map(|term| Self::optimistic_contribution(context, term))
                .sum::<i32>()
    }
}

impl<Var: IntegerVariable + 'static> Propagator for LinearLeqPropagator<Var> {
    fn name(&self) -> &str {
        "LinearLeq"
    }

    fn propagate(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let optimistic_sum = self.optimistic_sum(&context);

        if optimistic_sum > 0 {
            let reason: PropositionalConjunction = self
                .terms
                .iter()
                .map(|term| Self::optimistic_bound_predicate(&context, term))
                .collect();
            return Err(reason);
        }

        for i in 0..self.terms.len() {
            let term = self.terms[i].clone();
            if term.weight == 0 {
                continue;
            }
            let contribution = Self::optimistic_contribution(&context, &term);
            let gap = -(optimistic_sum - contribution);

            let reason: PropositionalConjunction = self
                .terms
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| Self::optimistic_bound_predicate(&context, other))
                .collect();

            if term.weight > 0 {
                let new_upper_bound = floor_div(gap, term.weight);
                context.set_upper_bound(&term.variable, new_upper_bound, reason)?;
            } else {
                let new_lower_bound = ceil_div(gap, term.weight);
                context.set_lower_bound(&term.variable, new_lower_bound, reason)?;
            }
        }

        Ok(())
    }

    fn initialise_at_root(
        &mut self,
        context: &mut PropagatorInitialisationContext,
    ) -> Result<(), PropositionalConjunction> {
        for term in self.terms.iter() {
            context.register(term.variable.clone(), events::presets::bounds());
        }
        Ok(())
    }
}

/// Mathematical floor division (rounds toward negative infinity), matching the teacher's
/// `AffineView`'s `NumExt::div_floor` definition rather than Rust's truncating `/`. `pub(crate)`
/// so `crate::model`'s single-variable `post_lin_leq` degenerate case can reuse it.
pub(crate) fn floor_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if (r > 0 && b < 0) || (r < 0 && b > 0) {
        q - 1
    } else {
        q
    }
}

/// Mathematical ceiling division, the mirror of `floor_div` (teacher's `NumExt::div_ceil`).
pub(crate) fn ceil_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if (r > 0 && b > 0) || (r < 0 && b < 0) {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clause::ClauseAllocator;
    use crate::engine::domains::IntegerDomains;
    use crate::engine::propagation::queue::PropagatorQueue;
    use crate::engine::propagation::WatcherTable;
    use crate::engine::sat::AssignmentsPropositional;

    #[test]
    fn floor_and_ceil_div_handle_negative_numerators() {
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(ceil_div(7, -2), -3);
    }

    #[test]
    fn bound_propagation_tightens_all_three_upper_bounds() {
        // x + y + z <= 20, each in [6, 9] initially: scenario D of the worked examples. With two
        // other terms pinned at their optimistic (lower-bound) contribution of 6 apiece, the
        // remaining slack for the third is 20 - 6 - 6 = 8.
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x = domains.create_domain(&mut sat, &mut allocator, 6, 9);
        let y = domains.create_domain(&mut sat, &mut allocator, 6, 9);
        let z = domains.create_domain(&mut sat, &mut allocator, 6, 9);

        let propagator = LinearLeqPropagator::new(
            vec![
                Term { weight: 1, variable: x },
                Term { weight: 1, variable: y },
                Term { weight: 1, variable: z },
            ]
            .into_boxed_slice(),
            -20,
        );

        let mut queue = PropagatorQueue::default();
        let watchers: WatcherTable = vec![Vec::new(); domains.num_domains()];
        let context =
            PropagationContextMut::new(&mut sat, &mut domains, &mut allocator, &mut queue, &watchers);
        propagator.propagate(context).unwrap();

        assert_eq!(domains.upper_bound(x), 8);
        assert_eq!(domains.upper_bound(y), 8);
        assert_eq!(domains.upper_bound(z), 8);
    }
}
