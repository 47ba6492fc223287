//! Posting helpers for the "other propagators" family (spec §4.9) and the embedding API's
//! domain-surgery entry points (spec §6), layered as inherent methods on [`Solver`].
//!
//! Grounded on the teacher's `model/mod.rs`, which posts these same kinds of constraints by
//! building a clause or instantiating a propagator directly on a `ConstraintSatisfactionSolver`.
//! Unlike the teacher, none of this routes through an `AffineView`/`TransformableVariable`: a
//! constraint over a scaled or shifted variable introduces an explicit auxiliary [`DomainId`]
//! tied to the original by a linear-equality decomposition instead (see `DESIGN.md`).

use std::collections::HashMap;

use crate::basic_types::PostingError;
use crate::basic_types::PropagationStatusCP;
use crate::engine::propagation::context::ReadDomains;
use crate::engine::propagation::events;
use crate::engine::propagation::propagator::Propagator;
use crate::engine::propagation::propagator::PropagatorInitialisationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::Solver;
use crate::propagators::linear_leq::ceil_div;
use crate::propagators::linear_leq::floor_div;
use crate::propagators::AllDifferentPropagator;
use crate::propagators::LinearLeqPropagator;
use crate::propagators::Term;
use crate::variables::DomainId;
use crate::variables::Predicate;
use crate::variables::PropositionalConjunction;

impl Solver {
    /// `newCSPVarArray(n, lb, ub)`: `n` freshly created, independent integer variables.
    pub fn new_integer_variable_array(&mut self, count: usize, lower_bound: i32, upper_bound: i32) -> Vec<DomainId> {
        (0..count)
            .map(|_| self.new_integer_variable(lower_bound, upper_bound))
            .collect()
    }

    /// `setmin(x, bound)`: tightens `x`'s lower bound to `bound`, or reports unsatisfiability if
    /// `bound` is already above `x`'s current upper bound.
    pub fn setmin(&mut self, id: DomainId, bound: i32) -> Result<(), PostingError> {
        if bound <= self.domains().lower_bound(id) {
            return Ok(());
        }
        if bound > self.domains().upper_bound(id) {
            return Err(PostingError::Unsatisfiable);
        }
        let literal = self
            .domains()
            .order_literal(id, bound - 1)
            .expect("a bound strictly inside the current domain has a materialised order literal");
        self.add_clause(vec![!literal])
    }

    /// `setmax(x, bound)`: the dual of [`Solver::setmin`].
    pub fn setmax(&mut self, id: DomainId, bound: i32) -> Result<(), PostingError> {
        if bound >= self.domains().upper_bound(id) {
            return Ok(());
        }
        if bound < self.domains().lower_bound(id) {
            return Err(PostingError::Unsatisfiable);
        }
        let literal = self
            .domains()
            .order_literal(id, bound)
            .expect("a bound strictly inside the current domain has a materialised order literal");
        self.add_clause(vec![literal])
    }

    /// `remove(x, value)`: punches a hole in `x`'s domain. A no-op if `value` is already outside
    /// the current bounds.
    pub fn remove_value(&mut self, id: DomainId, value: i32) -> Result<(), PostingError> {
        if value < self.domains().lower_bound(id) || value > self.domains().upper_bound(id) {
            return Ok(());
        }
        let literal = self
            .domains()
            .equality_literal(id, value)
            .expect("a value inside the current bounds has a materialised equality literal");
        self.add_clause(vec![!literal])
    }

    /// `assign(x, value)`: fixes `x` to `value` outright.
    pub fn assign_value(&mut self, id: DomainId, value: i32) -> Result<(), PostingError> {
        if value < self.domains().lower_bound(id) || value > self.domains().upper_bound(id) {
            return Err(PostingError::Unsatisfiable);
        }
        let literal = self
            .domains()
            .equality_literal(id, value)
            .expect("a value inside the current bounds has a materialised equality literal");
        self.add_clause(vec![literal])
    }

    /// Posts `Σ terms[i].weight * terms[i].variable + constant <= 0`, coalescing repeated
    /// variables and dropping zero-weight terms first (spec §4.7's edge cases). Degenerates to a
    /// single `setmin`/`setmax` call for a one-variable constraint rather than instantiating a
    /// propagator for it.
    pub fn post_lin_leq(&mut self, terms: Vec<Term<DomainId>>, constant: i32) -> Result<(), PostingError> {
        let mut coalesced: HashMap<DomainId, i32> = HashMap::new();
        for term in terms {
            *coalesced.entry(term.variable).or_insert(0) += term.weight;
        }
        let terms: Vec<Term<DomainId>> = coalesced
            .into_iter()
            .filter(|&(_, weight)| weight != 0)
            .map(|(variable, weight)| Term { weight, variable })
            .collect();

        match terms.as_slice() {
            [] => {
                if constant <= 0 {
                    Ok(())
                } else {
                    Err(PostingError::Unsatisfiable)
                }
            }
            [term] => {
                // weight * x + constant <= 0
                if term.weight > 0 {
                    self.setmax(term.variable, floor_div(-constant, term.weight))
                } else {
                    self.setmin(term.variable, ceil_div(-constant, term.weight))
                }
            }
            _ => {
                let propagator = LinearLeqPropagator::new(terms.into_boxed_slice(), constant);
                self.add_propagator(Box::new(propagator))
            }
        }
    }

    /// `x == y + c`.
    pub fn post_int_eq(&mut self, x: DomainId, y: DomainId, c: i32) -> Result<(), PostingError> {
        self.post_int_leq(x, y, c)?;
        self.post_int_leq(y, x, -c)
    }

    /// `x <= y + c`.
    pub fn post_int_leq(&mut self, x: DomainId, y: DomainId, c: i32) -> Result<(), PostingError> {
        self.post_lin_leq(
            vec![Term { weight: 1, variable: x }, Term { weight: -1, variable: y }],
            -c,
        )
    }

    /// `x < y + c`.
    pub fn post_int_less(&mut self, x: DomainId, y: DomainId, c: i32) -> Result<(), PostingError> {
        self.post_int_leq(x, y, c - 1)
    }

    /// `x != y`, posted directly as one binary clause `[!eq(x, v), !eq(y, v)]` per value `v`
    /// shared by the two current domains, rather than as a scheduled propagator — every clause is
    /// its own tiny watched-literal "wake on either side going to `v`".
    pub fn post_not_equal(&mut self, x: DomainId, y: DomainId) -> Result<(), PostingError> {
        let lo = self.domains().lower_bound(x).max(self.domains().lower_bound(y));
        let hi = self.domains().upper_bound(x).min(self.domains().upper_bound(y));
        for value in lo..=hi {
            if let (Some(lit_x), Some(lit_y)) = (
                self.domains().equality_literal(x, value),
                self.domains().equality_literal(y, value),
            ) {
                self.add_clause(vec![!lit_x, !lit_y])?;
            }
        }
        Ok(())
    }

    /// `result == array[index - base]`, where `base` is `index`'s current lower bound. Posted as
    /// one binary clause `[!eq(index, i), eq(result, array[i - base])]` per index value: a
    /// two-literal clause propagates in both directions under watched-literal BCP, so fixing
    /// `result` also narrows `index`, and vice versa, without a dedicated element propagator.
    pub fn post_element(&mut self, result: DomainId, array: &[i32], index: DomainId) -> Result<(), PostingError> {
        let lo = self.domains().lower_bound(index);
        let hi = self.domains().upper_bound(index);
        if array.len() != (hi - lo + 1) as usize {
            return Err(PostingError::Unsupported(format!(
                "element array has {} entries but the index domain spans {} values",
                array.len(),
                hi - lo + 1
            )));
        }
        for (offset, &value) in array.iter().enumerate() {
            let i = lo + offset as i32;
            let Some(index_lit) = self.domains().equality_literal(index, i) else {
                continue;
            };
            match self.domains().equality_literal(result, value) {
                Some(result_lit) => self.add_clause(vec![!index_lit, result_lit])?,
                // `value` isn't even in result's domain: index can never take value `i`.
                None => self.add_clause(vec![!index_lit])?,
            }
        }
        Ok(())
    }

    /// `post_alldiff`: all of `variables` take pairwise-distinct values (spec §4.8).
    pub fn post_alldiff(&mut self, variables: Vec<DomainId>) -> Result<(), PostingError> {
        self.add_propagator(Box::new(AllDifferentPropagator::new(variables.into_boxed_slice())))
    }

    /// A set variable over the universe `{0, .., size - 1}`: one 0/1 membership variable per
    /// element plus a cardinality variable, in the style of `new_set_variable` sketched in spec
    /// §4.9/§9. Booleans are represented as `{0, 1}`-domain integer variables rather than raw
    /// propositional literals, so membership reuses the same watcher/bound machinery as every
    /// other integer variable instead of a separate boolean-literal watch list.
    pub fn new_set_variable(&mut self, size: usize) -> SetVariable {
        let membership = self.new_integer_variable_array(size, 0, 1).into_boxed_slice();
        let cardinality = self.new_integer_variable(0, size as i32);
        SetVariable {
            membership,
            cardinality,
        }
    }

    /// Ties a set variable's membership indicators to its cardinality variable:
    /// `Σ membership_i == cardinality`, posted as the two halves of the equality.
    pub fn post_set_cardinality(&mut self, set: &SetVariable) -> Result<(), PostingError> {
        let mut terms: Vec<Term<DomainId>> = set
            .membership
            .iter()
            .map(|&id| Term { weight: 1, variable: id })
            .collect();
        terms.push(Term {
            weight: -1,
            variable: set.cardinality,
        });
        let negated: Vec<Term<DomainId>> = terms
            .iter()
            .map(|term| Term {
                weight: -term.weight,
                variable: term.variable,
            })
            .collect();
        self.post_lin_leq(terms, 0)?;
        self.post_lin_leq(negated, 0)
    }

    /// `Σ weight_i * [operand_i == 1] >= target`: a pseudo-Boolean threshold constraint.
    ///
    /// Deliberately incomplete (spec §9's open question): this only raises a conflict once the
    /// best achievable sum can no longer reach `target`, and never strengthens any operand's
    /// bound the way a full pseudo-Boolean unit-propagation rule would. Operands are `{0,
    /// 1}`-domain variables (as with [`Solver::new_set_variable`]) rather than raw literals, for
    /// the same reason: it reuses the existing `DomainId` watcher plumbing.
    pub fn post_pseudo_boolean(&mut self, terms: Vec<(i32, DomainId)>, target: i32) -> Result<(), PostingError> {
        self.add_propagator(Box::new(PseudoBooleanPropagator::new(terms, target)))
    }
}

/// A set variable over a fixed universe, as created by [`Solver::new_set_variable`].
#[derive(Debug, Clone)]
pub struct SetVariable {
    /// `membership[i]` is a `{0, 1}` variable: `1` means element `i` is in the set.
    pub membership: Box<[DomainId]>,
    pub cardinality: DomainId,
}

/// Backs [`Solver::post_pseudo_boolean`]. Grounded on `minicsp`'s greedy pseudo-Boolean watch
/// scheme (`examples/original_source/core/cons.cpp`'s `cons_pb`): terms are kept sorted by
/// descending absolute weight so the "best achievable sum" check can short-circuit once the
/// remaining, still-reachable terms can no longer close the gap to `target`.
#[derive(Debug)]
struct PseudoBooleanPropagator {
    terms: Box<[(i32, DomainId)]>,
    target: i32,
}

impl PseudoBooleanPropagator {
    fn new(mut terms: Vec<(i32, DomainId)>, target: i32) -> Self {
        terms.sort_by_key(|&(weight, _)| std::cmp::Reverse(weight.abs()));
        PseudoBooleanPropagator {
            terms: terms.into_boxed_slice(),
            target,
        }
    }
}

impl Propagator for PseudoBooleanPropagator {
    fn name(&self) -> &str {
        "PseudoBoolean"
    }

    fn propagate(&self, context: PropagationContextMut) -> PropagationStatusCP {
        // Best case: every operand with a positive weight that could still become 1 does.
        // Operands with non-positive weight never help reach the threshold, so they are excluded
        // from the optimistic sum entirely (mirroring how a negative-weight PB term is handled by
        // flipping it to a positive-weight term over the negated literal in a fully general
        // encoding; this crate's greedy check only needs the achievable upper bound).
        let mut achievable = 0i32;
        for &(weight, id) in self.terms.iter() {
            if weight > 0 && context.contains(&id, 1) {
                achievable += weight;
            }
        }

        if achievable >= self.target {
            return Ok(());
        }

        // Conflict: blame every positive-weight term that has already been fixed away from 1,
        // accumulated in descending-weight order until the named deficit alone explains the gap.
        let mut reason = Vec::new();
        let mut lost = 0i32;
        let deficit = self.target - achievable;
        for &(weight, id) in self.terms.iter() {
            if weight > 0 && !context.contains(&id, 1) {
                reason.push(Predicate::Equal { id, value: 0 });
                lost += weight;
                if lost >= deficit {
                    break;
                }
            }
        }
        Err(PropositionalConjunction::new(reason))
    }

    fn initialise_at_root(
        &mut self,
        context: &mut PropagatorInitialisationContext,
    ) -> Result<(), PropositionalConjunction> {
        for &(_, id) in self.terms.iter() {
            context.register(id, events::presets::any());
        }
        Ok(())
    }
}
