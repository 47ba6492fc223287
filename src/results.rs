//! The solution-facing half of the embedding API (spec §6): turning a feasible search into a
//! queryable snapshot, and turning that snapshot back into a blocking clause for enumeration.
//!
//! Grounded on the teacher's `results::{Solution, ProblemSolution}`, minus the multi-solution
//! bookkeeping the teacher's proof-logging front end needs — this crate's caller drives
//! enumeration itself by looping `solve_for_solution` / `exclude_last`.

use std::collections::HashMap;

use crate::basic_types::CSPSolverExecutionFlag;
use crate::basic_types::PostingError;
use crate::engine::Solver;
use crate::termination::TerminationCondition;
use crate::variables::DomainId;

/// A snapshot of every integer variable's value at a feasible search state.
#[derive(Debug, Clone)]
pub struct Solution {
    values: HashMap<DomainId, i32>,
}

impl Solution {
    /// Reads every variable `solver` has created. Only meaningful right after `solver.solve(..)`
    /// returned [`CSPSolverExecutionFlag::Feasible`], when every domain is a singleton.
    fn extract(solver: &Solver) -> Self {
        let values = solver
            .variables()
            .iter()
            .map(|&id| (id, solver.domains().lower_bound(id)))
            .collect();
        Solution { values }
    }

    /// `value(x)`: the single value `x` took in this solution.
    pub fn value(&self, id: DomainId) -> i32 {
        self.values[&id]
    }

    /// `cspModelRange(x)`: the `[lower, upper]` range of `x` in this solution — always `(v, v)`
    /// for a genuine solution, but kept as a range to match the embedding API's general query
    /// shape (the same call also answers mid-search range queries via `Solver::domains()`).
    pub fn range(&self, id: DomainId) -> (i32, i32) {
        let value = self.value(id);
        (value, value)
    }

    fn variables(&self) -> impl Iterator<Item = (&DomainId, &i32)> {
        self.values.iter()
    }
}

impl Solver {
    /// Runs search to completion and, on success, returns a [`Solution`] snapshot. Unlike the raw
    /// [`Solver::solve`], which returns a [`CSPSolverExecutionFlag`] for callers that need to
    /// distinguish infeasible from timeout, this collapses both non-solution outcomes to `None` —
    /// the plain bool/Option contract spec §6 describes for simple embedding.
    pub fn solve_for_solution(&mut self, termination: &mut impl TerminationCondition) -> Option<Solution> {
        match self.solve(termination) {
            CSPSolverExecutionFlag::Feasible => Some(Solution::extract(self)),
            CSPSolverExecutionFlag::Infeasible | CSPSolverExecutionFlag::Timeout => None,
        }
    }

    /// `excludeLast()`: posts a clause forbidding exactly the combination of values in `solution`,
    /// so a subsequent `solve_for_solution` call finds a different one (or proves there isn't
    /// one). The clause is a disjunction of "some variable differs from its value here" literals.
    pub fn exclude_last(&mut self, solution: &Solution) -> Result<(), PostingError> {
        let mut literals = Vec::new();
        for (&id, &value) in solution.variables() {
            let Some(eq_literal) = self.domains().equality_literal(id, value) else {
                continue;
            };
            literals.push(!eq_literal);
        }
        self.add_clause(literals)
    }
}
