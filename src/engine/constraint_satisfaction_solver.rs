//! The search driver: ties the Boolean core, the integer-domain encoding, and the propagator
//! scheduler together into a single CDCL+CP loop (spec §4.10).
//!
//! Unlike the teacher's `ConstraintSatisfactionSolver`, which keeps a Boolean trail
//! (`AssignmentsPropositional`) and an integer trail (`AssignmentsInteger`) in lockstep via an
//! explicit synchronisation step every round, this crate uses the single unified
//! [`crate::engine::trail::Trail`] described by spec.md §3 directly: every literal — decision,
//! clause-propagated, or propagator-derived — lands on one trail, and `IntegerDomains` is a
//! cache over it rather than a second source of truth. See `DESIGN.md` for the tradeoffs.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::basic_types::CSPSolverExecutionFlag;
use crate::basic_types::PostingError;
use crate::branching::value_selection::Bisect;
use crate::branching::value_selection::IndomainMin;
use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::FirstFail;
use crate::branching::variable_selection::Lexicographic;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::clause::ClauseAllocator;
use crate::engine::conflict_analysis;
use crate::engine::domains::conflict_from_reason;
use crate::engine::domains::IntegerDomains;
use crate::engine::propagation::context::PropagationContext;
use crate::engine::propagation::context::PropagationContextMut;
use crate::engine::propagation::events::DomainEvent;
use crate::engine::propagation::propagator::PropagatorInitialisationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorQueue;
use crate::engine::propagation::WatcherTable;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::sat::Conflict;
use crate::engine::trail::Reason;
use crate::engine::variable_names::VariableNames;
use crate::statistics::Counters;
use crate::termination::TerminationCondition;
use crate::variables::DomainId;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// `varbranch` (spec §6): which unfixed variable to branch on next. `Vsids` and `DomWdeg` are
/// named by the spec but not implemented by this crate (see `DESIGN.md`'s Open Question decision)
/// and fall back to `Dom`, the heuristic this crate does implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableBranch {
    Vsids,
    Lex,
    Dom,
    DomWdeg,
}

/// `valbranch` (spec §6): which value to try first for the chosen variable. `Vsids` (assign phase
/// from VSIDS polarity) is named by the spec but not implemented and falls back to `Bisect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBranch {
    Vsids,
    Lex,
    Bisect,
}

/// Root-level, user-overridable knobs (spec §6).
#[derive(Debug, Clone)]
pub struct SolverOptions {
    pub learning_enabled: bool,
    pub restarts_enabled: bool,
    pub base_restart_interval: u64,
    pub random_seed: u64,
    pub varbranch: VariableBranch,
    pub valbranch: ValueBranch,
    pub verbosity: u8,
    pub trace: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            learning_enabled: true,
            restarts_enabled: true,
            base_restart_interval: 100,
            random_seed: 0,
            varbranch: VariableBranch::Dom,
            valbranch: ValueBranch::Bisect,
            verbosity: 0,
            trace: false,
        }
    }
}

fn variable_selector_for(kind: VariableBranch) -> Box<dyn VariableSelector> {
    match kind {
        VariableBranch::Lex => Box::new(Lexicographic),
        // VSIDS and dom/wdeg aren't implemented; both fall back to plain smallest-domain.
        VariableBranch::Dom | VariableBranch::Vsids | VariableBranch::DomWdeg => Box::new(FirstFail),
    }
}

fn value_selector_for(kind: ValueBranch) -> Box<dyn ValueSelector> {
    match kind {
        ValueBranch::Lex => Box::new(IndomainMin),
        // VSIDS-polarity isn't implemented; falls back to bisection.
        ValueBranch::Bisect | ValueBranch::Vsids => Box::new(Bisect),
    }
}

pub struct Solver {
    sat: AssignmentsPropositional,
    domains: IntegerDomains,
    allocator: ClauseAllocator,
    propagators: Vec<Box<dyn Propagator>>,
    watchers: WatcherTable,
    queue: PropagatorQueue,
    counters: Counters,
    pub variable_names: VariableNames,
    options: SolverOptions,
    #[allow(dead_code, reason = "seeded for reproducible tie-breaking once value selectors use it")]
    random_generator: SmallRng,
    variable_selector: Box<dyn VariableSelector>,
    value_selector: Box<dyn ValueSelector>,
    all_variables: Vec<DomainId>,
    conflicts_since_restart: u64,
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("num_variables", &self.all_variables.len())
            .field("num_propagators", &self.propagators.len())
            .finish()
    }
}

impl Solver {
    pub fn new(options: SolverOptions) -> Self {
        let variable_selector = variable_selector_for(options.varbranch);
        let value_selector = value_selector_for(options.valbranch);
        Solver {
            sat: AssignmentsPropositional::default(),
            domains: IntegerDomains::default(),
            allocator: ClauseAllocator::default(),
            propagators: Vec::new(),
            watchers: Vec::new(),
            queue: PropagatorQueue::default(),
            counters: Counters::default(),
            variable_names: VariableNames::default(),
            random_generator: SmallRng::seed_from_u64(options.random_seed),
            options,
            variable_selector,
            value_selector,
            all_variables: Vec::new(),
            conflicts_since_restart: 0,
        }
    }

    pub fn set_variable_selector(&mut self, selector: Box<dyn VariableSelector>) {
        self.variable_selector = selector;
    }

    pub fn set_value_selector(&mut self, selector: Box<dyn ValueSelector>) {
        self.value_selector = selector;
    }

    pub fn new_integer_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let id = self
            .domains
            .create_domain(&mut self.sat, &mut self.allocator, lower_bound, upper_bound);
        self.watchers.push(Vec::new());
        self.all_variables.push(id);
        id
    }

    pub fn new_boolean_variable(&mut self) -> PropositionalVariable {
        self.sat.new_variable()
    }

    pub fn domains(&self) -> &IntegerDomains {
        &self.domains
    }

    pub fn assignments(&self) -> &AssignmentsPropositional {
        &self.sat
    }

    /// Every integer variable created so far, in creation order. Used by [`crate::results`] to
    /// build a full [`crate::results::Solution`] snapshot without the caller having to remember
    /// every `DomainId` it handed out.
    pub fn variables(&self) -> &[DomainId] {
        &self.all_variables
    }

    /// Posts a root-level clause. Empty clauses and unit clauses that contradict what's already
    /// on the trail are reported as `PostingError::Unsatisfiable`.
    pub fn add_clause(&mut self, literals: Vec<Literal>) -> Result<(), PostingError> {
        match literals.len() {
            0 => Err(PostingError::Unsatisfiable),
            1 => {
                let literal = literals[0];
                // `enqueue` treats an already-false `Fact` as a programming error (it can't
                // point to a falsifying clause the way a propagated literal can), so a
                // contradictory root-level fact has to be caught here rather than passed through.
                if self.sat.is_false(literal) {
                    return Err(PostingError::Unsatisfiable);
                }
                match self.sat.enqueue(literal, Reason::Fact) {
                    Ok(_) => Ok(()),
                    Err(_) => Err(PostingError::Unsatisfiable),
                }
            }
            _ => {
                let watch_a = literals[0];
                let watch_b = literals[1];
                let clause_ref = self.allocator.allocate(literals, false);
                self.sat.watch(watch_a, clause_ref);
                self.sat.watch(watch_b, clause_ref);
                Ok(())
            }
        }
    }

    /// Registers a propagator, runs its root initialisation, and schedules it for an initial run.
    pub fn add_propagator(
        &mut self,
        mut propagator: Box<dyn Propagator>,
    ) -> Result<(), PostingError> {
        let mut registrations = Vec::new();
        {
            let mut init_context = PropagatorInitialisationContext {
                registrations: &mut registrations,
            };
            propagator
                .initialise_at_root(&mut init_context)
                .map_err(|_| PostingError::Unsatisfiable)?;
        }

        let propagator_id = PropagatorId(self.propagators.len() as u32);
        self.propagators.push(propagator);
        self.queue.register_propagator();

        for (domain_id, events) in registrations {
            self.watchers[domain_id.index()].push((propagator_id, events, priority_of(events)));
        }

        self.queue.schedule(propagator_id, 0);
        Ok(())
    }

    /// Runs BCP and the propagator queue to a joint fixpoint. Returns the falsifying clause on
    /// conflict.
    pub fn propagate_to_fixpoint(&mut self) -> Result<(), Conflict> {
        loop {
            let trail_start = self.sat.trail.len();
            self.sat.propagate(&mut self.allocator, 0)?;
            for entry in self.sat.trail.iter_from(trail_start) {
                self.domains.notify_assigned(entry.literal);
            }
            self.counters.num_propagations += (self.sat.trail.len() - trail_start) as u64;

            let Some(propagator_id) = self.queue.pop() else {
                break;
            };

            let trail_before = self.sat.trail.len();
            let context = PropagationContextMut::new(
                &mut self.sat,
                &mut self.domains,
                &mut self.allocator,
                &mut self.queue,
                &self.watchers,
            );
            let result = self.propagators[propagator_id.0 as usize].propagate(context);
            self.counters.num_propagations += (self.sat.trail.len() - trail_before) as u64;

            if let Err(reason) = result {
                return Err(conflict_from_reason(&self.domains, &mut self.allocator, &reason));
            }
        }
        crate::engine::debug_helper::check_bounds_consistency(&self.sat, &self.domains);
        crate::engine::debug_helper::check_trail_reasons_are_satisfied(&self.sat, &self.allocator);
        Ok(())
    }

    fn backtrack_to(&mut self, level: u32) {
        let popped = self.sat.trail.backtrack_to_level(level);
        for entry in &popped {
            self.sat.undo(entry.literal);
        }
        self.domains.reset_all_bounds_to_initial();
        for entry in self.sat.trail.iter() {
            self.domains.notify_assigned(entry.literal);
        }
        self.queue.clear();
        for id in 0..self.propagators.len() {
            self.queue.schedule(PropagatorId(id as u32), 0);
        }
    }

    fn make_decision(&mut self) -> Option<Literal> {
        let context = SelectionContext::new(&self.domains, &self.sat, &self.all_variables);
        let variable = self.variable_selector.select_variable(&context)?;
        Some(self.value_selector.select_value(&context, variable))
    }

    /// Runs search until a solution is found, the problem is proven infeasible, or `termination`
    /// asks to stop.
    pub fn solve(&mut self, termination: &mut impl TerminationCondition) -> CSPSolverExecutionFlag {
        if self.all_variables.is_empty() {
            log::warn!("solving with no integer variables created");
        }
        loop {
            match self.propagate_to_fixpoint() {
                Ok(()) => {}
                Err(conflict) => {
                    if self.sat.decision_level() == 0 {
                        log::info!("proved infeasible after {} conflicts", self.counters.num_conflicts);
                        return CSPSolverExecutionFlag::Infeasible;
                    }
                    self.counters.num_conflicts += 1;
                    self.conflicts_since_restart += 1;
                    self.resolve_conflict(conflict);
                    continue;
                }
            }

            if termination.should_stop() {
                log::info!("search stopped by termination condition");
                return CSPSolverExecutionFlag::Timeout;
            }

            if self.should_restart() {
                log::info!("restarting after {} conflicts", self.conflicts_since_restart);
                self.counters.num_restarts += 1;
                self.backtrack_to(0);
                self.conflicts_since_restart = 0;
                continue;
            }

            match self.make_decision() {
                None => {
                    log::info!("solution found after {} decisions", self.counters.num_decisions);
                    return CSPSolverExecutionFlag::Feasible;
                }
                Some(literal) => {
                    self.counters.num_decisions += 1;
                    if self.options.trace {
                        log::trace!("decision #{}: {:?}", self.counters.num_decisions, literal);
                    }
                    self.sat
                        .enqueue(literal, Reason::Decision)
                        .expect("a fresh decision literal cannot already be false");
                    self.domains.notify_assigned(literal);
                }
            }
        }
    }

    fn should_restart(&self) -> bool {
        self.options.restarts_enabled
            && self.conflicts_since_restart >= self.options.base_restart_interval
    }

    fn resolve_conflict(&mut self, conflict: Conflict) {
        if !self.options.learning_enabled {
            // Without clause learning, fall back to chronological backtracking by one level.
            self.backtrack_to(self.sat.decision_level() - 1);
            return;
        }

        let result = conflict_analysis::analyse(&self.sat, &self.allocator, conflict);
        self.counters.num_backjumps += 1;
        self.backtrack_to(result.backjump_level);

        if result.learned_literals.len() == 1 {
            let literal = result.learned_literals[0];
            self.sat
                .enqueue(literal, Reason::Fact)
                .expect("learned unit clause cannot already be falsified after backjump");
            self.domains.notify_assigned(literal);
        } else {
            let asserting_literal = result.learned_literals[0];
            let watch_b = result.learned_literals[1];
            let clause_ref = self
                .allocator
                .allocate(result.learned_literals.clone(), true);
            self.sat.watch(asserting_literal, clause_ref);
            self.sat.watch(watch_b, clause_ref);
            self.sat
                .enqueue(asserting_literal, Reason::Clause(clause_ref))
                .expect("asserting literal cannot already be falsified after backjump");
            self.domains.notify_assigned(asserting_literal);
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn log_statistics(&self) {
        self.counters.log();
    }

    pub fn read_domains_context(&self) -> PropagationContext<'_> {
        PropagationContext::new(&self.sat, &self.domains)
    }
}

fn priority_of(events: crate::engine::propagation::DomainEvents) -> u32 {
    // Propagators interested only in full assignment are cheap to re-check and run first;
    // bounds/removal watchers run afterwards. Arbitrary but stable, matching the teacher's
    // "priority is a small integer, lower runs first" convention.
    if events.contains(DomainEvent::Assign) && events.len() == 1 {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::all_different::AllDifferentPropagator;
    use crate::termination::Indefinite;

    #[test]
    fn solves_a_trivial_all_different_instance() {
        let mut solver = Solver::new(SolverOptions::default());
        let x = solver.new_integer_variable(1, 2);
        let y = solver.new_integer_variable(1, 2);
        solver
            .add_propagator(Box::new(AllDifferentPropagator::new(Box::new([x, y]))))
            .unwrap();

        let flag = solver.solve(&mut Indefinite);
        assert_eq!(flag, CSPSolverExecutionFlag::Feasible);
        assert_ne!(solver.domains().lower_bound(x), solver.domains().lower_bound(y));
    }

    #[test]
    fn detects_infeasible_all_different_hall_violation() {
        let mut solver = Solver::new(SolverOptions::default());
        let x1 = solver.new_integer_variable(1, 2);
        let x2 = solver.new_integer_variable(1, 2);
        let x3 = solver.new_integer_variable(1, 2);
        solver
            .add_propagator(Box::new(AllDifferentPropagator::new(Box::new([
                x1, x2, x3,
            ]))))
            .unwrap();

        let flag = solver.solve(&mut Indefinite);
        assert_eq!(flag, CSPSolverExecutionFlag::Infeasible);
    }
}
