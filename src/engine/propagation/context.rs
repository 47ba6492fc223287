//! The two propagator-facing views of solver state: read-only during root detection and between
//! fixpoint steps, read-write (with mandatory reasons) while actually propagating.

use crate::engine::clause::ClauseAllocator;
use crate::engine::domains::explanation_to_clause;
use crate::engine::domains::IntegerDomains;
use crate::engine::propagation::queue::PropagatorId;
use crate::engine::propagation::queue::PropagatorQueue;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::trail::Reason;
use crate::variables::IntegerVariable;
use crate::variables::PropositionalConjunction;

/// Blanket trait giving read access to domain bounds regardless of whether the caller holds a
/// [`PropagationContext`] or a [`PropagationContextMut`]; grounded on the teacher's `ReadDomains`.
pub trait ReadDomains {
    fn lower_bound(&self, variable: &impl IntegerVariable) -> i32;
    fn upper_bound(&self, variable: &impl IntegerVariable) -> i32;
    fn is_fixed(&self, variable: &impl IntegerVariable) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }
    fn contains(&self, variable: &impl IntegerVariable, value: i32) -> bool;
}

pub struct PropagationContext<'a> {
    sat: &'a AssignmentsPropositional,
    domains: &'a IntegerDomains,
}

impl<'a> PropagationContext<'a> {
    pub fn new(sat: &'a AssignmentsPropositional, domains: &'a IntegerDomains) -> Self {
        PropagationContext { sat, domains }
    }
}

impl ReadDomains for PropagationContext<'_> {
    fn lower_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.domains.lower_bound(variable.domain_id())
    }

    fn upper_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.domains.upper_bound(variable.domain_id())
    }

    fn contains(&self, variable: &impl IntegerVariable, value: i32) -> bool {
        self.domains.contains(self.sat, variable.domain_id(), value)
    }
}

/// Per-domain subscriptions: which propagator to schedule, at which priority, when which event
/// fires. Owned by the solver and handed to each `PropagationContextMut` by reference.
pub type WatcherTable = Vec<Vec<(PropagatorId, crate::engine::propagation::events::DomainEvents, u32)>>;

pub struct PropagationContextMut<'a> {
    sat: &'a mut AssignmentsPropositional,
    domains: &'a mut IntegerDomains,
    allocator: &'a mut ClauseAllocator,
    queue: &'a mut PropagatorQueue,
    watchers: &'a WatcherTable,
}

impl<'a> PropagationContextMut<'a> {
    pub fn new(
        sat: &'a mut AssignmentsPropositional,
        domains: &'a mut IntegerDomains,
        allocator: &'a mut ClauseAllocator,
        queue: &'a mut PropagatorQueue,
        watchers: &'a WatcherTable,
    ) -> Self {
        PropagationContextMut {
            sat,
            domains,
            allocator,
            queue,
            watchers,
        }
    }

    fn schedule_watchers(
        &mut self,
        id: crate::variables::DomainId,
        event: crate::engine::propagation::events::DomainEvent,
    ) {
        for (propagator_id, events, priority) in &self.watchers[id.index()] {
            if events.contains(event) {
                self.queue.schedule(*propagator_id, *priority);
            }
        }
    }

    fn enqueue_with_reason(
        &mut self,
        implied: crate::variables::Literal,
        reason: &PropositionalConjunction,
    ) -> Result<bool, ()> {
        if self.sat.is_true(implied) {
            return Ok(false);
        }
        let literals = explanation_to_clause(self.domains, Some(implied), reason);
        let clause_ref = self.allocator.allocate(literals, false);
        match self.sat.enqueue(implied, Reason::Clause(clause_ref)) {
            Ok(changed) => {
                if changed {
                    self.domains.notify_assigned(implied);
                }
                Ok(changed)
            }
            Err(_) => Err(()),
        }
    }

    pub fn set_lower_bound(
        &mut self,
        variable: &impl IntegerVariable,
        bound: i32,
        reason: PropositionalConjunction,
    ) -> Result<(), PropositionalConjunction> {
        let id = variable.domain_id();
        if bound <= self.domains.lower_bound(id) {
            return Ok(());
        }
        if bound > self.domains.upper_bound(id) {
            return Err(reason);
        }
        let Some(threshold_literal) = self.domains.order_literal(id, bound - 1) else {
            return Ok(());
        };
        let implied = !threshold_literal;
        match self.enqueue_with_reason(implied, &reason) {
            Ok(true) => {
                use crate::engine::propagation::events::DomainEvent;
                self.schedule_watchers(id, DomainEvent::LowerBound);
                if self.domains.is_fixed(id) {
                    self.schedule_watchers(id, DomainEvent::Assign);
                }
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(()) => Err(reason),
        }
    }

    pub fn set_upper_bound(
        &mut self,
        variable: &impl IntegerVariable,
        bound: i32,
        reason: PropositionalConjunction,
    ) -> Result<(), PropositionalConjunction> {
        let id = variable.domain_id();
        if bound >= self.domains.upper_bound(id) {
            return Ok(());
        }
        if bound < self.domains.lower_bound(id) {
            return Err(reason);
        }
        let Some(threshold_literal) = self.domains.order_literal(id, bound) else {
            return Ok(());
        };
        match self.enqueue_with_reason(threshold_literal, &reason) {
            Ok(true) => {
                use crate::engine::propagation::events::DomainEvent;
                self.schedule_watchers(id, DomainEvent::UpperBound);
                if self.domains.is_fixed(id) {
                    self.schedule_watchers(id, DomainEvent::Assign);
                }
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(()) => Err(reason),
        }
    }

    pub fn remove(
        &mut self,
        variable: &impl IntegerVariable,
        value: i32,
        reason: PropositionalConjunction,
    ) -> Result<(), PropositionalConjunction> {
        let id = variable.domain_id();
        if !self.domains.contains(self.sat, id, value) {
            return Ok(());
        }
        let Some(eq_literal) = self.domains.equality_literal(id, value) else {
            return Ok(());
        };
        match self.enqueue_with_reason(!eq_literal, &reason) {
            Ok(true) => {
                use crate::engine::propagation::events::DomainEvent;
                self.schedule_watchers(id, DomainEvent::Removal);
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(()) => Err(reason),
        }
    }

    pub fn assign(
        &mut self,
        variable: &impl IntegerVariable,
        value: i32,
        reason: PropositionalConjunction,
    ) -> Result<(), PropositionalConjunction> {
        let id = variable.domain_id();
        let Some(eq_literal) = self.domains.equality_literal(id, value) else {
            return Err(reason);
        };
        match self.enqueue_with_reason(eq_literal, &reason) {
            Ok(true) => {
                use crate::engine::propagation::events::DomainEvent;
                self.schedule_watchers(id, DomainEvent::LowerBound);
                self.schedule_watchers(id, DomainEvent::UpperBound);
                self.schedule_watchers(id, DomainEvent::Assign);
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(()) => Err(reason),
        }
    }
}

impl ReadDomains for PropagationContextMut<'_> {
    fn lower_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.domains.lower_bound(variable.domain_id())
    }

    fn upper_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.domains.upper_bound(variable.domain_id())
    }

    fn contains(&self, variable: &impl IntegerVariable, value: i32) -> bool {
        self.domains.contains(self.sat, variable.domain_id(), value)
    }
}
