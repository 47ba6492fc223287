//! Generalised-arc-consistent all-different via bipartite matching plus an SCC decomposition of
//! the matching's residual graph (spec §4.8).
//!
//! Grounded on `minicsp`'s `cons_alldiff` (`examples/original_source/core/cons.cpp`): a maximum
//! matching between variables and values proves feasibility (or, if no perfect matching exists,
//! exposes a Hall set: a group of variables whose combined domain is smaller than the group); a
//! value/variable edge survives GAC pruning exactly when it lies on some maximum matching, which
//! is exactly when the value and the variable end up in the same strongly connected component of
//! the matching's directed residual graph (after merging every currently-unused value into one
//! virtual "free" component, since any of them can restart an augmenting path).

use std::collections::HashMap;

use fnv::FnvHashSet;

use crate::basic_types::PropagationStatusCP;
use crate::engine::propagation::context::ReadDomains;
use crate::engine::propagation::events;
use crate::engine::propagation::propagator::Propagator;
use crate::engine::propagation::propagator::PropagatorInitialisationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::variables::IntegerVariable;
use crate::variables::Predicate;
use crate::variables::PropositionalConjunction;

#[derive(Debug)]
pub struct AllDifferentPropagator<Var> {
    variables: Box<[Var]>,
}

impl<Var: IntegerVariable> AllDifferentPropagator<Var> {
    pub fn new(variables: Box<[Var]>) -> Self {
        AllDifferentPropagator { variables }
    }

    fn domain_values(&self, context: &impl ReadDomains, index: usize) -> Vec<i32> {
        let variable = &self.variables[index];
        let lb = context.lower_bound(variable);
        let ub = context.upper_bound(variable);
        (lb..=ub)
            .filter(|&v| context.contains(variable, v))
            .collect()
    }

    /// Greedy-then-BFS-augmenting-path maximum matching between variable indices and values.
    /// Returns `variable -> value` for every matched variable; an unmatched variable proves
    /// infeasibility.
    fn compute_matching(
        &self,
        context: &impl ReadDomains,
    ) -> (HashMap<usize, i32>, Vec<Vec<i32>>) {
        let n = self.variables.len();
        let domains: Vec<Vec<i32>> = (0..n).map(|i| self.domain_values(context, i)).collect();

        let mut variable_to_value: HashMap<usize, i32> = HashMap::new();
        let mut value_to_variable: HashMap<i32, usize> = HashMap::new();

        for v in 0..n {
            for &value in &domains[v] {
                if !value_to_variable.contains_key(&value) {
                    variable_to_value.insert(v, value);
                    value_to_variable.insert(value, v);
                    break;
                }
            }
        }

        for start in 0..n {
            if variable_to_value.contains_key(&start) {
                continue;
            }
            if let Some(path) =
                find_augmenting_path(start, &domains, &value_to_variable)
            {
                apply_augmenting_path(path, &mut variable_to_value, &mut value_to_variable);
            }
        }

        (variable_to_value, domains)
    }

    /// Builds the reason "every variable in `hall_variables` has a domain inside
    /// `[hall_lo, hall_hi]`" as a conjunction, matching the worked Hall-interval scenario of
    /// spec §8 scenario C.
    fn hall_set_reason(
        &self,
        context: &impl ReadDomains,
        hall_variables: &[usize],
        hall_lo: i32,
        hall_hi: i32,
    ) -> PropositionalConjunction {
        let _ = context;
        hall_variables
            .iter()
            .flat_map(|&v| {
                let id = self.variables[v].domain_id();
                [
                    Predicate::LowerBound { id, bound: hall_lo },
                    Predicate::UpperBound { id, bound: hall_hi },
                ]
            })
            .collect()
    }
}

fn find_augmenting_path(
    start: usize,
    domains: &[Vec<i32>],
    value_to_variable: &HashMap<i32, usize>,
) -> Option<Vec<(usize, i32)>> {
    // BFS over variables, recording the value used to reach each visited variable so the path can
    // be replayed (iteratively) once a free value is found.
    let mut queue = std::collections::VecDeque::new();
    let mut came_from: HashMap<usize, (usize, i32)> = HashMap::new();
    let mut visited: FnvHashSet<usize> = FnvHashSet::default();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &value in &domains[current] {
            match value_to_variable.get(&value) {
                None => {
                    // Found a free value: replay the path back to `start`.
                    let mut path = vec![(current, value)];
                    let mut cursor = current;
                    while let Some(&(prev_var, prev_val)) = came_from.get(&cursor) {
                        path.push((prev_var, prev_val));
                        cursor = prev_var;
                    }
                    path.reverse();
                    return Some(path);
                }
                Some(&owner) => {
                    if visited.insert(owner) {
                        came_from.insert(owner, (current, value));
                        queue.push_back(owner);
                    }
                }
            }
        }
    }
    None
}

fn apply_augmenting_path(
    path: Vec<(usize, i32)>,
    variable_to_value: &mut HashMap<usize, i32>,
    value_to_variable: &mut HashMap<i32, usize>,
) {
    for (variable, value) in path {
        if let Some(old_value) = variable_to_value.insert(variable, value) {
            value_to_variable.remove(&old_value);
        }
        value_to_variable.insert(value, variable);
    }
}

/// Iterative Tarjan SCC over a graph given as an adjacency function, so no recursion depth is
/// tied to the number of variables/values.
struct TarjanState {
    index_counter: usize,
    index: HashMap<i32, usize>,
    lowlink: HashMap<i32, usize>,
    on_stack: FnvHashSet<i32>,
    stack: Vec<i32>,
    component_of: HashMap<i32, usize>,
    num_components: usize,
}

fn tarjan_scc(nodes: &[i32], adjacency: &HashMap<i32, Vec<i32>>) -> HashMap<i32, usize> {
    let mut state = TarjanState {
        index_counter: 0,
        index: HashMap::new(),
        lowlink: HashMap::new(),
        on_stack: FnvHashSet::default(),
        stack: Vec::new(),
        component_of: HashMap::new(),
        num_components: 0,
    };

    for &node in nodes {
        if !state.index.contains_key(&node) {
            tarjan_visit_iterative(node, adjacency, &mut state);
        }
    }

    state.component_of
}

enum Frame {
    Enter(i32),
    PostVisit(i32, i32),
}

fn tarjan_visit_iterative(start: i32, adjacency: &HashMap<i32, Vec<i32>>, state: &mut TarjanState) {
    let mut work: Vec<Frame> = vec![Frame::Enter(start)];
    let empty = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Enter(node) => {
                if state.index.contains_key(&node) {
                    continue;
                }
                state.index.insert(node, state.index_counter);
                state.lowlink.insert(node, state.index_counter);
                state.index_counter += 1;
                state.stack.push(node);
                state.on_stack.insert(node);

                for &next in adjacency.get(&node).unwrap_or(&empty) {
                    if !state.index.contains_key(&next) {
                        work.push(Frame::PostVisit(node, next));
                        work.push(Frame::Enter(next));
                    } else if state.on_stack.contains(&next) {
                        let next_index = state.index[&next];
                        let current_low = state.lowlink[&node];
                        state.lowlink.insert(node, current_low.min(next_index));
                    }
                }
                work.push(Frame::PostVisit(node, node));
            }
            Frame::PostVisit(node, next) if node != next => {
                let next_low = state.lowlink[&next];
                let current_low = state.lowlink[&node];
                state.lowlink.insert(node, current_low.min(next_low));
            }
            Frame::PostVisit(node, _) => {
                if state.lowlink[&node] == state.index[&node] {
                    let component_id = state.num_components;
                    state.num_components += 1;
                    loop {
                        let member = state.stack.pop().expect("SCC root must be on the stack");
                        state.on_stack.remove(&member);
                        state.component_of.insert(member, component_id);
                        if member == node {
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl<Var: IntegerVariable + 'static> Propagator for AllDifferentPropagator<Var> {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn propagate(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let n = self.variables.len();
        let (matching, domains) = self.compute_matching(&context);

        if matching.len() < n {
            // Some variable has no augmenting path to a free value: the variables reachable from
            // it (by alternating unmatched/matched edges) plus their combined domain form a Hall
            // set. Find it with the same BFS reachability the matcher uses.
            let unmatched = (0..n).find(|v| !matching.contains_key(v)).unwrap();
            let mut reachable_vars: FnvHashSet<usize> = FnvHashSet::default();
            let mut reachable_values: FnvHashSet<i32> = FnvHashSet::default();
            let mut queue = std::collections::VecDeque::new();
            reachable_vars.insert(unmatched);
            queue.push_back(unmatched);
            while let Some(v) = queue.pop_front() {
                for &value in &domains[v] {
                    if reachable_values.insert(value) {
                        if let Some(&owner) = matching_owner(&matching, value) {
                            if reachable_vars.insert(owner) {
                                queue.push_back(owner);
                            }
                        }
                    }
                }
            }

            let hall_vars: Vec<usize> = reachable_vars.into_iter().collect();
            let hall_lo = *reachable_values.iter().min().unwrap();
            let hall_hi = *reachable_values.iter().max().unwrap();
            let reason = self.hall_set_reason(&context, &hall_vars, hall_lo, hall_hi);
            return Err(reason);
        }

        // GAC pruning: build the residual graph over variable indices and values (disjoint
        // integer spaces, so values are offset to avoid collision with variable indices), merge
        // every free (unused) value into one node, and remove any edge whose endpoints fall in
        // different SCCs.
        let value_offset = n as i32 + 1;
        let free_node = -1;
        let mut adjacency: HashMap<i32, Vec<i32>> = HashMap::new();
        let mut all_nodes: FnvHashSet<i32> = FnvHashSet::default();
        all_nodes.insert(free_node);

        let used_values: FnvHashSet<i32> = matching.values().copied().collect();

        for v in 0..n {
            let var_node = v as i32;
            all_nodes.insert(var_node);
            let matched_value = matching[&v];
            for &value in &domains[v] {
                let value_node = value + value_offset;
                all_nodes.insert(value_node);
                if value == matched_value {
                    adjacency.entry(value_node).or_default().push(var_node);
                } else {
                    adjacency.entry(var_node).or_default().push(value_node);
                }
                if !used_values.contains(&value) {
                    adjacency.entry(free_node).or_default().push(value_node);
                    adjacency.entry(value_node).or_default().push(free_node);
                }
            }
        }

        let nodes: Vec<i32> = all_nodes.into_iter().collect();
        let components = tarjan_scc(&nodes, &adjacency);
        let free_component = components[&free_node];

        for v in 0..n {
            let var_node = v as i32;
            let matched_value = matching[&v];
            for &value in &domains[v] {
                if value == matched_value {
                    continue;
                }
                let value_node = value + value_offset;
                let consistent = components[&var_node] == components[&value_node]
                    || components[&var_node] == free_component
                    || components[&value_node] == free_component;
                if !consistent {
                    // `value` cannot be assigned to variable `v` in any maximum matching: the
                    // variables whose only remaining outlet is the same blocked SCC form the Hall
                    // set that justifies removing it.
                    let hall_vars: Vec<usize> = (0..n)
                        .filter(|&w| components[&(w as i32)] == components[&var_node])
                        .collect();
                    let hall_values: Vec<i32> = domains
                        .iter()
                        .enumerate()
                        .filter(|(w, _)| hall_vars.contains(w))
                        .flat_map(|(_, vals)| vals.iter().copied())
                        .filter(|val| components[&(*val + value_offset)] == components[&var_node])
                        .collect();
                    let hall_lo = *hall_values.iter().min().unwrap_or(&value);
                    let hall_hi = *hall_values.iter().max().unwrap_or(&value);
                    let reason = self.hall_set_reason(&context, &hall_vars, hall_lo, hall_hi);
                    context.remove(&self.variables[v], value, reason)?;
                }
            }
        }

        Ok(())
    }

    fn initialise_at_root(
        &mut self,
        context: &mut PropagatorInitialisationContext,
    ) -> Result<(), PropositionalConjunction> {
        for variable in self.variables.iter() {
            context.register(variable.clone(), events::presets::any());
        }
        Ok(())
    }
}

fn matching_owner<'a>(matching: &'a HashMap<usize, i32>, value: i32) -> Option<&'a usize> {
    matching
        .iter()
        .find(|&(_, &matched_value)| matched_value == value)
        .map(|(variable, _)| variable)
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
    fn hall_interval_violation_is_detected() {
        // Three variables squeezed into {1, 2}: an unsatisfiable Hall set (scenario C).
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x1 = domains.create_domain(&mut sat, &mut allocator, 1, 2);
        let x2 = domains.create_domain(&mut sat, &mut allocator, 1, 2);
        let x3 = domains.create_domain(&mut sat, &mut allocator, 1, 2);

        let propagator = AllDifferentPropagator::new(Box::new([x1, x2, x3]));
        let mut queue = PropagatorQueue::default();
        let watchers: WatcherTable = vec![Vec::new(); domains.num_domains()];
        let context =
            PropagationContextMut::new(&mut sat, &mut domains, &mut allocator, &mut queue, &watchers);

        let result = propagator.propagate(context);
        assert!(result.is_err());
    }

    #[test]
    fn consistent_domains_do_not_conflict() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x1 = domains.create_domain(&mut sat, &mut allocator, 1, 3);
        let x2 = domains.create_domain(&mut sat, &mut allocator, 1, 3);
        let x3 = domains.create_domain(&mut sat, &mut allocator, 1, 3);

        let propagator = AllDifferentPropagator::new(Box::new([x1, x2, x3]));
        let mut queue = PropagatorQueue::default();
        let watchers: WatcherTable = vec![Vec::new(); domains.num_domains()];
        let context =
            PropagationContextMut::new(&mut sat, &mut domains, &mut allocator, &mut queue, &watchers);

        assert!(propagator.propagate(context).is_ok());
    }
}
