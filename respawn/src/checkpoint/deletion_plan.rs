use crate::checkpoint::{CheckpointError, ConstraintScope, DependencyGraph, Table};
use alloc::{collections::BTreeMap, vec, vec::Vec};

const UNVISITED: usize = usize::MAX;

/// Unit of work of a [`DeletionPlan`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
  /// Table that can be emptied while every constraint is enforced.
  Ordered(Table),
  /// Tables that reference each other, directly or transitively, or a single table that
  /// references itself. Constraints must be suspended while they are emptied. Members are sorted.
  ConstrainedGroup(Vec<Table>),
}

impl Phase {
  /// Tables of this phase
  #[inline]
  pub fn tables(&self) -> &[Table] {
    match self {
      Self::Ordered(table) => core::slice::from_ref(table),
      Self::ConstrainedGroup(tables) => tables,
    }
  }
}

/// Order in which tables are emptied. Every table that references another table comes first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeletionPlan {
  phases: Vec<Phase>,
}

impl DeletionPlan {
  /// Resolves the order of `graph`.
  ///
  /// Strongly connected components become [`Phase::ConstrainedGroup`]s, which can only be
  /// emptied if `scope` is supported. Otherwise [`CheckpointError::UnresolvableCycle`] is
  /// returned. Among the components that are ready to be emptied, the one holding the smallest
  /// table always comes first, so the same graph always produces the same plan.
  #[inline]
  pub fn new(graph: &DependencyGraph, scope: ConstraintScope) -> crate::Result<Self> {
    let (component_of, components) = strongly_connected_components(graph);
    let is_constrained: Vec<bool> = components
      .iter()
      .map(|members| match members.as_slice() {
        [idx] => graph.is_self_referencing(*idx),
        _ => true,
      })
      .collect();
    if !scope.is_supported() && is_constrained.iter().any(|elem| *elem) {
      let mut tables: Vec<Table> = components
        .iter()
        .zip(&is_constrained)
        .filter(|(_, is_constrained)| **is_constrained)
        .flat_map(|(members, _)| members.iter().map(|idx| graph.tables()[*idx].clone()))
        .collect();
      tables.sort_unstable();
      return Err(CheckpointError::UnresolvableCycle { tables }.into());
    }

    let mut in_degree = vec![0usize; components.len()];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); components.len()];
    for (component, members) in components.iter().enumerate() {
      let targets = &mut outgoing[component];
      for member in members {
        for parent in graph.parents(*member) {
          let target = component_of[*parent];
          if target != component {
            targets.push(target);
          }
        }
      }
      targets.sort_unstable();
      targets.dedup();
      for target in targets.iter() {
        in_degree[*target] = in_degree[*target].wrapping_add(1);
      }
    }

    // Members are ascending so the first one is the smallest table of the component
    let mut ready: BTreeMap<usize, usize> = BTreeMap::new();
    for (component, degree) in in_degree.iter().enumerate() {
      if *degree == 0 {
        let _ = ready.insert(components[component][0], component);
      }
    }
    let mut phases = Vec::with_capacity(components.len());
    while let Some((_, component)) = ready.pop_first() {
      let members = &components[component];
      if is_constrained[component] {
        phases.push(Phase::ConstrainedGroup(
          members.iter().map(|idx| graph.tables()[*idx].clone()).collect(),
        ));
      } else {
        phases.push(Phase::Ordered(graph.tables()[members[0]].clone()));
      }
      for target in &outgoing[component] {
        let degree = &mut in_degree[*target];
        *degree = degree.wrapping_sub(1);
        if *degree == 0 {
          let _ = ready.insert(components[*target][0], *target);
        }
      }
    }
    _debug!("Resolved {} phase(s) for {} table(s)", phases.len(), graph.len());
    Ok(Self { phases })
  }

  /// If at least one phase requires suspended constraints.
  #[inline]
  pub fn has_constrained_groups(&self) -> bool {
    self.phases.iter().any(|phase| matches!(phase, Phase::ConstrainedGroup(_)))
  }

  /// If there is nothing to delete.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.phases.is_empty()
  }

  /// Number of phases
  #[inline]
  pub fn len(&self) -> usize {
    self.phases.len()
  }

  /// Phases in execution order
  #[inline]
  pub fn phases(&self) -> &[Phase] {
    &self.phases
  }

  /// Every table in deletion order.
  #[inline]
  pub fn tables(&self) -> impl Iterator<Item = &Table> {
    self.phases.iter().flat_map(Phase::tables)
  }
}

// Iterative Tarjan. Returns the component of each node and the sorted members of each component.
fn strongly_connected_components(graph: &DependencyGraph) -> (Vec<usize>, Vec<Vec<usize>>) {
  let len = graph.len();
  let mut call_stack: Vec<(usize, usize)> = Vec::new();
  let mut component_of = vec![UNVISITED; len];
  let mut components: Vec<Vec<usize>> = Vec::new();
  let mut counter = 0;
  let mut index = vec![UNVISITED; len];
  let mut lowlink = vec![0; len];
  let mut on_stack = vec![false; len];
  let mut stack = Vec::new();

  for root in 0..len {
    if index[root] != UNVISITED {
      continue;
    }
    index[root] = counter;
    lowlink[root] = counter;
    counter = counter.wrapping_add(1);
    on_stack[root] = true;
    stack.push(root);
    call_stack.push((root, 0));
    while let Some((node, pos)) = call_stack.last_mut().map(|frame| {
      let rslt = *frame;
      frame.1 = frame.1.wrapping_add(1);
      rslt
    }) {
      if let Some(&next) = graph.parents(node).get(pos) {
        if index[next] == UNVISITED {
          index[next] = counter;
          lowlink[next] = counter;
          counter = counter.wrapping_add(1);
          on_stack[next] = true;
          stack.push(next);
          call_stack.push((next, 0));
        } else if on_stack[next] {
          lowlink[node] = lowlink[node].min(index[next]);
        }
        continue;
      }
      let _ = call_stack.pop();
      if let Some(&(caller, _)) = call_stack.last() {
        lowlink[caller] = lowlink[caller].min(lowlink[node]);
      }
      if lowlink[node] != index[node] {
        continue;
      }
      let mut members = Vec::new();
      while let Some(member) = stack.pop() {
        on_stack[member] = false;
        component_of[member] = components.len();
        members.push(member);
        if member == node {
          break;
        }
      }
      members.sort_unstable();
      components.push(members);
    }
  }
  (component_of, components)
}

#[cfg(test)]
mod tests;
