use crate::{
  checkpoint::{
    CheckpointError, Collation, ConstraintScope, DeletionPlan, DependencyGraph, Phase, Relationship,
    Table,
  },
  Error,
};
use alloc::{vec, vec::Vec};

fn plan(names: &[&str], edges: &[(&str, &str)], scope: ConstraintScope) -> crate::Result<DeletionPlan> {
  let tables = names.iter().map(|name| Table::new("s", *name)).collect();
  let relationships = edges
    .iter()
    .map(|(parent, child)| Relationship::new(Table::new("s", *parent), Table::new("s", *child)));
  DeletionPlan::new(&DependencyGraph::new(tables, relationships, Collation::CaseSensitive), scope)
}

fn ordered(name: &str) -> Phase {
  Phase::Ordered(Table::new("s", name))
}

fn group(names: &[&str]) -> Phase {
  Phase::ConstrainedGroup(names.iter().map(|name| Table::new("s", *name)).collect())
}

#[test]
fn children_come_before_parents() {
  let plan = plan(
    &["company", "feed", "post", "user"],
    &[("company", "user"), ("user", "post"), ("post", "feed")],
    ConstraintScope::Unsupported,
  )
  .unwrap();
  assert_eq!(plan.phases(), [ordered("feed"), ordered("post"), ordered("user"), ordered("company")]);
  assert!(!plan.has_constrained_groups());
}

#[test]
fn independent_tables_are_sorted() {
  let plan = plan(&["c", "a", "b"], &[], ConstraintScope::Unsupported).unwrap();
  assert_eq!(plan.phases(), [ordered("a"), ordered("b"), ordered("c")]);
}

#[test]
fn ready_components_are_taken_by_their_smallest_table() {
  // `a` is referenced by `z` so `b` and `c` are emptied before `a` becomes ready
  let plan = plan(&["a", "b", "c", "z"], &[("a", "z")], ConstraintScope::Unsupported).unwrap();
  assert_eq!(plan.phases(), [ordered("b"), ordered("c"), ordered("z"), ordered("a")]);
}

#[test]
fn diamond() {
  let plan = plan(
    &["bottom", "left", "right", "top"],
    &[("top", "left"), ("top", "right"), ("left", "bottom"), ("right", "bottom")],
    ConstraintScope::Unsupported,
  )
  .unwrap();
  assert_eq!(plan.phases(), [ordered("bottom"), ordered("left"), ordered("right"), ordered("top")]);
}

#[test]
fn self_reference_is_a_constrained_group() {
  let plan = plan(&["a", "tree"], &[("tree", "tree")], ConstraintScope::Table).unwrap();
  assert_eq!(plan.phases(), [ordered("a"), group(&["tree"])]);
  assert!(plan.has_constrained_groups());
}

#[test]
fn mutual_reference_is_a_single_constrained_group() {
  let plan = plan(
    &["child", "x", "y"],
    &[("x", "y"), ("y", "x"), ("x", "child")],
    ConstraintScope::Session,
  )
  .unwrap();
  assert_eq!(plan.phases(), [ordered("child"), group(&["x", "y"])]);
}

#[test]
fn groups_are_ordered_like_any_other_component() {
  let plan = plan(
    &["a", "b", "c", "d"],
    &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c"), ("a", "c")],
    ConstraintScope::Table,
  )
  .unwrap();
  assert_eq!(plan.phases(), [group(&["c", "d"]), group(&["a", "b"])]);
}

#[test]
fn cycles_without_constraint_suspension_are_unresolvable() {
  let err = plan(
    &["a", "b", "c", "d"],
    &[("b", "a"), ("a", "b"), ("d", "d"), ("a", "c")],
    ConstraintScope::Unsupported,
  )
  .unwrap_err();
  let Error::CheckpointError(CheckpointError::UnresolvableCycle { tables }) = err else {
    panic!();
  };
  assert_eq!(tables, [Table::new("s", "a"), Table::new("s", "b"), Table::new("s", "d")]);
}

#[test]
fn empty_graph() {
  let plan = plan(&[], &[], ConstraintScope::Unsupported).unwrap();
  assert!(plan.is_empty());
  assert_eq!(plan.len(), 0);
  assert_eq!(plan.tables().count(), 0);
}

#[test]
fn tables_follow_phases() {
  let plan = plan(&["a", "b", "c"], &[("c", "a"), ("a", "b"), ("b", "a")], ConstraintScope::Table).unwrap();
  let tables: Vec<_> = plan.tables().map(Table::name).collect();
  assert_eq!(tables, vec!["a", "b", "c"]);
}

#[cfg(feature = "_proptest")]
#[cfg(test)]
mod _proptest {
  use crate::checkpoint::{
    Collation, ConstraintScope, DeletionPlan, DependencyGraph, Phase, Relationship, Table,
  };
  use alloc::{format, vec::Vec};

  fn graph(len: u8, edges: &[(u8, u8)], acyclic: bool) -> (Vec<Relationship>, DependencyGraph) {
    let len = len % 16 + 1;
    let table = |idx: u8| Table::new("s", format!("t{:02}", idx % len));
    let relationships: Vec<_> = edges
      .iter()
      .filter_map(|(lhs, rhs)| {
        let (lhs, rhs) = (lhs % len, rhs % len);
        if !acyclic {
          return Some(Relationship::new(table(lhs), table(rhs)));
        }
        // Children always have a greater index than their parents
        (lhs < rhs).then(|| Relationship::new(table(lhs), table(rhs)))
      })
      .collect();
    let tables = (0..len).map(table).collect();
    let graph = DependencyGraph::new(tables, relationships.iter().cloned(), Collation::CaseSensitive);
    (relationships, graph)
  }

  #[test_strategy::proptest]
  fn acyclic_plans_delete_children_first(len: u8, edges: Vec<(u8, u8)>) {
    let (relationships, graph) = graph(len, &edges, true);
    let plan = DeletionPlan::new(&graph, ConstraintScope::Unsupported).unwrap();
    assert!(plan.phases().iter().all(|phase| matches!(phase, Phase::Ordered(_))));
    let order: Vec<&Table> = plan.tables().collect();
    let position = |table: &Table| order.iter().position(|elem| *elem == table).unwrap();
    for relationship in &relationships {
      assert!(position(&relationship.child) < position(&relationship.parent));
    }
  }

  #[test_strategy::proptest]
  fn every_table_is_emptied_exactly_once(len: u8, edges: Vec<(u8, u8)>) {
    let (relationships, graph) = graph(len, &edges, false);
    let plan = DeletionPlan::new(&graph, ConstraintScope::Table).unwrap();
    let mut tables: Vec<&Table> = plan.tables().collect();
    tables.sort_unstable();
    assert_eq!(tables.len(), graph.len());
    assert!(tables.iter().zip(graph.tables()).all(|(lhs, rhs)| *lhs == rhs));
    let phase_of = |table: &Table| {
      plan.phases().iter().position(|phase| phase.tables().contains(table)).unwrap()
    };
    for relationship in &relationships {
      assert!(phase_of(&relationship.child) <= phase_of(&relationship.parent));
    }
    assert_eq!(plan, DeletionPlan::new(&graph, ConstraintScope::Session).unwrap());
  }
}
