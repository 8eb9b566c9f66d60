use crate::checkpoint::{Collation, Relationship, Table};
use alloc::{collections::BTreeMap, vec, vec::Vec};

/// Foreign keys between a fixed set of tables.
///
/// Nodes are addressed by their position in [`DependencyGraph::tables`], which is sorted by
/// schema and name. Each node lists the parents it references.
#[derive(Debug)]
pub struct DependencyGraph {
  parents: Vec<Vec<usize>>,
  self_referencing: Vec<bool>,
  tables: Vec<Table>,
}

impl DependencyGraph {
  /// Relationships with at least one endpoint outside of `tables` are discarded. Repeated
  /// relationships, like composite or multiple foreign keys between the same pair of tables,
  /// collapse into a single edge.
  ///
  /// Endpoints are matched by their exact names first. `collation` is only consulted when that
  /// fails and the folded name designates a single table, distinct tables that differ only in case
  /// are never merged.
  #[inline]
  pub fn new(
    mut tables: Vec<Table>,
    relationships: impl IntoIterator<Item = Relationship>,
    collation: Collation,
  ) -> Self {
    tables.sort_unstable();
    tables.dedup();
    let exact: BTreeMap<&Table, usize> =
      tables.iter().enumerate().map(|(idx, table)| (table, idx)).collect();
    let mut folded: BTreeMap<Table, Option<usize>> = BTreeMap::new();
    for (idx, table) in tables.iter().enumerate() {
      let _ = folded.entry(collation.key(table)).and_modify(|elem| *elem = None).or_insert(Some(idx));
    }
    let position = |table: &Table| {
      exact.get(table).copied().or_else(|| folded.get(&collation.key(table)).copied().flatten())
    };
    let mut parents = vec![Vec::new(); tables.len()];
    let mut self_referencing = vec![false; tables.len()];
    for relationship in relationships {
      let (Some(child), Some(parent)) =
        (position(&relationship.child), position(&relationship.parent))
      else {
        _trace!("Discarding relationship {} -> {}", relationship.child, relationship.parent);
        continue;
      };
      if child == parent {
        if let Some(elem) = self_referencing.get_mut(child) {
          *elem = true;
        }
      } else if let Some(elem) = parents.get_mut(child) {
        elem.push(parent);
      }
    }
    for elem in &mut parents {
      elem.sort_unstable();
      elem.dedup();
    }
    Self { parents, self_referencing, tables }
  }

  /// Number of edges between distinct tables.
  #[inline]
  pub fn edges_len(&self) -> usize {
    self.parents.iter().map(Vec::len).sum()
  }

  /// If there are no tables.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.tables.is_empty()
  }

  /// If the table at `idx` holds a foreign key into itself.
  #[inline]
  pub fn is_self_referencing(&self, idx: usize) -> bool {
    self.self_referencing.get(idx).copied().unwrap_or_default()
  }

  /// Number of tables.
  #[inline]
  pub fn len(&self) -> usize {
    self.tables.len()
  }

  /// Indices of the tables referenced by the table at `idx`, excluding itself.
  #[inline]
  pub fn parents(&self, idx: usize) -> &[usize] {
    self.parents.get(idx).map(Vec::as_slice).unwrap_or_default()
  }

  /// Sorted nodes
  #[inline]
  pub fn tables(&self) -> &[Table] {
    &self.tables
  }
}

#[cfg(test)]
mod tests {
  use crate::checkpoint::{Collation, DependencyGraph, Relationship, Table};
  use alloc::vec;

  fn rel(parent: &str, child: &str) -> Relationship {
    Relationship::new(Table::new("s", parent), Table::new("s", child))
  }

  #[test]
  fn outsiders_are_discarded() {
    let graph = DependencyGraph::new(
      vec![Table::new("s", "b"), Table::new("s", "a")],
      [rel("a", "b"), rel("a", "x"), rel("x", "b")],
      Collation::CaseSensitive,
    );
    assert_eq!(graph.tables(), [Table::new("s", "a"), Table::new("s", "b")]);
    assert_eq!(graph.parents(0), [0usize; 0]);
    assert_eq!(graph.parents(1), [0]);
    assert_eq!(graph.edges_len(), 1);
  }

  #[test]
  fn repeated_edges_collapse_and_self_loops_are_flags() {
    let graph = DependencyGraph::new(
      vec![Table::new("s", "a"), Table::new("s", "b")],
      [rel("a", "b"), rel("a", "b"), rel("b", "b")],
      Collation::CaseSensitive,
    );
    assert_eq!(graph.edges_len(), 1);
    assert!(!graph.is_self_referencing(0));
    assert!(graph.is_self_referencing(1));
    assert!(!graph.is_self_referencing(9));
    assert_eq!(graph.parents(9), [0usize; 0]);
  }

  #[test]
  fn endpoints_are_matched_with_the_collation() {
    let tables = vec![Table::new("dbo", "Parent"), Table::new("dbo", "child")];
    let relationship = Relationship::new(Table::new("DBO", "parent"), Table::new("dbo", "CHILD"));
    let graph = DependencyGraph::new(tables.clone(), [relationship.clone()], Collation::CaseInsensitive);
    assert_eq!(graph.edges_len(), 1);
    let graph = DependencyGraph::new(tables, [relationship], Collation::CaseSensitive);
    assert_eq!(graph.edges_len(), 0);
  }

  #[test]
  fn tables_that_only_differ_in_case_stay_apart() {
    let tables = vec![Table::new("s", "A"), Table::new("s", "a"), Table::new("s", "b")];
    let graph = DependencyGraph::new(
      tables,
      [
        Relationship::new(Table::new("s", "A"), Table::new("s", "b")),
        Relationship::new(Table::new("s", "a"), Table::new("S", "B")),
        Relationship::new(Table::new("S", "A"), Table::new("s", "b")),
      ],
      Collation::CaseInsensitive,
    );
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.parents(2), [0, 1]);
    assert_eq!(graph.edges_len(), 2);
  }
}
