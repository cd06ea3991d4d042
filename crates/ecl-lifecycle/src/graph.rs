//! # Transition Graph
//!
//! The single table of legal stage moves. Every consumer (validation, the
//! component record, the API, the CLI graph export) reads this table; none
//! defines its own.
//!
//! ```text
//! draft ─▶ approved ─▶ available ─▶ sourcing ─▶ rfq_open ─▶ rfq_awarded
//!   ▲         │            ▲           │  ▲          │
//!   └─────────┘            └───────────┘  └──────────┘        (rollbacks)
//!
//! rfq_awarded ─▶ purchasing ─▶ ordered ─▶ shipped ─▶ received ─▶ installed
//!                                            │          │           │
//!                                            ▼          ▼           ▼
//!                                   returned / quarantine     quarantine
//!
//! installed ─▶ commissioned ─▶ operational ◀─▶ maintenance
//!                                   │     ╲
//!                                   ▼      ▼
//!                          warranty_active ─▶ retired ─▶ decommissioned
//!                                                │             │
//!                                                ▼             ▼
//!                                            recycling ───▶ archived
//! ```
//!
//! Every stage from `draft` through `ordered` also has an edge to
//! `cancelled`. Exception sinks and `archived` have no outbound edges.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

use ecl_core::Stage;

use crate::catalog::StageCatalog;
use crate::error::LifecycleError;

/// Classification of an edge, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Moves later in the canonical order.
    Forward,
    /// Moves earlier in the canonical order.
    Rollback,
    /// Into `cancelled`.
    Cancellation,
    /// Into `returned` or `quarantine`.
    Exception,
}

impl EdgeKind {
    /// Classify the move `from -> to`.
    pub fn classify(from: Stage, to: Stage) -> Self {
        match to {
            Stage::Cancelled => Self::Cancellation,
            Stage::Returned | Stage::Quarantine => Self::Exception,
            _ => match (from.ordinal(), to.ordinal()) {
                (Some(f), Some(t)) if t < f => Self::Rollback,
                _ => Self::Forward,
            },
        }
    }
}

/// A directed legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitionEdge {
    pub from: Stage,
    pub to: Stage,
    pub kind: EdgeKind,
}

fn standard_successors(stage: Stage) -> &'static [Stage] {
    use Stage::*;
    match stage {
        Draft => &[Approved, Cancelled],
        Approved => &[Available, Draft, Cancelled],
        Available => &[Sourcing, Cancelled],
        Sourcing => &[RfqOpen, Available, Cancelled],
        RfqOpen => &[RfqAwarded, Sourcing, Cancelled],
        RfqAwarded => &[Purchasing, Cancelled],
        Purchasing => &[Ordered, Cancelled],
        Ordered => &[Shipped, Cancelled],
        Shipped => &[Received, Returned, Quarantine],
        Received => &[Installed, Returned, Quarantine],
        Installed => &[Commissioned, Quarantine],
        Commissioned => &[Operational],
        Operational => &[WarrantyActive, Maintenance, Retired],
        WarrantyActive => &[Maintenance, Retired],
        Maintenance => &[Operational, Retired],
        Retired => &[Decommissioned, Recycling, Archived],
        Decommissioned => &[Recycling, Archived],
        Recycling => &[Archived],
        Archived | Cancelled | Returned | Quarantine => &[],
    }
}

/// Adjacency table of legal transitions, indexed by stage.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    successors: Vec<Vec<Stage>>,
}

static STANDARD: OnceLock<TransitionGraph> = OnceLock::new();

impl TransitionGraph {
    /// Build a graph from an edge list, validated against `catalog`.
    ///
    /// Rejects edges naming stages the catalog lacks, self loops, duplicate
    /// edges, and any outbound edge from `archived` or an exception sink.
    /// Successor order follows edge order.
    pub fn from_edges(
        catalog: &StageCatalog,
        edges: impl IntoIterator<Item = (Stage, Stage)>,
    ) -> Result<Self, LifecycleError> {
        let mut successors: Vec<Vec<Stage>> = Stage::all_stages().map(|_| Vec::new()).collect();
        for (from, to) in edges {
            for stage in [from, to] {
                if !catalog.contains(stage) {
                    return Err(LifecycleError::CatalogInvariant(format!(
                        "edge {from} -> {to} names stage {stage} missing from catalog"
                    )));
                }
            }
            if from == to {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "self loop on {from}"
                )));
            }
            if from == Stage::Archived || from.is_exception_sink() {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "terminal stage {from} cannot have outbound edge to {to}"
                )));
            }
            let out = &mut successors[from as usize];
            if out.contains(&to) {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "duplicate edge {from} -> {to}"
                )));
            }
            out.push(to);
        }
        Ok(Self { successors })
    }

    /// The built-in graph over the standard catalog.
    pub fn standard() -> &'static TransitionGraph {
        STANDARD.get_or_init(|| {
            let edges = Stage::all_stages()
                .flat_map(|from| standard_successors(from).iter().map(move |to| (from, *to)));
            let catalog = StageCatalog::standard();
            Self::from_edges(catalog, edges)
                .and_then(|graph| graph.validate(catalog).map(|()| graph))
                .expect("built-in transition table is well-formed")
        })
    }

    /// Whole-graph invariants that a per-edge check cannot see: every
    /// catalogued stage is reachable from the initial stage, and every
    /// canonical stage other than `archived` has a way forward.
    pub fn validate(&self, catalog: &StageCatalog) -> Result<(), LifecycleError> {
        let start = Stage::initial();
        let mut reached = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in self.next_stages(current) {
                if reached.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        for def in catalog.iter() {
            if !reached.contains(&def.stage) {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "stage {} is unreachable from {start}",
                    def.stage
                )));
            }
        }
        for def in catalog.all() {
            if def.stage != Stage::Archived && self.is_terminal(def.stage) {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "canonical stage {} has no outbound edge",
                    def.stage
                )));
            }
        }
        Ok(())
    }

    /// Stages legally reachable from `current` in one step. Empty for
    /// terminal stages.
    pub fn next_stages(&self, current: Stage) -> &[Stage] {
        &self.successors[current as usize]
    }

    /// Whether `from -> to` is a legal move.
    pub fn is_legal_transition(&self, from: Stage, to: Stage) -> bool {
        self.next_stages(from).contains(&to)
    }

    /// Whether `stage` has no outbound moves.
    pub fn is_terminal(&self, stage: Stage) -> bool {
        self.next_stages(stage).is_empty()
    }

    /// Every edge, grouped by source stage in `Stage::all_stages()` order.
    pub fn edges(&self) -> Vec<TransitionEdge> {
        Stage::all_stages()
            .flat_map(|from| {
                self.next_stages(from).iter().map(move |to| TransitionEdge {
                    from,
                    to: *to,
                    kind: EdgeKind::classify(from, *to),
                })
            })
            .collect()
    }

    /// Stages with a legal move into `stage`.
    pub fn predecessors(&self, stage: Stage) -> Vec<Stage> {
        Stage::all_stages()
            .filter(|from| self.is_legal_transition(*from, stage))
            .collect()
    }

    /// Shortest legal path from `from` to `to`, both ends included.
    ///
    /// Breadth-first over successors in table order, so ties resolve to the
    /// earliest-listed edge. `None` if `to` is unreachable.
    pub fn shortest_path(&self, from: Stage, to: Stage) -> Option<Vec<Stage>> {
        if from == to {
            return Some(vec![from]);
        }
        let mut parent: Vec<Option<Stage>> = Stage::all_stages().map(|_| None).collect();
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for next in self.next_stages(current) {
                if !visited.insert(*next) {
                    continue;
                }
                parent[*next as usize] = Some(current);
                if *next == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(prev) = parent[cursor as usize] {
                        path.push(prev);
                        cursor = prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(*next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> &'static TransitionGraph {
        TransitionGraph::standard()
    }

    #[test]
    fn test_draft_successors() {
        assert_eq!(graph().next_stages(Stage::Draft), &[Stage::Approved, Stage::Cancelled]);
    }

    #[test]
    fn test_operational_successors_exact() {
        assert_eq!(
            graph().next_stages(Stage::Operational),
            &[Stage::WarrantyActive, Stage::Maintenance, Stage::Retired]
        );
    }

    #[test]
    fn test_terminal_stages() {
        for stage in [Stage::Archived, Stage::Cancelled, Stage::Returned, Stage::Quarantine] {
            assert!(graph().next_stages(stage).is_empty(), "{stage}");
            assert!(graph().is_terminal(stage));
        }
        let terminal: Vec<Stage> = Stage::all_stages().filter(|s| graph().is_terminal(*s)).collect();
        assert_eq!(terminal.len(), 4);
    }

    #[test]
    fn test_legal_checks() {
        assert!(graph().is_legal_transition(Stage::Draft, Stage::Approved));
        assert!(!graph().is_legal_transition(Stage::Draft, Stage::Operational));
        assert!(graph().is_legal_transition(Stage::Approved, Stage::Draft));
        assert!(graph().is_legal_transition(Stage::Sourcing, Stage::Available));
        assert!(!graph().is_legal_transition(Stage::Operational, Stage::Draft));
    }

    #[test]
    fn test_edge_kinds() {
        assert_eq!(EdgeKind::classify(Stage::Approved, Stage::Draft), EdgeKind::Rollback);
        assert_eq!(EdgeKind::classify(Stage::Draft, Stage::Approved), EdgeKind::Forward);
        assert_eq!(EdgeKind::classify(Stage::Ordered, Stage::Cancelled), EdgeKind::Cancellation);
        assert_eq!(EdgeKind::classify(Stage::Shipped, Stage::Quarantine), EdgeKind::Exception);
        assert_eq!(
            EdgeKind::classify(Stage::Maintenance, Stage::Operational),
            EdgeKind::Rollback
        );
    }

    #[test]
    fn test_cancellation_sources() {
        let sources = graph().predecessors(Stage::Cancelled);
        assert_eq!(
            sources,
            vec![
                Stage::Draft,
                Stage::Approved,
                Stage::Available,
                Stage::Sourcing,
                Stage::RfqOpen,
                Stage::RfqAwarded,
                Stage::Purchasing,
                Stage::Ordered,
            ]
        );
        assert_eq!(
            graph().predecessors(Stage::Returned),
            vec![Stage::Shipped, Stage::Received]
        );
    }

    #[test]
    fn test_every_stage_reachable_from_draft() {
        for stage in Stage::all_stages() {
            assert!(
                graph().shortest_path(Stage::Draft, stage).is_some(),
                "{stage} unreachable"
            );
        }
    }

    #[test]
    fn test_archived_reachable_from_every_canonical_stage() {
        for stage in Stage::canonical() {
            assert!(graph().shortest_path(*stage, Stage::Archived).is_some());
        }
    }

    #[test]
    fn test_shortest_path() {
        assert_eq!(
            graph().shortest_path(Stage::Operational, Stage::Archived),
            Some(vec![Stage::Operational, Stage::Retired, Stage::Archived])
        );
        assert_eq!(graph().shortest_path(Stage::Draft, Stage::Draft), Some(vec![Stage::Draft]));
        assert_eq!(graph().shortest_path(Stage::Cancelled, Stage::Archived), None);
        let full = graph().shortest_path(Stage::Draft, Stage::Archived).unwrap();
        assert_eq!(full.first(), Some(&Stage::Draft));
        assert_eq!(full.last(), Some(&Stage::Archived));
        for pair in full.windows(2) {
            assert!(graph().is_legal_transition(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_edges_match_next_stages() {
        let edges = graph().edges();
        let total: usize = Stage::all_stages().map(|s| graph().next_stages(s).len()).sum();
        assert_eq!(edges.len(), total);
        for edge in &edges {
            assert!(graph().is_legal_transition(edge.from, edge.to));
        }
    }

    #[test]
    fn test_from_edges_rejects_self_loop() {
        let err = TransitionGraph::from_edges(
            StageCatalog::standard(),
            [(Stage::Draft, Stage::Draft)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("self loop"));
    }

    #[test]
    fn test_from_edges_rejects_sink_outbound() {
        assert!(TransitionGraph::from_edges(
            StageCatalog::standard(),
            [(Stage::Cancelled, Stage::Draft)],
        )
        .is_err());
        assert!(TransitionGraph::from_edges(
            StageCatalog::standard(),
            [(Stage::Archived, Stage::Draft)],
        )
        .is_err());
    }

    #[test]
    fn test_from_edges_rejects_duplicates() {
        assert!(TransitionGraph::from_edges(
            StageCatalog::standard(),
            [(Stage::Draft, Stage::Approved), (Stage::Draft, Stage::Approved)],
        )
        .is_err());
    }

    #[test]
    fn test_validate_accepts_standard_graph() {
        assert!(graph().validate(StageCatalog::standard()).is_ok());
    }

    #[test]
    fn test_validate_rejects_unreachable_stage() {
        let partial = TransitionGraph::from_edges(
            StageCatalog::standard(),
            [(Stage::Draft, Stage::Approved)],
        )
        .unwrap();
        let err = partial.validate(StageCatalog::standard()).unwrap_err();
        assert!(matches!(err, LifecycleError::CatalogInvariant(_)));
    }
}
