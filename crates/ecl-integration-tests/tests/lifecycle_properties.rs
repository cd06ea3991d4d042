//! # Lifecycle Properties
//!
//! Property tests over the full stage set: graph closure, completion
//! monotonicity, path legality, and version bookkeeping under random walks.

use proptest::prelude::*;

use ecl_core::{ComponentId, Stage};
use ecl_lifecycle::{
    ComponentRecord, FactSheet, IntegrationStatusReporter, StageCatalog, TransitionGraph,
    WorkflowValidationService,
};

fn any_stage() -> impl Strategy<Value = Stage> {
    let stages: Vec<Stage> = Stage::all_stages().collect();
    prop::sample::select(stages)
}

fn rules() -> WorkflowValidationService<'static> {
    WorkflowValidationService::standard(IntegrationStatusReporter::default())
}

#[test]
fn completion_strictly_increasing_and_ends_at_100() {
    let svc = rules();
    let values: Vec<u8> = StageCatalog::standard()
        .all()
        .iter()
        .map(|d| svc.completion_percent(d.stage).unwrap())
        .collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
    assert_eq!(values.last(), Some(&100));
}

proptest! {
    #[test]
    fn next_stages_stay_inside_catalog(stage in any_stage()) {
        let catalog = StageCatalog::standard();
        for next in TransitionGraph::standard().next_stages(stage) {
            prop_assert!(catalog.contains(*next));
        }
    }

    #[test]
    fn shortest_paths_use_legal_edges(from in any_stage(), to in any_stage()) {
        let graph = TransitionGraph::standard();
        if let Some(path) = graph.shortest_path(from, to) {
            prop_assert_eq!(path.first(), Some(&from));
            prop_assert_eq!(path.last(), Some(&to));
            for pair in path.windows(2) {
                prop_assert!(graph.is_legal_transition(pair[0], pair[1]));
            }
        }
    }

    #[test]
    fn predecessors_mirror_successors(stage in any_stage()) {
        let graph = TransitionGraph::standard();
        for pred in graph.predecessors(stage) {
            prop_assert!(graph.next_stages(pred).contains(&stage));
        }
    }

    #[test]
    fn random_walk_keeps_version_equal_to_history(choices in prop::collection::vec(0usize..8, 0..40)) {
        let rules = rules();
        let facts = FactSheet::all_satisfied();
        let mut record = ComponentRecord::new(ComponentId::new("WALK-1").unwrap());
        for choice in choices {
            let next = rules.graph().next_stages(record.stage);
            if next.is_empty() {
                break;
            }
            let target = next[choice % next.len()];
            let version = record.version;
            record.try_transition(target, version, &rules, &facts, None).unwrap();
            prop_assert_eq!(record.stage, target);
        }
        prop_assert_eq!(record.version as usize, record.history().len());
        for (i, entry) in record.history().iter().enumerate() {
            prop_assert_eq!(entry.version as usize, i + 1);
            prop_assert!(rules.graph().is_legal_transition(entry.from, entry.to));
        }
    }
}
