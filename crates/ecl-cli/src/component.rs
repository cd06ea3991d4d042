//! # Component Subcommand
//!
//! Component records kept as JSON files in a local state directory, one
//! file per component. Transitions go through the same commit rules as
//! the API: legal edge, satisfied target prerequisites, matching version.
//!
//! Writers serialise on an exclusive lock over `<id>.lock` and re-read the
//! record under it, so two processes committing against the same version
//! cannot both succeed. Records are replaced atomically (temp file, then
//! rename); readers never see a partial file.
//!
//! ## Subcommands
//!
//! - `create`: Register a component (default stage `draft`).
//! - `transition`: Validate and commit a move.
//! - `status`: Show the current stage and history.
//! - `list`: List every stored component.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use fs2::FileExt;

use ecl_core::{ComponentId, Stage};
use ecl_lifecycle::{ComponentRecord, IntegrationStatusReporter, WorkflowValidationService};

use crate::facts::FactsFile;

/// Arguments for `ecl component`.
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Directory holding component state files.
    #[arg(long, default_value = ".ecl/components")]
    pub state_dir: PathBuf,

    #[command(subcommand)]
    pub command: ComponentCommand,
}

#[derive(Subcommand, Debug)]
pub enum ComponentCommand {
    /// Register a new component.
    Create {
        #[arg(long)]
        id: String,
        /// Starting stage, for hardware already in service.
        #[arg(long)]
        stage: Option<String>,
    },

    /// Move a component to another stage.
    Transition {
        #[arg(long)]
        id: String,
        #[arg(long)]
        target: String,
        /// YAML or JSON facts for the target stage's prerequisites.
        #[arg(long)]
        facts: Option<PathBuf>,
        /// Version the caller last saw (`ecl component status`).
        #[arg(long)]
        expected_version: u64,
        #[arg(long)]
        note: Option<String>,
    },

    /// Show current stage and transition history.
    Status {
        #[arg(long)]
        id: String,
    },

    /// List all stored components.
    List,
}

pub fn run_component(args: &ComponentArgs) -> Result<u8> {
    let dir = args.state_dir.as_path();
    match &args.command {
        ComponentCommand::Create { id, stage } => cmd_create(dir, id, stage.as_deref()),
        ComponentCommand::Transition {
            id,
            target,
            facts,
            expected_version,
            note,
        } => cmd_transition(
            dir,
            id,
            target,
            facts.as_deref(),
            *expected_version,
            note.clone(),
        ),
        ComponentCommand::Status { id } => cmd_status(dir, id),
        ComponentCommand::List => cmd_list(dir),
    }
}

fn service() -> WorkflowValidationService<'static> {
    WorkflowValidationService::standard(IntegrationStatusReporter::default())
}

fn state_file(dir: &Path, id: &ComponentId) -> PathBuf {
    dir.join(format!("{id}.json"))
}

fn lock_file(dir: &Path, id: &ComponentId) -> PathBuf {
    dir.join(format!("{id}.lock"))
}

/// Take the exclusive write lock for one component. Released when the
/// returned handle is dropped.
fn lock(dir: &Path, id: &ComponentId) -> Result<File> {
    let path = lock_file(dir, id);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("failed to lock {}", path.display()))?;
    Ok(file)
}

fn load(dir: &Path, id: &ComponentId) -> Result<ComponentRecord> {
    let path = state_file(dir, id);
    if !path.exists() {
        bail!("component not found: {id}");
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("corrupt state file {}", path.display()))
}

/// Replace the record's state file atomically. Caller holds the lock.
fn save(dir: &Path, record: &ComponentRecord) -> Result<()> {
    let path = state_file(dir, &record.id);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, record)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn cmd_create(dir: &Path, id: &str, stage: Option<&str>) -> Result<u8> {
    let id = ComponentId::new(id).context("invalid component id")?;
    let stage = match stage {
        Some(raw) => service().catalog().lookup_name(raw)?.stage,
        None => Stage::initial(),
    };
    std::fs::create_dir_all(dir).context("failed to create component state directory")?;
    let _guard = lock(dir, &id)?;
    if state_file(dir, &id).exists() {
        bail!("component already exists: {id}");
    }
    let record = ComponentRecord::at_stage(id, stage);
    save(dir, &record)?;
    println!("OK: created component {} at {}", record.id, record.stage);
    Ok(0)
}

fn cmd_transition(
    dir: &Path,
    id: &str,
    target: &str,
    facts: Option<&Path>,
    expected_version: u64,
    note: Option<String>,
) -> Result<u8> {
    let id = ComponentId::new(id).context("invalid component id")?;
    let facts = FactsFile::load_optional(facts)?;
    let rules = service();
    let target = rules.catalog().lookup_name(target)?.stage;
    if !state_file(dir, &id).exists() {
        bail!("component not found: {id}");
    }

    let _guard = lock(dir, &id)?;
    let mut record = load(dir, &id)?;
    let committed = record
        .try_transition(target, expected_version, &rules, &facts.prerequisites, note)?
        .clone();
    save(dir, &record)?;
    println!(
        "OK: component {id} transitioned {} -> {} (version {})",
        committed.from, committed.to, committed.version
    );
    Ok(0)
}

fn cmd_status(dir: &Path, id: &str) -> Result<u8> {
    let id = ComponentId::new(id).context("invalid component id")?;
    let record = load(dir, &id)?;
    let rules = service();
    println!("Component: {id}");
    println!("  Stage: {}", record.stage);
    match rules.completion_percent(record.stage) {
        Some(pct) => println!("  Completion: {pct}%"),
        None => println!("  Completion: - (exception stage)"),
    }
    println!("  Version: {}", record.version);
    println!("  Created: {}", record.created_at);
    println!("  Transitions: {}", record.history().len());
    for (i, t) in record.history().iter().enumerate() {
        match &t.note {
            Some(note) => println!("    [{i}] {} -> {} at {} ({note})", t.from, t.to, t.timestamp),
            None => println!("    [{i}] {} -> {} at {}", t.from, t.to, t.timestamp),
        }
    }
    Ok(0)
}

fn cmd_list(dir: &Path) -> Result<u8> {
    if !dir.is_dir() {
        println!("No components found (state directory does not exist).");
        return Ok(0);
    }
    let mut entries: Vec<(ComponentId, Stage)> = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|c| serde_json::from_str::<ComponentRecord>(&c).map_err(Into::into))
        {
            Ok(record) => entries.push((record.id, record.stage)),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping unreadable state file"),
        }
    }
    entries.sort();
    if entries.is_empty() {
        println!("No components found.");
    } else {
        println!("Components ({}):", entries.len());
        for (id, stage) in &entries {
            println!("  {id}: {stage}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_file(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("facts.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn create_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        assert_eq!(cmd_create(&state, "INV-1", None).unwrap(), 0);
        assert_eq!(cmd_status(&state, "INV-1").unwrap(), 0);
        let record = load(&state, &ComponentId::new("INV-1").unwrap()).unwrap();
        assert_eq!(record.stage, Stage::Draft);
    }

    #[test]
    fn create_rejects_duplicates_and_unknown_stage() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        cmd_create(&state, "INV-2", None).unwrap();
        assert!(cmd_create(&state, "INV-2", None).is_err());
        assert!(cmd_create(&state, "INV-3", Some("orbit")).is_err());
    }

    #[test]
    fn transition_with_facts_commits() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        cmd_create(&state, "INV-4", Some("shipped")).unwrap();
        let facts = facts_file(
            dir.path(),
            "prerequisites:\n  delivery_inspected: true\n  inventory_recorded: true\n",
        );
        cmd_transition(&state, "INV-4", "received", Some(&facts), 0, Some("dock 3".into()))
            .unwrap();
        let record = load(&state, &ComponentId::new("INV-4").unwrap()).unwrap();
        assert_eq!(record.stage, Stage::Received);
        assert_eq!(record.version, 1);
        assert_eq!(record.history()[0].note.as_deref(), Some("dock 3"));
    }

    #[test]
    fn transition_rejections_leave_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        cmd_create(&state, "INV-5", None).unwrap();
        // Illegal edge.
        assert!(cmd_transition(&state, "INV-5", "shipped", None, 0, None).is_err());
        // Prerequisites unknown.
        assert!(cmd_transition(&state, "INV-5", "approved", None, 0, None).is_err());
        // Stale version.
        assert!(cmd_transition(&state, "INV-5", "cancelled", None, 3, None).is_err());
        let record = load(&state, &ComponentId::new("INV-5").unwrap()).unwrap();
        assert_eq!(record.version, 0);
        assert!(record.history().is_empty());
    }

    #[test]
    fn transition_on_missing_component_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        std::fs::create_dir_all(&state).unwrap();
        let err = cmd_transition(&state, "INV-9", "cancelled", None, 0, None).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!lock_file(&state, &ComponentId::new("INV-9").unwrap()).exists());
    }

    #[test]
    fn concurrent_transitions_commit_once_per_version() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        for round in 0..20 {
            let id = format!("INV-C{round}");
            cmd_create(&state, &id, None).unwrap();
            let wins = std::thread::scope(|s| {
                let handles: Vec<_> = (0..8)
                    .map(|_| s.spawn(|| cmd_transition(&state, &id, "cancelled", None, 0, None)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap())
                    .filter(|r| r.is_ok())
                    .count()
            });
            assert_eq!(wins, 1, "round {round}");
            let record = load(&state, &ComponentId::new(id.as_str()).unwrap()).unwrap();
            assert_eq!(record.version, 1);
            assert_eq!(record.history().len(), 1);
            assert_eq!(record.stage, Stage::Cancelled);
        }
    }

    #[test]
    fn reader_never_sees_partial_record() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("components");
        let facts = facts_file(
            dir.path(),
            "prerequisites:\n  technical_specifications_complete: true\n  technical_approval_signed: true\n  budget_allocated: true\n",
        );
        cmd_create(&state, "INV-R", None).unwrap();
        let id = ComponentId::new("INV-R").unwrap();
        std::thread::scope(|s| {
            s.spawn(|| {
                for version in 0..30 {
                    let target = if version % 2 == 0 { "approved" } else { "draft" };
                    cmd_transition(&state, "INV-R", target, Some(&facts), version, None).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..200 {
                    load(&state, &id).unwrap();
                }
            });
        });
        assert_eq!(load(&state, &id).unwrap().version, 30);
    }

    #[test]
    fn list_handles_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cmd_list(&dir.path().join("absent")).unwrap(), 0);
        let state = dir.path().join("components");
        cmd_create(&state, "INV-6", None).unwrap();
        std::fs::write(state.join("junk.json"), "{").unwrap();
        assert_eq!(cmd_list(&state).unwrap(), 0);
    }
}
