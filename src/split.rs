//! Branch splitting: one force-pushed branch per commit.
//!
//! Every commit reachable from HEAD gets a branch named after its subject
//! token (`part-1.1`, `part-1.2`, ...). Afterwards `part-<i>.0` markers are
//! placed one commit before each `part-<i>.1`, so every tutorial chapter has
//! a branch holding its starting point.
//!
//! All names are derived and validated before the first ref is written.
//! Once writing starts, the first failure aborts the run and whatever was
//! already created or pushed stays in place.

use std::collections::HashMap;

use git2::Oid;

use crate::config::SplitConfig;
use crate::error::{GitPartsError, Result};
use crate::git::{CommitInfo, Repository};
use crate::naming;
use crate::ui;

/// Settings of a split run
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub prefix: String,
    pub remote: String,
    /// Number of `<prefix><i>.0` markers, counted from 1
    pub markers: u32,
    pub push: bool,
}

impl From<&SplitConfig> for SplitOptions {
    fn from(config: &SplitConfig) -> Self {
        SplitOptions {
            prefix: config.prefix.clone(),
            remote: config.remote.clone(),
            markers: config.markers,
            push: config.push,
        }
    }
}

/// A branch that will be created at a commit
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBranch {
    pub name: String,
    pub commit: CommitInfo,
}

/// A start marker and the commit it will point at
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMarker {
    pub name: String,
    pub anchor: String,
    pub oid: Oid,
}

/// Branch assignments for the whole history, newest first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitPlan {
    pub branches: Vec<PlannedBranch>,
}

impl SplitPlan {
    pub fn find(&self, name: &str) -> Option<&PlannedBranch> {
        self.branches.iter().find(|b| b.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Outcome of a split run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitReport {
    pub branches: Vec<String>,
    pub markers: Vec<String>,
    pub pushed: bool,
}

/// Derives a branch name for every commit of the history.
///
/// # Returns
/// * `Ok(SplitPlan)` - One branch per commit, newest first
/// * `Err` - If a subject has no usable label, a name is not a legal ref,
///   or two commits map to the same branch
pub fn plan_split<R: Repository>(repo: &R, prefix: &str) -> Result<SplitPlan> {
    let history = repo.history()?;
    let mut owners: HashMap<String, &CommitInfo> = HashMap::new();
    let mut branches = Vec::with_capacity(history.len());

    for commit in &history {
        let name = naming::branch_name(prefix, &commit.subject).map_err(|e| {
            GitPartsError::branch_name(format!("commit {}: {}", commit.short_hash, e))
        })?;

        if let Some(owner) = owners.get(&name) {
            return Err(GitPartsError::collision(format!(
                "'{}' would be used by both {} ({}) and {} ({})",
                name, owner.short_hash, owner.subject, commit.short_hash, commit.subject
            )));
        }
        owners.insert(name.clone(), commit);

        tracing::debug!(branch = %name, commit = %commit.short_hash, "planned branch");
        branches.push(PlannedBranch {
            name,
            commit: commit.clone(),
        });
    }

    Ok(SplitPlan { branches })
}

/// Resolves the commits the start markers point at.
///
/// An anchor (`<prefix><i>.1`) is looked up in the plan first and then among
/// the existing local branches. A marker sits on the anchor's first parent.
pub fn plan_markers<R: Repository>(
    repo: &R,
    plan: &SplitPlan,
    options: &SplitOptions,
) -> Result<Vec<PlannedMarker>> {
    let mut markers = Vec::new();

    for index in 1..=options.markers {
        let name = naming::marker_name(&options.prefix, index);
        let anchor = naming::marker_anchor(&options.prefix, index);
        naming::validate_branch_name(&name)?;

        if let Some(planned) = plan.find(&name) {
            return Err(GitPartsError::collision(format!(
                "marker '{}' would overwrite the branch of {} ({})",
                name, planned.commit.short_hash, planned.commit.subject
            )));
        }

        let anchor_oid = match plan.find(&anchor) {
            Some(planned) => planned.commit.oid,
            None => repo.resolve_branch(&anchor)?.ok_or_else(|| {
                GitPartsError::marker(format!(
                    "'{}' needs branch '{}', which does not exist",
                    name, anchor
                ))
            })?,
        };

        let oid = repo.parent_of(anchor_oid)?.ok_or_else(|| {
            GitPartsError::marker(format!(
                "'{}' needs the parent of '{}', which is a root commit",
                name, anchor
            ))
        })?;

        markers.push(PlannedMarker { name, anchor, oid });
    }

    Ok(markers)
}

/// Creates (and optionally force-pushes) every planned branch, then the markers.
///
/// Markers are resolved before anything is written, so a missing anchor
/// fails the run without side effects.
pub fn run_split<R: Repository>(
    repo: &R,
    plan: &SplitPlan,
    options: &SplitOptions,
) -> Result<SplitReport> {
    let markers = plan_markers(repo, plan, options)?;
    let mut report = SplitReport {
        pushed: options.push,
        ..SplitReport::default()
    };

    for planned in &plan.branches {
        publish(repo, &planned.name, planned.commit.oid, options)?;
        report.branches.push(planned.name.clone());
    }

    for marker in &markers {
        publish(repo, &marker.name, marker.oid, options)?;
        report.markers.push(marker.name.clone());
    }

    Ok(report)
}

fn publish<R: Repository>(repo: &R, name: &str, oid: Oid, options: &SplitOptions) -> Result<()> {
    repo.force_branch(name, oid)?;
    tracing::info!(branch = %name, %oid, "branch created");

    if options.push {
        repo.force_push_branch(&options.remote, name)?;
        tracing::info!(branch = %name, remote = %options.remote, "branch pushed");
        ui::display_success(&format!("{} -> {}/{}", name, options.remote, name));
    } else {
        ui::display_success(&format!("{} created", name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn options(markers: u32, push: bool) -> SplitOptions {
        SplitOptions {
            prefix: "part-".to_string(),
            remote: "origin".to_string(),
            markers,
            push,
        }
    }

    /// Initial commit followed by two chapters of three steps each.
    fn tutorial() -> MockRepository {
        MockRepository::with_subjects(&[
            "Initial commit",
            "1.1: Open a window",
            "1.2: Draw the player",
            "1.3: Move the player",
            "2.1: Add a map",
            "2.2: Add walls",
            "2.3: Collisions",
        ])
    }

    #[test]
    fn test_plan_follows_history_newest_first() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();

        let names: Vec<&str> = plan.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "part-2.3",
                "part-2.2",
                "part-2.1",
                "part-1.3",
                "part-1.2",
                "part-1.1",
                "part-Initial"
            ]
        );
        assert_eq!(plan.find("part-1.1").unwrap().commit.oid, repo.oid(1));
    }

    #[test]
    fn test_plan_strips_colons_only() {
        let repo = MockRepository::with_subjects(&["A: x", "B: y"]);
        let plan = plan_split(&repo, "part-").unwrap();

        assert!(plan.find("part-A").is_some());
        assert!(plan.find("part-B").is_some());
    }

    #[test]
    fn test_plan_rejects_collisions() {
        let repo = MockRepository::with_subjects(&["1.1: first try", "1.1: second try"]);
        let err = plan_split(&repo, "part-").unwrap_err();

        assert!(matches!(err, GitPartsError::Collision(_)));
        assert!(err.to_string().contains("part-1.1"));
    }

    #[test]
    fn test_plan_rejects_invalid_names() {
        let repo = MockRepository::with_subjects(&["ok: fine", "bad..name: nope"]);
        let err = plan_split(&repo, "part-").unwrap_err();

        assert!(matches!(err, GitPartsError::BranchName(_)));
    }

    #[test]
    fn test_empty_history_plans_nothing() {
        let repo = MockRepository::new();
        assert!(plan_split(&repo, "part-").unwrap().is_empty());
    }

    #[test]
    fn test_markers_sit_one_commit_before_anchor() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();
        let markers = plan_markers(&repo, &plan, &options(2, true)).unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].name, "part-1.0");
        assert_eq!(markers[0].anchor, "part-1.1");
        assert_eq!(markers[0].oid, repo.oid(0));
        assert_eq!(markers[1].name, "part-2.0");
        assert_eq!(markers[1].oid, repo.oid(3));
    }

    #[test]
    fn test_marker_anchor_from_existing_branch() {
        let repo = MockRepository::with_subjects(&["Initial commit", "intro: words"]);
        repo.set_branch("part-1.1", repo.oid(1));
        let plan = plan_split(&repo, "part-").unwrap();

        let markers = plan_markers(&repo, &plan, &options(1, false)).unwrap();
        assert_eq!(markers[0].oid, repo.oid(0));
    }

    #[test]
    fn test_missing_marker_anchor_fails() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();
        let err = plan_markers(&repo, &plan, &options(3, true)).unwrap_err();

        assert!(matches!(err, GitPartsError::Marker(_)));
        assert!(err.to_string().contains("part-3.1"));
    }

    #[test]
    fn test_root_commit_anchor_fails() {
        let repo = MockRepository::with_subjects(&["1.1: first"]);
        let plan = plan_split(&repo, "part-").unwrap();
        let err = plan_markers(&repo, &plan, &options(1, true)).unwrap_err();

        assert!(err.to_string().contains("root commit"));
    }

    #[test]
    fn test_marker_colliding_with_commit_branch() {
        let repo = MockRepository::with_subjects(&["1.0: setup", "1.1: start"]);
        let plan = plan_split(&repo, "part-").unwrap();
        let err = plan_markers(&repo, &plan, &options(1, true)).unwrap_err();

        assert!(matches!(err, GitPartsError::Collision(_)));
    }

    #[test]
    fn test_run_split_creates_and_pushes_everything() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();
        let report = run_split(&repo, &plan, &options(2, true)).unwrap();

        assert_eq!(report.branches.len(), 7);
        assert_eq!(report.markers, vec!["part-1.0", "part-2.0"]);
        assert!(report.pushed);
        assert_eq!(repo.branch_count(), 9);
        assert_eq!(repo.branch("part-1.2"), Some(repo.oid(2)));
        assert_eq!(repo.branch("part-2.0"), Some(repo.oid(3)));

        let pushes = repo.pushes();
        assert_eq!(pushes.len(), 9);
        assert_eq!(pushes[0], ("origin".to_string(), "part-2.3".to_string()));
        assert_eq!(pushes[8], ("origin".to_string(), "part-2.0".to_string()));
    }

    #[test]
    fn test_run_split_without_push() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();
        let report = run_split(&repo, &plan, &options(1, false)).unwrap();

        assert!(!report.pushed);
        assert_eq!(repo.branch_count(), 8);
        assert!(repo.pushes().is_empty());
    }

    #[test]
    fn test_push_failure_aborts_and_keeps_earlier_branches() {
        let mut repo = tutorial();
        repo.fail_push("part-2.1");
        let plan = plan_split(&repo, "part-").unwrap();

        let err = run_split(&repo, &plan, &options(2, true)).unwrap_err();
        assert!(matches!(err, GitPartsError::Remote(_)));

        // part-2.3 and part-2.2 were pushed; part-2.1 exists locally only.
        assert_eq!(repo.pushes().len(), 2);
        assert_eq!(repo.branch("part-2.1"), Some(repo.oid(4)));
        assert_eq!(repo.branch("part-1.3"), None);
        assert_eq!(repo.branch("part-1.0"), None);
    }

    #[test]
    fn test_missing_anchor_fails_before_writing() {
        let repo = tutorial();
        let plan = plan_split(&repo, "part-").unwrap();

        assert!(run_split(&repo, &plan, &options(5, true)).is_err());
        assert_eq!(repo.branch_count(), 0);
        assert!(repo.pushes().is_empty());
    }

    #[test]
    fn test_default_five_markers() {
        let repo = MockRepository::with_subjects(&[
            "Initial commit",
            "1.1: Open a window",
            "1.2: Draw the player",
            "2.1: Add a map",
            "3.1: Field of view",
            "3.2: Remember tiles",
            "4.1: Lighting",
            "5.1: Terrain",
        ]);
        let options = SplitOptions::from(&SplitConfig::default());
        let plan = plan_split(&repo, &options.prefix).unwrap();

        let report = run_split(&repo, &plan, &options).unwrap();
        assert_eq!(
            report.markers,
            vec!["part-1.0", "part-2.0", "part-3.0", "part-4.0", "part-5.0"]
        );
        for (marker, anchor) in [
            ("part-1.0", "part-1.1"),
            ("part-2.0", "part-2.1"),
            ("part-3.0", "part-3.1"),
            ("part-4.0", "part-4.1"),
            ("part-5.0", "part-5.1"),
        ] {
            let anchor_oid = repo.branch(anchor).unwrap();
            assert_eq!(repo.branch(marker), repo.parent_of(anchor_oid).unwrap());
        }

        // Running again yields the same refs.
        let again = run_split(&repo, &plan, &options).unwrap();
        assert_eq!(again, report);
        assert_eq!(repo.branch("part-4.0"), Some(repo.oid(5)));
        assert_eq!(repo.branch_count(), 13);
    }

    #[test]
    fn test_options_from_config() {
        let options = SplitOptions::from(&SplitConfig::default());
        assert_eq!(options.prefix, "part-");
        assert_eq!(options.remote, "origin");
        assert_eq!(options.markers, 5);
        assert!(options.push);
    }
}
