//! Publication version tree: branches, semantic version increments, merge and
//! rollback bookkeeping (all append-only), and content-hash integrity.
//!
//! Branch membership is a tag on the version, not a structural property of
//! the tree. A version's parent may sit on a different branch; that is exactly
//! how a branch is created.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Branch the first version of every publication lands on.
pub const DEFAULT_BRANCH: &str = "main";

/// Maximum allowed length for a branch name.
pub const MAX_BRANCH_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A published work; versions hang off it as a forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub id: EntityId,
    pub title: String,
    pub author_id: EntityId,
    pub isbn_13: Option<String>,
    /// BISAC subject heading codes.
    pub subject_codes: Vec<String>,
    pub language: Option<String>,
    pub created_at: Timestamp,
}

/// Semantic version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionNumber {
    pub const INITIAL: VersionNumber = VersionNumber {
        major: 1,
        minor: 0,
        patch: 0,
    };

    pub fn bumped(self, change: ChangeType) -> VersionNumber {
        match change {
            ChangeType::Major => VersionNumber {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            ChangeType::Minor => VersionNumber {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
            ChangeType::Patch | ChangeType::Hotfix => VersionNumber {
                major: self.major,
                minor: self.minor,
                patch: self.patch + 1,
            },
        }
    }
}

impl std::fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Kind of change a new version represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Major,
    Minor,
    Patch,
    Hotfix,
}

/// Version lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Draft,
    InReview,
    Approved,
    Published,
    Archived,
}

impl VersionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::InReview => "in_review",
            VersionStatus::Approved => "approved",
            VersionStatus::Published => "published",
            VersionStatus::Archived => "archived",
        }
    }
}

/// Returns the set of statuses reachable from `from`.
pub fn valid_status_transitions(from: VersionStatus) -> &'static [VersionStatus] {
    use VersionStatus::*;
    match from {
        Draft => &[InReview, Archived],
        InReview => &[Approved, Draft],
        Approved => &[Published, Draft],
        Published => &[Archived],
        Archived => &[],
    }
}

/// Validate a version status transition.
pub fn validate_status_transition(
    from: VersionStatus,
    to: VersionStatus,
) -> Result<(), CoreError> {
    if valid_status_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition version from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// One node in a publication's version tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: EntityId,
    pub publication_id: EntityId,
    pub parent_version_id: Option<EntityId>,
    pub branch: String,
    pub number: VersionNumber,
    pub content: String,
    pub content_hash: String,
    pub status: VersionStatus,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Branch names and hashes
// ---------------------------------------------------------------------------

/// Validate a branch name: non-empty, trimmed, within
/// [`MAX_BRANCH_NAME_LENGTH`].
pub fn validate_branch_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Branch name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Branch name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_BRANCH_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Branch name must not exceed {MAX_BRANCH_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

/// Deterministic digest of a version's content, stored as lowercase SHA-256
/// hex. Recomputed whenever content changes; used for integrity checks, not
/// deduplication.
pub fn compute_content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{digest:x}")
}

/// Check that a version's stored hash still matches its content.
pub fn verify_content_hash(version: &Version) -> Result<(), CoreError> {
    let expected = compute_content_hash(&version.content);
    if version.content_hash == expected {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Version {} content hash mismatch",
            version.id
        )))
    }
}

// ---------------------------------------------------------------------------
// Tree queries
// ---------------------------------------------------------------------------

/// Latest version on a branch, by version number.
pub fn latest_on_branch<'a>(versions: &'a [Version], branch: &str) -> Option<&'a Version> {
    versions
        .iter()
        .filter(|v| v.branch == branch)
        .max_by_key(|v| v.number)
}

/// Semantic-versioning increment relative to the latest on the branch.
pub fn next_version(latest: Option<VersionNumber>, change: ChangeType) -> VersionNumber {
    match latest {
        Some(number) => number.bumped(change),
        None => VersionNumber::INITIAL,
    }
}

fn find_version<'a>(versions: &'a [Version], id: EntityId) -> Option<&'a Version> {
    versions.iter().find(|v| v.id == id)
}

/// Guard against a caller mixing version slices from different publications.
fn ensure_same_publication(version: &Version, publication_id: EntityId) -> Result<(), CoreError> {
    if version.publication_id != publication_id {
        return Err(CoreError::Validation(format!(
            "Version {} belongs to publication {}, not {publication_id}",
            version.id, version.publication_id
        )));
    }
    Ok(())
}

/// Walk the parent chain from `start`, most recent first, `start` included.
fn ancestry(versions: &[Version], start: &Version) -> Vec<EntityId> {
    let mut chain = Vec::new();
    let mut cursor = Some(start.id);
    while let Some(id) = cursor {
        chain.push(id);
        cursor = find_version(versions, id).and_then(|v| v.parent_version_id);
    }
    chain
}

/// Nearest version both lineages share.
fn common_ancestor<'a>(
    versions: &'a [Version],
    a: &Version,
    b: &Version,
) -> Option<&'a Version> {
    let lineage_a = ancestry(versions, a);
    ancestry(versions, b)
        .into_iter()
        .find(|id| lineage_a.contains(id))
        .and_then(|id| find_version(versions, id))
}

// ---------------------------------------------------------------------------
// Version creation
// ---------------------------------------------------------------------------

fn new_node(
    publication_id: EntityId,
    parent: Option<&Version>,
    branch: &str,
    number: VersionNumber,
    content: String,
    created_at: Timestamp,
) -> Version {
    let content_hash = compute_content_hash(&content);
    Version {
        id: uuid::Uuid::new_v4(),
        publication_id,
        parent_version_id: parent.map(|p| p.id),
        branch: branch.to_string(),
        number,
        content,
        content_hash,
        status: VersionStatus::Draft,
        created_at,
    }
}

/// Append a new version to an existing branch.
///
/// The first version of a publication must land on [`DEFAULT_BRANCH`]; any
/// other branch has to be opened with [`create_branch`] first.
pub fn create_version(
    versions: &[Version],
    publication_id: EntityId,
    branch: &str,
    content: String,
    change: ChangeType,
    now: Timestamp,
) -> Result<Version, CoreError> {
    validate_branch_name(branch)?;
    let latest = latest_on_branch(versions, branch);
    match latest {
        Some(latest) => ensure_same_publication(latest, publication_id)?,
        None => {
            if !versions.is_empty() || branch != DEFAULT_BRANCH {
                return Err(CoreError::Validation(format!(
                    "Branch '{branch}' does not exist for this publication"
                )));
            }
        }
    }
    let number = next_version(latest.map(|v| v.number), change);
    Ok(new_node(publication_id, latest, branch, number, content, now))
}

/// Open a new branch off the latest version of `source_branch`.
///
/// The branch point is a patch bump whose parent sits on the source branch;
/// the new branch name is just a tag on the new version.
pub fn create_branch(
    versions: &[Version],
    publication_id: EntityId,
    source_branch: &str,
    new_branch: &str,
    now: Timestamp,
) -> Result<Version, CoreError> {
    validate_branch_name(new_branch)?;
    if latest_on_branch(versions, new_branch).is_some() {
        return Err(CoreError::Conflict(format!(
            "Branch '{new_branch}' already exists"
        )));
    }
    let source = latest_on_branch(versions, source_branch).ok_or_else(|| {
        CoreError::Validation(format!("Source branch '{source_branch}' has no versions"))
    })?;
    ensure_same_publication(source, publication_id)?;
    let number = source.number.bumped(ChangeType::Patch);
    tracing::debug!(%publication_id, source_branch, new_branch, "opening branch");
    Ok(new_node(
        publication_id,
        Some(source),
        new_branch,
        number,
        source.content.clone(),
        now,
    ))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// A line changed on both sides since the common ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConflict {
    pub line: usize,
    pub base: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Content-level conflict detection, the extension seam for richer formats.
pub trait ConflictDetector {
    fn detect(&self, base: &str, source: &str, target: &str) -> Vec<MergeConflict>;
}

/// Three-way, line-keyed comparison against the common ancestor. A line both
/// sides changed to different text is a conflict; a line only one side
/// touched is not.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineConflictDetector;

impl ConflictDetector for LineConflictDetector {
    fn detect(&self, base: &str, source: &str, target: &str) -> Vec<MergeConflict> {
        let base_lines: Vec<&str> = base.lines().collect();
        let source_lines: Vec<&str> = source.lines().collect();
        let target_lines: Vec<&str> = target.lines().collect();
        let len = base_lines
            .len()
            .max(source_lines.len())
            .max(target_lines.len());

        let mut conflicts = Vec::new();
        for line in 0..len {
            let b = base_lines.get(line).copied();
            let s = source_lines.get(line).copied();
            let t = target_lines.get(line).copied();
            if s != b && t != b && s != t {
                conflicts.push(MergeConflict {
                    line,
                    base: b.map(str::to_string),
                    source: s.map(str::to_string),
                    target: t.map(str::to_string),
                });
            }
        }
        conflicts
    }
}

/// How merged content is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    PreferSource,
    PreferTarget,
    /// Caller supplies the resolved content.
    Manual {
        content: String,
    },
}

/// Merge the latest of `source_branch` into `target_branch`.
///
/// The merge version lands on the target branch as a minor bump whose parent
/// is the target's latest version. Unresolved conflicts under a non-manual
/// strategy are rejected.
pub fn merge_branches(
    versions: &[Version],
    publication_id: EntityId,
    source_branch: &str,
    target_branch: &str,
    strategy: MergeStrategy,
    detector: &dyn ConflictDetector,
    now: Timestamp,
) -> Result<Version, CoreError> {
    let source = latest_on_branch(versions, source_branch).ok_or_else(|| {
        CoreError::Validation(format!("Source branch '{source_branch}' has no versions"))
    })?;
    let target = latest_on_branch(versions, target_branch).ok_or_else(|| {
        CoreError::Validation(format!("Target branch '{target_branch}' has no versions"))
    })?;
    ensure_same_publication(source, publication_id)?;
    ensure_same_publication(target, publication_id)?;

    let base = common_ancestor(versions, source, target)
        .map(|v| v.content.as_str())
        .unwrap_or("");
    let conflicts = detector.detect(base, &source.content, &target.content);
    tracing::debug!(
        %publication_id,
        source_branch,
        target_branch,
        conflicts = conflicts.len(),
        "merging branches"
    );

    let content = match strategy {
        MergeStrategy::Manual { content } => content,
        MergeStrategy::PreferSource if conflicts.is_empty() => source.content.clone(),
        MergeStrategy::PreferTarget if conflicts.is_empty() => target.content.clone(),
        MergeStrategy::PreferSource | MergeStrategy::PreferTarget => {
            return Err(CoreError::Conflict(format!(
                "Merge of '{source_branch}' into '{target_branch}' has {} unresolved conflicts",
                conflicts.len()
            )));
        }
    };

    let number = target.number.bumped(ChangeType::Minor);
    Ok(new_node(
        publication_id,
        Some(target),
        target_branch,
        number,
        content,
        now,
    ))
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

/// Roll a branch back to a past version's content.
///
/// History is append-only: rollback is a new forward patch bump copying the
/// old content, never a mutation of existing versions.
pub fn rollback_to(
    versions: &[Version],
    publication_id: EntityId,
    target_version_id: EntityId,
    now: Timestamp,
) -> Result<Version, CoreError> {
    let target = find_version(versions, target_version_id).ok_or(CoreError::NotFound {
        entity: "version",
        id: target_version_id,
    })?;
    ensure_same_publication(target, publication_id)?;
    verify_content_hash(target)?;
    let latest = latest_on_branch(versions, &target.branch).ok_or_else(|| {
        CoreError::Validation(format!("Branch '{}' has no versions", target.branch))
    })?;
    let number = latest.number.bumped(ChangeType::Patch);
    tracing::debug!(
        %publication_id,
        branch = %target.branch,
        target = %target.number,
        "rolling back branch"
    );
    Ok(new_node(
        publication_id,
        Some(latest),
        &target.branch,
        number,
        target.content.clone(),
        now,
    ))
}
