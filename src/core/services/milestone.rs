//! Milestone reconciler - links a tracker release to a code-host milestone
//!
//! The milestone is found by the canonical release URL embedded in its
//! description, never by title. Once found (or created) its title is kept in
//! line with the release name, and it is attached to the pull request. The
//! attachment is verified by reading the pull request back.
//!
//! Milestones are never deleted here.

use std::fmt;

use log::{debug, error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::core::models::{
    CiContext, Milestone, MilestoneDraft, PullRequestUpdate, ReleaseLink, RepoRef, TrackerIssue,
};
use crate::core::ports::{CodeHost, CodeHostError};

/// Largest page size the code host accepts
pub const MILESTONE_PAGE_SIZE: u32 = 100;

/// Errors from milestone reconciliation
#[derive(Debug, Error)]
pub enum MilestoneError {
    /// A code host call failed
    #[error(transparent)]
    CodeHost(#[from] CodeHostError),

    /// Creation reported a conflict but no milestone carries the release URL
    #[error("milestone '{0}' already exists but none references its release URL")]
    NotFoundAfterConflict(String),

    /// The pull request did not carry the milestone after the update
    #[error("pull request #{pr} does not carry milestone #{expected} after update")]
    VerificationFailed {
        /// Pull request number
        pr: u64,
        /// Milestone number that was set
        expected: u64,
    },
}

/// How the milestone used for attachment came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneOrigin {
    /// Found with the right title
    Reused,
    /// Found and renamed to the release name
    Renamed,
    /// Newly created
    Created,
}

impl fmt::Display for MilestoneOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reused => write!(f, "reused"),
            Self::Renamed => write!(f, "renamed"),
            Self::Created => write!(f, "created"),
        }
    }
}

/// Result of milestone sync for one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MilestoneOutcome {
    /// The milestone is attached to the pull request and verified
    Attached {
        /// Milestone number
        number: u64,
        /// Milestone title
        title: String,
        /// Whether it was reused, renamed or created
        origin: MilestoneOrigin,
        /// Whether the fallback attach path was needed
        via_fallback: bool,
    },
    /// Nothing to do
    Skipped {
        /// Why the step was skipped
        reason: String,
    },
    /// The step failed; other issues are unaffected
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl MilestoneOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Whether the step failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Finds, creates, renames and attaches release milestones
pub struct MilestoneReconciler<'a> {
    code_host: &'a dyn CodeHost,
    tracker_host: &'a str,
    page_size: u32,
}

impl fmt::Debug for MilestoneReconciler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MilestoneReconciler")
            .field("tracker_host", &self.tracker_host)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<'a> MilestoneReconciler<'a> {
    /// Create a reconciler for releases of the given tracker host
    #[must_use]
    pub fn new(code_host: &'a dyn CodeHost, tracker_host: &'a str) -> Self {
        Self {
            code_host,
            tracker_host,
            page_size: MILESTONE_PAGE_SIZE,
        }
    }

    /// Override the page size used when listing milestones
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sync the issue's release milestone onto the event's pull request
    ///
    /// Missing pull request identity, fix versions or project key make this a
    /// no-op. Failures are reported in the outcome, never propagated.
    pub fn reconcile(&self, issue: &TrackerIssue, ctx: &CiContext) -> MilestoneOutcome {
        let Some((pr, repo)) = ctx.pull_request_identity() else {
            info!("Missing pull request number or repository; cannot sync milestone");
            return MilestoneOutcome::skipped("missing pull request number or repository");
        };

        let Some(release) = issue.fix_versions.first() else {
            info!("No fix versions found for {}; skipping milestone sync", issue.key);
            return MilestoneOutcome::skipped("issue has no fix versions");
        };
        if issue.fix_versions.len() > 1 {
            info!(
                "{} has {} fix versions; only the first ('{}') is used",
                issue.key,
                issue.fix_versions.len(),
                release.name
            );
        }

        let Some(project_key) = issue.project_key.as_deref() else {
            warn!("{} has no project key; cannot build the release URL", issue.key);
            return MilestoneOutcome::skipped("issue has no project key");
        };

        let link = ReleaseLink::new(self.tracker_host, project_key, release);
        info!(
            "Found release '{}' with date: {}",
            link.name,
            release.release_date.as_deref().unwrap_or("no date")
        );
        if let (Some(date), None) = (&release.release_date, &link.due_on) {
            warn!("Release date {date:?} is not YYYY-MM-DD; milestone gets no due date");
        }

        match self.sync_release(repo, pr, &link) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Milestone sync for {} failed: {e}", issue.key);
                MilestoneOutcome::Failed {
                    reason: e.to_string(),
                }
            },
        }
    }

    fn sync_release(
        &self,
        repo: &RepoRef,
        pr: u64,
        link: &ReleaseLink,
    ) -> Result<MilestoneOutcome, MilestoneError> {
        let (milestone, origin) = self.ensure_milestone(repo, link)?;
        let via_fallback = self.attach(repo, pr, &milestone)?;
        Ok(MilestoneOutcome::Attached {
            number: milestone.number,
            title: milestone.title,
            origin,
            via_fallback,
        })
    }

    /// List every milestone of the repository, following all pages
    pub fn list_all(&self, repo: &RepoRef) -> Result<Vec<Milestone>, CodeHostError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.code_host.list_milestones(repo, page, self.page_size)?;
            let last = batch.len() < self.page_size as usize;
            all.extend(batch);
            if last {
                break;
            }
            page += 1;
        }

        debug!("Found {} milestones in {repo} ({page} page(s))", all.len());
        Ok(all)
    }

    /// Find the milestone whose description references the release URL
    pub fn find_by_release(
        &self,
        repo: &RepoRef,
        release_url: &str,
    ) -> Result<Option<Milestone>, CodeHostError> {
        Ok(self.list_all(repo)?.into_iter().find(|m| m.references(release_url)))
    }

    /// Find or create the release milestone and bring its title in line
    pub fn ensure_milestone(
        &self,
        repo: &RepoRef,
        link: &ReleaseLink,
    ) -> Result<(Milestone, MilestoneOrigin), MilestoneError> {
        if let Some(existing) = self.find_by_release(repo, &link.url)? {
            if existing.title == link.name {
                info!("Milestone #{} '{}' found for release", existing.number, existing.title);
                return Ok((existing, MilestoneOrigin::Reused));
            }

            info!(
                "Milestone #{} title '{}' differs from release name '{}'; renaming",
                existing.number, existing.title, link.name
            );
            let draft = MilestoneDraft {
                title: link.name.clone(),
                description: None,
                due_on: link.due_on.clone().or(existing.due_on),
            };
            let renamed = self.code_host.update_milestone(repo, existing.number, &draft)?;
            return Ok((renamed, MilestoneOrigin::Renamed));
        }

        info!("Creating new milestone '{}'", link.name);
        let draft = MilestoneDraft {
            title: link.name.clone(),
            description: Some(link.description()),
            due_on: link.due_on.clone(),
        };

        match self.code_host.create_milestone(repo, &draft) {
            Ok(created) => {
                info!("Created milestone #{} '{}'", created.number, created.title);
                Ok((created, MilestoneOrigin::Created))
            },
            Err(CodeHostError::AlreadyExists(detail)) => {
                info!("Milestone '{}' already exists ({detail}); looking it up again", link.name);
                self.find_by_release(repo, &link.url)?
                    .map(|m| (m, MilestoneOrigin::Reused))
                    .ok_or_else(|| MilestoneError::NotFoundAfterConflict(link.name.clone()))
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Attach the milestone to the pull request and verify it
    ///
    /// Returns whether the fallback path was needed. The fallback confirms the
    /// milestone still exists and resends the pull request's title and body
    /// along with the milestone.
    pub fn attach(
        &self,
        repo: &RepoRef,
        pr: u64,
        milestone: &Milestone,
    ) -> Result<bool, MilestoneError> {
        let update = PullRequestUpdate::milestone_only(milestone.number);
        match self.attach_and_verify(repo, pr, milestone, &update) {
            Ok(()) => return Ok(false),
            Err(e) => warn!("Attaching milestone #{} to PR #{pr} failed: {e}", milestone.number),
        }

        info!("Fallback: re-fetching milestone #{} before retrying", milestone.number);
        let confirmed = self.code_host.get_milestone(repo, milestone.number)?;
        let current = self.code_host.get_pull_request(repo, pr)?;
        let update = PullRequestUpdate {
            milestone: confirmed.number,
            title: Some(current.title),
            body: current.body,
        };

        match self.attach_and_verify(repo, pr, &confirmed, &update) {
            Ok(()) => {
                info!("Fallback attached milestone #{} to PR #{pr}", confirmed.number);
                Ok(true)
            },
            Err(e) => {
                error!("Fallback attach of milestone #{} to PR #{pr} failed: {e}", confirmed.number);
                Err(e)
            },
        }
    }

    fn attach_and_verify(
        &self,
        repo: &RepoRef,
        pr: u64,
        milestone: &Milestone,
        update: &PullRequestUpdate,
    ) -> Result<(), MilestoneError> {
        info!(
            "Updating PR #{pr} with milestone '{}' (#{})",
            milestone.title, milestone.number
        );
        let status = self.code_host.update_pull_request(repo, pr, update)?;
        debug!("Update response status: {status}");
        if !(200..300).contains(&status) {
            return Err(CodeHostError::Status {
                status,
                message: "pull request update rejected".to_string(),
            }
            .into());
        }

        let updated = self.code_host.get_pull_request(repo, pr)?;
        match updated.milestone {
            Some(current) if current.number == milestone.number => {
                info!("Verified: PR #{pr} has milestone '{}'", current.title);
                Ok(())
            },
            current => {
                warn!(
                    "Verification failed: PR #{pr} has milestone {}",
                    current.map_or_else(|| "none".to_string(), |m| format!("'{}'", m.title))
                );
                Err(MilestoneError::VerificationFailed {
                    pr,
                    expected: milestone.number,
                })
            },
        }
    }
}
