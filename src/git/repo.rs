use crate::error::{GheatError, Result};
use crate::model::CommitRecord;
use chrono::{DateTime, FixedOffset, Utc};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(path = %path.display(), "opened repository");

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `user.name` from the repository's effective configuration.
    pub fn configured_author_name(&self) -> Result<String> {
        let config = self.repo.config_snapshot();
        let name = config
            .string("user.name")
            .map(|name| name.to_string())
            .unwrap_or_default();

        if name.trim().is_empty() {
            return Err(GheatError::ConfigRead(
                "user.name is not set in the git configuration".to_string(),
            ));
        }
        Ok(name)
    }

    /// Every commit reachable from HEAD authored at or after `since`.
    ///
    /// The walk is lazy; read errors surface as `Err` items mid-iteration.
    /// An unborn HEAD yields an empty walk.
    pub fn commits_since(&self, since: DateTime<Utc>) -> Result<HistoryWalk<'_>> {
        let mut head = self.repo.head()?;
        let mut stack = VecDeque::new();

        if head.is_unborn() {
            debug!("HEAD is unborn, history is empty");
        } else {
            let head_commit = head.peel_to_commit_in_place()?;
            stack.push_back(head_commit.id);
        }

        Ok(HistoryWalk::new(&self.repo, stack, since))
    }
}

/// Depth-first walk over the commit graph, deduplicating shared ancestors.
pub struct HistoryWalk<'repo> {
    repo: &'repo Repository,
    stack: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
    since: DateTime<Utc>,
    progress: ProgressBar,
    failed: bool,
}

impl<'repo> HistoryWalk<'repo> {
    fn new(repo: &'repo Repository, stack: VecDeque<ObjectId>, since: DateTime<Utc>) -> Self {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message("Reading commits...");

        Self {
            repo,
            stack,
            seen: HashSet::new(),
            since,
            progress,
            failed: false,
        }
    }

    fn visit(&mut self, commit_id: ObjectId) -> Result<Option<CommitRecord>> {
        let repo = self.repo;
        let commit = repo.find_commit(commit_id)?;
        for parent in commit.parent_ids() {
            self.stack.push_back(parent.detach());
        }

        let author = commit.author()?;
        let time = author.time().map_err(GheatError::history)?;
        let author_timestamp = to_datetime(time.seconds, time.offset)?;

        if author_timestamp.with_timezone(&Utc) < self.since {
            trace!(%commit_id, "commit older than lower bound");
            return Ok(None);
        }

        Ok(Some(CommitRecord {
            author_name: author.name.to_string(),
            author_timestamp,
        }))
    }
}

impl Iterator for HistoryWalk<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(commit_id) = self.stack.pop_back() {
            if !self.seen.insert(commit_id) {
                continue;
            }

            match self.visit(commit_id) {
                Ok(Some(record)) => {
                    self.progress.inc(1);
                    return Some(Ok(record));
                }
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    self.progress.abandon();
                    return Some(Err(err));
                }
            }
        }

        if !self.progress.is_finished() {
            debug!(visited = self.seen.len(), "history walk finished");
            self.progress.finish_and_clear();
        }
        None
    }
}

fn to_datetime(seconds: i64, offset: i32) -> Result<DateTime<FixedOffset>> {
    let tz = FixedOffset::east_opt(offset)
        .ok_or_else(|| GheatError::InvalidDate(format!("Invalid timezone offset: {offset}")))?;
    let utc = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| GheatError::InvalidDate(format!("Invalid timestamp: {seconds}")))?;
    Ok(utc.with_timezone(&tz))
}
