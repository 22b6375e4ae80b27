use crate::model::{CalendarDay, CommitRecord, DayCommitCounts};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, trace};

/// Count commits per day as seen in `local`.
///
/// Records older than `since` are skipped. An empty or `None` author filter
/// counts every author; otherwise the name must match exactly. The first
/// error produced by `commits` stops the count and is returned unchanged.
pub fn aggregate<I, E, L>(
    commits: I,
    since: DateTime<Utc>,
    author: Option<&str>,
    local: &L,
) -> Result<DayCommitCounts, E>
where
    I: IntoIterator<Item = Result<CommitRecord, E>>,
    L: TimeZone,
{
    let author = author.filter(|name| !name.is_empty());
    let mut counts = DayCommitCounts::new();
    let mut skipped = 0usize;

    for record in commits {
        let record = record?;

        if let Some(name) = author {
            if record.author_name != name {
                skipped += 1;
                continue;
            }
        }

        if record.author_timestamp.with_timezone(&Utc) < since {
            trace!(timestamp = %record.author_timestamp, "skipping commit before window");
            skipped += 1;
            continue;
        }

        counts.record(CalendarDay::of(&record.author_timestamp, local));
    }

    debug!(
        days = counts.len(),
        commits = counts.total(),
        skipped,
        "aggregated commit history"
    );
    Ok(counts)
}
