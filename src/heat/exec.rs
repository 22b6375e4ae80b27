use super::{aggregate, grid_output, output_grid, output_json, output_ndjson, HeatGrid, Window};
use crate::cli::{CommonArgs, HeatArgs};
use crate::git::GitRepo;
use anyhow::Context;
use chrono::{Local, Utc};
use tracing::info;

pub fn exec(common: CommonArgs, args: HeatArgs) -> anyhow::Result<()> {
    let window = Window::new(Local::now(), args.month).context("Invalid lookback window")?;

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let author = if args.self_only {
        Some(
            repo.configured_author_name()
                .context("Failed to resolve author for --self")?,
        )
    } else if args.username.is_empty() {
        None
    } else {
        Some(args.username.clone())
    };

    let since = window.since().with_timezone(&Utc);
    info!(
        since = %since,
        start_day = %window.start_day(),
        author = author.as_deref().unwrap_or("*"),
        "collecting commits"
    );

    let history = repo
        .commits_since(since)
        .context("Failed to read commit history")?;
    let counts = aggregate(history, since, author.as_deref(), &Local)
        .context("Failed to read commit history")?;

    let grid = HeatGrid::layout(&counts, &window);

    if args.json {
        output_json(&grid_output(&grid, &window, repo.path(), author.as_deref()))?;
    } else if args.ndjson {
        output_ndjson(&grid)?;
    } else {
        output_grid(&grid, !common.no_color && console::colors_enabled())?;
    }

    Ok(())
}
