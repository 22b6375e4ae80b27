use super::grid::{weekday_abbreviation, HeatGrid, Window, WEEKDAYS};
use crate::model::{ColorBucket, GridDay, GridOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::{TimeZone, Utc, Weekday};
use console::Style;
use std::io::{self, Write};
use std::path::Path;

/// Width of the weekday label gutter.
pub const LABEL_WIDTH: usize = 4;
/// Width of one day cell.
pub const CELL_WIDTH: usize = 3;
/// Largest count that fits in a cell; anything above is clipped.
pub const MAX_CELL_COUNT: u32 = 999;

pub fn bucket_style(bucket: ColorBucket) -> Style {
    match bucket {
        ColorBucket::None => Style::new().on_white(),
        ColorBucket::Low => Style::new().on_cyan().on_bright().bold(),
        ColorBucket::Medium => Style::new().on_cyan().bold(),
        ColorBucket::High => Style::new().on_green().on_bright().bold(),
        ColorBucket::Max => Style::new().on_green().bold(),
    }
}

fn weekday_label(weekday: Weekday) -> String {
    match weekday {
        Weekday::Mon | Weekday::Wed | Weekday::Fri => {
            format!("{:<width$}", weekday_abbreviation(weekday), width = LABEL_WIDTH)
        }
        _ => " ".repeat(LABEL_WIDTH),
    }
}

/// Write the month header and the seven weekday rows.
pub fn render_grid<W: Write>(out: &mut W, grid: &HeatGrid, colors: bool) -> io::Result<()> {
    write!(out, "{}", " ".repeat(LABEL_WIDTH))?;
    for label in grid.month_labels() {
        match label {
            Some(month) => write!(out, "{:<width$}", month, width = CELL_WIDTH)?,
            None => write!(out, "{}", " ".repeat(CELL_WIDTH))?,
        }
    }
    writeln!(out)?;

    for (&weekday, row) in WEEKDAYS.iter().zip(grid.rows()) {
        write!(out, "{}", weekday_label(weekday))?;

        for cell in row {
            match cell {
                Some(cell) => {
                    let text = format!(
                        "{:>width$}",
                        cell.count.min(MAX_CELL_COUNT),
                        width = CELL_WIDTH
                    );
                    let style = bucket_style(cell.bucket).force_styling(colors);
                    write!(out, "{}", style.apply_to(text))?;
                }
                None => write!(out, "{}", " ".repeat(CELL_WIDTH))?,
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

pub fn output_grid(grid: &HeatGrid, colors: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_grid(&mut out, grid, colors)?;
    out.flush()?;
    Ok(())
}

pub fn grid_days(grid: &HeatGrid) -> Vec<GridDay> {
    grid.days()
        .map(|cell| GridDay {
            date: cell.day,
            weekday: weekday_abbreviation(cell.weekday).to_string(),
            commit_count: cell.count,
            level: cell.bucket.level(),
        })
        .collect()
}

pub fn grid_output<Tz: TimeZone>(
    grid: &HeatGrid,
    window: &Window<Tz>,
    repository_path: &Path,
    author: Option<&str>,
) -> GridOutput {
    let days = grid_days(grid);
    GridOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string_lossy().to_string(),
        author: author.filter(|a| !a.is_empty()).map(str::to_string),
        months: window.months(),
        since: window.since().fixed_offset(),
        start_day: grid.start_day(),
        today: grid.today(),
        weeks: grid.weeks(),
        total_commits: days.iter().map(|d| u64::from(d.commit_count)).sum(),
        days,
    }
}

pub fn output_json(output: &GridOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_ndjson(grid: &HeatGrid) -> Result<()> {
    for day in grid_days(grid) {
        println!("{}", serde_json::to_string(&day)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CalendarDay, DayCommitCounts};
    use chrono::{FixedOffset, NaiveDate};
    use pretty_assertions::assert_eq;

    fn window() -> Window<FixedOffset> {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .unwrap();
        Window::new(now, 1).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn render_plain(counts: &DayCommitCounts) -> String {
        let grid = HeatGrid::layout(counts, &window());
        let mut out = Vec::new();
        render_grid(&mut out, &grid, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_grid_for_empty_history() {
        let rendered = render_plain(&DayCommitCounts::new());
        let expected = [
            "    Feb      Mar   ",
            "      0  0  0  0  0",
            "Mon   0  0  0  0  0",
            "      0  0  0  0  0",
            "Wed   0  0  0  0  0",
            "      0  0  0  0  0",
            "Fri   0  0  0  0  0",
            "      0  0  0  0   ",
        ]
        .join("\n")
            + "\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn counts_land_in_their_cells() {
        let mut counts = DayCommitCounts::new();
        counts.record(day(2024, 2, 12));
        for _ in 0..12 {
            counts.record(day(2024, 3, 6));
        }
        let rendered = render_plain(&counts);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "Mon   1  0  0  0  0");
        assert_eq!(lines[4], "Wed   0  0  0 12  0");
    }

    #[test]
    fn oversized_counts_are_clipped() {
        let mut counts = DayCommitCounts::new();
        for _ in 0..1200 {
            counts.record(day(2024, 2, 11));
        }
        let rendered = render_plain(&counts);
        assert_eq!(rendered.lines().nth(1), Some("    999  0  0  0  0"));
    }

    #[test]
    fn header_and_rows_share_width() {
        let rendered = render_plain(&DayCommitCounts::new());
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == LABEL_WIDTH + 5 * CELL_WIDTH));
    }

    #[test]
    fn colored_cells_use_ansi_backgrounds() {
        let mut counts = DayCommitCounts::new();
        counts.record(day(2024, 2, 12));
        let grid = HeatGrid::layout(&counts, &window());
        let mut out = Vec::new();
        render_grid(&mut out, &grid, true).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("\u{1b}["));
        assert_eq!(console::strip_ansi_codes(&rendered), render_plain(&counts));
    }

    #[test]
    fn json_output_lists_every_day() {
        let mut counts = DayCommitCounts::new();
        counts.record(day(2024, 2, 12));
        counts.record(day(2024, 2, 12));
        let window = window();
        let grid = HeatGrid::layout(&counts, &window);
        let output = grid_output(&grid, &window, Path::new("/tmp/repo"), Some("alice"));

        assert_eq!(output.weeks, 5);
        assert_eq!(output.days.len(), 34);
        assert_eq!(output.total_commits, 2);
        assert_eq!(output.author.as_deref(), Some("alice"));

        let monday = &output.days[1];
        assert_eq!(monday.date, day(2024, 2, 12));
        assert_eq!(monday.weekday, "Mon");
        assert_eq!(monday.commit_count, 2);
        assert_eq!(monday.level, 2);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["start_day"], "2024-02-11");
        assert_eq!(json["today"], "2024-03-15");
    }
}
