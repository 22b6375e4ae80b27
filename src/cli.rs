use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gheat")]
#[command(about = "Calendar heatmap of commit activity, one column per week")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub heat: HeatArgs,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Disable colored cells")]
    pub no_color: bool,
}

#[derive(Args, Clone, Debug)]
pub struct HeatArgs {
    #[arg(
        long,
        default_value_t = 6,
        allow_negative_numbers = true,
        help = "Since how many months ago"
    )]
    pub month: i64,

    #[arg(
        long,
        default_value = "",
        help = "Count commits by this author name only (exact match). Counts every author if empty"
    )]
    pub username: String,

    #[arg(
        long = "self",
        help = "Count only commits by the configured user.name. Overrides --username"
    )]
    pub self_only: bool,

    #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON, one object per day")]
    pub ndjson: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::heat::exec(self.common, self.heat)
    }
}
