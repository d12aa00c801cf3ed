//! These structs provide the CLI interface for the tally CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

const CATEGORIES_JSON: &str = "categories.json";
const HISTORY_JSON: &str = "history.json";
const OUTPUTS: &str = "outputs";

/// tally: categorize a month of bank transactions and compare your spending
/// against your running average.
///
/// The program reads one or more transaction CSV exports for a month,
/// resolves each row to one of your internal budget categories (asking you
/// about rows it cannot resolve, and optionally remembering your answer),
/// writes the month's totals and line items to a JSON report, folds the
/// month into a running multi-month history, and renders a chart comparing
/// the month against your per-category averages.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Categorize a month's transaction export(s) and update the history.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where tally data is held. Defaults to ~/tally
    #[arg(long, env = "TALLY_HOME", default_value_t = default_tally_home())]
    tally_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, tally_home: PathBuf) -> Self {
        Self {
            log_level,
            tally_home: tally_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn tally_home(&self) -> &DisplayPath {
        &self.tally_home
    }
}

/// Args for the `tally report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Transaction CSV file(s) for one month. Each file name must begin with
    /// a date in YYYY-MM-DD or YYYY-MM form; the first file names the month.
    /// Files are processed in the order given and share one classification
    /// session, so a rule learned in the first file applies to the rest.
    #[arg(required = true, value_name = "MONTH_CSV")]
    month_csvs: Vec<PathBuf>,

    /// The category store file. Defaults to <TALLY_HOME>/categories.json
    #[arg(long)]
    categories: Option<PathBuf>,

    /// The history file. Defaults to <TALLY_HOME>/history.json
    #[arg(long)]
    history: Option<PathBuf>,

    /// The directory where the month report and chart are written.
    /// Defaults to <TALLY_HOME>/outputs
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip rendering the comparison chart.
    #[arg(long)]
    no_chart: bool,
}

impl ReportArgs {
    pub fn new(
        month_csvs: Vec<PathBuf>,
        categories: Option<PathBuf>,
        history: Option<PathBuf>,
        out_dir: Option<PathBuf>,
        no_chart: bool,
    ) -> Self {
        Self {
            month_csvs,
            categories,
            history,
            out_dir,
            no_chart,
        }
    }

    pub fn month_csvs(&self) -> &[PathBuf] {
        &self.month_csvs
    }

    pub fn categories_path(&self, home: &Path) -> PathBuf {
        self.categories
            .clone()
            .unwrap_or_else(|| home.join(CATEGORIES_JSON))
    }

    pub fn history_path(&self, home: &Path) -> PathBuf {
        self.history
            .clone()
            .unwrap_or_else(|| home.join(HISTORY_JSON))
    }

    pub fn out_dir(&self, home: &Path) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| home.join(OUTPUTS))
    }

    pub fn no_chart(&self) -> bool {
        self.no_chart
    }
}

fn default_tally_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("tally"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --tally-home or TALLY_HOME instead of relying on the default \
                tally home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("tally")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
