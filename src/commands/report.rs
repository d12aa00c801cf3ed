//! The report command: ingest a month of transaction exports, categorize
//! them, persist what was learned, merge the month into the history and
//! render the comparison chart.

use crate::aggregate::Session;
use crate::args::ReportArgs;
use crate::chart;
use crate::commands::Out;
use crate::history::History;
use crate::model::{MonthKey, Record};
use crate::resolve::Resolve;
use crate::store::CategoryStore;
use crate::{utils, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What the report run did, for the command output.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub month: String,
    pub files: usize,
    pub aggregated: usize,
    pub skipped: usize,
    pub learned: usize,
    pub output_path: PathBuf,
    pub chart_path: Option<PathBuf>,
}

pub fn report<R: Resolve>(
    home: &Path,
    args: &ReportArgs,
    resolver: R,
) -> Result<Out<ReportSummary>> {
    // Every input file name must carry a date prefix; this is checked before
    // any file content is read. The first file names the month.
    let months = args
        .month_csvs()
        .iter()
        .map(|path| MonthKey::from_filename(path))
        .collect::<Result<Vec<_>>>()?;
    let month = *months
        .first()
        .context("At least one transaction file is required")?;

    let categories_path = args.categories_path(home);
    let store = CategoryStore::load(&categories_path)?;
    info!(
        "Categorizing {} file(s) for {month} against {} categories",
        args.month_csvs().len(),
        store.taxonomy().len()
    );

    let mut session = Session::new(store, resolver);
    for path in args.month_csvs() {
        let records = Record::read_file(path)?;
        debug!("Read {} record(s) from {}", records.len(), path.display());
        session.ingest(records)?;
    }
    let (aggregated, skipped, learned) =
        (session.aggregated(), session.skipped(), session.learned());
    let (report, store) = session.finish();

    // All classification is done; this is the single store write of the run.
    store.save(&categories_path)?;
    if learned > 0 {
        info!("Saved {learned} learned rule(s) to {}", categories_path.display());
    }

    let out_dir = args.out_dir(home);
    utils::create_dir_all(&out_dir)?;
    let output_path = out_dir.join(format!("{}-output.json", month.label()));
    let data =
        serde_json::to_string_pretty(&report).context("Unable to serialize the month report")?;
    utils::write(&output_path, data)?;
    info!("Wrote {}", output_path.display());

    let history_path = args.history_path(home);
    let mut history = History::load(&history_path)?;
    let averages = history.merge(&month, report.totals.clone())?.clone();
    history.save(&history_path)?;
    debug!(
        "History now spans {} month(s) at {}",
        history.months().len(),
        history_path.display()
    );

    let chart_path = if args.no_chart() {
        None
    } else {
        let path = out_dir.join(format!("{}.svg", month.label()));
        let document = chart::comparison(&report.totals, &averages, &month.label());
        chart::save(&document, &path)?;
        info!("Wrote {}", path.display());
        Some(path)
    };

    let summary = ReportSummary {
        month: month.label(),
        files: args.month_csvs().len(),
        aggregated,
        skipped,
        learned,
        output_path,
        chart_path,
    };
    Ok(Out::new(
        format!(
            "Categorized {aggregated} transaction(s) from {} file(s) for {}",
            summary.files, summary.month
        ),
        summary,
    ))
}
