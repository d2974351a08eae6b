pub mod chapters;
pub mod editor;
pub mod show;
pub mod status;

use anyhow::Result;
use tracing::info;

use crate::cli::SourceArgs;
use crate::model::DashboardData;
use crate::source::{self, DataSource};
use crate::view::report_inconsistencies;

/// Loads the document for one command run. Output is only written after this
/// returns, so a failed load never leaves a partial dashboard behind.
fn load_dashboard(args: &SourceArgs) -> Result<DashboardData> {
    let data = source::load(&DataSource::parse(&args.data))?;

    let issues = report_inconsistencies(&data.chapters);
    if issues > 0 {
        info!(issues, "data inconsistencies tolerated");
    }

    Ok(data)
}
