use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::cli::StatusArgs;
use crate::commands::editor::write_editor_section;
use crate::commands::load_dashboard;
use crate::util::write_json_stdout;
use crate::view::{EditorSection, ProjectStatusView, editor_section, project_status};

#[derive(Debug, Serialize)]
struct StatusResponse {
    project: ProjectStatusView,
    editor: EditorSection,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let data = load_dashboard(&args.source)?;

    let response = StatusResponse {
        project: project_status(&data, args.progress_policy),
        editor: editor_section(&data),
    };

    info!(
        chapters = response.project.counts.total,
        drafted = response.project.counts.drafted,
        qaed = response.project.counts.qaed,
        reviewed = response.project.counts.reviewed,
        complete = response.project.counts.complete,
        overall_percent = response.project.overall_percent,
        policy = response.project.progress_policy,
        "project status computed"
    );

    if args.source.json {
        return write_json_stdout(&response);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_text_response(&mut output, &response)?;
    output.flush()?;
    Ok(())
}

fn write_text_response<W: Write>(output: &mut W, response: &StatusResponse) -> Result<()> {
    let project = &response.project;

    writeln!(output, "Last updated: {}", project.last_updated)?;
    writeln!(
        output,
        "Overall progress: {}% ({})",
        project.overall_percent, project.progress_policy
    )?;
    for pie in &project.stages {
        writeln!(
            output,
            "  {:<9} {:>3}%  {} of {}",
            pie.label, pie.percent, pie.value, pie.total
        )?;
    }
    writeln!(output)?;
    write_editor_section(output, &response.editor)
}
