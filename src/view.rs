//! Immutable view-model derived from one loaded document.
//!
//! Commands build these values fresh on every invocation and hand them to a
//! text or JSON renderer; nothing here is cached between loads.

use serde::Serialize;
use tracing::warn;

use crate::aggregate::{StageCounts, overall_percent, select_actionable, stage_counts};
use crate::cli::ProgressPolicy;
use crate::model::{Chapter, DashboardData};
use crate::util::{EMPTY_CELL, format_long_date, format_score, format_short_date, percent_of};
use crate::workflow::{
    Inconsistency, Phase, RoundState, WORKFLOW_STEPS, WorkflowStatus, WorkflowStep,
    inconsistencies, is_ready_for_review, next_round_number, phase, round_states, step_progress,
    workflow_status,
};

const DEFAULT_EDITOR_NAME: &str = "Editor";

#[derive(Debug, Clone, Serialize)]
pub struct StagePie {
    pub label: &'static str,
    pub value: usize,
    pub total: usize,
    pub percent: u32,
}

impl StagePie {
    fn new(label: &'static str, value: usize, total: usize) -> Self {
        Self {
            label,
            value,
            total,
            percent: percent_of(value, total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatusView {
    pub last_updated: String,
    pub progress_policy: &'static str,
    pub overall_percent: u32,
    pub counts: StageCounts,
    pub stages: Vec<StagePie>,
}

pub fn project_status(data: &DashboardData, policy: ProgressPolicy) -> ProjectStatusView {
    let counts = stage_counts(&data.chapters);

    ProjectStatusView {
        last_updated: format_long_date(data.meta.last_updated.as_deref()),
        progress_policy: policy.as_str(),
        overall_percent: overall_percent(&data.chapters, policy),
        counts,
        stages: vec![
            StagePie::new("Drafted", counts.drafted, counts.total),
            StagePie::new("QA'd", counts.qaed, counts.total),
            StagePie::new("Reviewed", counts.reviewed, counts.total),
            StagePie::new("Complete", counts.complete, counts.total),
        ],
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorCard {
    pub chapter_id: String,
    pub title: String,
    pub chapter_label: String,
    pub round: usize,
    pub note: Option<String>,
    pub doc_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorSelection {
    Ready(EditorCard),
    NoneReady,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorSection {
    pub editor_name: String,
    pub selection: EditorSelection,
}

pub fn editor_section(data: &DashboardData) -> EditorSection {
    let editor_name = data
        .meta
        .editor_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR_NAME.to_string());

    let selection = match select_actionable(&data.chapters) {
        Some(chapter) => EditorSelection::Ready(EditorCard {
            chapter_id: chapter.id.clone(),
            title: chapter.title.clone(),
            chapter_label: chapter_label(chapter),
            round: next_round_number(&chapter.workflow),
            note: chapter.note_to_editor.clone(),
            doc_link: chapter.doc_link.clone(),
        }),
        None => EditorSelection::NoneReady,
    };

    EditorSection {
        editor_name,
        selection,
    }
}

/// `Chapter N`, or the part name for unnumbered front and back matter.
fn chapter_label(chapter: &Chapter) -> String {
    match chapter.display_number() {
        Some(number) => format!("Chapter {number}"),
        None => chapter.part.clone(),
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Filled,
    Current,
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepDot {
    pub step: WorkflowStep,
    pub short_label: &'static str,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterRow {
    pub id: String,
    pub number: String,
    pub title: String,
    pub doc_link: Option<String>,
    pub steps: Vec<StepDot>,
    pub segments: Vec<Segment>,
    pub last_edited: String,
    pub needs_review: bool,
    pub phase: Phase,
    pub status: WorkflowStatus,
    pub rounds_over_target: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartGroup {
    pub part: String,
    pub rows: Vec<ChapterRow>,
}

/// Rows grouped by part; a new group starts whenever the part changes from
/// the previous chapter, so list order is preserved.
pub fn chapter_table(chapters: &[Chapter]) -> Vec<PartGroup> {
    let mut groups: Vec<PartGroup> = Vec::new();

    for chapter in chapters {
        let row = chapter_row(chapter);
        match groups.last_mut() {
            Some(group) if group.part == chapter.part => group.rows.push(row),
            _ => groups.push(PartGroup {
                part: chapter.part.clone(),
                rows: vec![row],
            }),
        }
    }

    groups
}

pub fn chapter_row(chapter: &Chapter) -> ChapterRow {
    let workflow = &chapter.workflow;

    ChapterRow {
        id: chapter.id.clone(),
        number: chapter
            .display_number()
            .map(ToString::to_string)
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        title: chapter.title.clone(),
        doc_link: chapter.doc_link.clone(),
        steps: WORKFLOW_STEPS
            .iter()
            .map(|&step| StepDot {
                step,
                short_label: step.short_label(),
                done: workflow.is_step_done(step),
            })
            .collect(),
        segments: round_states(workflow)
            .iter()
            .map(|state| match state {
                RoundState::Done { .. } => Segment::Filled,
                RoundState::Current => Segment::Current,
                RoundState::Pending => Segment::Empty,
            })
            .collect(),
        last_edited: format_short_date(chapter.last_edited.as_deref()),
        needs_review: is_ready_for_review(workflow),
        phase: phase(workflow),
        status: workflow_status(workflow),
        rounds_over_target: workflow.round_count() > workflow.target_rounds(),
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreClass {
    None,
    High,
    Medium,
    Low,
}

impl ScoreClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

pub fn score_class(score: Option<f64>) -> ScoreClass {
    match score {
        None => ScoreClass::None,
        Some(value) if value >= 90.0 => ScoreClass::High,
        Some(value) if value >= 75.0 => ScoreClass::Medium,
        Some(_) => ScoreClass::Low,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepDetail {
    pub step: WorkflowStep,
    pub label: &'static str,
    pub done: bool,
    /// Short date when done, `Pending` otherwise.
    pub when: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundDetail {
    pub number: usize,
    pub state: Segment,
    pub label: &'static str,
    pub review_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterDetail {
    pub id: String,
    pub title: String,
    pub chapter_label: String,
    pub phase: Phase,
    pub status: WorkflowStatus,
    pub steps_done: usize,
    pub steps_total: usize,
    pub steps: Vec<StepDetail>,
    pub rounds_done: usize,
    pub rounds_target: usize,
    pub rounds: Vec<RoundDetail>,
    pub qa_score: String,
    pub qa_class: ScoreClass,
    pub tags: Vec<&'static str>,
    pub note: Option<String>,
    pub doc_link: Option<String>,
    pub warnings: Vec<String>,
}

pub fn chapter_detail(chapter: &Chapter) -> ChapterDetail {
    let workflow = &chapter.workflow;

    let steps = WORKFLOW_STEPS
        .iter()
        .map(|&step| {
            let done = workflow.is_step_done(step);
            let when = if done {
                format_short_date(workflow.step(step).and_then(|record| record.date.as_deref()))
            } else {
                "Pending".to_string()
            };
            StepDetail {
                step,
                label: step.label(),
                done,
                when,
            }
        })
        .collect();

    let rounds = round_states(workflow)
        .into_iter()
        .enumerate()
        .map(|(index, state)| match state {
            RoundState::Done {
                approved,
                review_date,
            } => RoundDetail {
                number: index + 1,
                state: Segment::Filled,
                label: if approved { "Approved" } else { "Reviewed" },
                review_date: Some(format_short_date(review_date.as_deref())),
            },
            RoundState::Current => RoundDetail {
                number: index + 1,
                state: Segment::Current,
                label: "Awaiting review",
                review_date: None,
            },
            RoundState::Pending => RoundDetail {
                number: index + 1,
                state: Segment::Empty,
                label: "Pending",
                review_date: None,
            },
        })
        .collect();

    let mut tags = Vec::new();
    if workflow.used_qa_loop() {
        tags.push("QA Loop");
    }
    if chapter.adversarial.as_ref().is_some_and(|marker| marker.has_run) {
        tags.push("Adversarial");
    }

    ChapterDetail {
        id: chapter.id.clone(),
        title: chapter.title.clone(),
        chapter_label: chapter_label(chapter),
        phase: phase(workflow),
        status: workflow_status(workflow),
        steps_done: step_progress(workflow).done_count,
        steps_total: WORKFLOW_STEPS.len(),
        steps,
        rounds_done: workflow.round_count(),
        rounds_target: workflow.target_rounds(),
        rounds,
        qa_score: chapter
            .qa_score
            .map(format_score)
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        qa_class: score_class(chapter.qa_score),
        tags,
        note: chapter.note_to_editor.clone(),
        doc_link: chapter.doc_link.clone(),
        warnings: inconsistencies(workflow)
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}

pub fn find_chapter<'a>(chapters: &'a [Chapter], id: &str) -> Option<&'a Chapter> {
    chapters.iter().find(|chapter| chapter.id == id)
}

/// Logs every tolerated data inconsistency once per load and returns how many
/// were found.
pub fn report_inconsistencies(chapters: &[Chapter]) -> usize {
    let mut count = 0;
    for chapter in chapters {
        for issue in inconsistencies(&chapter.workflow) {
            match &issue {
                Inconsistency::CompletedWithPendingStep(step) => warn!(
                    chapter = %chapter.id,
                    step = step.key(),
                    "{issue}"
                ),
                Inconsistency::RoundsOverTarget { rounds, target } => warn!(
                    chapter = %chapter.id,
                    rounds = *rounds,
                    target = *target,
                    "{issue}"
                ),
                Inconsistency::TargetRoundsImplausible { target } => warn!(
                    chapter = %chapter.id,
                    target = *target,
                    "{issue}"
                ),
            }
            count += 1;
        }
    }
    count
}
