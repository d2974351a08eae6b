//! Per-chapter workflow evaluation.
//!
//! The workflow is a linear progression:
//! writing → automatedQA → automatedFixes → manualQA → editorial rounds → completed
//!
//! Everything here is a pure function of one [`Workflow`] record. Missing step
//! records count as not done and a missing editorial record counts as zero
//! rounds against the default target.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::{DEFAULT_TARGET_ROUNDS, EditorialRound, StepRecord, Workflow};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WorkflowStep {
    Writing,
    AutomatedQa,
    AutomatedFixes,
    ManualQa,
}

/// Canonical step order. The first step in this list that is not done is the
/// current step.
pub const WORKFLOW_STEPS: [WorkflowStep; 4] = [
    WorkflowStep::Writing,
    WorkflowStep::AutomatedQa,
    WorkflowStep::AutomatedFixes,
    WorkflowStep::ManualQa,
];

/// Ordered steps plus one slot for the editorial phase.
pub const TOTAL_SLOTS: usize = WORKFLOW_STEPS.len() + 1;

impl WorkflowStep {
    /// Key used for the step in the data file.
    pub fn key(self) -> &'static str {
        match self {
            Self::Writing => "writing",
            Self::AutomatedQa => "automatedQA",
            Self::AutomatedFixes => "automatedFixes",
            Self::ManualQa => "manualQA",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Self::Writing => "WRT",
            Self::AutomatedQa => "QA",
            Self::AutomatedFixes => "FIX",
            Self::ManualQa => "MAN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Writing => "Writing",
            Self::AutomatedQa => "Automated QA",
            Self::AutomatedFixes => "Automated Fixes",
            Self::ManualQa => "Manual QA",
        }
    }
}

impl Serialize for WorkflowStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl Workflow {
    pub fn step(&self, step: WorkflowStep) -> Option<&StepRecord> {
        match step {
            WorkflowStep::Writing => self.writing.as_ref(),
            WorkflowStep::AutomatedQa => self.automated_qa.as_ref().map(|qa| &qa.step),
            WorkflowStep::AutomatedFixes => self.automated_fixes.as_ref(),
            WorkflowStep::ManualQa => self.manual_qa.as_ref(),
        }
    }

    pub fn is_step_done(&self, step: WorkflowStep) -> bool {
        self.step(step).is_some_and(|record| record.done)
    }

    pub fn rounds(&self) -> &[EditorialRound] {
        self.editorial
            .as_ref()
            .map(|editorial| editorial.rounds.as_slice())
            .unwrap_or_default()
    }

    pub fn round_count(&self) -> usize {
        self.rounds().len()
    }

    pub fn target_rounds(&self) -> usize {
        self.editorial
            .as_ref()
            .map(|editorial| editorial.target_rounds)
            .unwrap_or(DEFAULT_TARGET_ROUNDS) as usize
    }

    pub fn used_qa_loop(&self) -> bool {
        self.automated_qa.as_ref().is_some_and(|qa| qa.used_loop)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StepProgress {
    pub done_count: usize,
    pub first_pending: Option<WorkflowStep>,
}

/// Scans the ordered steps, counting the done ones and remembering the first
/// one that is not done.
pub fn step_progress(workflow: &Workflow) -> StepProgress {
    let mut done_count = 0;
    let mut first_pending = None;

    for step in WORKFLOW_STEPS {
        if workflow.is_step_done(step) {
            done_count += 1;
        } else if first_pending.is_none() {
            first_pending = Some(step);
        }
    }

    StepProgress {
        done_count,
        first_pending,
    }
}

/// Coarse display bucket for a chapter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pending,
    Writing,
    Review,
    Complete,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Writing => "writing",
            Self::Review => "review",
            Self::Complete => "complete",
        }
    }
}

pub fn phase(workflow: &Workflow) -> Phase {
    if workflow.completed {
        Phase::Complete
    } else if workflow.round_count() > 0 {
        Phase::Review
    } else if workflow.is_step_done(WorkflowStep::Writing) {
        Phase::Writing
    } else {
        Phase::Pending
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatusTag {
    Step(WorkflowStep),
    Editorial,
    Complete,
}

impl StatusTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Step(step) => step.key(),
            Self::Editorial => "editorial",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WorkflowStatus {
    pub completed: usize,
    pub total: usize,
    /// `None` once the chapter is complete.
    pub current: Option<StatusTag>,
    pub status: StatusTag,
}

pub fn workflow_status(workflow: &Workflow) -> WorkflowStatus {
    let progress = step_progress(workflow);

    match progress.first_pending {
        Some(step) => WorkflowStatus {
            completed: progress.done_count,
            total: TOTAL_SLOTS,
            current: Some(StatusTag::Step(step)),
            status: StatusTag::Step(step),
        },
        None if editorial_target_met(workflow) || workflow.completed => WorkflowStatus {
            completed: TOTAL_SLOTS,
            total: TOTAL_SLOTS,
            current: None,
            status: StatusTag::Complete,
        },
        None => WorkflowStatus {
            completed: progress.done_count,
            total: TOTAL_SLOTS,
            current: Some(StatusTag::Editorial),
            status: StatusTag::Editorial,
        },
    }
}

/// Only an explicit editorial record can meet its target.
fn editorial_target_met(workflow: &Workflow) -> bool {
    workflow
        .editorial
        .as_ref()
        .is_some_and(|editorial| editorial.rounds.len() >= editorial.target_rounds as usize)
}

/// Manual QA done and not yet marked complete, however many rounds have run.
pub fn is_ready_for_review(workflow: &Workflow) -> bool {
    workflow.is_step_done(WorkflowStep::ManualQa) && !workflow.completed
}

/// Round number the editor would be working on next.
pub fn next_round_number(workflow: &Workflow) -> usize {
    workflow.round_count() + 1
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RoundState {
    Done {
        approved: bool,
        review_date: Option<String>,
    },
    Current,
    Pending,
}

/// Targets above this are treated as data-entry mistakes when laying out
/// round slots.
pub const MAX_ROUND_SLOTS: usize = 12;

/// One entry per target round, extended so that rounds past the target are
/// still listed. The round after the last done one is `Current` while the
/// chapter is ready for review. Pending slots stop at [`MAX_ROUND_SLOTS`].
pub fn round_states(workflow: &Workflow) -> Vec<RoundState> {
    let rounds = workflow.rounds();
    let slots = workflow
        .target_rounds()
        .min(MAX_ROUND_SLOTS)
        .max(rounds.len());
    let ready = is_ready_for_review(workflow);

    (0..slots)
        .map(|index| match rounds.get(index) {
            Some(round) => RoundState::Done {
                approved: round.is_approved(),
                review_date: round.review_date.clone(),
            },
            None if ready && index == rounds.len() => RoundState::Current,
            None => RoundState::Pending,
        })
        .collect()
}

/// Record shapes the workflow rules tolerate but that indicate stale or
/// hand-edited data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Inconsistency {
    CompletedWithPendingStep(WorkflowStep),
    RoundsOverTarget { rounds: usize, target: usize },
    TargetRoundsImplausible { target: usize },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletedWithPendingStep(step) => {
                write!(f, "marked completed but {} is not done", step.key())
            }
            Self::RoundsOverTarget { rounds, target } => {
                write!(f, "{rounds} editorial rounds recorded against a target of {target}")
            }
            Self::TargetRoundsImplausible { target } => {
                write!(f, "editorial target of {target} rounds exceeds {MAX_ROUND_SLOTS}")
            }
        }
    }
}

pub fn inconsistencies(workflow: &Workflow) -> Vec<Inconsistency> {
    let mut found = Vec::new();

    if workflow.completed {
        if let Some(step) = step_progress(workflow).first_pending {
            found.push(Inconsistency::CompletedWithPendingStep(step));
        }
    }

    let rounds = workflow.round_count();
    let target = workflow.target_rounds();
    if rounds > target {
        found.push(Inconsistency::RoundsOverTarget { rounds, target });
    }
    if target > MAX_ROUND_SLOTS {
        found.push(Inconsistency::TargetRoundsImplausible { target });
    }

    found
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Editorial, EditorialRound, QaStepRecord, StepRecord, Workflow};

    fn step(done: bool) -> Option<StepRecord> {
        Some(StepRecord { done, date: None })
    }

    /// Workflow with the given step flags, in canonical order.
    pub fn workflow(steps: [bool; 4]) -> Workflow {
        Workflow {
            writing: step(steps[0]),
            automated_qa: Some(QaStepRecord {
                step: StepRecord {
                    done: steps[1],
                    date: None,
                },
                used_loop: false,
            }),
            automated_fixes: step(steps[2]),
            manual_qa: step(steps[3]),
            editorial: None,
            completed: false,
        }
    }

    pub fn with_rounds(mut workflow: Workflow, outcomes: &[&str], target: u32) -> Workflow {
        workflow.editorial = Some(Editorial {
            rounds: outcomes
                .iter()
                .map(|outcome| EditorialRound {
                    outcome: Some((*outcome).to_string()),
                    review_date: Some("2026-02-01".to_string()),
                })
                .collect(),
            target_rounds: target,
        });
        workflow
    }
}
