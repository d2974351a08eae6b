//! Project-wide progress over the whole chapter list.

use serde::Serialize;

use crate::cli::ProgressPolicy;
use crate::model::{Chapter, Workflow};
use crate::util::{percent_of, rounded_average};
use crate::workflow::{WorkflowStep, is_ready_for_review};

/// Independent per-stage tallies; one chapter can count towards all of them.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StageCounts {
    pub total: usize,
    pub drafted: usize,
    pub qaed: usize,
    pub reviewed: usize,
    pub complete: usize,
}

pub fn stage_counts(chapters: &[Chapter]) -> StageCounts {
    chapters.iter().map(|chapter| &chapter.workflow).fold(
        StageCounts {
            total: chapters.len(),
            ..StageCounts::default()
        },
        |mut counts, workflow| {
            counts.drafted += usize::from(workflow.is_step_done(WorkflowStep::Writing));
            counts.qaed += usize::from(workflow.is_step_done(WorkflowStep::AutomatedQa));
            counts.reviewed += usize::from(workflow.round_count() > 0);
            counts.complete += usize::from(workflow.completed);
            counts
        },
    )
}

/// Points for the furthest stage a chapter has reached.
pub fn stage_weight(workflow: &Workflow) -> u32 {
    if workflow.completed {
        100
    } else if workflow.round_count() > 0 {
        75
    } else if workflow.is_step_done(WorkflowStep::AutomatedQa) {
        50
    } else if workflow.is_step_done(WorkflowStep::Writing) {
        25
    } else {
        0
    }
}

/// Overall project percentage, 0 for an empty chapter list.
pub fn overall_percent(chapters: &[Chapter], policy: ProgressPolicy) -> u32 {
    match policy {
        ProgressPolicy::StageWeighted => {
            let points = chapters
                .iter()
                .map(|chapter| u64::from(stage_weight(&chapter.workflow)))
                .sum();
            rounded_average(points, chapters.len())
        }
        ProgressPolicy::CompletionOnly => {
            percent_of(stage_counts(chapters).complete, chapters.len())
        }
    }
}

/// First chapter in list order that is waiting on the editor.
pub fn select_actionable(chapters: &[Chapter]) -> Option<&Chapter> {
    chapters
        .iter()
        .find(|chapter| is_ready_for_review(&chapter.workflow))
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::workflow::fixtures::{with_rounds, workflow};

    fn any_chapter() -> impl Strategy<Value = Chapter> {
        (any::<[bool; 4]>(), 0usize..4, any::<bool>()).prop_map(|(steps, rounds, completed)| {
            let mut built = with_rounds(workflow(steps), &vec!["revise"; rounds], 3);
            built.completed = completed;
            Chapter {
                id: "x".to_string(),
                workflow: built,
                ..Chapter::default()
            }
        })
    }

    proptest! {
        #[test]
        fn counts_never_exceed_total(chapters in prop::collection::vec(any_chapter(), 0..12)) {
            let counts = stage_counts(&chapters);
            prop_assert_eq!(counts.total, chapters.len());
            for value in [counts.drafted, counts.qaed, counts.reviewed, counts.complete] {
                prop_assert!(value <= counts.total);
            }
        }

        #[test]
        fn adding_a_chapter_never_lowers_counts(
            chapters in prop::collection::vec(any_chapter(), 0..12),
            extra in any_chapter(),
        ) {
            let before = stage_counts(&chapters);
            let mut grown = chapters.clone();
            grown.push(extra);
            let after = stage_counts(&grown);

            prop_assert!(after.drafted >= before.drafted);
            prop_assert!(after.qaed >= before.qaed);
            prop_assert!(after.reviewed >= before.reviewed);
            prop_assert!(after.complete >= before.complete);
        }

        #[test]
        fn completing_a_chapter_never_lowers_progress(
            chapters in prop::collection::vec(any_chapter(), 1..12),
            index in any::<prop::sample::Index>(),
        ) {
            let target = index.index(chapters.len());
            let mut advanced = chapters.clone();
            advanced[target].workflow.completed = true;

            for policy in [ProgressPolicy::StageWeighted, ProgressPolicy::CompletionOnly] {
                let before = overall_percent(&chapters, policy);
                let after = overall_percent(&advanced, policy);
                prop_assert!(after >= before);
                prop_assert!(after <= 100);
            }
        }
    }
}
