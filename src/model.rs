use std::fmt;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_TARGET_ROUNDS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    pub meta: Meta,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub last_updated: Option<String>,
    pub editor_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part: String,
    pub number: Option<ChapterNumber>,
    pub doc_link: Option<String>,
    pub qa_score: Option<f64>,
    pub note_to_editor: Option<String>,
    pub last_edited: Option<String>,
    pub adversarial: Option<Adversarial>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow: Workflow,
}

impl Chapter {
    /// Number to display, treating `0` and `""` as unnumbered.
    pub fn display_number(&self) -> Option<&ChapterNumber> {
        self.number.as_ref().filter(|number| match number {
            ChapterNumber::Int(value) => *value != 0,
            ChapterNumber::Text(value) => !value.is_empty(),
        })
    }
}

/// Chapter numbers show up both as `3` and `"3a"` in the data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChapterNumber {
    Int(u64),
    Text(String),
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adversarial {
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_run: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workflow {
    pub writing: Option<StepRecord>,
    #[serde(rename = "automatedQA")]
    pub automated_qa: Option<QaStepRecord>,
    #[serde(rename = "automatedFixes")]
    pub automated_fixes: Option<StepRecord>,
    #[serde(rename = "manualQA")]
    pub manual_qa: Option<StepRecord>,
    pub editorial: Option<Editorial>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaStepRecord {
    #[serde(flatten)]
    pub step: StepRecord,
    #[serde(default, deserialize_with = "null_as_default")]
    pub used_loop: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Editorial {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rounds: Vec<EditorialRound>,
    #[serde(default = "default_target_rounds", deserialize_with = "null_as_target_rounds")]
    pub target_rounds: u32,
}

fn default_target_rounds() -> u32 {
    DEFAULT_TARGET_ROUNDS
}

/// Explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_target_rounds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(DEFAULT_TARGET_ROUNDS))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorialRound {
    pub outcome: Option<String>,
    pub review_date: Option<String>,
}

impl EditorialRound {
    pub fn is_approved(&self) -> bool {
        self.outcome.as_deref() == Some("approved")
    }
}
