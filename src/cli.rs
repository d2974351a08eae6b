use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "chapterdash",
    version,
    about = "Chapter workflow dashboard for the book project"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Overall progress, per-stage counts and the chapter waiting on the editor.
    Status(StatusArgs),
    /// Condensed chapter table grouped by part.
    Chapters(ChaptersArgs),
    /// Detail panel for one chapter.
    Show(ShowArgs),
    /// The chapter currently ready for editorial review, if any.
    Editor(EditorArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path or http(s) URL of the dashboard document.
    #[arg(long, env = "CHAPTERDASH_DATA", default_value = "data.json")]
    pub data: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProgressPolicy {
    /// Average of 0/25/50/75/100 points per chapter by furthest stage.
    StageWeighted,
    /// Share of chapters marked completed.
    CompletionOnly,
}

impl ProgressPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StageWeighted => "stage-weighted",
            Self::CompletionOnly => "completion-only",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = ProgressPolicy::StageWeighted)]
    pub progress_policy: ProgressPolicy,
}

#[derive(Args, Debug, Clone)]
pub struct ChaptersArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Chapter id as written in the data file.
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct EditorArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
