use std::io::{self, Write};

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ShowArgs;
use crate::commands::load_dashboard;
use crate::util::write_json_stdout;
use crate::view::{ChapterDetail, chapter_detail, find_chapter};

pub fn run(args: ShowArgs) -> Result<()> {
    let data = load_dashboard(&args.source)?;

    let Some(chapter) = find_chapter(&data.chapters, &args.id) else {
        bail!("no chapter with id {:?} in {}", args.id, args.source.data);
    };
    let detail = chapter_detail(chapter);

    info!(
        chapter = %detail.id,
        status = %detail.status.status,
        phase = detail.phase.as_str(),
        "chapter detail built"
    );

    if args.source.json {
        return write_json_stdout(&detail);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_text_detail(&mut output, &detail)?;
    output.flush()?;
    Ok(())
}

fn write_text_detail<W: Write>(output: &mut W, detail: &ChapterDetail) -> Result<()> {
    writeln!(output, "{} ({})", detail.title, detail.chapter_label)?;
    writeln!(
        output,
        "Status: {} ({}/{})  phase: {}",
        detail.status.status,
        detail.status.completed,
        detail.status.total,
        detail.phase.as_str()
    )?;

    writeln!(output)?;
    writeln!(
        output,
        "Workflow progress {}/{}",
        detail.steps_done, detail.steps_total
    )?;
    for step in &detail.steps {
        let mark = if step.done { "x" } else { " " };
        writeln!(output, "  [{mark}] {:<16} {}", step.label, step.when)?;
    }

    writeln!(output)?;
    writeln!(
        output,
        "Editorial review {}/{}",
        detail.rounds_done, detail.rounds_target
    )?;
    for round in &detail.rounds {
        match &round.review_date {
            Some(date) => writeln!(output, "  Round {}  {} ({date})", round.number, round.label)?,
            None => writeln!(output, "  Round {}  {}", round.number, round.label)?,
        }
    }

    writeln!(output)?;
    writeln!(
        output,
        "QA score: {} ({})",
        detail.qa_score,
        detail.qa_class.as_str()
    )?;
    if !detail.tags.is_empty() {
        writeln!(output, "Tags: {}", detail.tags.join(", "))?;
    }
    if let Some(link) = &detail.doc_link {
        writeln!(output, "Document: {link}")?;
    }
    if let Some(note) = &detail.note {
        writeln!(output, "Note to editor: \"{note}\"")?;
    }
    for warning in &detail.warnings {
        writeln!(output, "Warning: {warning}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cli::SourceArgs;
    use crate::model::Chapter;

    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn detail_text_covers_steps_rounds_and_warnings() {
        let chapter: Chapter = serde_json::from_str(
            r#"
            {
              "id": "ch-2", "title": "Steam", "part": "Part I", "number": 2, "qaScore": 68,
              "docLink": "https://docs.example.org/steam",
              "workflow": {
                "writing": { "done": true, "date": "2026-01-02" },
                "automatedQA": { "done": true, "date": "2026-01-03", "usedLoop": true },
                "automatedFixes": { "done": false },
                "manualQA": { "done": false },
                "editorial": { "rounds": [], "targetRounds": 2 },
                "completed": true
              }
            }
            "#,
        )
        .expect("fixture should deserialize");

        let mut buf = Vec::new();
        write_text_detail(&mut buf, &chapter_detail(&chapter)).expect("render to memory");
        let text = String::from_utf8(buf).expect("utf-8 output");

        assert!(text.starts_with("Steam (Chapter 2)\n"));
        assert!(text.contains("Status: automatedFixes (2/5)  phase: complete"));
        assert!(text.contains("Workflow progress 2/4"));
        assert!(text.contains("[x] Writing          Jan 2"));
        assert!(text.contains("[ ] Manual QA        Pending"));
        assert!(text.contains("Editorial review 0/2"));
        assert!(text.contains("Round 2  Pending"));
        assert!(text.contains("QA score: 68 (low)"));
        assert!(text.contains("Tags: QA Loop"));
        assert!(text.contains("Document: https://docs.example.org/steam"));
        assert!(text.contains("Warning: marked completed but automatedFixes is not done"));
    }

    #[test]
    fn show_logs_each_inconsistency_once() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "meta": {{}}, "chapters": [{{ "id": "ch-2", "title": "Steam",
                "workflow": {{ "writing": {{ "done": true }}, "completed": true }} }}] }}"#
        )
        .expect("write fixture");

        let log = SharedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            run(ShowArgs {
                source: SourceArgs {
                    data: file.path().display().to_string(),
                    json: true,
                },
                id: "ch-2".to_string(),
            })
        })
        .expect("show should succeed");

        let text = String::from_utf8(log.0.lock().expect("log buffer").clone()).expect("utf-8 log");
        assert_eq!(text.matches("marked completed but").count(), 1);
    }
}
