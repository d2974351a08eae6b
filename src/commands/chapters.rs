use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::cli::ChaptersArgs;
use crate::commands::load_dashboard;
use crate::util::write_json_stdout;
use crate::view::{ChapterRow, PartGroup, Segment, chapter_table};

pub fn run(args: ChaptersArgs) -> Result<()> {
    let data = load_dashboard(&args.source)?;
    let groups = chapter_table(&data.chapters);

    info!(
        chapters = data.chapters.len(),
        groups = groups.len(),
        needs_review = groups
            .iter()
            .flat_map(|group| &group.rows)
            .filter(|row| row.needs_review)
            .count(),
        "chapter table built"
    );

    if args.source.json {
        return write_json_stdout(&groups);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_text_table(&mut output, &groups)?;
    output.flush()?;
    Ok(())
}

fn write_text_table<W: Write>(output: &mut W, groups: &[PartGroup]) -> Result<()> {
    writeln!(
        output,
        "   {:>4}  {:<36} {:<4} WRT QA  FIX MAN  {:<8} {:<8} STATUS",
        "#", "TITLE", "DOC", "EDIT", "EDITED"
    )?;

    for group in groups {
        writeln!(output, "{}", group.part)?;
        for row in &group.rows {
            write_row(output, row)?;
        }
    }
    Ok(())
}

fn write_row<W: Write>(output: &mut W, row: &ChapterRow) -> Result<()> {
    let marker = if row.needs_review { "*" } else { " " };
    let doc = if row.doc_link.is_some() { "open" } else { "—" };
    let dots: Vec<&str> = row
        .steps
        .iter()
        .map(|dot| if dot.done { "●" } else { "○" })
        .collect();
    let segments: String = row
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Filled => '■',
            Segment::Current => '▣',
            Segment::Empty => '□',
        })
        .collect();
    let flag = if row.rounds_over_target { " (rounds over target)" } else { "" };

    writeln!(
        output,
        " {marker} {:>4}  {:<36} {:<4}  {}   {}   {}   {}   {:<8} {:<8} {} {}/{}{flag}",
        row.number,
        truncate(&row.title, 36),
        doc,
        dots[0],
        dots[1],
        dots[2],
        dots[3],
        segments,
        row.last_edited,
        row.status.status,
        row.status.completed,
        row.status.total,
    )?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut shortened: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Chapter;

    #[test]
    fn table_prints_part_headers_and_review_marker() {
        let chapters: Vec<Chapter> = serde_json::from_str(
            r#"
            [
              { "id": "1", "title": "Ice", "part": "Part I", "number": 1,
                "workflow": { "writing": { "done": true }, "automatedQA": { "done": true },
                              "automatedFixes": { "done": true }, "manualQA": { "done": true } } },
              { "id": "2", "title": "Steam", "part": "Part II", "workflow": {} }
            ]
            "#,
        )
        .expect("fixture should deserialize");

        let mut buf = Vec::new();
        write_text_table(&mut buf, &chapter_table(&chapters)).expect("render to memory");
        let text = String::from_utf8(buf).expect("utf-8 output");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Part I");
        assert!(lines[2].starts_with(" *    1  Ice"));
        assert!(lines[2].contains("▣□□"));
        assert!(lines[2].contains("editorial 4/5"));
        assert_eq!(lines[3], "Part II");
        assert!(lines[4].starts_with("      —  Steam"));
        assert!(lines[4].contains("writing 0/5"));
    }

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("Ice", 36), "Ice");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
