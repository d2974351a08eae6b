use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::cli::EditorArgs;
use crate::commands::load_dashboard;
use crate::util::write_json_stdout;
use crate::view::{EditorSection, EditorSelection, editor_section};

pub fn run(args: EditorArgs) -> Result<()> {
    let data = load_dashboard(&args.source)?;
    let section = editor_section(&data);

    info!(
        ready = matches!(section.selection, EditorSelection::Ready(_)),
        "editor section built"
    );

    if args.source.json {
        return write_json_stdout(&section);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_editor_section(&mut output, &section)?;
    output.flush()?;
    Ok(())
}

pub(crate) fn write_editor_section<W: Write>(output: &mut W, section: &EditorSection) -> Result<()> {
    writeln!(output, "Ready for {}", section.editor_name)?;

    let card = match &section.selection {
        EditorSelection::Ready(card) => card,
        EditorSelection::NoneReady => {
            writeln!(output, "  No chapters ready for review")?;
            return Ok(());
        }
    };

    writeln!(output, "  {} ({})  Round {}", card.title, card.chapter_label, card.round)?;
    if let Some(note) = &card.note {
        writeln!(output, "  Note from author: \"{note}\"")?;
    }
    if let Some(link) = &card.doc_link {
        writeln!(output, "  Document: {link}")?;
    }
    Ok(())
}
