//! Export and import commands.

use crate::cli::{ExportArgs, ImportArgs};
use crate::context::AppContext;
use crate::output;
use anyhow::{bail, Context, Result};
use log::info;
use notesphere_core::{ExportFormat, ImportReport, NotificationLevel, Outcome};
use std::path::PathBuf;

pub fn export(ctx: &mut AppContext, args: ExportArgs) -> Result<()> {
    let outcome = ctx.service.export(args.format);
    let Some(text) = outcome.value.as_deref() else {
        output::outcome(&outcome);
        return Ok(());
    };
    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(args.format.default_file_name()));
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(
        "event=cli_export module=cli status=ok format={} mime={} bytes={}",
        args.format,
        args.format.mime_type(),
        text.len()
    );
    output::outcome(&outcome);
    println!("{}", path.display());
    Ok(())
}

pub fn import(ctx: &mut AppContext, args: ImportArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read `{}`", args.path.display()))?;
    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::detect(Some(&args.path), &text));
    let outcome = ctx.service.import(&text, format);
    output::outcome(&outcome);
    if import_rejected(&outcome) {
        bail!("nothing imported from `{}`", args.path.display());
    }
    Ok(())
}

/// An import that changed nothing and resolved as a failure.
fn import_rejected(outcome: &Outcome<ImportReport>) -> bool {
    !outcome.value.applied && outcome.notification.level == NotificationLevel::Error
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesphere_core::{MemoryNoteStore, NoteService};

    #[test]
    fn rejected_files_fail_the_command() {
        let mut service = NoteService::open(MemoryNoteStore::new());
        for (text, format) in [
            ("Name,Body\nx,y", ExportFormat::Csv),
            ("{\"notes\": []}", ExportFormat::Json),
            ("[]", ExportFormat::Json),
            ("   ", ExportFormat::Json),
        ] {
            assert!(import_rejected(&service.import(text, format)), "{text}");
        }
    }

    #[test]
    fn applied_import_succeeds() {
        let mut service = NoteService::open(MemoryNoteStore::new());
        let text = "ID,Title,Objective,NotesArea,CreatedAt,IsPinned\n\
                    25101901,Title,Objective,Body,2025-10-19T07:00:00.000Z,false\n\
                    25101902,Only,Three\n";
        let outcome = service.import(text, ExportFormat::Csv);
        assert!(outcome.value.applied);
        assert!(!import_rejected(&outcome));
    }
}
