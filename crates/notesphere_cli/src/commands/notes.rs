//! Note CRUD, listing and pinning commands.

use super::require_note;
use crate::cli::{AddArgs, ClearArgs, DeleteArgs, EditArgs, IdArgs, ListArgs, PinManyArgs, TableArgs};
use crate::context::AppContext;
use crate::output;
use anyhow::{bail, Context, Result};
use notesphere_core::editor::form::FieldError;
use notesphere_core::view::list::{list_view, ListView};
use notesphere_core::view::table::{table_view, SortDirection, TableSort};
use notesphere_core::{FormSubmission, ImageFile, NoteForm, NoteId};
use std::path::PathBuf;

pub fn add(ctx: &mut AppContext, args: AddArgs) -> Result<()> {
    let mut form = NoteForm::new(ctx.config.editor_limits());
    form.set_title(args.title);
    form.set_objective(args.objective);
    form.set_notes_area(args.notes);
    attach(&mut form, &args.images)?;

    match form.submit() {
        Ok(FormSubmission::Create(draft)) => {
            let outcome = ctx.service.add(draft);
            output::outcome(&outcome);
            println!("{}", outcome.value.id);
            Ok(())
        }
        Ok(FormSubmission::Update(_)) => bail!("new note form produced an update"),
        Err(errors) => invalid(&errors),
    }
}

pub fn list(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    match list_view(ctx.service.notes(), &args.search) {
        ListView::Empty => println!("No notes yet. Create one with `notesphere add`."),
        ListView::NoResults { term } => println!("No notes match \"{term}\"."),
        ListView::Notes(notes) => {
            for note in notes {
                output::list_entry(note, &args.search);
            }
        }
    }
    Ok(())
}

pub fn table(ctx: &mut AppContext, args: TableArgs) -> Result<()> {
    let sort = args.sort.map(|key| TableSort {
        key,
        direction: if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    });
    let rows = table_view(ctx.service.notes(), &args.filter, sort);
    if rows.is_empty() {
        println!("No notes to show.");
        return Ok(());
    }
    output::table(&rows);
    Ok(())
}

pub fn show(ctx: &mut AppContext, args: IdArgs) -> Result<()> {
    let note = require_note(&ctx.service, &args.id)?;
    output::full(&note);
    Ok(())
}

pub fn edit(ctx: &mut AppContext, args: EditArgs) -> Result<()> {
    let note = require_note(&ctx.service, &args.id)?;
    let mut form = NoteForm::edit(note, ctx.config.editor_limits());
    if let Some(title) = args.title {
        form.set_title(title);
    }
    if let Some(objective) = args.objective {
        form.set_objective(objective);
    }
    if let Some(notes) = args.notes {
        form.set_notes_area(notes);
    }
    if let Some(index) = args.remove_image {
        form.remove_image(index);
    }
    attach(&mut form, &args.images)?;

    match form.submit() {
        Ok(FormSubmission::Update(note)) => {
            output::outcome(&ctx.service.update(note));
            Ok(())
        }
        Ok(FormSubmission::Create(_)) => bail!("edit form produced a new note"),
        Err(errors) => invalid(&errors),
    }
}

pub fn pin(ctx: &mut AppContext, args: IdArgs) -> Result<()> {
    output::outcome(&ctx.service.toggle_pin(&NoteId::new(args.id)));
    Ok(())
}

pub fn pin_many(ctx: &mut AppContext, args: PinManyArgs) -> Result<()> {
    let ids = to_ids(args.ids);
    output::outcome(&ctx.service.set_pin_many(&ids, !args.unpin));
    Ok(())
}

pub fn delete(ctx: &mut AppContext, args: DeleteArgs) -> Result<()> {
    let ids = to_ids(args.ids);
    let outcome = match ids.as_slice() {
        [single] => ctx.service.delete(single),
        many => ctx.service.delete_many(many),
    };
    output::outcome(&outcome);
    Ok(())
}

pub fn clear(ctx: &mut AppContext, args: ClearArgs) -> Result<()> {
    if !args.yes {
        bail!(
            "refusing to delete {} notes without --yes; this cannot be undone",
            ctx.service.len()
        );
    }
    output::outcome(&ctx.service.clear());
    Ok(())
}

fn attach(form: &mut NoteForm, paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    let files = paths
        .iter()
        .map(|path| {
            ImageFile::from_path(path)
                .with_context(|| format!("failed to read image `{}`", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let report = form.attach_images(files);
    for notification in &report.notifications {
        output::notification(notification);
    }
    Ok(())
}

fn invalid(errors: &[FieldError]) -> Result<()> {
    for error in errors {
        eprintln!("  - {error}");
    }
    bail!("note is not valid ({} problems)", errors.len())
}

fn to_ids(ids: Vec<String>) -> Vec<NoteId> {
    ids.into_iter().map(NoteId::new).collect()
}
