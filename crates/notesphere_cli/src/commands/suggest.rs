//! AI suggestion command.

use super::require_note;
use crate::cli::IdArgs;
use crate::context::AppContext;
use anyhow::Result;
use notesphere_core::{
    refresh_suggestions, HttpSuggestionModel, SuggestionClient, SuggestionSession,
    SuggestionState,
};
use std::sync::Mutex;

pub async fn run(ctx: &mut AppContext, args: IdArgs) -> Result<()> {
    let note = require_note(&ctx.service, &args.id)?;
    let model = HttpSuggestionModel::new(ctx.config.model_settings())?;
    let client = SuggestionClient::new(model, ctx.config.prompt_template());
    let session = Mutex::new(SuggestionSession::new());

    println!("Generating ideas for \"{}\"...", note.title);
    refresh_suggestions(&session, &client, &note).await;

    let state = session
        .into_inner()
        .map(|session| session.state().clone())
        .unwrap_or_default();
    match state {
        SuggestionState::Ready { items, .. } if items.is_empty() => {
            println!("No suggestions for this note.");
        }
        SuggestionState::Ready { items, .. } => {
            for (index, item) in items.iter().enumerate() {
                match &item.kind {
                    Some(kind) => println!("{}. {} [{kind}]", index + 1, item.title),
                    None => println!("{}. {}", index + 1, item.title),
                }
                for line in item.details.lines() {
                    println!("   {line}");
                }
            }
        }
        SuggestionState::Failed { message, .. } => eprintln!("{message}"),
        SuggestionState::Idle | SuggestionState::Loading { .. } => {}
    }
    Ok(())
}
