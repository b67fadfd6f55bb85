//! `notesphere` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load config and start logging.
//! - Dispatch to one command module per concern.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = context::AppContext::load(&cli)?;

    match cli.command {
        Commands::Add(args) => commands::notes::add(&mut ctx, args),
        Commands::List(args) => commands::notes::list(&mut ctx, args),
        Commands::Table(args) => commands::notes::table(&mut ctx, args),
        Commands::Show(args) => commands::notes::show(&mut ctx, args),
        Commands::Edit(args) => commands::notes::edit(&mut ctx, args),
        Commands::Pin(args) => commands::notes::pin(&mut ctx, args),
        Commands::PinMany(args) => commands::notes::pin_many(&mut ctx, args),
        Commands::Delete(args) => commands::notes::delete(&mut ctx, args),
        Commands::Clear(args) => commands::notes::clear(&mut ctx, args),
        Commands::Export(args) => commands::transfer::export(&mut ctx, args),
        Commands::Import(args) => commands::transfer::import(&mut ctx, args),
        Commands::Suggest(args) => commands::suggest::run(&mut ctx, args).await,
    }
}
