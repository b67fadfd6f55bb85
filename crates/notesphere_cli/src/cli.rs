use clap::{Args, Parser, Subcommand};
use notesphere_core::view::table::SortKey;
use notesphere_core::ExportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "notesphere",
    version,
    about = "NoteSphere - structured notes with AI suggestions"
)]
pub struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, env = "NOTESPHERE_CONFIG", default_value = "notesphere.toml")]
    pub config: PathBuf,

    /// Keep notes in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log level override (trace, debug, info, warn, error, off)
    #[arg(long, global = true, env = "NOTESPHERE_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a note")]
    Add(AddArgs),

    #[command(about = "List notes, pinned first")]
    List(ListArgs),

    #[command(about = "Show notes as a sortable table")]
    Table(TableArgs),

    #[command(about = "Show one note in full")]
    Show(IdArgs),

    #[command(about = "Edit fields of an existing note")]
    Edit(EditArgs),

    #[command(about = "Toggle the pin flag of a note")]
    Pin(IdArgs),

    #[command(about = "Pin or unpin several notes")]
    PinMany(PinManyArgs),

    #[command(about = "Delete one or more notes")]
    Delete(DeleteArgs),

    #[command(about = "Delete every note")]
    Clear(ClearArgs),

    #[command(about = "Export all notes as JSON or CSV")]
    Export(ExportArgs),

    #[command(about = "Import notes from a JSON or CSV file")]
    Import(ImportArgs),

    #[command(about = "Ask the AI model for suggestions on a note")]
    Suggest(IdArgs),
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub objective: String,

    /// Markdown body
    #[arg(long)]
    pub notes: String,

    /// Image file to attach (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive search over id, title, objective and body
    #[arg(short, long, default_value = "")]
    pub search: String,
}

#[derive(Args)]
pub struct TableArgs {
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Column to sort by (title, objective, created, pinned)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub objective: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Image file to attach (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,

    /// Zero-based index of an attached image to remove
    #[arg(long, value_name = "INDEX")]
    pub remove_image: Option<usize>,
}

#[derive(Args)]
pub struct PinManyArgs {
    #[arg(long, num_args = 1.., required = true)]
    pub ids: Vec<String>,

    /// Unpin instead of pin
    #[arg(long)]
    pub unpin: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion of every note
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long, default_value = "json")]
    pub format: ExportFormat,

    /// Output file; defaults to the format's standard file name
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    pub path: PathBuf,

    /// Force a format instead of detecting it
    #[arg(short, long)]
    pub format: Option<ExportFormat>,
}
