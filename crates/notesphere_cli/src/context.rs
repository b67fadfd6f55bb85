//! Per-invocation wiring: config, logging and the note service.

use crate::cli::Cli;
use anyhow::{Context, Result};
use log::info;
use notesphere_core::{
    default_log_level, init_logging, open_db, open_db_in_memory, AppConfig, NoteService,
    SqliteNoteStore,
};

pub struct AppContext {
    pub config: AppConfig,
    pub service: NoteService<SqliteNoteStore>,
}

impl AppContext {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(&cli.config)?;

        let level = cli
            .log_level
            .clone()
            .or_else(|| config.logging.level.clone())
            .unwrap_or_else(|| match config.logging.dir {
                Some(_) => default_log_level().to_string(),
                None => "warn".to_string(),
            });
        if let Err(err) = init_logging(&level, config.logging.dir.as_deref()) {
            eprintln!("logging disabled: {err}");
        }

        let conn = if cli.ephemeral {
            open_db_in_memory()?
        } else {
            open_db(&config.storage.db_path).with_context(|| {
                format!("failed to open `{}`", config.storage.db_path.display())
            })?
        };
        let store = SqliteNoteStore::try_new(conn, config.storage.key.clone())?;
        let service = NoteService::open(store);
        if cli.ephemeral {
            info!("event=cli_start module=cli status=ok mode=ephemeral");
        }

        Ok(Self { config, service })
    }
}
