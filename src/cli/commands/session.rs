use crate::cli::commands::{finish, open_store, resolve_client};
use crate::cli::parser::SessionAction;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::formatting::hours_fixed;

pub fn handle(action: &SessionAction, cfg: &Config) -> AppResult<()> {
    let mut store = open_store(cfg)?;

    match action {
        SessionAction::Add {
            client,
            hours,
            description,
        } => {
            let id = resolve_client(&store, client)?;
            let session = store.add_time_session(&id, *hours, description)?;
            success(format!(
                "Logged {}h on {} ({})",
                hours_fixed(session.hours),
                session.date,
                total_of(&store, &id)
            ));
        }
        SessionAction::Edit {
            client,
            pos,
            hours,
            description,
        } => {
            let id = resolve_client(&store, client)?;
            let session = store.edit_session(&id, *pos, *hours, description.as_deref())?;
            success(format!(
                "Session #{} set to {}h ({})",
                pos,
                hours_fixed(session.hours),
                total_of(&store, &id)
            ));
        }
        SessionAction::Del { client, pos } => {
            let id = resolve_client(&store, client)?;
            let removed = store.delete_session(&id, *pos)?;
            success(format!(
                "Session #{} ({}h) deleted ({})",
                pos,
                hours_fixed(removed.hours),
                total_of(&store, &id)
            ));
        }
    }

    finish(&mut store);
    Ok(())
}

fn total_of(store: &crate::core::DataStore, id: &str) -> String {
    store
        .client(id)
        .map(|c| format!("total {}h", hours_fixed(c.total_hours)))
        .unwrap_or_default()
}
