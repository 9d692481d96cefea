use crate::cli::commands::{confirm, finish, open_store, resolve_client};
use crate::cli::parser::ClientAction;
use crate::config::Config;
use crate::core::DataStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success};
use crate::utils::formatting::{hours2readable, hours_fixed};
use crate::utils::table::{Column, Table};

pub fn handle(action: &ClientAction, cfg: &Config) -> AppResult<()> {
    let mut store = open_store(cfg)?;

    match action {
        ClientAction::Add { name } => {
            let client = store.add_client(name)?;
            success(format!("Client '{}' created (id {})", client.name, client.id));
        }
        ClientAction::Rename { client, name } => {
            let id = resolve_client(&store, client)?;
            let updated = store.rename_client(&id, name)?;
            success(format!("Client renamed to '{}'", updated.name));
        }
        ClientAction::Del { client, force } => {
            let id = resolve_client(&store, client)?;
            let name = store
                .client(&id)
                .map(|c| c.name.clone())
                .ok_or_else(|| AppError::ClientNotFound(id.clone()))?;

            if !*force && !confirm(&format!("Delete client '{}' and all its sessions?", name))? {
                info("Deletion cancelled.");
                return Ok(());
            }

            store.delete_client(&id)?;
            success(format!("Client '{}' deleted", name));
        }
        ClientAction::List => list(&store),
        ClientAction::Show { client } => {
            let id = resolve_client(&store, client)?;
            show(&store, &id)?;
        }
    }

    finish(&mut store);
    Ok(())
}

fn list(store: &DataStore) {
    if store.clients().is_empty() {
        info("No clients yet. Add one with `rtimeboard client add <NAME>`.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Hours"),
        Column::new("Total"),
        Column::new("Sessions"),
    ]);
    for c in store.clients() {
        table.add_row(vec![
            c.id.clone(),
            c.name.clone(),
            hours_fixed(c.total_hours),
            hours2readable(c.total_hours),
            c.sessions.len().to_string(),
        ]);
    }

    let total_hours: f64 = store.clients().iter().map(|c| c.total_hours).sum();
    let total_sessions: usize = store.clients().iter().map(|c| c.sessions.len()).sum();
    table.set_footer(vec![
        String::new(),
        "TOTAL".to_string(),
        hours_fixed(total_hours),
        hours2readable(total_hours),
        total_sessions.to_string(),
    ]);
    print!("{}", table.render());
}

fn show(store: &DataStore, id: &str) -> AppResult<()> {
    let client = store
        .client(id)
        .ok_or_else(|| AppError::ClientNotFound(id.to_string()))?;

    header(format!(
        "{}  ({}h, {})",
        client.name,
        hours_fixed(client.total_hours),
        hours2readable(client.total_hours)
    ));

    if client.sessions.is_empty() {
        info("No sessions logged.");
    } else {
        let mut table = Table::new(vec![
            Column::new("#"),
            Column::new("Date"),
            Column::new("Hours"),
            Column::new("Description"),
        ]);
        for (i, s) in client.sessions.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                s.date.clone(),
                hours_fixed(s.hours),
                s.description.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    let events = store.events_for_client(id);
    if !events.is_empty() {
        println!("\n📅 Calendar events:");
        let mut table = Table::new(vec![
            Column::new("Date"),
            Column::new("Type"),
            Column::new("Hours"),
            Column::new("Description"),
        ]);
        for e in events {
            table.add_row(vec![
                e.date.clone(),
                e.kind.to_string(),
                hours_fixed(e.hours),
                e.description.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
