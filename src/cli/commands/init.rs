use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::LocalCache;
use crate::utils::path::expand_tilde_str;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the local cache database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let custom = cli.db.as_deref().map(expand_tilde_str);
    let db_path = Config::init_all(custom, cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rTimeboard…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let cache = LocalCache::open(&db_path)?;
    cache.audit(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    println!("✅ Database initialized at {}", &db_path);
    println!("🎉 rTimeboard initialization completed!");
    Ok(())
}
