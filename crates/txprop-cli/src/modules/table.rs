use anyhow::Context;
use tracing::info;
use txprop_core::User;
use txprop_db::migrate;
use txprop_db::services::UserTableService;
use txprop_db::tx::TxManager;

use crate::cli_args::ListArgs;

pub async fn handle_migrate_command(manager: &TxManager) -> anyhow::Result<()> {
    migrate(manager.pool())
        .await
        .context("failed to run migrations")?;
    info!(event = "migrations_applied");
    Ok(())
}

pub async fn handle_list_command(args: ListArgs, manager: &TxManager) -> anyhow::Result<()> {
    let users = UserTableService::new(manager).list().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else {
        print_users(&users);
    }
    Ok(())
}

pub async fn handle_reset_command(manager: &TxManager) -> anyhow::Result<()> {
    let deleted = UserTableService::new(manager).reset().await?;
    println!("deleted {deleted} users");
    Ok(())
}

pub(crate) fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("no users");
        return;
    }
    println!("{:<8} NAME", "ID");
    for user in users {
        println!("{:<8} {}", user.id, user.name);
    }
}
