use anyhow::Context;
use txprop_core::{NoFault, SaveReport, SequencerRows, User};
use txprop_db::migrate;
use txprop_db::services::{UserService, UserTableService};
use txprop_db::tx::TxManager;

use crate::cli_args::RunArgs;
use crate::modules::table::print_users;
use crate::settings::Settings;

pub(crate) fn resolve_rows(args: &RunArgs, defaults: &SequencerRows) -> SequencerRows {
    let outer_id = args.outer_id.unwrap_or(defaults.outer.id);
    let inner_id = args.inner_id.unwrap_or(defaults.inner.id);
    // A changed id without a name keeps the JackN naming of the defaults.
    let outer_name = args.outer_name.clone().unwrap_or_else(|| match args.outer_id {
        Some(id) => format!("Jack{id}"),
        None => defaults.outer.name.clone(),
    });
    let inner_name = args.inner_name.clone().unwrap_or_else(|| match args.inner_id {
        Some(id) => format!("Jack{id}"),
        None => defaults.inner.name.clone(),
    });
    SequencerRows {
        outer: User::new(outer_id, outer_name),
        inner: User::new(inner_id, inner_name),
    }
}

pub async fn handle_run_command(
    args: RunArgs,
    settings: &Settings,
    manager: &TxManager,
) -> anyhow::Result<()> {
    migrate(manager.pool())
        .await
        .context("failed to run migrations")?;

    let rows = resolve_rows(&args, &settings.rows);
    let inner_call = args.inner.unwrap_or(settings.inner_call);
    let mut service = UserService::new(manager)
        .with_rows(rows)
        .with_inner_call(inner_call);
    if args.no_fault {
        service = service.with_fault(NoFault);
    }

    let report = service.save().await.context("outer write failed")?;
    let users = UserTableService::new(manager).list().await?;
    if args.json {
        let body = serde_json::json!({ "report": report, "users": users });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_report(&report);
        print_users(&users);
    }
    Ok(())
}

fn print_report(report: &SaveReport) {
    println!("inner call: {}", report.inner_call);
    println!("outer row {}: committed", report.outer_id);
    match &report.inner_error {
        Some(err) => println!("inner row {}: failed ({err})", report.inner_id),
        None => println!("inner row {}: committed", report.inner_id),
    }
}
