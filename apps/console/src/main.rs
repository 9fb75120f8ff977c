//! Tourguard authority console composition root.

#![forbid(unsafe_code)]

mod commands;
mod console_config;
mod console_services;
mod render;

use std::env;
use std::sync::Arc;

use tourguard_application::{
    Credentials, DelayedReset, ListPage, Notification, Notifier, PageScope, Session,
    notification_for_error,
};
use tourguard_core::{AppError, AppResult, RecordId};
use tourguard_domain::{ManagedRecord, RecordQuery, Resource, ZoneDraft};
use tracing::info;

use crate::commands::Command;
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::console_services::{Collection, ConsoleServices};
use crate::render::{RenderRow, render_settings};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let command = Command::parse(env::args().skip(1))?;
    let services = ConsoleServices::build(&config);

    let mut session = Session::new();
    session.set_mock_mode(config.mock_mode);
    services.seed(session.data_mode()).await;
    services
        .session_service
        .login(
            &mut session,
            &Credentials::new(config.email.as_str(), config.password.as_str()),
        )
        .await?;

    let scope = PageScope::new();
    let outcome = run(&services, &mut session, &scope, command).await;
    scope.unmount();

    services.session_service.logout(&mut session).await;
    outcome
}

async fn run(
    services: &ConsoleServices,
    session: &mut Session,
    scope: &PageScope,
    command: Command,
) -> AppResult<()> {
    let notifier = services.notifier.clone();

    match command {
        Command::List { resource, query } => match resource {
            Resource::Zones => show(&services.zones, session, scope, &notifier, query).await,
            Resource::Users => show(&services.users, session, scope, &notifier, query).await,
            Resource::AuditLogs => {
                show(&services.audit_logs, session, scope, &notifier, query).await;
            }
            Resource::Tourists => {
                show(&services.tourists, session, scope, &notifier, query).await;
            }
        },
        Command::CreateZone { name } => {
            let mut page = open_page(&services.zones, session, scope, &notifier).await;
            let result = services
                .zones
                .service
                .create(session, ZoneDraft::named(name.as_str()))
                .await;
            page.apply_mutation(
                result,
                Notification::success("Zone Created", format!("{name} has been added")),
            );
            print_rows(&page);
        }
        Command::ZoneStatus { id, status } => {
            let mut page = open_page(&services.zones, session, scope, &notifier).await;
            let result = services.zones.service.update_status(session, &id, status).await;
            page.apply_mutation(
                result,
                Notification::success(
                    "Zone Updated",
                    format!("{id} is now {}", status.as_str()),
                ),
            );
            print_rows(&page);
        }
        Command::UserStatus { id, status } => {
            let mut page = open_page(&services.users, session, scope, &notifier).await;
            let result = services.users.service.update_status(session, &id, status).await;
            page.apply_mutation(
                result,
                Notification::success(
                    "User Updated",
                    format!("{id} is now {}", status.as_str()),
                ),
            );
            print_rows(&page);
        }
        Command::Delete { resource, id } => match resource {
            Resource::Zones => delete(&services.zones, session, scope, &notifier, &id).await,
            Resource::Users => delete(&services.users, session, scope, &notifier, &id).await,
            Resource::AuditLogs => {
                delete(&services.audit_logs, session, scope, &notifier, &id).await;
            }
            Resource::Tourists => {
                delete(&services.tourists, session, scope, &notifier, &id).await;
            }
        },
        Command::ExportAudit { query } => {
            open_page(&services.audit_logs, session, scope, &notifier).await;
            match services.audit_logs.service.export(session, &query).await {
                Ok(export) => {
                    println!("{}", export.csv);
                    notifier.notify(Notification::success(
                        "Export Complete",
                        format!("{} audit entries exported", export.row_count),
                    ));
                }
                Err(error) => notifier.notify(notification_for_error(&error)),
            }
        }
        Command::Anchor { id } => {
            let mut page = open_page(&services.audit_logs, session, scope, &notifier).await;
            let result = services.audit_logs.service.anchor(session, &id).await;
            page.apply_mutation(
                result,
                Notification::success("Entry Anchored", format!("{id} anchored to the ledger")),
            );
            print_rows(&page);
        }
        Command::RegisterTourist { draft } => {
            let mut page = open_page(&services.tourists, session, scope, &notifier).await;
            let name = draft.name.clone();
            let result = services.tourists.service.register(session, draft).await;
            page.apply_mutation(
                result,
                Notification::success(
                    "Tourist Registered",
                    format!("Digital ID created for {name}"),
                ),
            );
            print_rows(&page);
        }
        Command::ViewTourist { id } => {
            open_page(&services.tourists, session, scope, &notifier).await;
            match services.tourists.service.view_profile(session, &id).await {
                Ok(tourist) => println!("{}", tourist.render_row()),
                Err(error) => notifier.notify(notification_for_error(&error)),
            }
        }
        Command::VerifyId { id } => {
            let mut page = open_page(&services.tourists, session, scope, &notifier).await;
            let result = services.tourists.service.verify_digital_id(session, &id).await;
            page.apply_mutation(
                result,
                Notification::success("Digital ID Verified", format!("{id} verified")),
            );
            print_rows(&page);
        }
        Command::ShowSettings => {
            let settings = services.settings_service.load(session).await?;
            for line in render_settings(&settings, session.mock_mode()) {
                println!("{line}");
            }
        }
        Command::SaveSettings { theme, mock_mode } => {
            let mut settings = services.settings_service.load(session).await?;
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            services
                .settings_service
                .save(session, &settings, mock_mode)
                .await?;
            notifier.notify(Notification::success(
                "Settings Saved",
                "Your preferences have been updated",
            ));
            for line in render_settings(&settings, session.mock_mode()) {
                println!("{line}");
            }
        }
        Command::ResetSettings => {
            let settings = services.settings_service.reset(session).await?;
            notifier.notify(Notification::info(
                "Settings Reset",
                "All settings have been restored to defaults",
            ));
            for line in render_settings(&settings, session.mock_mode()) {
                println!("{line}");
            }
        }
        Command::DemoFlow {
            flow,
            action,
            duration,
        } => {
            let mut active_flow = DelayedReset::new();
            active_flow.set(format!("{flow}-{action}"), duration);
            notifier.notify(Notification::info(
                "Demo Action Triggered",
                format!("{flow} - {action} flow demonstrated"),
            ));
            if let Some(active) = active_flow.current() {
                println!("active flow: {active}");
            }
            active_flow.cleared().await;
            info!(flow = %flow, action = %action, "demo flow reset");
        }
    }

    Ok(())
}

async fn open_page<R>(
    collection: &Collection<R>,
    session: &Session,
    scope: &PageScope,
    notifier: &Arc<dyn Notifier>,
) -> ListPage<R>
where
    R: ManagedRecord,
{
    let mut page = ListPage::new(notifier.clone());
    page.begin_load();
    if let Some(result) = collection.loader.load_scoped(session, scope).await.transpose() {
        page.apply_load(result);
    }

    page
}

async fn show<R>(
    collection: &Collection<R>,
    session: &Session,
    scope: &PageScope,
    notifier: &Arc<dyn Notifier>,
    query: RecordQuery,
) where
    R: ManagedRecord + RenderRow,
{
    let mut page = open_page(collection, session, scope, notifier).await;
    page.set_query(query);
    print_rows(&page);
}

async fn delete<R>(
    collection: &Collection<R>,
    session: &Session,
    scope: &PageScope,
    notifier: &Arc<dyn Notifier>,
    id: &RecordId,
) where
    R: ManagedRecord + RenderRow,
{
    let mut page = open_page(collection, session, scope, notifier).await;
    let result = collection.service.delete(session, id).await;
    page.apply_mutation(
        result,
        Notification::success("Record Deleted", format!("{id} has been removed")),
    );
    print_rows(&page);
}

fn print_rows<R>(page: &ListPage<R>)
where
    R: ManagedRecord + RenderRow,
{
    for record in page.visible() {
        println!("{}", record.render_row());
    }
}
