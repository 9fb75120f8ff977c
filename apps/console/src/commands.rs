//! Scripted console commands parsed from process arguments.

use std::str::FromStr;
use std::time::Duration;

use tourguard_core::{AppError, AppResult, RecordId};
use tourguard_domain::{RecordQuery, Resource, Theme, TouristDraft, UserStatus, ZoneStatus};

const DEMO_FLOW_SECONDS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List {
        resource: Resource,
        query: RecordQuery,
    },
    CreateZone {
        name: String,
    },
    ZoneStatus {
        id: RecordId,
        status: ZoneStatus,
    },
    UserStatus {
        id: RecordId,
        status: UserStatus,
    },
    Delete {
        resource: Resource,
        id: RecordId,
    },
    ExportAudit {
        query: RecordQuery,
    },
    Anchor {
        id: RecordId,
    },
    RegisterTourist {
        draft: TouristDraft,
    },
    ViewTourist {
        id: RecordId,
    },
    VerifyId {
        id: RecordId,
    },
    ShowSettings,
    SaveSettings {
        theme: Option<Theme>,
        mock_mode: bool,
    },
    ResetSettings,
    DemoFlow {
        flow: String,
        action: String,
        duration: Duration,
    },
}

impl Command {
    /// Parses `<command> [arguments] [--search text] [--filter field=value]`.
    ///
    /// No arguments lists zones.
    pub fn parse<I>(arguments: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut arguments: Vec<String> = arguments.into_iter().collect();
        if arguments.is_empty() {
            return Ok(Self::List {
                resource: Resource::Zones,
                query: RecordQuery::new(),
            });
        }

        let name = arguments.remove(0);
        let (positional, query) = split_query(arguments)?;
        let mut positional = positional.into_iter();
        let mut next = |what: &str| {
            positional
                .next()
                .ok_or_else(|| AppError::Validation(format!("'{name}' requires {what}")))
        };

        let command = match name.as_str() {
            "zones" | "users" | "audit" | "tourists" => Self::List {
                resource: parse_resource(name.as_str())?,
                query,
            },
            "create-zone" => Self::CreateZone {
                name: next("a zone name")?,
            },
            "zone-status" => Self::ZoneStatus {
                id: RecordId::new(next("a zone id")?)?,
                status: ZoneStatus::from_str(next("a status")?.as_str())?,
            },
            "user-status" => Self::UserStatus {
                id: RecordId::new(next("a user id")?)?,
                status: UserStatus::from_str(next("a status")?.as_str())?,
            },
            "delete" => Self::Delete {
                resource: parse_resource(next("a collection")?.as_str())?,
                id: RecordId::new(next("a record id")?)?,
            },
            "export-audit" => Self::ExportAudit { query },
            "anchor" => Self::Anchor {
                id: RecordId::new(next("an audit entry id")?)?,
            },
            "register-tourist" => Self::RegisterTourist {
                draft: TouristDraft {
                    name: next("a name")?,
                    passport: next("a passport number")?,
                    phone: next("a phone number")?,
                    email: next("").ok(),
                    ..TouristDraft::default()
                },
            },
            "view-tourist" => Self::ViewTourist {
                id: RecordId::new(next("a tourist id")?)?,
            },
            "verify-id" => Self::VerifyId {
                id: RecordId::new(next("a tourist id")?)?,
            },
            "settings" => Self::ShowSettings,
            "settings-save" => {
                let theme = next("").ok().map(|value| parse_theme(value.as_str())).transpose()?;
                let mock_mode = match next("").ok() {
                    Some(value) => parse_flag(value.as_str())?,
                    None => true,
                };
                Self::SaveSettings { theme, mock_mode }
            }
            "settings-reset" => Self::ResetSettings,
            "demo-flow" => {
                let flow = next("a flow name")?;
                let action = next("an action")?;
                let seconds = match next("").ok() {
                    Some(value) => value.parse::<u64>().map_err(|error| {
                        AppError::Validation(format!("invalid demo duration '{value}': {error}"))
                    })?,
                    None => DEMO_FLOW_SECONDS,
                };
                Self::DemoFlow {
                    flow,
                    action,
                    duration: Duration::from_secs(seconds),
                }
            }
            other => {
                return Err(AppError::Validation(format!("unknown command '{other}'")));
            }
        };

        Ok(command)
    }
}

fn split_query(arguments: Vec<String>) -> AppResult<(Vec<String>, RecordQuery)> {
    let mut positional = Vec::new();
    let mut query = RecordQuery::new();
    let mut arguments = arguments.into_iter();

    while let Some(argument) = arguments.next() {
        match argument.as_str() {
            "--search" => {
                let text = arguments.next().ok_or_else(|| {
                    AppError::Validation("--search requires a value".to_owned())
                })?;
                query.set_text(text);
            }
            "--filter" => {
                let filter = arguments.next().ok_or_else(|| {
                    AppError::Validation("--filter requires field=value".to_owned())
                })?;
                let Some((field, value)) = filter.split_once('=') else {
                    return Err(AppError::Validation(format!(
                        "invalid filter '{filter}', expected field=value"
                    )));
                };
                query.set_filter(field, value);
            }
            _ => positional.push(argument),
        }
    }

    Ok((positional, query))
}

fn parse_resource(value: &str) -> AppResult<Resource> {
    match value {
        "zones" => Ok(Resource::Zones),
        "users" => Ok(Resource::Users),
        "audit" | "audit_logs" => Ok(Resource::AuditLogs),
        "tourists" => Ok(Resource::Tourists),
        _ => Err(AppError::Validation(format!("unknown collection '{value}'"))),
    }
}

fn parse_theme(value: &str) -> AppResult<Theme> {
    match value {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        "system" => Ok(Theme::System),
        _ => Err(AppError::Validation(format!("unknown theme '{value}'"))),
    }
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value {
        "true" | "on" => Ok(true),
        "false" | "off" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "invalid mock mode '{value}', expected on or off"
        ))),
    }
}
