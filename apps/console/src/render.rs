use tourguard_domain::{AuditLogEntry, AuthoritySettings, SystemUser, Tourist, Zone};

/// One-line table rendering of a record.
pub trait RenderRow {
    fn render_row(&self) -> String;
}

impl RenderRow for Zone {
    fn render_row(&self) -> String {
        format!(
            "{:<12} {:<24} {:<10} risk {:>4.1} ({}) tourists {:>4} incidents {:>3}",
            self.id,
            self.name,
            self.status.as_str(),
            self.risk_score,
            self.risk_level().as_str(),
            self.tourist_count,
            self.incident_count
        )
    }
}

impl RenderRow for SystemUser {
    fn render_row(&self) -> String {
        let last_login = self
            .last_login
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_owned());
        format!(
            "{:<12} {:<28} {:<26} {:<15} {:<10} last login {}",
            self.id,
            self.name,
            self.email,
            self.role.as_str(),
            self.status.as_str(),
            last_login
        )
    }
}

impl RenderRow for AuditLogEntry {
    fn render_row(&self) -> String {
        let anchored = if self.blockchain_tx.is_some() {
            "anchored"
        } else {
            "-"
        };
        format!(
            "{:<12} {} {:<20} {:<28} {:<24} {:<10} {:<8} {}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.action.as_str(),
            self.actor,
            self.resource,
            self.status.as_str(),
            self.risk_level.as_str(),
            anchored
        )
    }
}

impl RenderRow for Tourist {
    fn render_row(&self) -> String {
        format!(
            "{:<12} {:<20} {:<12} {:<10} {:<24} id {}",
            self.id,
            self.name,
            self.passport,
            self.check_in_status.as_str(),
            self.last_location,
            self.digital_id_status.as_str()
        )
    }
}

pub fn render_settings(settings: &AuthoritySettings, mock_mode: bool) -> Vec<String> {
    vec![
        format!("theme            {:?}", settings.theme),
        format!("language         {}", settings.language),
        format!("timezone         {}", settings.timezone),
        format!(
            "notifications    email={} push={} sound={} emergency={}",
            settings.notifications.email,
            settings.notifications.push,
            settings.notifications.sound,
            settings.notifications.emergency
        ),
        format!(
            "security         two_factor={} session_timeout={}m audit_logging={} retention={}d",
            settings.security.two_factor,
            settings.security.session_timeout,
            settings.security.audit_logging,
            settings.security.data_retention
        ),
        format!(
            "api              real_time={} timeout={}s retries={}",
            settings.api.real_time_updates, settings.api.timeout, settings.api.max_retries
        ),
        format!("mock mode        {mock_mode}"),
    ]
}
