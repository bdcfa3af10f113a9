/// Email fan-out to users subscribed to a notice or event category.
use mongodb::Database;
use serde::Serialize;

use crate::db::user_repo;
use crate::error::Result;
use crate::models::{TargetAudience, UserRole};
use crate::services::email::EmailService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Notice,
    Event,
}

impl ContentKind {
    fn type_label(&self) -> &'static str {
        match self {
            ContentKind::Notice => "Notice",
            ContentKind::Event => "Event",
        }
    }

    fn preference_field(&self) -> &'static str {
        match self {
            ContentKind::Notice => "notification_preferences.notices",
            ContentKind::Event => "notification_preferences.events",
        }
    }

    fn link_segment(&self) -> &'static str {
        match self {
            ContentKind::Notice => "notices",
            ContentKind::Event => "events",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationContent {
    pub title: String,
    pub id: String,
    pub category: String,
    pub target_audience: Option<TargetAudience>,
    pub should_send_email: bool,
    pub is_important: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NotificationOutcome {
    pub success: usize,
    pub total: usize,
    pub notified_emails: Vec<String>,
    pub skipped: bool,
}

/// Notify users whose preferences match the published content. Important
/// notices bypass the category preference filter; the audience narrows by
/// role. Per-recipient failures are logged and tallied, never propagated
/// to the publishing request.
pub async fn notify_interested_users(
    db: &Database,
    email: &EmailService,
    kind: ContentKind,
    content: &NotificationContent,
) -> Result<NotificationOutcome> {
    tracing::info!(
        kind = kind.type_label(),
        category = %content.category,
        title = %content.title,
        important = content.is_important,
        "notification triggered"
    );

    if kind == ContentKind::Notice && !content.should_send_email {
        tracing::info!("email notification skipped as per notice settings");
        return Ok(NotificationOutcome {
            skipped: true,
            ..Default::default()
        });
    }

    // Important notices go to every relevant user regardless of category
    // preference.
    let category_filter = if kind == ContentKind::Notice && content.is_important {
        None
    } else {
        Some(content.category.as_str())
    };

    let role_filter = match (kind, content.target_audience) {
        (ContentKind::Notice, Some(TargetAudience::Student)) => Some(UserRole::Student),
        (ContentKind::Notice, Some(TargetAudience::Teacher)) => Some(UserRole::Teacher),
        _ => None,
    };

    let users =
        user_repo::list_notification_targets(db, kind.preference_field(), category_filter, role_filter)
            .await?;

    if users.is_empty() {
        tracing::info!("no users found to notify for this category");
        return Ok(NotificationOutcome::default());
    }

    let link = format!(
        "{}/{}/{}",
        email.client_url(),
        kind.link_segment(),
        content.id
    );

    let mut outcome = NotificationOutcome {
        total: users.len(),
        ..Default::default()
    };

    for user in &users {
        match email
            .send_notification_email(
                &user.email,
                &user.name,
                kind.type_label(),
                &content.category,
                &content.title,
                &link,
            )
            .await
        {
            Ok(()) => {
                outcome.success += 1;
                outcome.notified_emails.push(user.email.clone());
            }
            Err(e) => {
                tracing::warn!(email = %user.email, error = %e, "failed to notify user");
            }
        }
    }

    tracing::info!(
        success = outcome.success,
        total = outcome.total,
        "notification process finished"
    );

    Ok(outcome)
}
