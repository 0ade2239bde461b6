use anyhow::{bail, Context, Result};
use newsdesk_core::DeskService;
use newsdesk_models::{Desk, User};

use crate::config::UiSettings;

/// Headings run through the configured locale overrides.
pub struct Labels<'a> {
    ui: &'a UiSettings,
    locale: &'a str,
}

impl<'a> Labels<'a> {
    pub fn new(ui: &'a UiSettings, locale: &'a str) -> Self {
        Self { ui, locale }
    }

    pub fn get(&self, text: &'a str) -> &'a str {
        self.ui.translate(self.locale, text)
    }
}

fn desk_line(desk: &Desk, members: usize) -> String {
    format!("{:<26} {:<32} {:>4}", desk.id, desk.name, members)
}

fn user_line(user: &User) -> String {
    format!("{:<26} {}", user.id, user.name())
}

async fn load(service: &DeskService) -> Result<()> {
    service
        .initialize()
        .await
        .context("Failed to load desks and users")
}

pub async fn list_desks(service: &DeskService, labels: &Labels<'_>) -> Result<()> {
    load(service).await?;
    let desks = service.desks().await;
    println!("{} ({})", labels.get("Desks"), desks.len());
    for desk in &desks {
        let members = service.desk_members(&desk.id).await.len();
        println!("{}", desk_line(desk, members));
    }
    Ok(())
}

pub async fn list_members(service: &DeskService, labels: &Labels<'_>, desk_id: &str) -> Result<()> {
    load(service).await?;
    let Some(desk) = service.desk(desk_id).await else {
        bail!("unknown desk {}", desk_id);
    };
    let members = service.desk_members(desk_id).await;
    println!("{} - {} ({})", desk.name, labels.get("Members"), members.len());
    for user in &members {
        println!("{}", user_line(user));
    }
    Ok(())
}

pub async fn user_desks(service: &DeskService, labels: &Labels<'_>, user_id: &str) -> Result<()> {
    load(service).await?;
    let Some(user) = service.user(user_id).await else {
        bail!("unknown user {}", user_id);
    };
    let desks = service
        .fetch_user_desks(&user)
        .await
        .with_context(|| format!("Failed to fetch desks of {}", user.name()))?;
    println!("{} - {} ({})", user.name(), labels.get("Desks"), desks.len());
    for desk in &desks {
        println!("{}", desk_line(desk, desk.members.len()));
    }
    Ok(())
}

pub async fn show_current(service: &DeskService, labels: &Labels<'_>) -> Result<()> {
    let Some(id) = service.current_desk_id().await? else {
        println!("No current desk selected");
        return Ok(());
    };
    load(service).await?;
    match service.current_desk().await? {
        Some(desk) => {
            println!("{}", labels.get("Current desk"));
            println!("{}", desk_line(&desk, service.desk_members(&desk.id).await.len()));
        }
        None => println!("Current desk {} is not among the loaded desks", id),
    }
    Ok(())
}

pub async fn set_current(service: &DeskService, desk_id: &str) -> Result<()> {
    service.set_current_desk_id(Some(desk_id)).await?;
    tracing::info!(desk = %desk_id, "current desk updated");
    println!("Current desk set to {}", desk_id);
    Ok(())
}

pub async fn clear_current(service: &DeskService) -> Result<()> {
    service.set_current_desk_id(None).await?;
    tracing::info!("current desk cleared");
    println!("Current desk cleared");
    Ok(())
}

pub async fn fetch_current(service: &DeskService, labels: &Labels<'_>) -> Result<()> {
    match service.fetch_current_desk().await? {
        Some(desk) => {
            println!("{}", labels.get("Current desk"));
            println!("{}", desk_line(&desk, desk.members.len()));
        }
        None => println!("No current desk selected"),
    }
    Ok(())
}
