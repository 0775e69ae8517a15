#[macro_use]
extern crate rocket;

pub mod api;
pub mod config;
pub mod error;
pub mod highlight;
pub mod html;
pub mod indexer;
pub mod markdown;
pub mod pages;
pub mod search;
pub mod template;
pub mod watcher;

use rocket::{config::LogLevel, fairing::AdHoc, figment::Figment, Build, Rocket};

use config::SiteConfig;
use watcher::DocsWatcher;

/// Rocket settings for `config`. Development mode raises the log level so watcher
/// events are printed in release builds too.
fn figment_for(config: &SiteConfig) -> Figment {
    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));

    if config.is_development() {
        figment.merge(("log_level", LogLevel::Normal))
    } else {
        figment
    }
}

pub fn build_rocket(config: SiteConfig) -> Rocket<Build> {
    rocket::custom(figment_for(&config))
        .manage(config)
        .mount(
            "/",
            routes![api::index, api::document, api::search, api::static_file],
        )
        .register(
            "/",
            catchers![api::forbidden, api::not_found, api::server_error],
        )
        .attach(AdHoc::on_ignite("Document root", prepare_root))
}

/// Creates the document root if needed and, in development mode, starts watching it.
async fn prepare_root(rocket: Rocket<Build>) -> Rocket<Build> {
    let Some(config) = rocket.state::<SiteConfig>().cloned() else {
        return rocket;
    };

    if let Err(error) = tokio::fs::create_dir_all(&config.root).await {
        log::error!(
            "could not create document root {}: {error}",
            config.root.display()
        );
    }

    if !config.is_development() {
        return rocket;
    }

    match DocsWatcher::start(&config.root) {
        Ok(watcher) => rocket.manage(watcher),
        Err(error) => {
            log::warn!("document watcher disabled: {error}");
            rocket
        }
    }
}
