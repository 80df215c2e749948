#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod model;

pub use config::Config;

use crate::config::{ConfigFairing, DatabaseFairing};
use crate::listing::ListingNotifier;
use crate::logging::LoggerFairing;
use rocket::{Build, Rocket};

/// Assemble the server: configuration, database, logging, and routes.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
        .manage(ListingNotifier::new())
        .mount("/", api::routes())
}
