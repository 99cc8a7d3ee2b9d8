#![deny(warnings)]
pub mod ledger;
pub mod model;
pub mod scoring;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "cardcount"
    }

    pub const fn tagline() -> &'static str {
        "Card Counter"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
