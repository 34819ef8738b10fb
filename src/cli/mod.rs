//! Terminal front end. Each command renders a hub payload as a table, or as
//! JSON with `--json`.

pub mod ask;
pub mod currencies;
pub mod history;
pub mod rate;
pub mod setup;
pub mod ui;
