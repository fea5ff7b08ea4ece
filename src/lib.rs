// Normalization and aggregation core for the strategy dashboard.
//
// Sheets come in through a `loader::TableSource`, cells are cleaned by
// `normalize`, headers are canonicalized by `columns` and each report in
// `reports` turns the result into a display-ready context.

pub mod columns;
pub mod config;
pub mod error;
pub mod insight;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod reports;
pub mod types;
