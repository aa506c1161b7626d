pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod profiles;
pub mod run;
pub mod runtime;
pub mod stats;
pub mod toggle;
