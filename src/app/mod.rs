mod fetch;
mod layout;
mod runtime;
mod tui;
mod types;

pub use runtime::run;
