mod aggregate;
pub mod args;
mod chart;
mod classify;
pub mod commands;
mod error;
mod history;
mod model;
mod resolve;
mod store;
mod utils;

pub use aggregate::{LineItem, Report, Session, AUTOPAY_DESCRIPTION};
pub use classify::{classify, Classification};
pub use error::Error;
pub use error::Result;
pub use history::{History, MonthTotals};
pub use model::{Amount, MonthKey, ParseAmountError, Record};
pub use resolve::{Resolution, Resolve, ScriptedResolver, TerminalResolver};
pub use store::{CategoryMapper, CategoryStore, MapEntry};
