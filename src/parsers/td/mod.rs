mod dto;
mod parser;
mod types;

pub mod prelude {
    pub use super::dto::TdRow;
    pub use super::parser::{TdParser, parse_line, split_amounts};
    pub use super::types::{MonthDay, PeriodEndpoint, StatementPeriod};
}
