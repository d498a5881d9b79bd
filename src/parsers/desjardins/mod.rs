mod dto;
mod parser;
mod types;

pub mod prelude {
    pub use super::dto::DesjardinsRow;
    pub use super::parser::{DesjardinsParser, parse_page_rows};
    pub use super::types::{AmountToken, DayMonth, infer_statement_year};
}
