pub mod desjardins;
pub mod td;
pub mod traits;

pub mod prelude {
    pub use super::desjardins::prelude::*;
    pub use super::td::prelude::*;
    pub use super::traits::Grammar;
}
