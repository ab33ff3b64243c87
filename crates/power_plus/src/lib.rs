//! Power+ computation crate.
//!
//! Turns a raw leaderboard table into graded player records and answers
//! read-only queries over them.

pub mod calculator;
pub mod process;
pub mod query;
pub mod resolver;

pub use calculator::{compute, grade, power_plus, LEAGUE_AVG_EFFICIENCY};
pub use process::process_table;
pub use query::{Summary, QUALIFIED_MIN_SWINGS};
pub use resolver::{resolve, ResolvedColumns};
