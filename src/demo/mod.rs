//! Sample provider and pager driving the terminal demo.

pub mod pager;
pub mod provider;

pub use pager::{DemoMessage, DemoPager, PageBook};
pub use provider::DemoProvider;
