//! Endless list controller.
//!
//! Turns a finite [`DataProvider`] into a list that pages in more data as the user
//! scrolls toward either end. While a page is in flight the list shows a placeholder
//! row at the edge being loaded, and scroll events are fanned out to any number of
//! listeners.
//!
//! The pieces, bottom up:
//! - [`provider`]: data source contract, change events and the placeholder-augmented view
//! - [`layout`]: layout capabilities and the visible-window resolver
//! - [`pager`]: pager contract, edge detection and deferred slot mutations
//! - [`scroll`]: scroll events and the multicaster
//! - [`list`]: [`EndlessList`], which wires everything together
//!
//! The `endless-demo` binary drives all of it from a terminal UI ([`view`]).

pub mod config;
pub mod demo;
pub mod layout;
pub mod list;
pub mod logging;
pub mod model;
pub mod pager;
pub mod provider;
pub mod scroll;
pub mod view;

pub use list::EndlessList;
pub use model::{Direction, EndlessError, Threshold};
pub use pager::Pager;
pub use provider::DataProvider;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
