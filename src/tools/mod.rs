//! Tool System - descriptors, catalog and dispatch

mod catalog;
mod definition;
mod dispatcher;

pub use catalog::{DEFAULT_MAX_ARTICLES, ToolCatalog};
pub use definition::{ParamSpec, ParamType, ToolDescriptor, ToolKind};
pub use dispatcher::{FetcherDispatcher, NewsArgs, PriceArgs, ToolDispatcher, ToolRequest, render};
