// src/wiki/mod.rs
pub mod client;
pub mod page;

pub use client::WikiClient;
pub use page::{NodeKind, Page, PageNode};
