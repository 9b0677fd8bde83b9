pub mod cache;
pub mod config;
pub mod fetcher;
pub mod journal;
pub mod metadata;
pub mod mirror;
pub mod page;
pub mod pipeline;
pub mod report;

pub use pipeline::{Analysis, Lens, Presenter, Session, TextPresenter};
