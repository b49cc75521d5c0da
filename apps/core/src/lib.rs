pub mod activation;
pub mod config;
pub mod contract;
pub mod engine;
pub mod item_store;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod observable;
pub mod runtime;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod transport;
pub mod widget;

pub use engine::{EngineConfig, OptionCollection, PresentationOrder};
pub use model::Item;
pub use search::Ranking;
