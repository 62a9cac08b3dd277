//! Inventory forecasting and reorder-recommendation engine
//!
//! Every function here is a pure transform of its inputs. Anything that
//! depends on the current time takes `now` as an argument.

pub mod alerts;
pub mod depletion;
pub mod export;
pub mod reorder;
pub mod summary;
pub mod units;
pub mod usage;

pub use alerts::*;
pub use depletion::*;
pub use export::*;
pub use reorder::*;
pub use summary::*;
pub use units::*;
pub use usage::*;
