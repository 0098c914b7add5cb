//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod fetch;
pub mod spreadsheet;
pub mod storage;
pub mod tts;

pub use audio::*;
pub use fetch::*;
pub use spreadsheet::*;
pub use storage::*;
pub use tts::*;
