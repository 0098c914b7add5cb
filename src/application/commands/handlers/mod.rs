//! Command Handlers 实现

mod convert_handlers;
mod mix_handlers;
mod text_handlers;

#[cfg(test)]
pub(crate) mod test_support;

pub use convert_handlers::*;
pub use mix_handlers::*;
pub use text_handlers::*;
