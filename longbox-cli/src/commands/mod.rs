//! Command implementations for the Longbox CLI

mod info;
mod organize;
mod validate;

pub use info::info;
pub use organize::organize;
pub use validate::validate;
