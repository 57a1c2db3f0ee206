//! High-level API: the [`Converter`] builder and its [`ConvertError`].

mod builder;
mod error;

pub use builder::Converter;
pub use error::ConvertError;
