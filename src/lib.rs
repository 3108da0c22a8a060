#![deny(rust_2018_idioms)]

pub use crate::actions::{run, Context};
pub use crate::args::get_args as args;

pub(crate) mod actions;
pub(crate) mod args;
pub mod aws;
pub mod commands;
pub mod error;
pub mod gateway;
pub mod model;
pub mod upload;

pub(crate) const APP_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));
