mod assets;
mod provider;
#[cfg(test)]
mod test_utils;

pub mod config;
pub mod responder;

pub use crate::assets::get_data_dir;
