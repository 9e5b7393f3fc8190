pub mod google;
pub mod trait_impl;

pub use google::GoogleProvider;
pub use trait_impl::{IdentificationProvider, StaticProvider};
