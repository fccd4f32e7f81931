mod account;
mod profile;

pub use account::*;
pub use profile::*;
