pub mod common;
pub mod config;
pub mod install;
pub mod pack;
pub mod symlink;

pub use common::RunOptions;
pub use config::Config;
pub use install::Install;
pub use pack::Pack;
pub use symlink::Symlink;
