mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_from_file, build_run};
pub use file::FileConfig;
pub use models::RunSetup;
