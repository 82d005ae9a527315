pub mod hostname;
pub mod path;
pub mod process;
