pub mod bar;
pub mod loader;

pub use bar::Bar;
pub use loader::{load_csv, LoadError};
