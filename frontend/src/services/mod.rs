pub mod dom;
pub mod logging;
pub mod navigation;
pub mod storage;

pub use storage::LocalStore;
