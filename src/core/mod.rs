pub mod backup;
pub mod log;
pub mod migrate;
pub mod roster;
pub mod submit;
pub mod summary;
