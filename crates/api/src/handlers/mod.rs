pub mod aircraft;
pub mod sync;
