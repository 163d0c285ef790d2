pub mod aircraft;
pub mod aircraft_image;
pub mod sync_run;
