mod aircraft_image_repo;
mod aircraft_repo;
mod sync_run_repo;

pub use aircraft_image_repo::AircraftImageRepo;
pub use aircraft_repo::AircraftRepo;
pub use sync_run_repo::SyncRunRepo;
