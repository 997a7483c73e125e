pub mod vehicle_controller;
pub mod vehicles_bulk_controller;

pub use vehicle_controller::VehicleController;
pub use vehicles_bulk_controller::VehiclesBulkController;
