//! Repositorios - acceso a datos de vehículos

pub mod memory_vehicle_repository;
pub mod postgres_vehicle_repository;
pub mod vehicle_repository;

pub use memory_vehicle_repository::InMemoryVehicleRepository;
pub use postgres_vehicle_repository::PostgresVehicleRepository;
pub use vehicle_repository::VehicleRepository;
