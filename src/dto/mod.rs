pub mod vehicle_dto;

pub use vehicle_dto::{
    CreateVehicleRequest, CreateVehicleResponse, ListVehiclesQuery, ListVehiclesResponse,
    VehicleResponse,
};
