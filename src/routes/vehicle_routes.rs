use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use crate::controllers::{VehicleController, VehiclesBulkController};
use crate::dto::vehicle_dto::ApiResponse;
use crate::models::{Vehicle, VehiclesBulk};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/bulk", post(create_vehicles_bulk).put(update_vehicles_bulk))
        .route("/:vin", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
}

fn vehicle_controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.repository.clone(), state.enricher.clone())
}

fn bulk_controller(state: &AppState) -> VehiclesBulkController {
    VehiclesBulkController::new(state.repository.clone(), state.bulk.clone())
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Vehicle>, JsonRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let Json(vehicle) = payload?;
    let response = vehicle_controller(&state).create(vehicle).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = vehicle_controller(&state).get(&vin).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let vehicles = vehicle_controller(&state).list().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    payload: Result<Json<Vehicle>, JsonRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let Json(vehicle) = payload?;
    let response = vehicle_controller(&state).update(&vin, vehicle).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    vehicle_controller(&state).delete(&vin).await?;
    Ok(Json(ApiResponse::message(format!("Vehicle {} deleted successfully", vin))))
}

async fn create_vehicles_bulk(
    State(state): State<AppState>,
    payload: Result<Json<VehiclesBulk>, JsonRejection>,
) -> Result<Json<ApiResponse<VehiclesBulk>>, AppError> {
    let Json(batch) = payload?;
    let response = bulk_controller(&state).create_bulk(batch).await?;
    Ok(Json(response))
}

async fn update_vehicles_bulk(
    State(state): State<AppState>,
    payload: Result<Json<VehiclesBulk>, JsonRejection>,
) -> Result<Json<ApiResponse<VehiclesBulk>>, AppError> {
    let Json(batch) = payload?;
    let response = bulk_controller(&state).update_bulk(batch).await?;
    Ok(Json(response))
}
