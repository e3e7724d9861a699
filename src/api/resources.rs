use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{parse_location, validate_search_query};
use super::{ApiError, AppState};
use crate::models::{Business, Location, Movie, Weather};

/// Every resource endpoint takes its input in `?data=`.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    pub data: Option<String>,
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<Location>, ApiError> {
    let Query(params) = query?;
    let query = validate_search_query(params.data.as_deref())?;
    let location = state.shared.locations.resolve(query).await?;
    Ok(Json(location))
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<Vec<Weather>>, ApiError> {
    let Query(params) = query?;
    let location = parse_location(params.data.as_deref())?;
    let entries = state.shared.weather.resolve(&location).await?;
    Ok(Json(entries))
}

pub async fn get_yelp(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<Vec<Business>>, ApiError> {
    let Query(params) = query?;
    let location = parse_location(params.data.as_deref())?;
    let entries = state.shared.businesses.resolve(&location).await?;
    Ok(Json(entries))
}

pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let Query(params) = query?;
    let location = parse_location(params.data.as_deref())?;
    let movies = state.shared.movies.search(&location).await?;
    Ok(Json(movies))
}
