//! Profile, BMI, nearby FitBuddies and leaderboards. Everything except the
//! BMI arithmetic is static mock data.

use axum::{
    Router,
    extract::{Path, Query},
    response::Json,
    routing::{get, post},
};
use fitola_core::BmiCategory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::plans::check_range;
use crate::{ApiResult, AppState};

#[derive(Deserialize)]
struct BmiRequest {
    height_cm: f64,
    weight_kg: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct BmiResponse {
    bmi: f64,
    category: BmiCategory,
}

impl BmiResponse {
    fn compute(weight_kg: f64, height_cm: f64) -> Self {
        let bmi = fitola_core::bmi(weight_kg, height_cm);
        Self {
            bmi: (bmi * 10.0).round() / 10.0,
            category: BmiCategory::from_bmi(bmi),
        }
    }
}

#[derive(Serialize)]
struct Profile {
    user_id: String,
    name: &'static str,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    body_type: &'static str,
    city: &'static str,
    goals: [&'static str; 2],
    fitness_level: &'static str,
    bmi: BmiResponse,
}

#[derive(Deserialize)]
struct NearbyParams {
    lat: Option<f64>,
    lng: Option<f64>,
    radius_km: Option<f64>,
}

#[derive(Serialize)]
struct FitBuddy {
    user_id: &'static str,
    name: &'static str,
    distance_km: f64,
    favorite_activity: &'static str,
}

#[derive(Serialize)]
struct NearbyResponse {
    message: &'static str,
    center: Option<Center>,
    radius_km: f64,
    fitbuddies: Vec<FitBuddy>,
}

#[derive(Serialize)]
struct Center {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, Serialize)]
struct LeaderboardEntry {
    rank: usize,
    user_id: String,
    name: String,
    points: u32,
}

#[derive(Serialize)]
struct Leaderboard {
    board: String,
    entries: Vec<LeaderboardEntry>,
}

const NEARBY: [(&str, &str, f64, &str); 3] = [
    ("buddy_amara", "Amara", 0.8, "running"),
    ("buddy_tunde", "Tunde", 1.6, "calisthenics"),
    ("buddy_zainab", "Zainab", 3.2, "yoga"),
];

const GLOBAL: [(&str, &str, u32); 5] = [
    ("user_kemi", "Kemi", 4820),
    ("user_rahul", "Rahul", 4515),
    ("user_lucia", "Lucia", 4390),
    ("user_chen", "Chen", 4102),
    ("user_ife", "Ife", 3988),
];

const WEEKLY: [(&str, &str, u32); 5] = [
    ("user_lucia", "Lucia", 910),
    ("user_ife", "Ife", 874),
    ("user_kemi", "Kemi", 802),
    ("user_omar", "Omar", 760),
    ("user_chen", "Chen", 698),
];

const FRIENDS: [(&str, &str, u32); 3] = [
    ("user_tobi", "Tobi", 1320),
    ("user_ada", "Ada", 1185),
    ("user_sam", "Sam", 940),
];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/users/bmi", post(bmi_handler))
        .route("/api/v1/users/{user_id}/profile", get(profile_handler))
        .route("/api/v1/map/nearby", get(nearby_handler))
        .route("/api/v1/leaderboard/global", get(global_handler))
        .route("/api/v1/leaderboard/weekly", get(weekly_handler))
        .route("/api/v1/leaderboard/friends/{user_id}", get(friends_handler))
}

async fn bmi_handler(Json(req): Json<BmiRequest>) -> ApiResult<Json<BmiResponse>> {
    check_range("height_cm", req.height_cm, 1.0, 300.0)?;
    check_range("weight_kg", req.weight_kg, 1.0, 500.0)?;
    Ok(Json(BmiResponse::compute(req.weight_kg, req.height_cm)))
}

async fn profile_handler(Path(user_id): Path<String>) -> Json<Profile> {
    let (height_cm, weight_kg) = (175.0, 72.0);
    Json(Profile {
        user_id,
        name: "Fitola Member",
        age: 28,
        height_cm,
        weight_kg,
        body_type: "Mesomorph",
        city: "Lagos",
        goals: ["Build Strength", "Improve Endurance"],
        fitness_level: "intermediate",
        bmi: BmiResponse::compute(weight_kg, height_cm),
    })
}

async fn nearby_handler(Query(params): Query<NearbyParams>) -> Json<NearbyResponse> {
    let radius_km = params.radius_km.unwrap_or(5.0);
    let center = params.lat.zip(params.lng).map(|(lat, lng)| Center { lat, lng });
    Json(NearbyResponse {
        message: "Map endpoint logic for nearby FitBuddies",
        center,
        radius_km,
        fitbuddies: NEARBY
            .iter()
            .filter(|(_, _, distance, _)| *distance <= radius_km)
            .map(|&(user_id, name, distance_km, favorite_activity)| FitBuddy {
                user_id,
                name,
                distance_km,
                favorite_activity,
            })
            .collect(),
    })
}

fn board(name: &str, rows: &[(&str, &str, u32)]) -> Leaderboard {
    let mut entries: Vec<LeaderboardEntry> = rows
        .iter()
        .map(|&(user_id, name, points)| LeaderboardEntry {
            rank: 0,
            user_id: user_id.into(),
            name: name.into(),
            points,
        })
        .collect();
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    Leaderboard {
        board: name.into(),
        entries,
    }
}

async fn global_handler() -> Json<Leaderboard> {
    Json(board("global", &GLOBAL))
}

async fn weekly_handler() -> Json<Leaderboard> {
    Json(board("weekly", &WEEKLY))
}

async fn friends_handler(Path(user_id): Path<String>) -> Json<Leaderboard> {
    let mut rows: Vec<(&str, &str, u32)> = FRIENDS.to_vec();
    rows.push((user_id.as_str(), "You", 1050));
    Json(board("friends", &rows))
}
