use crate::coordinator::Coordinator;
use crate::draft::Lane;
use crate::error::OrchestratorError;
use crate::identity::Identity;
use crate::queue::QueuedPlayer;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::Responder;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Renders a rejected operation as `{success:false, error:"<tag>"}`
/// with the HTTP status that matches its error kind.
fn error_response(err: OrchestratorError) -> HttpResponse {
    log::warn!("request rejected: {err}");
    let body = json!({ "success": false, "error": err.tag() });
    match err {
        OrchestratorError::NotFound(_) => HttpResponse::NotFound().json(body),
        OrchestratorError::OutOfOrder(_) | OrchestratorError::Conflict(_) => {
            HttpResponse::Conflict().json(body)
        }
        OrchestratorError::Unauthorized(_) => HttpResponse::Forbidden().json(body),
        OrchestratorError::Upstream(_) => HttpResponse::BadGateway().json(body),
        OrchestratorError::Persistence(_) => HttpResponse::InternalServerError().json(body),
    }
}

#[derive(Deserialize)]
pub struct DraftActionBody {
    match_id: i64,
    action_index: usize,
    champion_id: String,
    player_id: String,
}

pub async fn draft_action(
    coordinator: web::Data<Arc<Coordinator>>,
    body: web::Json<DraftActionBody>,
) -> impl Responder {
    let player = Identity::from(body.player_id.as_str());
    match coordinator
        .draft_action(body.match_id, body.action_index, &body.champion_id, &player)
        .await
    {
        Ok(accepted) => HttpResponse::Ok().json(json!({ "success": accepted })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ChangePickBody {
    action_index: usize,
    champion_id: String,
    player_id: String,
}

pub async fn change_pick(
    coordinator: web::Data<Arc<Coordinator>>,
    path: web::Path<i64>,
    body: web::Json<ChangePickBody>,
) -> impl Responder {
    let player = Identity::from(body.player_id.as_str());
    match coordinator
        .change_pick(path.into_inner(), body.action_index, &body.champion_id, &player)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ConfirmBody {
    player_id: String,
}

pub async fn confirm_final_draft(
    coordinator: web::Data<Arc<Coordinator>>,
    path: web::Path<i64>,
    body: web::Json<ConfirmBody>,
) -> impl Responder {
    let player = Identity::from(body.player_id.as_str());
    match coordinator.confirm_player(path.into_inner(), &player).await {
        Ok(result) => HttpResponse::Ok().json(json!({
            "success": true,
            "allConfirmed": result.all_confirmed,
            "confirmedCount": result.confirmed_count,
            "totalPlayers": result.total_players,
        })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct VoteBody {
    player_id: String,
    lcu_game_id: String,
}

pub async fn vote(
    coordinator: web::Data<Arc<Coordinator>>,
    path: web::Path<i64>,
    body: web::Json<VoteBody>,
) -> impl Responder {
    let voter = Identity::from(body.player_id.as_str());
    match coordinator.vote(path.into_inner(), &voter, &body.lcu_game_id).await {
        Ok(result) => HttpResponse::Ok().json(json!({
            "success": true,
            "voteCount": result.vote_count,
            "lcuGameId": result.lcu_game_id,
            "shouldLink": result.should_link,
            "specialUserVote": result.special_user_vote,
            "voterName": result.voter_name,
        })),
        Err(e) => error_response(e),
    }
}

pub async fn get_votes(coordinator: web::Data<Arc<Coordinator>>, path: web::Path<i64>) -> impl Responder {
    match coordinator.votes(path.into_inner()).await {
        Ok(tally) => HttpResponse::Ok().json(tally),
        Err(e) => error_response(e),
    }
}

pub async fn delete_vote(
    coordinator: web::Data<Arc<Coordinator>>,
    path: web::Path<i64>,
    body: web::Json<ConfirmBody>,
) -> impl Responder {
    let voter = Identity::from(body.player_id.as_str());
    match coordinator.remove_vote(path.into_inner(), &voter).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ActiveMatchQuery {
    summoner_name: String,
}

pub async fn my_active_match(
    coordinator: web::Data<Arc<Coordinator>>,
    query: web::Query<ActiveMatchQuery>,
) -> impl Responder {
    let identity = Identity::from(query.summoner_name.as_str());
    match coordinator.my_active_match(&identity).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct JoinQueueBody {
    summoner_name: String,
    primary_lane: String,
    secondary_lane: String,
    skill_rating: f32,
}

fn parse_lane(s: &str) -> Option<Lane> {
    Some(match s.to_ascii_lowercase().as_str() {
        "top" => Lane::Top,
        "jungle" => Lane::Jungle,
        "mid" => Lane::Mid,
        "adc" | "bot" => Lane::Adc,
        "support" => Lane::Support,
        _ => return None,
    })
}

pub async fn join_queue(
    coordinator: web::Data<Arc<Coordinator>>,
    body: web::Json<JoinQueueBody>,
) -> impl Responder {
    let (Some(primary), Some(secondary)) =
        (parse_lane(&body.primary_lane), parse_lane(&body.secondary_lane))
    else {
        return HttpResponse::BadRequest()
            .json(json!({ "success": false, "error": "conflict" }));
    };
    let player = QueuedPlayer {
        identity: Identity::from(body.summoner_name.as_str()),
        primary_lane: primary,
        secondary_lane: secondary,
        skill_rating: body.skill_rating,
    };
    match coordinator.join_queue(player).await {
        Ok(Some(record)) => HttpResponse::Ok().json(json!({ "success": true, "match": record })),
        Ok(None) => HttpResponse::Ok().json(json!({ "success": true, "match": null })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct LeaveQueueBody {
    summoner_name: String,
}

pub async fn leave_queue(
    coordinator: web::Data<Arc<Coordinator>>,
    body: web::Json<LeaveQueueBody>,
) -> impl Responder {
    let identity = Identity::from(body.summoner_name.as_str());
    let left = coordinator.leave_queue(&identity).await;
    HttpResponse::Ok().json(json!({ "success": left }))
}

pub async fn get_match(coordinator: web::Data<Arc<Coordinator>>, path: web::Path<i64>) -> impl Responder {
    match coordinator.get_match(path.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct SimulateLastMatchBody {
    team1: Vec<String>,
    team2: Vec<String>,
    #[serde(flatten)]
    game: serde_json::Value,
}

pub async fn simulate_last_match(
    coordinator: web::Data<Arc<Coordinator>>,
    body: web::Json<SimulateLastMatchBody>,
) -> impl Responder {
    let team1 = body.team1.iter().map(|s| Identity::from(s.as_str())).collect();
    let team2 = body.team2.iter().map(|s| Identity::from(s.as_str())).collect();
    match coordinator.simulate_last_match(team1, team2, body.game.clone()).await {
        Ok(record) => HttpResponse::Ok().json(json!({ "success": true, "match": record })),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct SpecialUsersBody {
    summoner_names: Vec<String>,
}

/// Admin hook: replaces the privileged-voter set and refreshes the
/// cached copy the vote path reads.
pub async fn set_special_users(
    coordinator: web::Data<Arc<Coordinator>>,
    body: web::Json<SpecialUsersBody>,
) -> impl Responder {
    let users = body.summoner_names.iter().map(|s| Identity::from(s.as_str())).collect();
    match coordinator.set_special_users(users).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

pub async fn health(coordinator: web::Data<Arc<Coordinator>>) -> impl Responder {
    let catalog_keys = coordinator.catalog.all_keys().await.len();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "championCatalogEntries": catalog_keys,
    }))
}
