use super::routes;
use super::ws;
use crate::config::Config;
use crate::coordinator::Coordinator;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run(config: Config, coordinator: Arc<Coordinator>) -> std::io::Result<()> {
        let bind_addr = config.bind_addr.clone();
        let state = web::Data::new(coordinator);
        log::info!("starting hosting server on {bind_addr}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/health", web::get().to(routes::health))
                .route("/ws", web::get().to(ws::connect))
                .route("/match/draft-action", web::post().to(routes::draft_action))
                .route("/match/{id}/change-pick", web::post().to(routes::change_pick))
                .route(
                    "/match/{id}/confirm-final-draft",
                    web::post().to(routes::confirm_final_draft),
                )
                .route("/match/{id}/vote", web::post().to(routes::vote))
                .route("/match/{id}/votes", web::get().to(routes::get_votes))
                .route("/match/{id}/vote", web::delete().to(routes::delete_vote))
                .route("/match/{id}", web::get().to(routes::get_match))
                .route("/queue/join", web::post().to(routes::join_queue))
                .route("/queue/leave", web::post().to(routes::leave_queue))
                .route("/queue/my-active-match", web::get().to(routes::my_active_match))
                .route(
                    "/debug/simulate-last-match",
                    web::post().to(routes::simulate_last_match),
                )
                .route("/admin/special-users", web::post().to(routes::set_special_users))
        })
        .bind(bind_addr)?
        .run()
        .await
    }
}
