use custom_match_orchestrator::config::Config;
use custom_match_orchestrator::coordinator::Coordinator;
use custom_match_orchestrator::hosting::Server;
use custom_match_orchestrator::scheduler;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    custom_match_orchestrator::init();
    let config = Config::from_env();
    log::info!("starting orchestrator in {} profile", config.profile);

    let coordinator = Coordinator::bootstrap(&config).await;
    scheduler::spawn(coordinator.clone());

    Server::run(config, coordinator).await
}
