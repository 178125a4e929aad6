pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod draft;
pub mod error;
pub mod game;
pub mod hosting;
pub mod identity;
pub mod lcu;
pub mod queue;
pub mod record;
pub mod registry;
pub mod scheduler;
pub mod special;
pub mod store;
pub mod voting;

/// Initializes logging and installs the ctrl-c force-exit handler: a
/// colored `TermLogger` for the console plus a per-run `WriteLogger`
/// under `logs/`.
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
