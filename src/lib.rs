pub mod agents;
pub mod blackboard;
pub mod engine;
pub mod model;
pub mod tournament;

/// dimensional analysis types
pub type Rating = i32;
pub type Score = f64;
pub type Similarity = f64;
pub type Completion = f64;

// elo tournament parameters
pub const ELO_INITIAL: Rating = 1200;
pub const ELO_K: Score = 32.;
pub const ELO_DEBATE_GATE: Rating = 1300;

// supervisor refill policy
pub const TARGET_HYPOTHESES: usize = 20;
pub const GENERATION_BATCH: usize = 5;
pub const REVIEW_BATCH: usize = 5;
pub const MATCH_BATCH: usize = 10;
pub const EVOLUTION_BATCH: usize = 3;
pub const PROXIMITY_PERIOD: usize = 3;
pub const TOURNAMENT_HUNGER: Completion = 0.8;

// termination thresholds
pub const TERMINAL_HYPOTHESES: usize = 10;
pub const TERMINAL_REVIEWED: usize = 10;
pub const TERMINAL_TOP_RANKED: usize = 5;
pub const TERMINAL_PROGRESS: Completion = 0.9;

// queue and statistics sizing
pub const QUEUE_CAPACITY_PER_WORKER: usize = 4;
pub const STATS_TOP_N: usize = 10;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging and exit on ctrl-c
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
        .expect("time moves slow")
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
