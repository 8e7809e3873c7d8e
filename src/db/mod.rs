pub mod game_repo;
pub mod models;
pub mod player_repo;
pub mod stat_repo;
pub mod user_repo;
