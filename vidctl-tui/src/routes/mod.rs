pub mod goto;
pub mod help;
pub mod log;
pub mod open;
pub mod player;
pub mod speed;
