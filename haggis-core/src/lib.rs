pub mod bomb;
pub mod card;
pub mod game;
pub mod hands;
pub mod parser;
pub mod result;
pub mod stats;
pub mod transport;
