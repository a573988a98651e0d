pub mod belief;
pub mod game;
pub mod model;
