mod component;
mod config;
mod graph;
mod palette;
mod pointer;
mod pulse;
mod render;
mod state;
mod surface;
mod types;

pub use component::CircuitBoardCanvas;
