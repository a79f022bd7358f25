mod client;
mod game_flow;
mod render;
