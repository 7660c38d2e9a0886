#[path = "support/scripted.rs"]
mod scripted;

#[path = "game/division_flow.rs"]
mod division_flow;
#[path = "game/move_parsing.rs"]
mod move_parsing;
#[path = "game/table_flow.rs"]
mod table_flow;
