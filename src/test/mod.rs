mod queue;
mod simulation;
mod support;
mod travel;
