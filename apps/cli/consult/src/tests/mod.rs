mod args;
mod commands;
mod error;
mod logger;
mod render;
