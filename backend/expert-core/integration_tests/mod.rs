mod classifier;
mod config;
mod credential;
mod environment;
mod gateway;
mod model_client;
mod persona;
mod service;
mod support;
