mod classifier;
mod model_client;
mod validation;
