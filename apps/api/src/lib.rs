pub mod analysis;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod scoring;
pub mod state;

#[cfg(test)]
mod test_support;
