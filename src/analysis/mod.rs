pub mod composition;
pub mod recommender;
pub mod scoring;
