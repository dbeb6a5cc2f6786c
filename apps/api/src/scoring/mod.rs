pub mod handlers;
pub mod history;
pub mod matching;
pub mod models;
pub mod report;
pub mod scorer;
pub mod service;
pub mod weights;
