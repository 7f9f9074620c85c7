/// Match persistence trait and its backends.
pub mod match_store;
/// Backend-independent row definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
