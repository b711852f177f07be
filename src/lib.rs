// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod time_series;
pub mod typed_buffer;
pub mod ui;
pub mod word_stream;
