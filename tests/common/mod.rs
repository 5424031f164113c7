#![allow(dead_code)]

pub mod mocks;
pub mod recording;

pub use mocks::MockWriter;
pub use recording::RecordingWriter;
