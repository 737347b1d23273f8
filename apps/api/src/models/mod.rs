pub mod job;
pub mod matching;
