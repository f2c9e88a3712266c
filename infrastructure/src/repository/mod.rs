//! Voting request repository adapters

mod in_memory;
mod json_file;

pub use in_memory::InMemoryVotingRequestRepository;
pub use json_file::JsonFileRepository;
