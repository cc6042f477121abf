pub mod token_list_repository;

pub use token_list_repository::{FileTokenListRepository, TokenListRepository, UpsertOutcome};
