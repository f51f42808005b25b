pub mod json_cards;
pub mod library;
pub mod lock;
pub mod source;
