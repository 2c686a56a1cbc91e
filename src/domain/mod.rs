pub mod listing;
pub mod logic;
pub mod sections;
