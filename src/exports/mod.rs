pub mod details;
pub mod links;

pub use details::{read_details, write_details};
pub use links::{read_links, write_links, write_summaries};
