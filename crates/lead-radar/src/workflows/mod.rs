pub mod assistant;
pub mod crm;
pub mod listings;
mod rows;
