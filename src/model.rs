pub mod card;
pub mod category;
