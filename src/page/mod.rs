pub mod page_model;
pub mod selector;
pub mod validity;
