pub mod category;
pub mod lead;
pub mod option_fields;
pub mod project;
pub mod service;
pub mod token;
