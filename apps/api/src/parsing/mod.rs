pub mod dates;
pub mod handlers;
pub mod jd_parser;
pub mod resume_parser;
pub mod sections;
pub mod vocabulary;
