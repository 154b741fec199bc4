pub mod config;
pub mod corpus;
pub mod events;
pub mod layout;
pub mod predict;
pub mod selector;
pub mod sentence;
pub mod session;
pub mod sys;
