pub mod event;
pub mod member;
pub mod sign_up;
