//! Data models for the marketplace fragment
//!
//! Core record types (articles, images, users) plus the vocabulary types the
//! processing layer dispatches on.

pub mod action;
pub mod article;
pub mod attributes;
pub mod image;
pub mod user;

pub use action::ArticleAction;
pub use article::{Article, ArticleState, RequestedTransition};
pub use attributes::AttributeMap;
pub use image::ArticleImage;
pub use user::User;
