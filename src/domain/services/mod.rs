pub mod inventory;
pub mod moderation;
pub mod permissions;
