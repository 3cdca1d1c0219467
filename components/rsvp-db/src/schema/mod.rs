pub mod guest;
pub mod invite_group;
