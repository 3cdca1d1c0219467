pub mod lookup;
pub mod submit;
