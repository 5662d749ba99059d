// Web presentation layer (askama pages)

pub mod handlers;
