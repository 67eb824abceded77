mod common;
mod filters;
mod service;
