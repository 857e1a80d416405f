mod config;
mod segment;
mod support;
