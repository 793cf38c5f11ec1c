pub mod circuit;
pub mod components;
pub mod connections;
pub mod errors;
pub mod execution;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod tests;
