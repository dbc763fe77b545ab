pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_support;
