pub mod entities;
pub mod errors;
pub mod ports;
pub mod queue;
pub mod services;
pub mod value_objects;

pub use entities::{FoodItem, Order, merge_food_items};
pub use errors::OrderError;
pub use ports::{OrderRepository, QueueChangeHandler, QueueRepository};
pub use queue::{Queue, QueueChange, QueueWrite};
pub use services::{OrderService, PlaceOrder};
pub use value_objects::{OrderId, OrderStatus};
