pub mod cancel_order;
pub mod consumer_orders;
pub mod place_order;
pub mod vendor_orders;

pub use cancel_order::{CancelOrderCommand, CancelOrderUseCase};
pub use consumer_orders::{ConsumerOrdersCommand, ListConsumerOrdersUseCase};
pub use place_order::{PlaceOrderCommand, PlaceOrderUseCase};
pub use vendor_orders::{
  CompleteCurrentOrderUseCase, ListVendorOrdersUseCase, NextOrderUseCase, VendorOrdersCommand,
};

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;
  use std::sync::Arc;
  use uuid::Uuid;

  use crate::application::consumer::{CreateAnonymousConsumerCommand, CreateAnonymousConsumerUseCase};
  use crate::application::vendor::add_food::tests::glazed;
  use crate::application::vendor::create_vendor::tests::command;
  use crate::application::vendor::{CreateVendorCommand, CreateVendorUseCase};
  use crate::domain::consumer::ConsumerService;
  use crate::domain::order::{OrderError, OrderService, OrderStatus};
  use crate::domain::vendor::VendorService;
  use crate::test_support::InMemoryStore;

  struct World {
    orders: Arc<OrderService>,
    vendor_id: Uuid,
    consumer_id: Uuid,
    food_id: Uuid,
  }

  async fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    let vendors = Arc::new(VendorService::new(store.clone(), store.clone()));
    let consumers = Arc::new(ConsumerService::new(store.clone()));
    let orders = Arc::new(OrderService::new(
      store.clone(),
      store.clone(),
      store.clone(),
      store.clone(),
      store.clone(),
    ));

    let vendor_id = Uuid::new_v4();
    let vendor = CreateVendorUseCase::new(vendors)
      .execute(CreateVendorCommand {
        menu: vec![glazed()],
        ..command(vendor_id)
      })
      .await
      .unwrap();

    let consumer_id = Uuid::new_v4();
    CreateAnonymousConsumerUseCase::new(consumers)
      .execute(CreateAnonymousConsumerCommand { consumer_id })
      .await
      .unwrap();

    World {
      orders,
      vendor_id,
      consumer_id,
      food_id: vendor.menu[0],
    }
  }

  fn place(w: &World) -> PlaceOrderCommand {
    PlaceOrderCommand {
      consumer_id: w.consumer_id,
      vendor_id: w.vendor_id,
      foods: vec![(w.food_id, 1), (w.food_id, 2)],
      total_price: dec!(300),
    }
  }

  #[tokio::test]
  async fn test_order_lifecycle() {
    let w = world().await;
    let vendor = VendorOrdersCommand { vendor_id: w.vendor_id };

    let placed = PlaceOrderUseCase::new(w.orders.clone())
      .execute(place(&w))
      .await
      .unwrap();
    assert_eq!(placed.foods.len(), 1);
    assert_eq!(placed.foods[0].quantity, 3);

    let next = NextOrderUseCase::new(w.orders.clone())
      .execute(vendor.clone())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(next.id, placed.id);
    assert_eq!(next.status, OrderStatus::Processing);

    let done = CompleteCurrentOrderUseCase::new(w.orders.clone())
      .execute(vendor.clone())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);

    let nothing = CompleteCurrentOrderUseCase::new(w.orders.clone())
      .execute(vendor.clone())
      .await
      .unwrap();
    assert!(nothing.is_none());

    let all = ListVendorOrdersUseCase::new(w.orders.clone())
      .execute(vendor)
      .await
      .unwrap();
    assert_eq!(all.len(), 1);

    let mine = ListConsumerOrdersUseCase::new(w.orders.clone())
      .execute(ConsumerOrdersCommand {
        consumer_id: w.consumer_id,
      })
      .await
      .unwrap();
    assert_eq!(mine[0].status, OrderStatus::Completed);
  }

  #[tokio::test]
  async fn test_cancel_by_id() {
    let w = world().await;
    let placed = PlaceOrderUseCase::new(w.orders.clone())
      .execute(place(&w))
      .await
      .unwrap();
    let cancel = CancelOrderUseCase::new(w.orders.clone());

    let malformed = cancel
      .execute(CancelOrderCommand {
        consumer_id: w.consumer_id,
        order_id: "not-an-order".into(),
      })
      .await;
    assert!(matches!(malformed, Err(OrderError::OrderNotFound(id)) if id == "not-an-order"));

    let canceled = cancel
      .execute(CancelOrderCommand {
        consumer_id: w.consumer_id,
        order_id: placed.id.to_string(),
      })
      .await
      .unwrap();
    assert_eq!(canceled.status, OrderStatus::Canceled);

    let next = NextOrderUseCase::new(w.orders.clone())
      .execute(VendorOrdersCommand { vendor_id: w.vendor_id })
      .await
      .unwrap();
    assert!(next.is_none());
  }
}
