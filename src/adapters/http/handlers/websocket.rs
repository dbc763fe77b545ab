use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::{CloseCode, CloseReason, Message, Session};
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
  adapters::http::{RequestIdExt, errors::ApiError},
  application::vendor::{GetVendorByNameCommand, GetVendorByNameUseCase},
  infrastructure::realtime::{ConnectionClosed, WebsocketManager, WsConnection},
};

#[async_trait]
impl WsConnection for Session {
  async fn send_text(&mut self, text: String) -> Result<(), ConnectionClosed> {
    self.text(text).await.map_err(|_| ConnectionClosed)
  }

  async fn close(&mut self, code: u16, reason: String) {
    let reason = CloseReason {
      code: CloseCode::from(code),
      description: Some(reason),
    };
    if Session::close(self.clone(), Some(reason)).await.is_err() {
      tracing::debug!("Websocket was already closed");
    }
  }
}

/// Live waiting-order count for a vendor.
/// GET /api/vendor/{vendor_name}/ws/order-count
///
/// The socket is registered under the vendor name and receives the count as
/// a text frame whenever the vendor's queue changes. Incoming text is ignored.
pub async fn order_count_ws_handler(
  req: HttpRequest,
  body: web::Payload,
  path: web::Path<String>,
  manager: web::Data<Arc<WebsocketManager>>,
  use_case: web::Data<Arc<GetVendorByNameUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let vendor = use_case
    .execute(GetVendorByNameCommand {
      name: path.into_inner(),
    })
    .await?;
  let name = vendor.name.into_inner();

  let (response, session, mut stream) =
    actix_ws::handle(&req, body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let mut control = session.clone();
  let manager = manager.get_ref().clone();
  let connection_id = manager.connect(&name, Box::new(session)).await;
  tracing::info!(request_id = ?req.request_id(), "Websocket connected for vendor {}", name);

  actix_web::rt::spawn(async move {
    while let Some(message) = stream.recv().await {
      match message {
        Ok(Message::Ping(bytes)) => {
          if control.pong(&bytes).await.is_err() {
            break;
          }
        }
        Ok(Message::Close(reason)) => {
          tracing::debug!("Websocket for {} closed by peer: {:?}", name, reason);
          break;
        }
        Ok(_) => {}
        Err(e) => {
          tracing::debug!("Websocket for {} failed: {}", name, e);
          break;
        }
      }
    }

    if manager.remove_connection_if(&name, connection_id).await {
      tracing::info!("Websocket disconnected for vendor {}", name);
    }
  });

  Ok(response)
}
