use crate::coordinator::Coordinator;
use crate::identity::Identity;
use crate::registry::InboundEvent;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use futures::StreamExt;
use std::sync::Arc;

/// Bridges one client's push-channel connection to a Registry session,
/// selecting between outbound envelopes queued for the session and
/// inbound frames off the socket.
pub async fn connect(
    coordinator: web::Data<Arc<Coordinator>>,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, mut session, mut stream) = actix_ws::handle(&req, body)?;
    let coordinator = coordinator.into_inner();

    actix_web::rt::spawn(async move {
        let (tx, mut rx) =
            tokio::sync::mpsc::channel::<String>(crate::registry::QUEUE_CAPACITY);
        let handle = coordinator.registry.register(tx).await;
        log::debug!("session {} connected", handle.id);

        'sesh: loop {
            tokio::select! {
                biased;
                outbound = rx.recv() => match outbound {
                    Some(json) => if session.text(json).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                inbound = stream.next() => match inbound {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        handle.touch();
                        handle_inbound(&coordinator, &handle, &text).await;
                    }
                    Some(Ok(actix_ws::Message::Ping(bytes))) => {
                        handle.touch();
                        if session.pong(&bytes).await.is_err() { break 'sesh }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) | None => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        coordinator.registry.remove(handle.id).await;
        coordinator.registry.broadcast_users_online().await;
        log::debug!("session {} disconnected", handle.id);
    });

    Ok(response)
}

async fn handle_inbound(
    coordinator: &Arc<Coordinator>,
    session: &crate::registry::Session,
    text: &str,
) {
    let event: InboundEvent = match serde_json::from_str(text) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("session {} sent unparseable message: {e}", session.id);
            return;
        }
    };
    match event {
        InboundEvent::Identify { summoner_name, .. } => {
            session.identify(Identity::from(summoner_name.as_str()));
            coordinator.registry.broadcast_users_online().await;
        }
        InboundEvent::Ping => {
            session.send(&crate::registry::OutboundEvent::DiscordStatus(
                serde_json::json!({ "pong": true }),
            ));
        }
        InboundEvent::LcuReachable { reachable } => session.set_lcu_reachable(reachable),
        InboundEvent::LcuReply { .. } => coordinator.lcu.resolve(&event),
    }
}
