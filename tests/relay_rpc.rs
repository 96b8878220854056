#![cfg(feature = "http")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use common::{ScriptedHub, config};
use hubwatch::{ChannelId, Controller, EventKind, HttpTransport, Mode, RpcChannels};

fn rpc(method: &str) -> wiremock::MockBuilder {
    Mock::given(matchers::path(format!("/rpc/{method}"))).and(matchers::query_param("id", "0"))
}

#[tokio::test]
async fn test_unmanaged_relay_mode_is_reconciled() {
    let relay = MockServer::start().await;
    rpc("Switch.GetConfig")
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 0, "in_mode": "momentary" })),
        )
        .mount(&relay)
        .await;
    rpc("Switch.GetStatus")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 0, "output": true })))
        .mount(&relay)
        .await;
    rpc("Switch.SetConfig")
        .and(matchers::query_param("config", r#"{"in_mode":"detached"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "restart_required": false })))
        .expect(1)
        .mount(&relay)
        .await;
    rpc("Switch.Set")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "was_on": true })))
        .expect(0)
        .mount(&relay)
        .await;

    let transport = HttpTransport::new().unwrap();
    let channels = Arc::new(RpcChannels::new(&transport, relay.uri(), Duration::from_secs(2)));
    let ctrl = Controller::builder(config())
        .with_transport(ScriptedHub::cycles(&[], true))
        .with_channels(channels.clone(), channels)
        .build()
        .unwrap();
    let mut rx = ctrl.subscribe();

    let token = CancellationToken::new();
    let run = tokio::spawn(ctrl.run(token.clone()));

    let written = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let ev = rx.recv().await.unwrap();
            match ev.kind {
                EventKind::ChannelModeWritten => break ev,
                EventKind::ChannelFailed => panic!("channel step failed: {:?}", ev.reason),
                _ => {}
            }
        }
    })
    .await
    .expect("mode was never written");
    assert_eq!(written.channel, Some(ChannelId(0)));
    assert_eq!(written.mode, Some(Mode::Detached));

    token.cancel();
    run.await.unwrap();
}
