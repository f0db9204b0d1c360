//! StreamTransport against a scripted host on the other end of a duplex pipe.

use relais_bridge::event::listen;
use relais_bridge::ipc::{frame_lines, read_frame, write_frame, FrameLines};
use relais_bridge::{
    unwrap, CommandResult, Commands, EventEnvelope, Frame, StreamTransport, TransportError,
    UpdateWindows,
};
use serde_json::{json, Value};
use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};

struct FakeHost {
    lines: FrameLines<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl FakeHost {
    async fn next_request(&mut self) -> (u64, String, Value) {
        match read_frame(&mut self.lines).await.unwrap() {
            Some(Frame::Request {
                request_id,
                cmd,
                args,
                ..
            }) => (request_id, cmd, args),
            other => panic!("expected a request, got {other:?}"),
        }
    }

    async fn send(&mut self, frame: Frame) {
        write_frame(&mut self.writer, &frame).await.unwrap();
    }

    async fn send_raw(&mut self, line: Value) {
        let line = format!("{line}\n");
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }
}

fn connect() -> (Commands<StreamTransport>, FakeHost) {
    let (client, server) = tokio::io::duplex(4096);
    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, server_write) = tokio::io::split(server);

    let commands = Commands::new(StreamTransport::new(client_read, client_write), "ctrl_v1");
    let host = FakeHost {
        lines: frame_lines(server_read),
        writer: server_write,
    };

    (commands, host)
}

#[tokio::test]
async fn test_out_of_order_responses_reach_their_callers() {
    let (commands, mut host) = connect();

    let server = tokio::spawn(async move {
        let first = host.next_request().await;
        let second = host.next_request().await;

        for (request_id, cmd, _) in [second, first] {
            let result = match cmd.as_str() {
                "get_pin" => json!(false),
                "toggle_pin" => json!(true),
                other => panic!("unexpected command {other}"),
            };
            host.send(Frame::response(request_id, Ok(result))).await;
        }
        host
    });

    let (pin, toggled) = futures_util::join!(commands.get_pin(), commands.toggle_pin());
    assert_eq!(pin.unwrap(), CommandResult::ok(false));
    assert_eq!(toggled.unwrap(), CommandResult::ok(true));

    server.await.unwrap();
}

#[tokio::test]
async fn test_host_error_is_tagged_and_unwraps_to_message() {
    let (commands, mut host) = connect();

    let server = tokio::spawn(async move {
        let (request_id, cmd, args) = host.next_request().await;
        assert_eq!(cmd, "view_close");
        assert_eq!(args, json!({"label": "v1"}));
        host.send(Frame::response(request_id, Err("view not found: v1".to_string())))
            .await;
        host
    });

    let result = commands.view_close("v1").await.unwrap();
    assert_eq!(unwrap(result).unwrap_err().message(), "view not found: v1");

    server.await.unwrap();
}

#[tokio::test]
async fn test_disconnect_fails_pending_and_later_calls() {
    let (commands, mut host) = connect();

    let server = tokio::spawn(async move {
        let (_, cmd, _) = host.next_request().await;
        assert_eq!(cmd, "view_zoomin");
        drop(host);
    });

    assert!(matches!(
        commands.view_zoomin().await,
        Err(TransportError::Disconnected)
    ));
    server.await.unwrap();

    assert!(matches!(
        commands.view_zoomout().await,
        Err(TransportError::Disconnected)
    ));
    assert!(!commands.transport().is_connected());
}

#[tokio::test]
async fn test_events_are_delivered_to_listeners() {
    let (commands, mut host) = connect();
    let mut windows = listen::<UpdateWindows, _>(commands.transport());

    host.send(Frame::event(EventEnvelope::new(
        "update_windows",
        json!([{"title": "Chat", "label": "v1", "ignore": false, "pin": true, "zoom": 1.2}]),
    )))
    .await;

    let received = windows.next().await.unwrap();
    assert_eq!(received[0].label, "v1");
    assert!(received[0].pin);
}

#[tokio::test]
async fn test_undecodable_response_fails_its_caller() {
    let (commands, mut host) = connect();

    let server = tokio::spawn(async move {
        let (request_id, cmd, _) = host.next_request().await;
        assert_eq!(cmd, "get_pin");
        host.send_raw(json!({"kind": "response", "requestId": request_id, "status": "weird"}))
            .await;

        let (request_id, cmd, _) = host.next_request().await;
        assert_eq!(cmd, "get_transparent");
        host.send(Frame::response(request_id, Ok(json!(true)))).await;
        host
    });

    let pin = tokio::time::timeout(std::time::Duration::from_secs(2), commands.get_pin())
        .await
        .expect("caller must not be left waiting");
    assert!(matches!(pin, Err(TransportError::Codec(_))));

    // The connection survives a bad frame
    assert_eq!(
        commands.get_transparent().await.unwrap(),
        CommandResult::ok(true)
    );
    assert!(commands.transport().is_connected());

    server.await.unwrap();
}
