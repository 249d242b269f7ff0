//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and drive it with
//! a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use mafia_transport::{Connection, FrameSink, FrameStream, Transport, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_websocket_accept_split_and_exchange() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("task should complete");
        assert!(conn.id().into_inner() > 0);

        let (mut writer, mut reader) = conn.split();

        writer.send(b"hello from server").await.expect("send");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from server");

        client
            .send(Message::Binary(b"hello from client".to_vec().into()))
            .await
            .unwrap();
        let received = reader.recv().await.expect("recv").expect("data");
        assert_eq!(received, b"hello from client");

        writer.close().await.expect("close");
    }

    #[tokio::test]
    async fn test_websocket_text_frames_are_delivered_as_bytes() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.unwrap() });

        let mut client = connect_client(&addr).await;
        let (_writer, mut reader) = server.await.unwrap().split();

        client.send(Message::Text("{\"a\":1}".into())).await.unwrap();
        let received = reader.recv().await.unwrap().unwrap();
        assert_eq!(received, b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_websocket_halves_work_from_separate_tasks() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.unwrap() });

        let mut client = connect_client(&addr).await;
        let (mut writer, mut reader) = server.await.unwrap().split();

        // The reader blocks waiting for the client while the writer pushes.
        let read_task = tokio::spawn(async move { reader.recv().await });
        let write_task = tokio::spawn(async move {
            for i in 0..3u8 {
                writer.send(&[i]).await.unwrap();
            }
            writer
        });

        let _writer = write_task.await.unwrap();
        for i in 0..3u8 {
            let msg = client.next().await.unwrap().unwrap();
            assert_eq!(msg.into_data().as_ref(), &[i]);
        }

        client.send(Message::Binary(vec![9].into())).await.unwrap();
        let got = tokio::time::timeout(Duration::from_secs(1), read_task)
            .await
            .expect("reader should finish")
            .unwrap()
            .unwrap();
        assert_eq!(got, Some(vec![9]));
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.unwrap() });

        let mut client = connect_client(&addr).await;
        let (_writer, mut reader) = server.await.unwrap().split();

        client.send(Message::Close(None)).await.unwrap();

        let result = reader.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_upgrade_timeout_rejects_silent_client() {
        let (transport, addr) = bind().await;
        let mut transport = transport.with_upgrade_timeout(Duration::from_millis(50));
        let server = tokio::spawn(async move { transport.accept().await });

        // A raw TCP client that never sends the HTTP upgrade request.
        let _tcp = tokio::net::TcpStream::connect(&addr).await.unwrap();

        let result = server.await.unwrap();
        assert!(result.is_err());
    }
}
