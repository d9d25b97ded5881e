#![allow(dead_code)]

use relay_core::Record;

use axum_test::{TestServer, TestWebSocket};

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Connect to the WebSocket endpoint without an Origin header
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server.get_websocket("/ws").await.into_websocket().await;
        Self { ws }
    }

    /// Connect to the WebSocket endpoint from a browser origin
    pub async fn connect_from(server: &TestServer, origin: &str) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_header("Origin", origin.to_string())
            .await
            .into_websocket()
            .await;
        Self { ws }
    }

    /// Receive the next record frame
    pub async fn receive_record(&mut self) -> Record {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("Record frame should be valid JSON")
    }

    /// Receive `count` record frames in order
    pub async fn receive_records(&mut self, count: usize) -> Vec<Record> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.receive_record().await);
        }
        records
    }

    /// Send text message (ignored by the server)
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}
