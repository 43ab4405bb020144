use avebridge_app::ports::{FrameReader, FrameWriter, Transport};
use avebridge_domain::error::BridgeError;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::WebSocketConfig;
use crate::error::WsError;

/// Subprotocol the hub expects during the handshake.
const SUBPROTOCOL: &str = "binary";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket links to the hub.
#[derive(Debug, Clone)]
pub struct WsTransport {
    config: WebSocketConfig,
}

impl WsTransport {
    #[must_use]
    pub fn new(config: WebSocketConfig) -> Self {
        Self { config }
    }
}

impl Transport for WsTransport {
    type Writer = WsWriter;
    type Reader = WsReader;

    async fn connect(&self) -> Result<(WsWriter, WsReader), BridgeError> {
        let url = self.config.url();
        let mut request = url.as_str().into_client_request().map_err(WsError::Request)?;
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static(SUBPROTOCOL),
        );

        let (stream, response) = connect_async(request).await.map_err(WsError::Connect)?;
        tracing::debug!(%url, status = %response.status(), "websocket handshake complete");

        let (sink, stream) = stream.split();
        Ok((WsWriter { sink }, WsReader { stream }))
    }
}

/// Outbound half of a hub link.
pub struct WsWriter {
    sink: SplitSink<WsStream, Message>,
}

impl FrameWriter for WsWriter {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), BridgeError> {
        // Encoded frames are ASCII; the hub expects them as text messages.
        let text = String::from_utf8_lossy(&frame).into_owned();
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|err| WsError::Send(err).into())
    }

    async fn close(&mut self) -> Result<(), BridgeError> {
        match self.sink.close().await {
            Ok(())
            | Err(
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed,
            ) => Ok(()),
            Err(err) => Err(WsError::Send(err).into()),
        }
    }
}

/// Inbound half of a hub link.
pub struct WsReader {
    stream: SplitStream<WsStream>,
}

impl FrameReader for WsReader {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, BridgeError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(None);
            };
            match message {
                Ok(Message::Binary(data)) => return Ok(Some(data)),
                Ok(Message::Text(text)) => return Ok(Some(text.into_bytes())),
                Ok(Message::Close(frame)) => {
                    tracing::debug!(?frame, "hub sent close frame");
                    return Ok(None);
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return Ok(None);
                }
                Err(err) => return Err(WsError::Receive(err).into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_hdr_async;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    use super::*;

    #[allow(clippy::result_large_err, clippy::unnecessary_wraps)]
    fn echo_subprotocol(
        request: &Request,
        mut response: Response,
    ) -> Result<Response, ErrorResponse> {
        if let Some(protocol) = request.headers().get("Sec-WebSocket-Protocol") {
            response
                .headers_mut()
                .insert("Sec-WebSocket-Protocol", protocol.clone());
        }
        Ok(response)
    }

    async fn listener() -> (TcpListener, WebSocketConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, WebSocketConfig::new("127.0.0.1", port))
    }

    #[tokio::test]
    async fn should_exchange_frames_with_hub() {
        let (listener, config) = listener().await;
        let hub = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_hdr_async(stream, echo_subprotocol).await.unwrap();
            ws.send(Message::Binary(b"\x02ping\x03ZZ\x04".to_vec()))
                .await
                .unwrap();
            let reply = ws.next().await.unwrap().unwrap();
            ws.close(None).await.unwrap();
            reply
        });

        let (mut writer, mut reader) = WsTransport::new(config).connect().await.unwrap();
        assert_eq!(
            reader.recv().await.unwrap(),
            Some(b"\x02ping\x03ZZ\x04".to_vec())
        );

        writer.send(b"\x02PONG\x03E8\x04".to_vec()).await.unwrap();
        assert_eq!(
            hub.await.unwrap(),
            Message::Text("\u{2}PONG\u{3}E8\u{4}".to_string())
        );
        assert_eq!(reader.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_accept_text_messages_from_hub() {
        let (listener, config) = listener().await;
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_hdr_async(stream, echo_subprotocol).await.unwrap();
            ws.send(Message::Text("\u{2}pong\u{3}ZZ\u{4}".to_string()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });

        let (_writer, mut reader) = WsTransport::new(config).connect().await.unwrap();
        assert_eq!(
            reader.recv().await.unwrap(),
            Some(b"\x02pong\x03ZZ\x04".to_vec())
        );
    }

    #[tokio::test]
    async fn should_close_link_once_and_ignore_second_close() {
        let (listener, config) = listener().await;
        let hub = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_hdr_async(stream, echo_subprotocol).await.unwrap();
            ws.next().await.unwrap().unwrap()
        });

        let (mut writer, _reader) = WsTransport::new(config).connect().await.unwrap();
        writer.close().await.unwrap();
        writer.close().await.unwrap();
        assert!(matches!(hub.await.unwrap(), Message::Close(_)));
    }

    #[tokio::test]
    async fn should_fail_when_hub_is_unreachable() {
        let (listener, config) = listener().await;
        drop(listener);

        let Err(err) = WsTransport::new(config).connect().await else {
            panic!("connect should fail");
        };
        assert!(matches!(err, BridgeError::CannotConnect(_)));
    }
}
