/// RESP protocol version negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProtocolVersion {
    Resp2,
    Resp3,
}
