#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, duplex},
    time::sleep,
};

/// Connected host/device stream pair.
pub fn link() -> (DuplexStream, DuplexStream) {
    duplex(4096)
}

/// Board that boots for `boot`, optionally prints `banner`, then answers
/// `set_builtin_led` requests line by line until the host hangs up.
pub async fn led_board(device: DuplexStream, boot: Duration, banner: Option<&'static [u8]>) {
    let (reader, mut writer) = tokio::io::split(device);

    sleep(boot).await;
    if let Some(banner) = banner {
        writer.write_all(banner).await.expect("banner write");
    }

    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let request: Value = serde_json::from_str(&line).expect("request should be json");
        let result = match request["params"]["status"].as_i64() {
            Some(1) => "on",
            _ => "off",
        };
        let response = json!({"jsonrpc": "2.0", "result": result, "id": request["id"]});
        let mut reply = response.to_string().into_bytes();
        reply.extend_from_slice(b"\r\n");
        if writer.write_all(&reply).await.is_err() {
            return;
        }
    }
}
