use std::{collections::BTreeSet, sync::Arc, thread};

use serde_json::{Value, json};
use tether_core::{
    DeviceCommand, JsonRpcRequest, Params, ReplyError, RequestBuilder, RequestId,
    RequestIdCounter, classify_reply,
};

#[test]
fn request_serializes_to_wire_shape() {
    let builder = RequestBuilder::new();
    let request = builder.build_command(DeviceCommand::LedOn);

    let encoded = serde_json::to_string(&request).expect("request encode should succeed");
    assert_eq!(
        encoded,
        r#"{"jsonrpc":"2.0","method":"set_builtin_led","params":{"status":1},"id":1}"#
    );

    let decoded: JsonRpcRequest =
        serde_json::from_str(&encoded).expect("request decode should succeed");
    assert_eq!(decoded, request);
}

#[test]
fn missing_params_default_to_empty_object() {
    let builder = RequestBuilder::new();
    let request = builder.build("ping", None);

    assert!(request.params().is_empty());
    let encoded = serde_json::to_value(&request).expect("request encode should succeed");
    assert_eq!(encoded["params"], json!({}));
    assert_eq!(request.version(), "2.0");
}

#[test]
fn ids_start_at_one_and_strictly_increase() {
    let builder = RequestBuilder::new();
    assert_eq!(builder.counter().last_issued(), 0);

    let ids: Vec<RequestId> = (0..16)
        .map(|_| builder.build("ping", None).id())
        .collect();

    assert_eq!(ids.first(), Some(&RequestId(1)));
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(builder.counter().last_issued(), 16);
}

#[test]
fn cloned_builders_share_one_counter() {
    let counter = Arc::new(RequestIdCounter::new());
    let first = RequestBuilder::with_counter(Arc::clone(&counter));
    let second = first.clone();

    assert_eq!(first.build("a", None).id(), RequestId(1));
    assert_eq!(second.build("b", None).id(), RequestId(2));
    assert_eq!(counter.next_id(), RequestId(3));
}

#[test]
fn concurrent_builders_never_reuse_ids() {
    let builder = RequestBuilder::new();

    let ids: Vec<u64> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let builder = builder.clone();
                scope.spawn(move || {
                    (0..250)
                        .map(|_| builder.build("ping", None).id().0)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| worker.join().expect("worker should finish"))
            .collect()
    });

    let unique: BTreeSet<u64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 1000);
    assert_eq!(unique.first(), Some(&1));
    assert_eq!(unique.last(), Some(&1000));
}

#[test]
fn device_commands_map_to_led_method() {
    let mut on = Params::new();
    on.insert("status".to_string(), json!(1));
    assert_eq!(DeviceCommand::LedOn.method(), "set_builtin_led");
    assert_eq!(DeviceCommand::LedOn.params(), on);
    assert_eq!(DeviceCommand::LedOff.params()["status"], json!(0));

    assert_eq!(DeviceCommand::from_name("LED_OFF"), Some(DeviceCommand::LedOff));
    assert_eq!(DeviceCommand::from_name("blink"), None);
}

#[test]
fn classify_reply_returns_result() {
    let reply = json!({"jsonrpc": "2.0", "result": "on", "id": 1});
    assert_eq!(classify_reply(&reply), Ok(json!("on")));
}

#[test]
fn classify_reply_rejects_bad_envelopes() {
    let wrong_version = json!({"jsonrpc": "1.0", "result": "on"});
    assert_eq!(
        classify_reply(&wrong_version),
        Err(ReplyError::InvalidVersion {
            found: Some(json!("1.0"))
        })
    );
    assert_eq!(
        classify_reply(&Value::String("BOOT OK".to_string())),
        Err(ReplyError::InvalidVersion { found: None })
    );

    let error = json!({"jsonrpc": "2.0", "error": {"code": -32601, "message": "Method not found"}, "id": 3});
    let err = classify_reply(&error).expect_err("error reply should fail");
    assert_eq!(err.code(), Some(-32601));
    assert!(err.to_string().contains("Method not found"));

    let empty = json!({"jsonrpc": "2.0", "result": null, "id": 4});
    assert_eq!(classify_reply(&empty), Err(ReplyError::MissingResult));
}
