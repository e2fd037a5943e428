use super::*;
use time::macros::datetime;

#[test]
fn envelope_uses_pascal_case_field_names() {
    let env = Envelope::ping("u1", GREETING);
    let json = encode_envelope(&env).expect("encode");
    assert_eq!(json, r#"{"Type":"ping","UserId":"u1","Payload":"Hello from dashboard"}"#);
}

#[test]
fn envelope_omits_absent_fields() {
    let env = Envelope::pong(None, "Server time: 00:00:00");
    let json = encode_envelope(&env).expect("encode");
    assert_eq!(json, r#"{"Type":"pong","Payload":"Server time: 00:00:00"}"#);
}

#[test]
fn decode_accepts_partial_envelope() {
    let env = decode_envelope(r#"{"Type":"unknown"}"#).expect("decode");
    assert_eq!(env.kind(), "unknown");
    assert!(env.user_id.is_none());
    assert!(env.payload.is_none());
    assert!(!env.is_ping());
}

#[test]
fn decode_accepts_null_and_empty_object() {
    let env = decode_envelope(r#"{"Type":null,"UserId":null}"#).expect("decode");
    assert_eq!(env.kind(), "");

    let env = decode_envelope("{}").expect("decode");
    assert_eq!(env, Envelope::default());
}

#[test]
fn decode_ignores_unknown_fields() {
    let env = decode_envelope(r#"{"Type":"ping","Extra":1}"#).expect("decode");
    assert!(env.is_ping());
}

#[test]
fn decode_rejects_non_json() {
    let err = decode_envelope("not-json").expect_err("should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn decode_rejects_schema_violations() {
    assert!(decode_envelope(r#"{"Type":5}"#).is_err());
    assert!(decode_envelope(r#"["ping"]"#).is_err());
    assert!(decode_envelope(r#""ping""#).is_err());
}

#[test]
fn ping_type_is_case_sensitive() {
    let env = decode_envelope(r#"{"Type":"PING"}"#).expect("decode");
    assert!(!env.is_ping());
}

#[test]
fn transport_wraps_stringified_envelope() {
    let msg = TransportMessage::wrap(CHANNEL_NAME, &Envelope::ping("", GREETING)).expect("wrap");
    let json = encode_transport(&msg).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");

    assert_eq!(value["MessageType"], "WebSocket");
    let data = value["Data"].as_str().expect("Data should be a string");
    let inner = decode_envelope(data).expect("inner decode");
    assert_eq!(inner.user_id.as_deref(), Some(""));
    assert_eq!(inner.payload.as_deref(), Some(GREETING));
}

#[test]
fn transport_data_defaults_to_empty() {
    let msg = decode_transport(r#"{"MessageType":"KeepAlive"}"#).expect("decode");
    assert_eq!(msg.message_type, "KeepAlive");
    assert!(msg.data.is_empty());
    assert!(!msg.is_channel(CHANNEL_NAME));
}

#[test]
fn transport_requires_message_type() {
    let err = decode_transport(r#"{"Data":"{}"}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn clock_text_pads_each_component() {
    assert_eq!(clock_text(datetime!(2024-01-02 03:04:05 UTC)), "03:04:05");
    assert_eq!(clock_text(datetime!(2024-01-02 23:59:59 UTC)), "23:59:59");
}

#[test]
fn server_time_payload_has_fixed_prefix() {
    let payload = server_time_payload(datetime!(2024-06-30 12:00:07 UTC));
    assert_eq!(payload, "Server time: 12:00:07");
}
