use httpbridge_channel::{AppChannel, ChannelError, LoopbackChannel};
use httpbridge_dict::{Dictionary, Tuple};
use httpbridge_proto::{bits_from_float, keys, Bridge, BridgeError, Callbacks, Location};

const APP: u32 = 0x5EED_0001;

#[derive(Debug, Default)]
struct Seen {
    events: Vec<String>,
}

type TestBridge = Bridge<LoopbackChannel, Seen>;

fn record(seen: &mut Seen, event: String) {
    seen.events.push(event);
}

fn bridge() -> TestBridge {
    let mut bridge = Bridge::with_app_id(LoopbackChannel::new(), APP);
    let callbacks = Callbacks::new()
        .on_failure(|id, status, seen: &mut Seen| record(seen, format!("failure {id} {status}")))
        .on_success(|id, status, dict, seen: &mut Seen| {
            let body = dict.find(1).and_then(|t| t.value.as_str()).unwrap_or("");
            record(seen, format!("success {id} {status} {body}"))
        })
        .on_reconnect(|seen: &mut Seen| record(seen, "reconnect".to_string()))
        .on_cookie_get(|id, tuple, seen: &mut Seen| {
            record(seen, format!("cookie_get {id} {} {}", tuple.key, tuple.value))
        })
        .on_cookie_batch_get(|id, dict, seen: &mut Seen| {
            record(seen, format!("cookie_batch_get {id} {}", dict.len()))
        })
        .on_cookie_set(|id, ok, seen: &mut Seen| record(seen, format!("cookie_set {id} {ok}")))
        .on_cookie_fsync(|ok, seen: &mut Seen| record(seen, format!("cookie_fsync {ok}")))
        .on_cookie_delete(|id, ok, seen: &mut Seen| {
            record(seen, format!("cookie_delete {id} {ok}"))
        })
        .on_time(|info, seen: &mut Seen| {
            record(
                seen,
                format!(
                    "time {} {} {} {}",
                    info.unix_time, info.utc_offset, info.is_dst, info.tz_name
                ),
            )
        })
        .on_location(|loc: &Location, seen: &mut Seen| {
            record(
                seen,
                format!(
                    "location {} {} {} {}",
                    loc.accuracy, loc.latitude, loc.longitude, loc.altitude
                ),
            )
        });
    assert!(bridge.register_callbacks(callbacks, Seen::default()));
    bridge
}

fn respond(bridge: &mut TestBridge, tuples: Vec<Tuple>) {
    bridge
        .channel_mut()
        .deliver(&Dictionary::from(tuples))
        .expect("bridge should be registered");
    bridge.process_events();
}

fn seen(bridge: &TestBridge) -> Vec<String> {
    bridge.context().expect("context registered").events.clone()
}

fn app_id_tuple() -> Tuple {
    Tuple::new(keys::APP_ID, APP as i32)
}

#[test]
fn http_get_success_round_trip() {
    let mut bridge = bridge();
    bridge.http_get("http://example.com/a", 42).unwrap().send().unwrap();

    let request = bridge.channel_mut().take_sent().unwrap().unwrap();
    let request_id = request.find(keys::REQUEST_ID).unwrap().value.as_i32().unwrap();
    let app_id = request.find(keys::APP_ID).unwrap().value.as_u32().unwrap();
    assert_eq!(app_id, APP);

    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::URL, 1u8),
            Tuple::new(keys::STATUS, 200i16),
            Tuple::new(keys::REQUEST_ID, request_id),
            Tuple::new(keys::APP_ID, app_id as i32),
            Tuple::new(1, "hello"),
        ],
    );
    assert_eq!(seen(&bridge), ["success 42 200 hello"]);
}

#[test]
fn http_failure_flag_reports_failure() {
    let mut bridge = bridge();
    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::URL, 1u8),
            Tuple::new(keys::SUCCESS, 0u8),
            Tuple::new(keys::STATUS, 500i16),
            Tuple::new(keys::REQUEST_ID, 7i32),
            app_id_tuple(),
        ],
    );
    assert_eq!(seen(&bridge), ["failure 7 500"]);
}

#[test]
fn http_missing_fields_reports_invalid_response() {
    let mut bridge = bridge();
    respond(
        &mut bridge,
        vec![Tuple::new(keys::URL, 1u8), Tuple::new(keys::REQUEST_ID, 7i32), app_id_tuple()],
    );
    assert_eq!(seen(&bridge), [format!("failure 0 {}", 1000 + (1 << 17))]);
}

#[test]
fn connect_wins_even_for_other_apps() {
    let mut bridge = bridge();
    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::CONNECT, 1u8),
            Tuple::new(keys::URL, 1u8),
            Tuple::new(keys::COOKIE_STORE, 1i32),
            Tuple::new(keys::APP_ID, 1i32),
        ],
    );
    assert_eq!(seen(&bridge), ["reconnect"]);
}

#[test]
fn mismatched_app_id_fires_nothing() {
    let mut bridge = bridge();
    respond(
        &mut bridge,
        vec![Tuple::new(keys::COOKIE_STORE, 1i32), Tuple::new(keys::APP_ID, 1i32)],
    );
    respond(&mut bridge, vec![Tuple::new(keys::COOKIE_DELETE, 1i32)]);
    assert!(seen(&bridge).is_empty());
}

#[test]
fn time_and_location_responses() {
    let mut bridge = bridge();
    bridge.time_request().unwrap();
    bridge.location_request().unwrap();
    assert_eq!(bridge.channel().sent_len(), 2);

    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::TIME, 1_700_000_000u32),
            Tuple::new(keys::UTC_OFFSET, 3600i32),
            Tuple::new(keys::IS_DST, 0u8),
            Tuple::new(keys::TZ_NAME, "Europe/Paris"),
        ],
    );
    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::LOCATION, bits_from_float(12.5)),
            Tuple::new(keys::LONGITUDE, bits_from_float(-0.25)),
        ],
    );
    assert_eq!(
        seen(&bridge),
        ["time 1700000000 3600 false Europe/Paris", "location 12.5 0 -0.25 0"]
    );
}

#[test]
fn cookie_batch_skips_reserved_keys() {
    let mut bridge = bridge();
    bridge.cookie_get_multiple(3, &[100, 101, 102]).unwrap();

    respond(
        &mut bridge,
        vec![
            Tuple::new(keys::COOKIE_LOAD, 3i32),
            app_id_tuple(),
            Tuple::new(100, 1u8),
            Tuple::new(101, "two"),
            Tuple::new(102, -3i32),
            Tuple::new(keys::SUCCESS, 1u8),
        ],
    );

    // 6 tuples, 3 of them reserved
    assert_eq!(
        seen(&bridge),
        [
            "cookie_batch_get 3 6",
            "cookie_get 3 100 1",
            "cookie_get 3 101 \"two\"",
            "cookie_get 3 102 -3",
        ]
    );
}

#[test]
fn cookie_confirmations() {
    let mut bridge = bridge();
    bridge.cookie_set(1, 100, "v").unwrap();
    bridge.cookie_delete(2, 100).unwrap();
    bridge.cookie_fsync().unwrap();
    assert_eq!(bridge.channel().sent_len(), 3);

    respond(&mut bridge, vec![Tuple::new(keys::COOKIE_STORE, 1i32), app_id_tuple()]);
    respond(&mut bridge, vec![Tuple::new(keys::COOKIE_DELETE, 2i32), app_id_tuple()]);
    respond(&mut bridge, vec![Tuple::new(keys::COOKIE_FSYNC, 1u8), app_id_tuple()]);

    assert_eq!(
        seen(&bridge),
        ["cookie_set 1 true", "cookie_delete 2 true", "cookie_fsync true"]
    );
}

#[test]
fn transport_failures_reach_failure_handler() {
    let mut bridge = bridge();
    bridge.channel_mut().fail_next_send(ChannelError::AppNotRunning);
    bridge.http_get("http://x/", 1).unwrap().send().unwrap();
    bridge.channel_mut().drop_inbound(ChannelError::BufferOverflow);

    assert_eq!(bridge.process_events(), 2);
    assert_eq!(seen(&bridge), ["failure 0 1016", "failure 0 1128"]);
}

#[test]
fn oversize_inbound_is_reported_as_overflow() {
    let mut bridge = bridge();
    let big = "x".repeat(400);
    respond(
        &mut bridge,
        vec![Tuple::new(keys::COOKIE_LOAD, 1i32), app_id_tuple(), Tuple::new(1, big.as_str())],
    );
    assert_eq!(seen(&bridge), ["failure 0 1128"]);
}

#[test]
fn outbound_slot_is_never_left_held() {
    let mut bridge = bridge();

    bridge.channel_mut().set_connected(false);
    assert_eq!(
        bridge.cookie_fsync(),
        Err(BridgeError::Channel(ChannelError::NotConnected))
    );
    assert!(!bridge.channel().is_slot_held());
    bridge.channel_mut().set_connected(true);

    let too_long = "u".repeat(300);
    assert!(bridge.http_get(&too_long, 1).is_err());
    assert!(!bridge.channel().is_slot_held());

    {
        let mut request = bridge.cookie_set_start(5).unwrap();
        request.write(1, 1u8).unwrap();
    }
    assert!(!bridge.channel().is_slot_held());
    assert_eq!(bridge.channel().sent_len(), 0);

    bridge.cookie_get(1, 9).unwrap();
    assert!(!bridge.channel().is_slot_held());
}

#[test]
fn double_registration_keeps_one_binding() {
    let mut bridge = bridge();
    assert!(bridge.register_callbacks(Callbacks::new(), Seen::default()));
    assert!(bridge.is_bound());
    assert!(bridge.channel().is_registered());

    respond(&mut bridge, vec![Tuple::new(keys::CONNECT, 1u8)]);
    assert!(seen(&bridge).is_empty());
}
