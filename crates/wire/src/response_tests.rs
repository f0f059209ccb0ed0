// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn opened_round_trips() {
    let resp = Response::Opened { handle_id: 9, status: 0 };
    let encoded = serde_json::to_string(&resp).unwrap();
    assert_eq!(serde_json::from_str::<Response>(&encoded).unwrap(), resp);
}

#[test]
fn bad_handle_round_trips() {
    let resp = Response::BadHandle;
    let encoded = serde_json::to_string(&resp).unwrap();
    assert_eq!(serde_json::from_str::<Response>(&encoded).unwrap(), resp);
}

#[test]
fn closed_carries_snapshot_path() {
    let resp = Response::Closed { snapshot_path: "/mnt/.sessionfs/1_2.snap".to_string() };
    let encoded = serde_json::to_string(&resp).unwrap();
    assert_eq!(serde_json::from_str::<Response>(&encoded).unwrap(), resp);
}
