//! End-to-end switching scenarios over mock ports. Receivers and the
//! switching loop are driven synchronously (`poll_once`/`process_next`),
//! so every counter assertion is deterministic.

use std::sync::Arc;

use virtualswitch::testing::MockPort;
use virtualswitch::{Frame, FrameReceiver, Layer2Switch, MacAddress, PortHandle};

fn mac(octet: u8) -> MacAddress {
    MacAddress::new(octet, octet, octet, octet, octet, octet)
}

/// A minimal well-formed frame whose header matches the given addresses.
fn frame(src: MacAddress, dst: MacAddress) -> Frame {
    let mut buffer = vec![0u8; 64];
    buffer[0..6].copy_from_slice(&dst.octets());
    buffer[6..12].copy_from_slice(&src.octets());
    Frame::new(src, dst, buffer)
}

fn switch_over(ports: &[Arc<MockPort>]) -> Layer2Switch {
    let handles: Vec<PortHandle> = ports.iter()
        .map(|port| -> PortHandle { port.clone() })
        .collect();
    Layer2Switch::new(handles)
}

fn receiver_on(switch: &Layer2Switch, port: &Arc<MockPort>) -> FrameReceiver {
    FrameReceiver::new(port.clone(), switch.queue(), switch.metrics())
}

#[test]
fn learn_then_unicast() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    eth0.push_frame(frame(mac(0x11), mac(0x22)));
    eth0.push_frame(frame(mac(0x22), mac(0x11)));
    rx0.poll_once();
    rx0.poll_once();

    let metrics = switch.metrics();
    assert_eq!(metrics.snapshot().received_frames, 2);
    assert_eq!(metrics.snapshot().read_errors, 0);
    assert_eq!(switch.queue().len(), 2);

    // First frame: destination unknown, flooded out of eth1 only
    switch.process_next();
    assert_eq!(switch.queue().len(), 1);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.sent_frames, 1);
    assert_eq!(snapshot.flood_count, 1);
    assert_eq!(snapshot.send_errors, 0);
    assert_eq!(snapshot.flood_errors, 0);
    assert_eq!(eth1.sent(), vec![frame(mac(0x11), mac(0x22))]);
    assert!(eth0.sent().is_empty());
    assert!(switch.cam().lookup(&mac(0x11)).unwrap().identity_equals(eth0.as_ref()));

    // Second frame: the first source is now known to live on eth0, so no flood
    switch.process_next();
    assert_eq!(switch.queue().len(), 0);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.sent_frames, 2);
    assert_eq!(snapshot.flood_count, 1);
    assert_eq!(snapshot.send_errors, 0);
    assert_eq!(snapshot.flood_errors, 0);
    assert_eq!(eth0.sent(), vec![frame(mac(0x22), mac(0x11))]);
    assert_eq!(switch.cam().len(), 2);
}

#[test]
fn broadcast_floods_all_but_ingress() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let eth2 = MockPort::new("eth2");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone(), eth2.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    let broadcast = frame(mac(0x11), MacAddress::broadcast());
    eth0.push_frame(broadcast.clone());
    rx0.poll_once();
    switch.process_next();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.flood_count, 1);
    assert_eq!(snapshot.sent_frames, 2);
    assert!(eth0.sent().is_empty());
    // The egress buffer is the ingress capture, byte for byte
    assert_eq!(eth1.sent(), vec![broadcast.clone()]);
    assert_eq!(eth2.sent(), vec![broadcast]);
}

#[test]
fn flood_abandons_on_first_send_failure() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let eth2 = MockPort::new("eth2");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone(), eth2.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    eth1.set_send_result(false);
    eth0.push_frame(frame(mac(0x11), mac(0x22)));
    rx0.poll_once();
    switch.process_next();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.flood_count, 1);
    assert_eq!(snapshot.sent_frames, 0);
    assert_eq!(snapshot.flood_errors, 1);
    assert_eq!(snapshot.send_errors, 0);
    // One send was attempted (on eth1); eth2 was never tried
    assert_eq!(eth1.sent().len(), 1);
    assert!(eth2.sent().is_empty());
}

#[test]
fn receive_failure_is_counted_and_skipped() {
    let eth0 = MockPort::new("eth0");
    let switch = switch_over(&[eth0.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    eth0.push_read_error();
    rx0.poll_once();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.received_frames, 0);
    assert_eq!(snapshot.read_errors, 1);
    assert!(switch.queue().is_empty());
}

#[test]
fn unicast_send_failure_is_counted() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);
    let rx1 = receiver_on(&switch, &eth1);

    // Teach the CAM which port the destination lives on (the priming frame floods)
    eth1.push_frame(frame(mac(0x22), mac(0x33)));
    rx1.poll_once();
    switch.process_next();
    assert_eq!(switch.metrics().snapshot().sent_frames, 1);

    // A frame for the learned MAC arrives on eth0, but eth1 refuses it
    eth1.set_send_result(false);
    eth0.push_frame(frame(mac(0x11), mac(0x22)));
    rx0.poll_once();
    switch.process_next();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.send_errors, 1);
    assert_eq!(snapshot.flood_errors, 0);
    // No sends beyond the priming flood, and no second flood decision
    assert_eq!(snapshot.sent_frames, 1);
    assert_eq!(snapshot.flood_count, 1);
}

#[test]
fn relearning_moves_a_mac_to_its_new_port() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);
    let rx1 = receiver_on(&switch, &eth1);

    eth0.push_frame(frame(mac(0x11), mac(0x99)));
    rx0.poll_once();
    switch.process_next();
    assert!(switch.cam().lookup(&mac(0x11)).unwrap().identity_equals(eth0.as_ref()));

    eth1.push_frame(frame(mac(0x11), mac(0x99)));
    rx1.poll_once();
    switch.process_next();
    assert!(switch.cam().lookup(&mac(0x11)).unwrap().identity_equals(eth1.as_ref()));
    // Moved, not duplicated; destinations are never learned
    assert_eq!(switch.cam().len(), 1);
}

#[test]
fn broadcast_source_mac_is_still_learned() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);
    let rx1 = receiver_on(&switch, &eth1);

    eth0.push_frame(frame(MacAddress::broadcast(), mac(0x22)));
    rx0.poll_once();
    switch.process_next();
    assert!(switch.cam()
        .lookup(&MacAddress::broadcast())
        .unwrap()
        .identity_equals(eth0.as_ref()));

    // A broadcast destination floods even though the CAM now has an entry
    // for the broadcast MAC
    eth1.push_frame(frame(mac(0x33), MacAddress::broadcast()));
    rx1.poll_once();
    switch.process_next();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.flood_count, 2);
    assert_eq!(eth0.sent().len(), 1);
}

#[test]
fn known_mac_on_the_ingress_port_still_unicasts() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    eth0.push_frame(frame(mac(0x11), mac(0x22)));
    rx0.poll_once();
    switch.process_next();

    // The learned MAC sits on eth0; a frame for it arriving on eth0 goes right
    // back out of eth0
    eth0.push_frame(frame(mac(0x33), mac(0x11)));
    rx0.poll_once();
    switch.process_next();

    let snapshot = switch.metrics().snapshot();
    assert_eq!(snapshot.flood_count, 1);
    assert_eq!(snapshot.sent_frames, 2);
    assert_eq!(eth0.sent(), vec![frame(mac(0x33), mac(0x11))]);
}

#[test]
fn frames_from_one_port_are_processed_in_receive_order() {
    let eth0 = MockPort::new("eth0");
    let eth1 = MockPort::new("eth1");
    let mut switch = switch_over(&[eth0.clone(), eth1.clone()]);
    let rx0 = receiver_on(&switch, &eth0);

    for payload_octet in 1..=4u8 {
        let mut spread = frame(mac(0x11), mac(0x22));
        let mut buffer = spread.buffer().to_vec();
        buffer[63] = payload_octet;
        spread = Frame::new(spread.source_mac(), spread.destination_mac(), buffer);
        eth0.push_frame(spread);
        rx0.poll_once();
    }
    for _ in 0..4 {
        switch.process_next();
    }

    let sent = eth1.sent();
    assert_eq!(sent.len(), 4);
    for (index, sent_frame) in sent.iter().enumerate() {
        assert_eq!(sent_frame.buffer()[63], index as u8 + 1);
    }
}
