use crate::error::SimError;
use crate::net::{ElementId, Packet, PacketKind};
use crate::sim::{SimTime, Simulator};

fn pkt(serial: u64, at: f64) -> Packet {
    Packet::new(PacketKind::NonProbe, serial, 100.0, ElementId(0), SimTime(at))
}

#[test]
fn scheduled_packets_order_by_time_then_serial() {
    let mut sim = Simulator::default();
    sim.schedule(pkt(5, 10.0));
    sim.schedule(pkt(1, 10.0));
    sim.schedule(pkt(9, 5.0));
    sim.schedule(pkt(3, 10.0));
    assert_eq!(sim.len(), 4);
    assert_eq!(sim.peek_at(), Some(SimTime(5.0)));

    let order: Vec<u64> = std::iter::from_fn(|| sim.pop()).map(|p| p.serial).collect();
    assert_eq!(order, vec![9, 1, 3, 5]);
    assert!(sim.is_empty());
    assert_eq!(sim.peek_at(), None);
}

#[test]
fn rescheduled_packet_keeps_serial_priority_on_ties() {
    let mut sim = Simulator::default();
    sim.schedule(pkt(2, 1.0));
    sim.schedule(pkt(7, 0.5));

    // serial 7 moves on and lands on the same time as serial 2.
    let mut moved = sim.pop().expect("pkt");
    assert_eq!(moved.serial, 7);
    moved.scheduled_at = SimTime(1.0);
    sim.schedule(moved);

    assert_eq!(sim.pop().expect("pkt").serial, 2);
    assert_eq!(sim.pop().expect("pkt").serial, 7);
}

#[test]
fn advance_to_rejects_time_going_backward() {
    let mut sim = Simulator::default();
    assert_eq!(sim.now(), SimTime::ZERO);
    sim.advance_to(SimTime(1.0)).expect("forward");
    sim.advance_to(SimTime(1.0)).expect("same time is fine");
    assert_eq!(sim.now(), SimTime(1.0));

    let err = sim.advance_to(SimTime(0.5)).expect_err("backward");
    assert!(matches!(err, SimError::ClockRegression { .. }));
    assert_eq!(sim.now(), SimTime(1.0));

    assert!(sim.advance_to(SimTime(f64::NAN)).is_err());
}

#[test]
fn discard_in_flight_empties_the_event_set() {
    let mut sim = Simulator::default();
    sim.schedule(pkt(0, 1.0));
    sim.schedule(pkt(1, 2.0));
    assert_eq!(sim.in_flight().count(), 2);
    assert_eq!(sim.discard_in_flight(), 2);
    assert!(sim.is_empty());
}
