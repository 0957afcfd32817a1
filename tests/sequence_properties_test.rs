use bus_boarding::core::sequencer::booking_key;
use bus_boarding::{parse, render_tsv, sequence, Booking};
use proptest::prelude::*;

fn seat_label() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => ("[A-D]", 1u32..40).prop_map(|(row, pos)| format!("{}{}", row, pos)),
        1 => "[a-z?]{1,3}",
    ]
}

fn booking_id() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (1u32..500).prop_map(|id| id.to_string()),
        1 => "[a-z]{1,4}",
    ]
}

fn bookings() -> impl Strategy<Value = Vec<Booking>> {
    prop::collection::vec(
        (booking_id(), prop::collection::vec(seat_label(), 1..4))
            .prop_map(|(id, seats)| Booking::new(id, seats)),
        0..30,
    )
}

#[test]
fn test_readme_scenario() {
    let bookings = parse("Booking_ID\tSeats\n101\tA1,B1\n120\tA20,C2\n");
    let entries = sequence(&bookings);
    assert_eq!(render_tsv(&entries), "Seq\tBooking_ID\n1\t120\n2\t101");
}

proptest! {
    /// Property: seq runs 1..=n without gaps
    #[test]
    fn prop_seq_is_contiguous(input in bookings()) {
        let entries = sequence(&input);
        prop_assert_eq!(entries.len(), input.len());
        for (index, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.seq, index + 1);
        }
    }

    /// Property: furthest first, then lower numeric ID
    #[test]
    fn prop_ordering_invariant(input in bookings()) {
        let entries = sequence(&input);
        for pair in entries.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            prop_assert!(earlier.max_distance >= later.max_distance);
            if earlier.max_distance == later.max_distance {
                prop_assert!(booking_key(&earlier.booking_id) <= booking_key(&later.booking_id));
            }
        }
    }

    /// Property: ranking an already ranked list keeps the order
    #[test]
    fn prop_ranking_is_idempotent(input in bookings()) {
        let first = sequence(&input);
        let reranked: Vec<Booking> = first.iter().map(|e| e.to_booking()).collect();
        prop_assert_eq!(sequence(&reranked), first);
    }

    /// Property: well-formed rows survive a tab-separated round through the parser
    #[test]
    fn prop_parser_reads_rendered_rows(input in bookings()) {
        let mut text = String::from("Booking_ID\tSeats\n");
        for booking in &input {
            text.push_str(&format!("{}\t{}\n", booking.booking_id, booking.seats.join(",")));
        }
        prop_assert_eq!(parse(&text), input);
    }
}
