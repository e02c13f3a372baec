//! Seat rotation arithmetic.
//!
//! Seats sit on a ring of four. With three seats the north seat stays empty and
//! is stepped over after the modulo step, so reversing direction needs no
//! separate lookup table. Three-seat games have no true opposite seat: the
//! opposite resolves to the previous seat.

use serde::{Deserialize, Serialize};

use crate::action::{NORTH, PlayerId};
use crate::card::SEAT_COUNT;

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Seat indices increase (+1).
    Clockwise,
    /// Seat indices decrease (-1).
    CounterClockwise,
    /// Round over, no rotation.
    Stopped,
}

impl Direction {
    /// Offset added modulo four to move one seat along.
    #[inline]
    fn step(self) -> usize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => SEAT_COUNT - 1,
            Direction::Stopped => 0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
            Direction::Stopped => Direction::Stopped,
        }
    }
}

/// Seat count and direction, enough to resolve any neighbor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRing {
    seat_count: usize,
    direction: Direction,
}

impl SeatRing {
    pub fn new(seat_count: usize, direction: Direction) -> Self {
        debug_assert!(seat_count == 3 || seat_count == 4);
        Self {
            seat_count,
            direction,
        }
    }

    pub fn seat_count(&self) -> usize {
        self.seat_count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Whether `seat` takes part in the game.
    #[inline]
    pub fn is_seated(&self, seat: PlayerId) -> bool {
        seat < SEAT_COUNT && !(self.seat_count == 3 && seat == NORTH)
    }

    /// Seated indices in ascending order.
    pub fn seats(&self) -> impl Iterator<Item = PlayerId> + '_ {
        (0..SEAT_COUNT).filter(move |seat| self.is_seated(*seat))
    }

    #[inline]
    fn skip_empty(&self, seat: PlayerId, step: usize) -> PlayerId {
        if self.seat_count == 3 && seat == NORTH {
            (seat + step) % SEAT_COUNT
        } else {
            seat
        }
    }

    pub fn next_of(&self, seat: PlayerId) -> PlayerId {
        let step = self.direction.step();
        self.skip_empty((seat + step) % SEAT_COUNT, step)
    }

    pub fn prev_of(&self, seat: PlayerId) -> PlayerId {
        let back = (SEAT_COUNT - self.direction.step()) % SEAT_COUNT;
        self.skip_empty((seat + back) % SEAT_COUNT, back)
    }

    /// Two seats along. Coincides with [`SeatRing::prev_of`] for three seats.
    pub fn oppo_of(&self, seat: PlayerId) -> PlayerId {
        let step = self.direction.step();
        self.skip_empty((self.next_of(seat) + step) % SEAT_COUNT, step)
    }

    /// Under the team rule seats 0/2 and 1/3 share a side.
    pub fn are_teammates(&self, a: PlayerId, b: PlayerId) -> bool {
        self.seat_count == SEAT_COUNT && a % 2 == b % 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_seats_clockwise() {
        let ring = SeatRing::new(4, Direction::Clockwise);
        assert_eq!(ring.next_of(0), 1);
        assert_eq!(ring.next_of(3), 0);
        assert_eq!(ring.prev_of(0), 3);
        assert_eq!(ring.oppo_of(1), 3);
        assert_eq!(ring.oppo_of(2), 0);
    }

    #[test]
    fn three_seats_skip_north_both_ways() {
        let mut ring = SeatRing::new(3, Direction::Clockwise);
        assert_eq!(ring.next_of(1), 3);
        assert_eq!(ring.prev_of(3), 1);
        ring.set_direction(ring.direction().reversed());
        assert_eq!(ring.next_of(3), 1);
        assert_eq!(ring.next_of(0), 3);
        assert_eq!(ring.prev_of(1), 3);
        assert_eq!(ring.seats().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn three_seat_opposite_is_previous() {
        for direction in [Direction::Clockwise, Direction::CounterClockwise] {
            let ring = SeatRing::new(3, direction);
            for seat in [0, 1, 3] {
                assert_eq!(ring.oppo_of(seat), ring.prev_of(seat));
            }
        }
    }

    #[test]
    fn stopped_ring_stays_put() {
        let ring = SeatRing::new(4, Direction::Stopped);
        assert_eq!(ring.next_of(2), 2);
        assert_eq!(ring.prev_of(2), 2);
    }

    #[test]
    fn teammates_only_with_four_seats() {
        let four = SeatRing::new(4, Direction::Clockwise);
        assert!(four.are_teammates(0, 2));
        assert!(!four.are_teammates(0, 1));
        let three = SeatRing::new(3, Direction::Clockwise);
        assert!(!three.are_teammates(1, 3));
    }
}
