use crate::{Row, StateIdx};
use tokio::sync::mpsc::{channel, Receiver, Sender};

/// One direction pair of the handshake between two adjacent partitions.
///
/// Both channels have capacity 1 and carry exactly one message per
/// generation: the new value of the sender's edge cell. Receiving it is
/// what lets a worker start the next generation, so the message is both
/// the synchronization token and the ghost-cell transport.
pub(super) struct Link {
    pub(super) tx: Sender<StateIdx>,
    pub(super) rx: Receiver<StateIdx>,
}

/// One open or closed side of a partition.
///
/// `ghost` is the partition's read-only copy of the nearest cell it does
/// not own. On a linked side it is refreshed from the neighbor every
/// generation; on an unlinked side it is the external marker and never
/// changes.
pub(super) struct Side {
    pub(super) ghost: StateIdx,
    pub(super) link: Option<Link>,
}

/// A contiguous run of interior cells owned by one worker, together with
/// its two ghost values and link endpoints. Ownership of every index is
/// fixed for the whole run.
pub(super) struct Partition {
    /// Global row index of the first owned cell.
    pub(super) start: usize,
    /// The owned cells, copied out of the starting row.
    pub(super) cells: Vec<StateIdx>,
    pub(super) left: Side,
    pub(super) right: Side,
}

/// Splits `row` into at most `count` partitions and wires each adjacent
/// pair with a capacity-1 channel per direction.
///
/// The row is walked in strides of `ceil(len / count)`; each window keeps
/// only its interior cells, and the last window absorbs any remainder.
/// Windows that hold no interior cell (possible when `count` approaches
/// the row length) are dropped entirely rather than wired up: a worker
/// with nothing to compute would quit on the spot and starve its
/// neighbor's handshake.
pub(super) fn split(row: &Row, count: usize) -> Vec<Partition> {
    let len = row.len();
    let stride = len.div_ceil(count.max(1));
    let mut parts = Vec::new();

    let mut offset = 0;
    while offset < len {
        // clamp the window to the interior
        let lo = offset.max(1);
        let hi = (offset + stride).min(len - 1);
        offset += stride;
        if lo >= hi {
            continue;
        }
        parts.push(Partition {
            start: lo,
            cells: row.cells()[lo..hi].to_vec(),
            left: Side {
                ghost: row.cells()[lo - 1],
                link: None,
            },
            right: Side {
                ghost: row.cells()[hi],
                link: None,
            },
        });
    }

    for i in 1..parts.len() {
        let (to_right_tx, to_right_rx) = channel(1);
        let (to_left_tx, to_left_rx) = channel(1);
        parts[i - 1].right.link = Some(Link {
            tx: to_right_tx,
            rx: to_left_rx,
        });
        parts[i].left.link = Some(Link {
            tx: to_left_tx,
            rx: to_right_rx,
        });
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ruleset, State, StateClass};

    fn rules() -> Ruleset {
        let states = vec![
            State::new("W", StateClass::External),
            State::new("G", StateClass::General),
            State::new("Q", StateClass::Soldier),
            State::new("F", StateClass::Firing),
        ];
        Ruleset::from_quadruples(states, [["W", "G", "W", "F"]]).unwrap()
    }

    fn ranges(parts: &[Partition]) -> Vec<(usize, usize)> {
        parts
            .iter()
            .map(|p| (p.start, p.start + p.cells.len()))
            .collect()
    }

    #[test]
    fn two_cells_two_workers() {
        let rules = rules();
        let row = Row::first(2, &rules);
        let parts = split(&row, 2);
        assert_eq!(ranges(&parts), [(1, 2), (2, 3)]);
        // exactly one boundary pair between them
        assert!(parts[0].left.link.is_none() && parts[0].right.link.is_some());
        assert!(parts[1].left.link.is_some() && parts[1].right.link.is_none());
    }

    #[test]
    fn owned_ranges_cover_the_interior_exactly_once() {
        let rules = rules();
        for n in [1, 2, 3, 7, 10, 100] {
            let row = Row::first(n, &rules);
            for count in 1..=n + 4 {
                let parts = split(&row, count);
                let mut expected = 1;
                for (lo, hi) in ranges(&parts) {
                    assert_eq!(lo, expected, "n={n} count={count}");
                    assert!(hi > lo);
                    expected = hi;
                }
                assert_eq!(expected, n + 1, "n={n} count={count}");
                assert!(parts.len() <= count);
            }
        }
    }

    #[test]
    fn last_partition_absorbs_the_remainder() {
        let rules = rules();
        let row = Row::first(10, &rules);
        // len 12, stride 4
        assert_eq!(ranges(&split(&row, 3)), [(1, 4), (4, 8), (8, 11)]);
    }

    #[test]
    fn interior_empty_windows_are_dropped() {
        let rules = rules();
        let row = Row::first(3, &rules);
        // len 5, stride 2: the third window holds only the right external
        let parts = split(&row, 3);
        assert_eq!(ranges(&parts), [(1, 2), (2, 4)]);
        assert!(parts.last().unwrap().right.link.is_none());
    }

    #[test]
    fn ghosts_mirror_the_starting_row() {
        let rules = rules();
        let row = Row::first(4, &rules);
        let parts = split(&row, 2);
        assert_eq!(parts[0].left.ghost, rules.external());
        assert_eq!(parts[0].right.ghost, row.cells()[parts[1].start]);
        assert_eq!(parts[1].left.ghost, row.cells()[parts[0].start + parts[0].cells.len() - 1]);
        assert_eq!(parts[1].right.ghost, rules.external());
    }
}
