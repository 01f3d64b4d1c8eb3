use crate::{Ruleset, StateIdx};

/// One line of the automaton: `interior + 2` cells, with the external
/// marker fixed at both ends for the whole run. Only indices
/// `1..=interior` are ever written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    cells: Vec<StateIdx>,
}

impl Row {
    /// A row of soldiers between two external markers.
    pub fn new(interior: usize, rules: &Ruleset) -> Self {
        let mut cells = vec![rules.soldier(); interior + 2];
        cells[0] = rules.external();
        cells[interior + 1] = rules.external();
        Self { cells }
    }

    /// The starting row: soldiers with the general at the left end.
    pub fn first(interior: usize, rules: &Ruleset) -> Self {
        assert!(interior >= 1, "a row needs at least one interior cell");
        let mut row = Self::new(interior, rules);
        row.cells[1] = rules.general();
        row
    }

    pub(crate) fn from_cells(cells: Vec<StateIdx>) -> Self {
        debug_assert!(cells.len() >= 2);
        Self { cells }
    }

    /// Total length including both external markers.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn interior_len(&self) -> usize {
        self.cells.len() - 2
    }

    pub fn cells(&self) -> &[StateIdx] {
        &self.cells
    }

    /// The live cells, externals excluded.
    pub fn interior(&self) -> &[StateIdx] {
        &self.cells[1..self.cells.len() - 1]
    }

    /// True iff every interior cell has reached the firing state.
    pub fn fired(&self, rules: &Ruleset) -> bool {
        self.interior().iter().all(|&c| c == rules.firing())
    }

    /// Computes the next generation of every interior cell into `next`,
    /// reading the two external markers as fixed neighbors. The buffers
    /// are swapped by the caller, never copied.
    pub fn step_into(&self, next: &mut Row, rules: &Ruleset) {
        debug_assert_eq!(self.cells.len(), next.cells.len());
        for (i, w) in self.cells.windows(3).enumerate() {
            next.cells[i + 1] = rules.lookup(w[0], w[1], w[2]);
        }
    }

    /// Renders the interior as `|name|name|...|`, the format the classic
    /// simulators dump after every generation.
    pub fn render(&self, rules: &Ruleset) -> String {
        let mut out = String::from("|");
        for &c in self.interior() {
            out.push_str(rules.name(c));
            out.push('|');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{State, StateClass};

    fn rules() -> Ruleset {
        let states = vec![
            State::new("W", StateClass::External),
            State::new("G", StateClass::General),
            State::new("Q", StateClass::Soldier),
            State::new("F", StateClass::Firing),
        ];
        Ruleset::from_quadruples(states, [["W", "G", "W", "F"]]).unwrap()
    }

    #[test]
    fn first_row_layout() {
        let rules = rules();
        let row = Row::first(4, &rules);
        assert_eq!(row.len(), 6);
        assert_eq!(row.cells()[0], rules.external());
        assert_eq!(row.cells()[5], rules.external());
        assert_eq!(row.cells()[1], rules.general());
        assert!(row.interior()[1..].iter().all(|&c| c == rules.soldier()));
    }

    #[test]
    fn fired_requires_every_interior_cell() {
        let rules = rules();
        let mut row = Row::new(3, &rules);
        assert!(!row.fired(&rules));
        for c in row.cells.iter_mut().skip(1).take(3) {
            *c = rules.firing();
        }
        assert!(row.fired(&rules));
    }

    #[test]
    fn step_preserves_the_boundary() {
        let rules = rules();
        let row = Row::first(1, &rules);
        let mut next = Row::new(1, &rules);
        row.step_into(&mut next, &rules);
        assert_eq!(next.cells()[0], rules.external());
        assert_eq!(next.cells()[2], rules.external());
        assert_eq!(next.interior(), [rules.firing()]);
    }

    #[test]
    fn render_joins_names_with_pipes() {
        let rules = rules();
        let row = Row::first(3, &rules);
        assert_eq!(row.render(&rules), "|G|Q|Q|");
    }
}
