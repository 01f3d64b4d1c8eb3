use ahash::AHashMap as HashMap;
use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;

/// Index of a state in the [`Ruleset`]'s state list. Rows store these
/// instead of names, so a cell is one byte.
pub type StateIdx = u8;

/// Role of a state in the synchronization protocol.
///
/// The four named classes are required by the automaton model; everything
/// else the rule author introduces (waves, reflections, counters) is
/// [`StateClass::Plain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateClass {
    /// The single initiating cell at the left end of the row.
    General,
    /// The initial state of every other interior cell.
    Soldier,
    /// The state all interior cells must reach simultaneously.
    Firing,
    /// The immutable marker outside both ends of the row.
    External,
    /// Any auxiliary state of the rule table.
    Plain,
}

impl StateClass {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "general" => Self::General,
            "soldier" => Self::Soldier,
            "firing" => Self::Firing,
            "external" => Self::External,
            _ => Self::Plain,
        }
    }
}

/// A named automaton state.
#[derive(Clone, Debug)]
pub struct State {
    pub name: String,
    pub class: StateClass,
}

impl State {
    pub fn new(name: impl Into<String>, class: StateClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

/// Triples that no rule maps are resolved to this index instead of failing,
/// matching the zero-initialized table of classic rule files.
pub const DEFAULT_STATE: StateIdx = 0;

/// The state list and the dense transition table of one automaton.
///
/// The table is total: `lookup` is a plain array read and cannot fail.
/// It is sized `K^3` from the discovered state count, so the only hard
/// limit on `K` is the range of [`StateIdx`].
///
/// A `Ruleset` is built once at startup and read-only afterwards; engines
/// take it by reference (the parallel one clones it into an `Arc` for its
/// workers).
#[derive(Clone)]
pub struct Ruleset {
    states: Vec<State>,
    /// Dense `K^3` table indexed by `(left * K + center) * K + right`.
    table: Vec<StateIdx>,
    general: StateIdx,
    soldier: StateIdx,
    firing: StateIdx,
    external: StateIdx,
}

impl Ruleset {
    /// Builds a ruleset from a state list and `(left, center, right, next)`
    /// state-name quadruples.
    ///
    /// # Errors
    ///
    /// Fails if any of the four required classes is missing from the state
    /// list, if the list exceeds the [`StateIdx`] range, or if a quadruple
    /// names an unknown state.
    pub fn from_quadruples<S: AsRef<str>>(
        states: Vec<State>,
        quadruples: impl IntoIterator<Item = [S; 4]>,
    ) -> Result<Self> {
        if states.len() > StateIdx::MAX as usize + 1 {
            bail!("too many states: {} (limit {})", states.len(), StateIdx::MAX as usize + 1);
        }
        let index_of: HashMap<&str, StateIdx> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i as StateIdx))
            .collect();

        let k = states.len();
        let mut table = vec![DEFAULT_STATE; k * k * k];
        for quad in quadruples {
            let [l, c, r, n] = quad.map(|s| -> Result<StateIdx> {
                index_of
                    .get(s.as_ref())
                    .copied()
                    .ok_or_else(|| anyhow!("rule references unknown state {:?}", s.as_ref()))
            });
            let (l, c, r) = (l?, c?, r?);
            table[((l as usize * k) + c as usize) * k + r as usize] = n?;
        }

        let class_index = |class: StateClass| -> Result<StateIdx> {
            states
                .iter()
                .rposition(|s| s.class == class)
                .map(|i| i as StateIdx)
                .ok_or_else(|| anyhow!("state list has no {class:?} state"))
        };
        let general = class_index(StateClass::General)?;
        let soldier = class_index(StateClass::Soldier)?;
        let firing = class_index(StateClass::Firing)?;
        let external = class_index(StateClass::External)?;
        Ok(Self {
            states,
            table,
            general,
            soldier,
            firing,
            external,
        })
    }

    /// Parses the `.rul` text format:
    ///
    /// ```text
    /// state_number 16
    /// Q@fff,000,soldier
    /// P@f00,fff,general
    /// ...
    /// rule_number 3924
    /// Q##Q##Q->Q
    /// ...
    /// ```
    ///
    /// State lines are `name@fg,bg,class`; colors are ignored. Classes other
    /// than the four recognized tags are treated as plain. Blank lines are
    /// skipped. A malformed header or an unknown state name in a rule is a
    /// fatal configuration error.
    pub fn from_rule_file(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let mut states = Vec::new();
        let mut quadruples = Vec::new();

        while let Some(line) = lines.next() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("state_number") {
                let n: usize = rest
                    .trim()
                    .parse()
                    .with_context(|| format!("bad state_number header: {line:?}"))?;
                for _ in 0..n {
                    let line = lines
                        .next()
                        .ok_or_else(|| anyhow!("rule file ends inside the state list"))?;
                    states.push(parse_state_line(line)?);
                }
            } else if let Some(rest) = line.strip_prefix("rule_number") {
                let n: usize = rest
                    .trim()
                    .parse()
                    .with_context(|| format!("bad rule_number header: {line:?}"))?;
                for _ in 0..n {
                    let line = lines
                        .next()
                        .ok_or_else(|| anyhow!("rule file ends inside the rule list"))?;
                    quadruples.push(parse_rule_line(line)?);
                }
            }
        }

        if states.is_empty() {
            bail!("rule file has no state_number section");
        }
        Self::from_quadruples(states, quadruples)
    }

    /// Reads and parses a rule file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule file {}", path.display()))?;
        Self::from_rule_file(&text).with_context(|| format!("in rule file {}", path.display()))
    }

    /// Transition lookup. Total by construction: unmapped triples were
    /// filled with [`DEFAULT_STATE`] when the table was built.
    #[inline]
    pub fn lookup(&self, left: StateIdx, center: StateIdx, right: StateIdx) -> StateIdx {
        let k = self.states.len();
        self.table[((left as usize * k) + center as usize) * k + right as usize]
    }

    pub fn general(&self) -> StateIdx {
        self.general
    }

    pub fn soldier(&self) -> StateIdx {
        self.soldier
    }

    pub fn firing(&self) -> StateIdx {
        self.firing
    }

    pub fn external(&self) -> StateIdx {
        self.external
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn name(&self, idx: StateIdx) -> &str {
        &self.states[idx as usize].name
    }
}

/// `name@fg,bg,class`; tolerant of extra comma-separated fields, the class
/// is always the last one (matching how classic rule files are written).
fn parse_state_line(line: &str) -> Result<State> {
    let mut fields = line.trim().split(['@', ',']).filter(|s| !s.is_empty());
    let name = fields
        .next()
        .ok_or_else(|| anyhow!("malformed state line {line:?}"))?;
    let tag = fields
        .last()
        .ok_or_else(|| anyhow!("state line {line:?} has no class tag"))?;
    Ok(State::new(name.trim(), StateClass::from_tag(tag.trim())))
}

/// `left##center##right->next`.
fn parse_rule_line(line: &str) -> Result<[String; 4]> {
    let (lhs, next) = line
        .trim()
        .split_once("->")
        .ok_or_else(|| anyhow!("malformed rule line {line:?}"))?;
    let mut triple = lhs.split("##").map(str::trim);
    let (l, c, r) = (triple.next(), triple.next(), triple.next());
    match (l, c, r, triple.next()) {
        (Some(l), Some(c), Some(r), None) => {
            Ok([l.to_owned(), c.to_owned(), r.to_owned(), next.trim().to_owned()])
        }
        _ => bail!("rule line {line:?} does not name exactly three states"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE_FILE: &str = "\
state_number 4

W@888,000,external
G@f00,000,general
Q@fff,000,soldier
F@0f0,000,firing

rule_number 3
W##G##W->F
W##G##Q->G
G##Q##W->F
";

    #[test]
    fn parses_states_and_classes() {
        let rules = Ruleset::from_rule_file(RULE_FILE).unwrap();
        assert_eq!(rules.state_count(), 4);
        assert_eq!(rules.name(rules.external()), "W");
        assert_eq!(rules.name(rules.general()), "G");
        assert_eq!(rules.name(rules.soldier()), "Q");
        assert_eq!(rules.name(rules.firing()), "F");
    }

    #[test]
    fn mapped_triples_follow_the_file() {
        let rules = Ruleset::from_rule_file(RULE_FILE).unwrap();
        let (w, g, q, f) = (
            rules.external(),
            rules.general(),
            rules.soldier(),
            rules.firing(),
        );
        assert_eq!(rules.lookup(w, g, w), f);
        assert_eq!(rules.lookup(w, g, q), g);
        assert_eq!(rules.lookup(g, q, w), f);
    }

    #[test]
    fn unmapped_triples_resolve_to_the_default() {
        let rules = Ruleset::from_rule_file(RULE_FILE).unwrap();
        let q = rules.soldier();
        assert_eq!(rules.lookup(q, q, q), DEFAULT_STATE);
    }

    #[test]
    fn unknown_state_in_rule_is_an_error() {
        let text = RULE_FILE.replace("G##Q##W->F", "G##Z##W->F");
        assert!(Ruleset::from_rule_file(&text).is_err());
    }

    #[test]
    fn missing_class_is_an_error() {
        let text = RULE_FILE.replace("F@0f0,000,firing", "F@0f0,000,flare");
        assert!(Ruleset::from_rule_file(&text).is_err());
    }

    #[test]
    fn bad_header_is_an_error() {
        assert!(Ruleset::from_rule_file("state_number four\n").is_err());
    }
}
