use std::fmt::Debug;
use std::hash::Hash;

const MAX_ACTIONS_DISPLAYED: usize = 20;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Every action costs the same, so costs are edge counts.
pub type Cost = u32;

/// A solution to a search problem.
///
/// `states[i]` is the state reached by taking `actions[i]`, so neither
/// sequence includes the start. Both are empty when the start is the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A>
where
    St: State,
    A: Action,
{
    start: St,
    states: Vec<St>,
    actions: Vec<A>,
}

impl<St, A> Path<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            start,
            states: vec![],
            actions: vec![],
        }
    }

    /// Builds a Path from `(state, action)` steps collected from the goal
    /// backwards.
    pub(crate) fn from_reversed_steps(start: St, mut steps: Vec<(St, A)>) -> Self {
        steps.reverse();
        let (states, actions) = steps.into_iter().unzip();
        Self {
            start,
            states,
            actions,
        }
    }

    #[inline(always)]
    pub fn append(&mut self, s: St, a: A) {
        self.states.push(s);
        self.actions.push(a);
    }

    pub fn start(&self) -> St {
        self.start
    }
    /// The last state of the path, which is the start for empty paths.
    pub fn end(&self) -> St {
        self.states.last().copied().unwrap_or(self.start)
    }
    pub fn states(&self) -> &[St] {
        &self.states
    }
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
    pub fn cost(&self) -> Cost {
        self.len() as Cost
    }
}

impl<St, A> std::fmt::Display for Path<St, A>
where
    St: State + std::fmt::Display,
    A: Action + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Path({}, {}:[", self.cost(), self.start)?;
        for (i, a) in self.actions.iter().take(MAX_ACTIONS_DISPLAYED).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{a}")?;
        }
        if self.len() > MAX_ACTIONS_DISPLAYED {
            write!(f, " …")?;
        }
        write!(f, "]:{})", self.end())
    }
}

pub trait Space<St, A>: Debug
where
    St: State,
    A: Action,
{
    /// Applies an Action, if it's legal on this Space.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Expands a State into the legal `(State, Action)` pairs leaving it.
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;

    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Checks that every action is legal and lands on the recorded state.
    fn valid_path(&self, p: &Path<St, A>) -> bool {
        if !self.valid(&p.start) || p.states.len() != p.actions.len() {
            return false;
        }

        let mut state: St = p.start;
        for (expected, a) in p.states.iter().zip(&p.actions) {
            match self.apply(&state, a) {
                Some(new_state) if new_state == *expected => state = new_state,
                _ => return false,
            }
        }
        true
    }

    fn size(&self) -> Option<usize> {
        None
    }
}
