use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// A single-start, single-goal search problem over a Space.
pub trait Problem<Sp, St, A>: std::fmt::Debug
where
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> St;
    fn goal(&self) -> St;

    fn is_goal(&self, s: &St) -> bool {
        *s == self.goal()
    }

    /// Whether `p` is a legal path from this problem's start to its goal.
    fn is_solution(&self, p: &Path<St, A>) -> bool {
        p.start() == self.start() && self.is_goal(&p.end()) && self.space().valid_path(p)
    }
}

/// A heuristic estimating the cost between two states.
pub trait ObjectiveHeuristic<St>: std::fmt::Debug
where
    St: State,
{
    fn h(s: &St, goal: &St) -> Cost;
}
