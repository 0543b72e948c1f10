//! Single round-robin pairings for one group.

use crate::models::TeamId;

/// Lazy sequence of the n(n-1)/2 pairings `(teams[i], teams[j])`, `i < j`, outer index
/// ascending then inner index ascending. Cloning or calling [`RoundRobin::restart`] replays it.
#[derive(Clone, Debug)]
pub struct RoundRobin<'a> {
    teams: &'a [TeamId],
    i: usize,
    j: usize,
}

impl<'a> RoundRobin<'a> {
    pub fn new(teams: &'a [TeamId]) -> Self {
        Self { teams, i: 0, j: 1 }
    }

    pub fn restart(&mut self) {
        self.i = 0;
        self.j = 1;
    }

    /// C(n, 2) for the whole sequence.
    pub fn total(&self) -> usize {
        let n = self.teams.len();
        n * n.saturating_sub(1) / 2
    }

    fn remaining(&self) -> usize {
        let n = self.teams.len();
        if self.i + 1 >= n {
            return 0;
        }
        // rest of row i, then every full row after it
        let rest_of_row = n - self.j;
        let later_rows = n - self.i - 1;
        rest_of_row + later_rows * (later_rows - 1) / 2
    }
}

impl Iterator for RoundRobin<'_> {
    type Item = (TeamId, TeamId);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.teams.len();
        while self.i + 1 < n {
            if self.j < n {
                let pair = (self.teams[self.i], self.teams[self.j]);
                self.j += 1;
                return Some(pair);
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining();
        (left, Some(left))
    }
}

impl ExactSizeIterator for RoundRobin<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn four_teams_in_row_order() {
        let t: Vec<TeamId> = (0..4).map(|_| Uuid::new_v4()).collect();
        let pairs: Vec<_> = RoundRobin::new(&t).collect();
        assert_eq!(
            pairs,
            vec![
                (t[0], t[1]),
                (t[0], t[2]),
                (t[0], t[3]),
                (t[1], t[2]),
                (t[1], t[3]),
                (t[2], t[3]),
            ]
        );
    }

    #[test]
    fn length_is_exact_while_iterating() {
        let t: Vec<TeamId> = (0..8).map(|_| Uuid::new_v4()).collect();
        let mut rr = RoundRobin::new(&t);
        assert_eq!(rr.total(), 28);
        assert_eq!(rr.len(), 28);
        rr.by_ref().take(10).for_each(drop);
        assert_eq!(rr.len(), 18);
        rr.restart();
        assert_eq!(rr.count(), 28);
    }

    #[test]
    fn degenerate_groups_are_empty() {
        let one = [Uuid::new_v4()];
        assert_eq!(RoundRobin::new(&one).count(), 0);
        assert_eq!(RoundRobin::new(&[]).count(), 0);
    }
}
