use crate::models::Moment;

use super::engine::Selection;

/// Progress of a selection against the list of moments that need a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub selected: usize,
    pub total: usize,
    /// Rounded percentage for display only. Completeness never depends on it.
    pub percent: u8,
    pub is_complete: bool,
}

impl Completion {
    /// Moments still waiting for a song.
    pub fn remaining(&self) -> usize {
        self.total - self.selected
    }

    /// Footer text, e.g. `3/9 selections made` or `All 9/9 selections made`.
    pub fn summary(&self) -> String {
        if self.is_complete {
            format!("All {}/{} selections made", self.selected, self.total)
        } else {
            format!("{}/{} selections made", self.selected, self.total)
        }
    }
}

/// Count how many of `order` have a song in `selection`. Keys outside `order`
/// are ignored. An empty `order` is trivially complete.
pub fn evaluate(selection: &Selection, order: &[Moment]) -> Completion {
    let total = order.len();
    let selected = order
        .iter()
        .filter(|moment| selection.contains_key(*moment))
        .count();

    let percent = if total == 0 {
        100
    } else {
        (selected as f64 * 100.0 / total as f64).round() as u8
    };

    Completion {
        selected,
        total,
        percent,
        is_complete: selected == total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_of(moments: &[Moment]) -> Selection {
        moments
            .iter()
            .enumerate()
            .map(|(index, moment)| (*moment, index as i64 + 1))
            .collect()
    }

    #[test]
    fn empty_selection_is_zero_percent() {
        let completion = evaluate(&Selection::new(), &Moment::ALL);
        assert_eq!(completion.percent, 0);
        assert!(!completion.is_complete);
        assert_eq!(completion.remaining(), 9);
    }

    #[test]
    fn three_of_nine_rounds_to_thirty_three() {
        let selection = selection_of(&[Moment::Ingresso, Moment::Santo, Moment::Fine]);
        let completion = evaluate(&selection, &Moment::ALL);
        assert_eq!(completion.percent, 33);
        assert!(!completion.is_complete);
        assert_eq!(completion.summary(), "3/9 selections made");
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let selection = selection_of(&[Moment::Ingresso, Moment::Fine]);
        assert_eq!(evaluate(&selection, &Moment::ALL).percent, 22);
        let selection = selection_of(&Moment::ALL[..5]);
        assert_eq!(evaluate(&selection, &Moment::ALL).percent, 56);
    }

    #[test]
    fn every_moment_filled_is_complete() {
        let completion = evaluate(&selection_of(&Moment::ALL), &Moment::ALL);
        assert_eq!(completion.percent, 100);
        assert!(completion.is_complete);
        assert_eq!(completion.remaining(), 0);
        assert_eq!(completion.summary(), "All 9/9 selections made");
    }

    #[test]
    fn eight_of_nine_is_not_complete() {
        let completion = evaluate(&selection_of(&Moment::ALL[..8]), &Moment::ALL);
        assert_eq!(completion.percent, 89);
        assert!(!completion.is_complete);
    }
}
