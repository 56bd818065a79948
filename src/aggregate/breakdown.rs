use serde::Serialize;

use super::label::Label;

/// Per-label clause counts for one statement.
///
/// Also remembers where each label first appeared, which settles ties when
/// picking the overall label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [usize; 4],
    first_seen: [Option<usize>; 4],
    total: usize,
}

impl Tally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more clause under `label`.
    pub fn record(&mut self, label: Label) {
        let i = label.index();
        self.counts[i] += 1;
        self.first_seen[i].get_or_insert(self.total);
        self.total += 1;
    }

    /// Clauses counted under `label`.
    pub fn count(&self, label: Label) -> usize {
        self.counts[label.index()]
    }

    /// Clauses counted overall.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Share of clauses under `label`, 0 to 100. Zero when nothing was counted.
    pub fn percentage(&self, label: Label) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total as f64 * 100.0
    }

    /// Most frequent label. Ties go to whichever label showed up first;
    /// an empty tally is neutral.
    pub fn overall(&self) -> Label {
        Label::ALL
            .into_iter()
            .filter_map(|label| {
                let first = self.first_seen[label.index()]?;
                Some((label, self.count(label), first))
            })
            .min_by_key(|&(_, count, first)| (std::cmp::Reverse(count), first))
            .map(|(label, _, _)| label)
            .unwrap_or(Label::Neutral)
    }
}

impl FromIterator<Label> for Tally {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for label in iter {
            tally.record(label);
        }
        tally
    }
}

/// Percentage breakdown of one statement.
///
/// `positive + negative + neutral + other` is 100 whenever `total > 0`, and every
/// field is 0 (with `overall` neutral) when the statement had no clauses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    /// Share of positive clauses.
    pub positive: f64,
    /// Share of negative clauses.
    pub negative: f64,
    /// Share of neutral clauses, including ones that failed to classify.
    pub neutral: f64,
    /// Share of clauses whose label was outside the known set.
    pub other: f64,
    /// Most frequent label.
    pub overall: Label,
    /// Number of clauses counted.
    pub total: usize,
}

impl Breakdown {
    /// Breakdown of a statement with no clauses.
    pub fn empty() -> Self {
        Self::from_tally(&Tally::new())
    }

    /// Derive percentages and the overall label from `tally`.
    pub fn from_tally(tally: &Tally) -> Self {
        Self {
            positive: tally.percentage(Label::Positive),
            negative: tally.percentage(Label::Negative),
            neutral: tally.percentage(Label::Neutral),
            other: tally.percentage(Label::Other),
            overall: tally.overall(),
            total: tally.total(),
        }
    }

    /// Percentage for one label.
    pub fn percentage(&self, label: Label) -> f64 {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
            Label::Neutral => self.neutral,
            Label::Other => self.other,
        }
    }
}
