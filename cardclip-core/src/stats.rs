use crate::{Difficulty, Review};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Totals {
    pub total: u32,
    pub hard: u32,
    pub medium: u32,
    pub easy: u32,
}

impl Totals {
    pub fn record(&mut self, d: Difficulty) {
        self.total += 1;
        match d {
            Difficulty::Hard => self.hard += 1,
            Difficulty::Medium => self.medium += 1,
            Difficulty::Easy => self.easy += 1,
        }
    }

    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.medium + self.easy) as f32 / self.total as f32
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StatsSummary {
    pub totals: Totals,
    pub per_day: BTreeMap<NaiveDate, Totals>,
}

pub fn summarize(reviews: &[Review]) -> StatsSummary {
    let mut summary = StatsSummary::default();
    for r in reviews {
        summary.totals.record(r.difficulty);
        let d = r.reviewed_at.date_naive();
        summary.per_day.entry(d).or_default().record(r.difficulty);
    }
    summary
}

pub fn daily_streak(reviews: &[Review], today: NaiveDate) -> u32 {
    let per_day = summarize(reviews).per_day;
    let mut streak = 0u32;
    let mut day = today;
    loop {
        if per_day.get(&day).map(|t| t.total > 0).unwrap_or(false) {
            streak += 1;
            day -= Duration::days(1);
        } else {
            break;
        }
    }
    streak
}
