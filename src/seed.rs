use crate::catalog::Catalog;
use crate::models::Entry;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::BTreeSet;

pub const DEFAULT_SAMPLE_DAYS: u32 = 15;

const SAMPLE_NOTES: [&str; 6] = [
    "Productive day, felt focused most of the afternoon.",
    "Tired after a long meeting, went to bed early.",
    "Took a walk at lunch and it helped a lot.",
    "Quiet day at home, read for an hour.",
    "Stressful morning but the evening was calm.",
    "Caught up with friends over dinner.",
];

pub fn sample_entries(catalog: &Catalog, today: NaiveDate, days: u32, seed: u64) -> Vec<Entry> {
    let mut rng = SplitMix64::new(seed);
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();

    (0..days)
        .map(|offset| {
            let day = today - Duration::days(i64::from(offset));
            let mood = pick(&mut rng, &catalog.moods).map(|mood| mood.label.clone());
            let notes = pick(&mut rng, &SAMPLE_NOTES)
                .map(|note| note.to_string())
                .unwrap_or_default();
            let habit_ids = catalog
                .habits
                .iter()
                .filter(|_| rng.next_u64() % 2 == 0)
                .map(|habit| habit.id.clone())
                .collect::<BTreeSet<_>>();

            Entry {
                date: day.and_time(noon).and_utc(),
                mood,
                notes,
                habit_ids,
            }
        })
        .collect()
}

fn pick<'a, T>(rng: &mut SplitMix64, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get((rng.next_u64() % items.len() as u64) as usize)
}

struct SplitMix64(u64);

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
