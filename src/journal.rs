use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::{Entry, NewEntry, Summary};
use crate::reflection::{build_summary, build_summary_at, TimeWindow};
use crate::seed::{sample_entries, DEFAULT_SAMPLE_DAYS};
use crate::storage::EntryRepository;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct Journal<R> {
    repo: R,
    catalog: Catalog,
    lock: RwLock<()>,
    seed_empty: bool,
}

impl<R: EntryRepository> Journal<R> {
    pub fn new(repo: R, catalog: Catalog) -> Self {
        Self {
            repo,
            catalog,
            lock: RwLock::new(()),
            seed_empty: false,
        }
    }

    // Users without a stored list start with sample entries instead of nothing.
    pub fn with_empty_seeding(mut self, enabled: bool) -> Self {
        self.seed_empty = enabled;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn entries(&self, user_id: &str) -> Result<Vec<Entry>, AppError> {
        self.snapshot(user_id, Utc::now()).await
    }

    pub async fn add_entry(&self, user_id: &str, new: NewEntry) -> Result<Entry, AppError> {
        if let Some(mood) = new.mood.as_deref() {
            if !self.catalog.has_mood(mood) {
                return Err(AppError::bad_request(format!("unknown mood '{mood}'")));
            }
        }
        self.check_habits(&new.habit_ids)?;

        let now = Utc::now();
        let _guard = self.lock.write().await;
        let mut entries = self.load_or_seed(user_id, now).await?;
        let entry = Entry::from(new);
        let day = entry.day();
        if entries.iter().any(|existing| existing.day() == day) {
            warn!(user = user_id, %day, "rejected second entry for the same day");
            return Err(AppError::conflict(format!("an entry already exists for {day}")));
        }

        entries.push(entry.clone());
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.repo.save(user_id, &entries).await?;

        info!(user = user_id, %day, "entry added");
        Ok(entry)
    }

    pub async fn update_habits(
        &self,
        user_id: &str,
        day: NaiveDate,
        habit_ids: BTreeSet<String>,
    ) -> Result<Entry, AppError> {
        self.check_habits(&habit_ids)?;

        let now = Utc::now();
        let _guard = self.lock.write().await;
        let mut entries = self.load_or_seed(user_id, now).await?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.day() == day)
            .ok_or_else(|| AppError::not_found(format!("no entry for {day}")))?;
        entry.habit_ids = habit_ids;
        let updated = entry.clone();
        self.repo.save(user_id, &entries).await?;

        info!(user = user_id, %day, habits = updated.habit_ids.len(), "habits updated");
        Ok(updated)
    }

    pub async fn remove_entry(&self, user_id: &str, day: NaiveDate) -> Result<Entry, AppError> {
        let now = Utc::now();
        let _guard = self.lock.write().await;
        let mut entries = self.load_or_seed(user_id, now).await?;
        let position = entries
            .iter()
            .position(|entry| entry.day() == day)
            .ok_or_else(|| AppError::not_found(format!("no entry for {day}")))?;
        let removed = entries.remove(position);
        self.repo.save(user_id, &entries).await?;

        info!(user = user_id, %day, "entry removed");
        Ok(removed)
    }

    pub async fn clear(&self, user_id: &str) -> Result<usize, AppError> {
        let _guard = self.lock.write().await;
        let removed = self.repo.load(user_id).await?.len();
        self.repo.save(user_id, &[]).await?;

        info!(user = user_id, removed, "entries cleared");
        Ok(removed)
    }

    pub async fn reset_with_samples(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, AppError> {
        let entries = self.samples(now);

        let _guard = self.lock.write().await;
        self.repo.save(user_id, &entries).await?;

        info!(user = user_id, days = DEFAULT_SAMPLE_DAYS, "entries reset with samples");
        Ok(entries)
    }

    pub async fn summary(&self, user_id: &str, window: TimeWindow) -> Result<Summary, AppError> {
        let entries = self.snapshot(user_id, Utc::now()).await?;
        Ok(build_summary(&entries, &self.catalog, window))
    }

    pub async fn summary_at(
        &self,
        user_id: &str,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Summary, AppError> {
        let entries = self.snapshot(user_id, now).await?;
        Ok(build_summary_at(&entries, &self.catalog, window, now))
    }

    async fn snapshot(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Entry>, AppError> {
        {
            let _guard = self.lock.read().await;
            if !self.seed_empty || self.repo.exists(user_id).await? {
                return self.repo.load(user_id).await;
            }
        }

        let _guard = self.lock.write().await;
        self.load_or_seed(user_id, now).await
    }

    // Caller must hold the write guard.
    async fn load_or_seed(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Entry>, AppError> {
        if !self.seed_empty || self.repo.exists(user_id).await? {
            return self.repo.load(user_id).await;
        }

        let entries = self.samples(now);
        self.repo.save(user_id, &entries).await?;
        info!(user = user_id, days = DEFAULT_SAMPLE_DAYS, "seeded empty account with samples");
        Ok(entries)
    }

    fn samples(&self, now: DateTime<Utc>) -> Vec<Entry> {
        let seed = now.timestamp_nanos_opt().unwrap_or_default() as u64;
        sample_entries(&self.catalog, now.date_naive(), DEFAULT_SAMPLE_DAYS, seed)
    }

    fn check_habits(&self, habit_ids: &BTreeSet<String>) -> Result<(), AppError> {
        match habit_ids.iter().find(|id| !self.catalog.has_habit(id)) {
            Some(unknown) => Err(AppError::bad_request(format!("unknown habit '{unknown}'"))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileRepository, MemoryRepository};
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 18, 0, 0).unwrap()
    }

    fn journal() -> Journal<MemoryRepository> {
        Journal::new(MemoryRepository::new(), Catalog::default())
    }

    fn new_entry(date: DateTime<Utc>, mood: Option<&str>, habits: &[&str]) -> NewEntry {
        NewEntry {
            date,
            mood: mood.map(str::to_string),
            notes: "notes".into(),
            habit_ids: habits.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn add_entry_keeps_newest_first() {
        let journal = journal();
        journal
            .add_entry("u1", new_entry(now() - Duration::days(2), Some("Sad"), &[]))
            .await
            .unwrap();
        journal
            .add_entry("u1", new_entry(now(), Some("Happy"), &["exercise"]))
            .await
            .unwrap();

        let entries = journal.entries("u1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mood.as_deref(), Some("Happy"));
        assert!(journal.entries("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_entry_on_same_day_conflicts() {
        let journal = journal();
        let morning = Utc.with_ymd_and_hms(2026, 5, 20, 7, 0, 0).unwrap();
        journal
            .add_entry("u1", new_entry(morning, Some("Neutral"), &[]))
            .await
            .unwrap();

        let err = journal
            .add_entry("u1", new_entry(now(), Some("Happy"), &[]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        journal
            .add_entry("u2", new_entry(now(), Some("Happy"), &[]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_catalog_items_are_rejected() {
        let journal = journal();
        let err = journal
            .add_entry("u1", new_entry(now(), Some("Ecstatic"), &[]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = journal
            .add_entry("u1", new_entry(now(), None, &["juggling"]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(journal.entries("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_habits_replaces_set_and_refreshes_summary() {
        let journal = journal();
        journal
            .add_entry("u1", new_entry(now(), None, &["exercise"]))
            .await
            .unwrap();

        let updated = journal
            .update_habits(
                "u1",
                now().date_naive(),
                ["reading".to_string(), "sleep".to_string()].into(),
            )
            .await
            .unwrap();
        assert!(!updated.habit_ids.contains("exercise"));

        let summary = journal
            .summary_at("u1", TimeWindow::Last7Days, now())
            .await
            .unwrap();
        let counts: Vec<u64> = summary.habits.iter().map(|h| h.count).collect();
        assert_eq!(counts, vec![0, 0, 1, 0, 1]);

        let missing = journal
            .update_habits("u1", now().date_naive() - Duration::days(1), BTreeSet::new())
            .await
            .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let journal = journal();
        for days_ago in 0..3 {
            journal
                .add_entry("u1", new_entry(now() - Duration::days(days_ago), Some("Happy"), &[]))
                .await
                .unwrap();
        }

        let removed = journal
            .remove_entry("u1", now().date_naive() - Duration::days(1))
            .await
            .unwrap();
        assert_eq!(removed.day(), now().date_naive() - Duration::days(1));
        assert_eq!(journal.entries("u1").await.unwrap().len(), 2);

        let err = journal
            .remove_entry("u1", now().date_naive() - Duration::days(1))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        assert_eq!(journal.clear("u1").await.unwrap(), 2);
        let summary = journal
            .summary_at("u1", TimeWindow::Last365Days, now())
            .await
            .unwrap();
        assert_eq!(summary.moods.len(), 3);
        assert!(summary.moods.iter().all(|m| m.count == 0));
    }

    #[tokio::test]
    async fn reset_with_samples_replaces_collection() {
        let journal = journal();
        journal
            .add_entry("u1", new_entry(now() - Duration::days(200), Some("Sad"), &[]))
            .await
            .unwrap();

        let samples = journal.reset_with_samples("u1", now()).await.unwrap();
        assert_eq!(samples.len(), DEFAULT_SAMPLE_DAYS as usize);
        assert_eq!(journal.entries("u1").await.unwrap(), samples);

        let summary = journal
            .summary_at("u1", TimeWindow::Last30Days, now())
            .await
            .unwrap();
        assert_eq!(
            summary.moods.iter().map(|m| m.count).sum::<u64>(),
            DEFAULT_SAMPLE_DAYS as u64
        );
    }

    #[tokio::test]
    async fn fresh_user_is_seeded_when_enabled() {
        let journal = journal().with_empty_seeding(true);

        let entries = journal.entries("newcomer").await.unwrap();
        assert_eq!(entries.len(), DEFAULT_SAMPLE_DAYS as usize);
        assert_eq!(journal.entries("newcomer").await.unwrap(), entries);

        let summary = journal.summary("other", TimeWindow::Last30Days).await.unwrap();
        assert_eq!(
            summary.moods.iter().map(|m| m.count).sum::<u64>(),
            DEFAULT_SAMPLE_DAYS as u64
        );
    }

    #[tokio::test]
    async fn cleared_user_stays_empty_with_seeding() {
        let journal = journal().with_empty_seeding(true);
        journal.entries("u1").await.unwrap();

        assert_eq!(journal.clear("u1").await.unwrap(), DEFAULT_SAMPLE_DAYS as usize);
        assert!(journal.entries("u1").await.unwrap().is_empty());
        let summary = journal.summary("u1", TimeWindow::Last365Days).await.unwrap();
        assert!(summary.moods.iter().all(|m| m.count == 0));
    }

    #[tokio::test]
    async fn seeding_is_off_by_default() {
        let journal = journal();
        assert!(journal.entries("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_counts_recent_entries() {
        let journal = journal();
        journal
            .add_entry("u1", new_entry(Utc::now(), Some("Neutral"), &["reading"]))
            .await
            .unwrap();

        let summary = journal.summary("u1", TimeWindow::Last7Days).await.unwrap();
        assert_eq!(summary.moods[1].count, 1);
        assert_eq!(summary.habits[2].count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_during_writes_never_fail() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!("journal_concurrency_{}_{}", std::process::id(), nanos));

        let journal = std::sync::Arc::new(Journal::new(FileRepository::new(&dir), Catalog::default()));
        let start = now() - Duration::days(3000);
        let history: Vec<Entry> = (0..3000)
            .map(|day| Entry::from(new_entry(start + Duration::days(day), Some("Happy"), &["sleep"])))
            .collect();
        journal.repo.save("u1", &history).await.unwrap();

        let writer = {
            let journal = journal.clone();
            tokio::spawn(async move {
                for round in 0..200 {
                    let habits: BTreeSet<String> = if round % 2 == 0 {
                        ["exercise".to_string()].into()
                    } else {
                        ["sleep".to_string()].into()
                    };
                    journal
                        .update_habits("u1", start.date_naive(), habits)
                        .await
                        .unwrap();
                }
            })
        };

        while !writer.is_finished() {
            let summary = journal.summary("u1", TimeWindow::Last7Days).await.unwrap();
            assert_eq!(summary.moods.len(), 3);
            assert_eq!(journal.entries("u1").await.unwrap().len(), history.len());
        }
        writer.await.unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }
}
