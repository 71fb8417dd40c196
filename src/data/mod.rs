use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{info, warn};
use rand::{seq::SliceRandom, Rng};
use tokio::sync::Mutex;

use crate::{config::RemoteConfig, models::Company};

mod fallback;
mod remote;

pub use fallback::fallback_companies;
pub use remote::{RemoteClient, COMPANIES_TABLE, LOGO_BUCKET};

/// Attempt bound when hunting for a candidate outside the exclusion set.
/// Past this, uniqueness is relaxed rather than the game failing.
pub const MAX_RANDOM_ATTEMPTS: usize = 20;

/// Resolves candidates for the game. Prefers the hosted backend; any
/// failure drops to the embedded demo list so a session can always start.
pub struct CompanyStore {
    remote: Option<RemoteClient>,
    pool: Mutex<Option<Vec<Company>>>,
    demo: AtomicBool,
}

impl CompanyStore {
    pub fn connect(config: Option<RemoteConfig>) -> Self {
        let remote = match config {
            Some(config) => {
                let client = RemoteClient::connect(&config);
                if client.is_none() {
                    warn!("Remote backend configured but unusable; running in demo mode");
                }
                client
            }
            None => {
                info!("No remote backend configured; running in demo mode");
                None
            }
        };

        let demo = remote.is_none();
        Self {
            remote,
            pool: Mutex::new(None),
            demo: AtomicBool::new(demo),
        }
    }

    pub fn remote(&self) -> Option<&RemoteClient> {
        self.remote.as_ref()
    }

    /// True when the session is playing against the embedded demo list.
    pub fn is_demo(&self) -> bool {
        self.demo.load(Ordering::Relaxed)
    }

    /// Fetches the candidate set once per session and caches it. Any fetch
    /// error, or fewer than two rows, engages the fallback list.
    pub async fn load_pool(&self) -> usize {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return pool.len();
        }

        let (companies, demo) = match self.fetch_remote_pool().await {
            Some(companies) => (companies, false),
            None => (fallback_companies(), true),
        };
        self.demo.store(demo, Ordering::Relaxed);

        let count = companies.len();
        info!("Candidate pool ready: {count} companies (demo mode: {demo})");
        *guard = Some(companies);
        count
    }

    async fn fetch_remote_pool(&self) -> Option<Vec<Company>> {
        let client = self.remote.as_ref()?;
        match client.fetch_all().await {
            Ok(companies) if companies.len() >= 2 => Some(companies),
            Ok(companies) => {
                warn!(
                    "Remote backend returned only {} companies; using demo data",
                    companies.len()
                );
                None
            }
            Err(err) => {
                warn!("Failed to fetch companies: {err:#}; using demo data");
                None
            }
        }
    }

    /// Draws up to `count` distinct candidates for a fresh round.
    pub async fn draw_initial(&self, count: usize) -> Vec<Company> {
        self.load_pool().await;
        let guard = self.pool.lock().await;
        match guard.as_ref() {
            Some(pool) => draw_distinct(pool, count, &mut rand::thread_rng()),
            None => Vec::new(),
        }
    }

    /// Random candidate for the prefetch buffer. Remote mode asks the
    /// backend for a fresh row at a random offset; demo mode draws from the
    /// in-memory pool. `used` is avoided for a bounded number of attempts,
    /// after which any identifier outside `displayed` is recycled.
    pub async fn random_company(
        &self,
        used: &HashSet<String>,
        displayed: &HashSet<String>,
    ) -> Option<Company> {
        if let Some(company) = self.random_remote(used, displayed).await {
            return Some(company);
        }

        let guard = self.pool.lock().await;
        let pool = guard.as_ref()?;
        pick_excluding(pool, used, displayed, MAX_RANDOM_ATTEMPTS, &mut rand::thread_rng())
    }

    async fn random_remote(
        &self,
        used: &HashSet<String>,
        displayed: &HashSet<String>,
    ) -> Option<Company> {
        let client = self.remote.as_ref()?;
        let total = match client.fetch_count().await {
            Ok(total) if total > 0 => total,
            Ok(_) => return None,
            Err(err) => {
                warn!("Company count failed: {err:#}");
                return None;
            }
        };

        let mut recyclable = None;
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let offset = rand::thread_rng().gen_range(0..total);
            match client.fetch_at_offset(offset).await {
                Ok(Some(company)) => {
                    if displayed.contains(&company.id) {
                        continue;
                    }
                    if !used.contains(&company.id) {
                        return Some(company);
                    }
                    recyclable = Some(company);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("Random company fetch failed: {err:#}");
                    return None;
                }
            }
        }

        // Hunt exhausted: recycle an already-used row rather than end the game.
        recyclable
    }
}

fn draw_distinct(pool: &[Company], count: usize, rng: &mut impl Rng) -> Vec<Company> {
    pool.choose_multiple(rng, count.min(pool.len()))
        .cloned()
        .collect()
}

fn pick_excluding(
    pool: &[Company],
    used: &HashSet<String>,
    displayed: &HashSet<String>,
    attempts: usize,
    rng: &mut impl Rng,
) -> Option<Company> {
    if pool.is_empty() {
        return None;
    }

    for _ in 0..attempts {
        let candidate = &pool[rng.gen_range(0..pool.len())];
        if !used.contains(&candidate.id) && !displayed.contains(&candidate.id) {
            return Some(candidate.clone());
        }
    }

    // Uniqueness exhausted: anything not currently on screen is fair game.
    let recyclable: Vec<&Company> = pool
        .iter()
        .filter(|company| !displayed.contains(&company.id))
        .collect();
    if let Some(company) = recyclable.choose(rng) {
        return Some((*company).clone());
    }

    pool.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn pool() -> Vec<Company> {
        fallback_companies()
    }

    #[test]
    fn hunt_skips_used_and_displayed_ids() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(7);

        let used: HashSet<String> = pool[..8].iter().map(|c| c.id.clone()).collect();
        let displayed: HashSet<String> = pool[8..9].iter().map(|c| c.id.clone()).collect();

        for _ in 0..50 {
            let picked = pick_excluding(&pool, &used, &displayed, MAX_RANDOM_ATTEMPTS, &mut rng)
                .expect("pool is non-empty");
            assert_eq!(picked.id, pool[9].id);
        }
    }

    #[test]
    fn exhausted_hunt_recycles_used_ids_but_never_displayed_ones() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(42);

        // Everything is used; only the displayed pair is off limits.
        let used: HashSet<String> = pool.iter().map(|c| c.id.clone()).collect();
        let displayed: HashSet<String> = pool[..2].iter().map(|c| c.id.clone()).collect();

        for _ in 0..50 {
            let picked = pick_excluding(&pool, &used, &displayed, MAX_RANDOM_ATTEMPTS, &mut rng)
                .expect("pool is non-empty");
            assert!(used.contains(&picked.id));
            assert!(!displayed.contains(&picked.id));
        }
    }

    #[test]
    fn draw_is_distinct_and_caps_at_pool_size() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(1);

        let drawn = draw_distinct(&pool, 4, &mut rng);
        assert_eq!(drawn.len(), 4);
        let ids: HashSet<&str> = drawn.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 4);

        assert_eq!(draw_distinct(&pool, 100, &mut rng).len(), pool.len());
    }

    #[tokio::test]
    async fn missing_config_means_demo_mode_with_ten_records() {
        let store = CompanyStore::connect(None);
        assert!(store.is_demo());
        assert_eq!(store.load_pool().await, 10);
        // A second load reuses the cached pool.
        assert_eq!(store.load_pool().await, 10);
    }

    #[tokio::test]
    async fn demo_draw_and_random_selection_work_without_a_backend() {
        let store = CompanyStore::connect(None);
        let drawn = store.draw_initial(4).await;
        assert_eq!(drawn.len(), 4);

        let used: HashSet<String> = drawn.iter().map(|c| c.id.clone()).collect();
        let company = store
            .random_company(&used, &used)
            .await
            .expect("demo pool always yields a candidate");
        assert!(!used.contains(&company.id));
    }
}
