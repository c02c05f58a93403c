//! PostgreSQL repository implementations

mod analysis_run;
mod dataset;
mod place;
mod user;

pub use analysis_run::PgAnalysisRunRepository;
pub use dataset::PgDatasetRepository;
pub use place::PgPlaceRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub datasets: PgDatasetRepository,
    pub analysis_runs: PgAnalysisRunRepository,
    pub places: PgPlaceRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            datasets: PgDatasetRepository::new(pool.clone()),
            analysis_runs: PgAnalysisRunRepository::new(pool.clone()),
            places: PgPlaceRepository::new(pool),
        }
    }
}
