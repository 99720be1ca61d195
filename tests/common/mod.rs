use recovery_admin::repository::InMemoryRepository;
use recovery_admin::repository::seed::SeedData;

const SEED: &str = include_str!("../../data/seed.json");

/// Repository loaded with the bundled fixture.
pub fn seeded_repository() -> InMemoryRepository {
    let seed = SeedData::from_json(SEED).expect("bundled seed data should parse");
    InMemoryRepository::from_seed(seed)
}
