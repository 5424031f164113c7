//! Randomised generation of receipts and their items.
//!
//! Everything here draws from an explicit [`SeedRng`] handed in by the caller,
//! so a fixed seed reproduces the same records.

use std::time::{SystemTime, UNIX_EPOCH};

use fake::{
    Fake, Faker,
    rand::{SeedableRng, rngs::StdRng},
};
use uuid::{Builder, Uuid};

/// Plans the category mix of a receipt.
pub mod planner;

/// Builds receipts and subtype records with fake payloads.
pub mod subtype_factory;

pub type SeedRng = StdRng;

/// Upper bound (inclusive) of receipt amounts and item prices.
pub const MAX_PRICE: i64 = 999_999;

/// Upper bound (inclusive) of a line item's quantity.
pub const MAX_QUANTITY: i32 = 50;

/// Upper bound (inclusive) of the number of items planned for one receipt.
pub const MAX_ITEMS_PER_RECEIPT: usize = 250;

pub fn seeded_rng(seed: u64) -> SeedRng {
    StdRng::seed_from_u64(seed)
}

/// Seed taken from the wall clock, used when no seed is configured.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

pub fn draw_seed(rng: &mut SeedRng) -> u64 {
    Faker.fake_with_rng::<u64, _>(rng)
}

pub fn draw_price(rng: &mut SeedRng) -> i64 {
    (1..MAX_PRICE + 1).fake_with_rng::<i64, _>(rng)
}

pub fn draw_quantity(rng: &mut SeedRng) -> i32 {
    (1..MAX_QUANTITY + 1).fake_with_rng::<i32, _>(rng)
}

/// Random (version 4) identifier built from `rng`.
pub fn draw_uuid(rng: &mut SeedRng) -> Uuid {
    let high = u128::from(draw_seed(rng));
    let low = u128::from(draw_seed(rng));
    Builder::from_random_bytes(((high << 64) | low).to_be_bytes()).into_uuid()
}
