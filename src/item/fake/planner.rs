use fake::Fake;
use log::debug;
use strum::IntoEnumIterator;

use super::{MAX_ITEMS_PER_RECEIPT, SeedRng, draw_price, draw_quantity, draw_seed};
use crate::{core::item::Category, error::BatchError};

/// One unit of fan-out work: the item to generate and the randomness it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPlan {
    pub category: Category,
    pub price: i64,
    pub amount: i32,
    /// Seeds the worker's own generator for the subtype payload and ids.
    pub seed: u64,
}

/// Number of items for one receipt, uniform in `1..=MAX_ITEMS_PER_RECEIPT`.
pub fn draw_mix_size(rng: &mut SeedRng) -> usize {
    (1..MAX_ITEMS_PER_RECEIPT + 1).fake_with_rng::<usize, _>(rng)
}

/// Draws `size` categories uniformly, with replacement.
pub fn plan_mix(rng: &mut SeedRng, size: usize) -> Vec<Category> {
    let categories: Vec<Category> = Category::iter().collect();

    let mix: Vec<Category> = (0..size)
        .map(|_| categories[(0..categories.len()).fake_with_rng::<usize, _>(rng)])
        .collect();

    debug!("Planned mix of {} items", mix.len());
    mix
}

/// Attaches price, quantity and a worker seed to every category of `mix`.
pub fn plan_items(rng: &mut SeedRng, mix: &[Category]) -> Vec<ItemPlan> {
    mix.iter()
        .map(|&category| ItemPlan {
            category,
            price: draw_price(rng),
            amount: draw_quantity(rng),
            seed: draw_seed(rng),
        })
        .collect()
}

/// Parses a forced mix given as category tags.
pub fn parse_mix<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Category>, BatchError> {
    tags.iter().map(|tag| Category::parse(tag.as_ref())).collect()
}
