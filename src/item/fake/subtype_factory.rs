use chrono::Utc;
use fake::{
    Fake,
    faker::{
        company::raw::{Buzzword, CompanyName},
        currency::raw::CurrencyName,
        filesystem::raw::Semver,
        lorem::raw::{Sentence, Word},
        name::raw::LastName,
    },
    locales::EN,
};
use log::debug;

use super::{SeedRng, draw_price, draw_uuid};
use crate::{
    core::item::{Category, SubtypeRecord},
    entity::{
        book_item, chemical_item, clothing_item, drink_item, electronic_item, film_item,
        fitness_item, food_item, game_item, hardware_item, hygiene_item, music_item, receipt,
        software_item, tool_item, toy_item, vehicle_item,
    },
};

/// A new open receipt with a random amount.
pub fn new_receipt(rng: &mut SeedRng) -> receipt::Model {
    let now = Utc::now();
    receipt::Model {
        id: draw_uuid(rng),
        state: receipt::DEFAULT_STATE.to_owned(),
        source: receipt::DEFAULT_SOURCE.to_owned(),
        target: receipt::DEFAULT_TARGET.to_owned(),
        amount: draw_price(rng),
        created_at: now,
        updated_at: now,
    }
}

/// A new record of `category` priced at `price`, with a fake payload.
///
/// Total over [`Category`]: every category has a constructor.
pub fn new_subtype(rng: &mut SeedRng, category: Category, price: i64) -> SubtypeRecord {
    let id = draw_uuid(rng);
    let now = Utc::now();

    let record = match category {
        Category::Book => SubtypeRecord::Book(book_item::Model {
            id,
            price,
            name: word(rng),
            genre: word(rng),
            author: word(rng),
            publisher: word(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Chemical => SubtypeRecord::Chemical(chemical_item::Model {
            id,
            price,
            name: Buzzword(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Clothing => SubtypeRecord::Clothing(clothing_item::Model {
            id,
            price,
            name: LastName(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Drink => SubtypeRecord::Drink(drink_item::Model {
            id,
            price,
            name: word(rng),
            style: Buzzword(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Electronic => SubtypeRecord::Electronic(electronic_item::Model {
            id,
            price,
            name: word(rng),
            kind: word(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Film => SubtypeRecord::Film(film_item::Model {
            id,
            price,
            name: word(rng),
            time: Semver(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Fitness => SubtypeRecord::Fitness(fitness_item::Model {
            id,
            price,
            name: word(rng),
            team: CompanyName(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Food => SubtypeRecord::Food(food_item::Model {
            id,
            price,
            name: word(rng),
            ingredient: word(rng),
            measurement: word(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Game => SubtypeRecord::Game(game_item::Model {
            id,
            price,
            name: CurrencyName(EN).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Hardware => SubtypeRecord::Hardware(hardware_item::Model {
            id,
            price,
            name: Sentence(EN, 1..3).fake_with_rng(rng),
            kind: Sentence(EN, 1..2).fake_with_rng(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Hygiene => SubtypeRecord::Hygiene(hygiene_item::Model {
            id,
            price,
            created_at: now,
            updated_at: now,
        }),
        Category::Music => SubtypeRecord::Music(music_item::Model {
            id,
            price,
            genre: word(rng),
            instrument: word(rng),
            created_at: now,
            updated_at: now,
        }),
        Category::Software => SubtypeRecord::Software(software_item::Model {
            id,
            price,
            created_at: now,
            updated_at: now,
        }),
        Category::Tool => SubtypeRecord::Tool(tool_item::Model {
            id,
            price,
            created_at: now,
            updated_at: now,
        }),
        Category::Toy => SubtypeRecord::Toy(toy_item::Model {
            id,
            price,
            created_at: now,
            updated_at: now,
        }),
        Category::Vehicle => SubtypeRecord::Vehicle(vehicle_item::Model {
            id,
            price,
            created_at: now,
            updated_at: now,
        }),
    };

    debug!("{}: {:?}", category, record);
    record
}

fn word(rng: &mut SeedRng) -> String {
    Word(EN).fake_with_rng(rng)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::{new_receipt, new_subtype};
    use crate::{
        core::item::{Category, SubtypeRecord},
        item::fake::{MAX_PRICE, seeded_rng},
    };

    #[test]
    fn every_category_builds_its_own_variant() {
        let mut rng = seeded_rng(11);

        for category in Category::iter() {
            let record = new_subtype(&mut rng, category, 1_234);
            assert_eq!(record.category(), category);
            assert_eq!(record.price(), 1_234);
            assert!(!record.id().is_nil());
        }
    }

    #[test]
    fn payload_fields_are_filled() {
        let mut rng = seeded_rng(5);

        match new_subtype(&mut rng, Category::Book, 10) {
            SubtypeRecord::Book(book) => {
                assert!(!book.name.is_empty());
                assert!(!book.genre.is_empty());
                assert!(!book.author.is_empty());
                assert!(!book.publisher.is_empty());
            }
            other => panic!("expected a book, got {:?}", other),
        }

        match new_subtype(&mut rng, Category::Food, 10) {
            SubtypeRecord::Food(food) => {
                assert!(!food.name.is_empty());
                assert!(!food.ingredient.is_empty());
                assert!(!food.measurement.is_empty());
            }
            other => panic!("expected food, got {:?}", other),
        }
    }

    #[test]
    fn same_seed_same_payload() {
        let mut first = seeded_rng(42);
        let mut second = seeded_rng(42);

        for category in Category::iter() {
            let left = new_subtype(&mut first, category, 99);
            let right = new_subtype(&mut second, category, 99);

            assert_eq!(left.id(), right.id());
            match (left, right) {
                (SubtypeRecord::Drink(left), SubtypeRecord::Drink(right)) => {
                    assert_eq!(left.name, right.name);
                    assert_eq!(left.style, right.style);
                }
                (SubtypeRecord::Hardware(left), SubtypeRecord::Hardware(right)) => {
                    assert_eq!(left.name, right.name);
                    assert_eq!(left.kind, right.kind);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn receipt_is_open_with_amount_in_range() {
        let mut rng = seeded_rng(2);

        for _ in 0..100 {
            let receipt = new_receipt(&mut rng);
            assert_eq!(receipt.state, "OPEN");
            assert_eq!(receipt.source, "ANYWHERE");
            assert_eq!(receipt.target, "SOMETHING");
            assert!((1..=MAX_PRICE).contains(&receipt.amount));
        }
    }
}
