use chrono::Utc;
use uuid::Uuid;

use crate::{
    core::item::SubtypeRecord,
    entity::line_item,
    item::fake::{SeedRng, draw_uuid},
};

/// Builds the line item linking `receipt_id` to `subtype`.
///
/// Exactly the reference column matching the variant of `subtype` is set, all
/// fifteen others stay `None`. No I/O happens here; the subtype record must be
/// persisted before the returned line item is.
pub fn new_line_item(
    rng: &mut SeedRng,
    price: i64,
    amount: i32,
    receipt_id: Uuid,
    subtype: &SubtypeRecord,
) -> line_item::Model {
    let now = Utc::now();
    let mut line_item = line_item::Model {
        id: draw_uuid(rng),
        price,
        amount,
        fiscal_receipt_id: receipt_id,
        book_item_id: None,
        chemical_item_id: None,
        clothing_item_id: None,
        drink_item_id: None,
        electronic_item_id: None,
        film_item_id: None,
        fitness_item_id: None,
        food_item_id: None,
        game_item_id: None,
        hardware_item_id: None,
        hygiene_item_id: None,
        music_item_id: None,
        software_item_id: None,
        tool_item_id: None,
        toy_item_id: None,
        vehicle_item_id: None,
        created_at: now,
        updated_at: now,
    };

    match subtype {
        SubtypeRecord::Book(book) => line_item.book_item_id = Some(book.id),
        SubtypeRecord::Chemical(chemical) => line_item.chemical_item_id = Some(chemical.id),
        SubtypeRecord::Clothing(clothing) => line_item.clothing_item_id = Some(clothing.id),
        SubtypeRecord::Drink(drink) => line_item.drink_item_id = Some(drink.id),
        SubtypeRecord::Electronic(electronic) => {
            line_item.electronic_item_id = Some(electronic.id)
        }
        SubtypeRecord::Film(film) => line_item.film_item_id = Some(film.id),
        SubtypeRecord::Fitness(fitness) => line_item.fitness_item_id = Some(fitness.id),
        SubtypeRecord::Food(food) => line_item.food_item_id = Some(food.id),
        SubtypeRecord::Game(game) => line_item.game_item_id = Some(game.id),
        SubtypeRecord::Hardware(hardware) => line_item.hardware_item_id = Some(hardware.id),
        SubtypeRecord::Hygiene(hygiene) => line_item.hygiene_item_id = Some(hygiene.id),
        SubtypeRecord::Music(music) => line_item.music_item_id = Some(music.id),
        SubtypeRecord::Software(software) => line_item.software_item_id = Some(software.id),
        SubtypeRecord::Tool(tool) => line_item.tool_item_id = Some(tool.id),
        SubtypeRecord::Toy(toy) => line_item.toy_item_id = Some(toy.id),
        SubtypeRecord::Vehicle(vehicle) => line_item.vehicle_item_id = Some(vehicle.id),
    }

    line_item
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;
    use uuid::Uuid;

    use super::new_line_item;
    use crate::{
        core::item::Category,
        item::fake::{seeded_rng, subtype_factory::new_subtype},
    };

    #[test]
    fn exactly_one_reference_per_category() {
        let mut rng = seeded_rng(21);
        let receipt_id = Uuid::new_v4();

        for (position, category) in Category::iter().enumerate() {
            let subtype = new_subtype(&mut rng, category, 500);
            let line_item = new_line_item(&mut rng, 500, 3, receipt_id, &subtype);

            assert_eq!(line_item.subtype_reference_count(), 1);
            assert_eq!(line_item.subtype_references()[position], Some(subtype.id()));
            assert_eq!(line_item.fiscal_receipt_id, receipt_id);
            assert_eq!(line_item.price, 500);
            assert_eq!(line_item.amount, 3);
        }
    }

    #[test]
    fn drink_sets_only_the_drink_column() {
        let mut rng = seeded_rng(4);
        let drink = new_subtype(&mut rng, Category::Drink, 12);
        let line_item = new_line_item(&mut rng, 12, 1, Uuid::nil(), &drink);

        assert_eq!(line_item.drink_item_id, Some(drink.id()));
        assert_eq!(line_item.book_item_id, None);
        assert_eq!(line_item.tool_item_id, None);
        assert_ne!(line_item.id, drink.id());
    }
}
