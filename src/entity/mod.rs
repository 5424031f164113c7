//! Relational schema of the seeded database.
//!
//! One module per table, in the sea-orm entity layout.

pub mod book_item;
pub mod chemical_item;
pub mod clothing_item;
pub mod drink_item;
pub mod electronic_item;
pub mod film_item;
pub mod fitness_item;
pub mod food_item;
pub mod game_item;
pub mod hardware_item;
pub mod hygiene_item;
pub mod line_item;
pub mod music_item;
pub mod receipt;
pub mod software_item;
pub mod tool_item;
pub mod toy_item;
pub mod vehicle_item;
