//! Synthetic product generation for development seeding

use crate::product::Product;
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

/// Upper bound on products generated by one call
pub const MAX_FAKE_PRODUCTS: usize = 10_000;

const ADJECTIVES: &[&str] = &[
    "Small", "Ergonomic", "Rustic", "Intelligent", "Gorgeous", "Incredible", "Fantastic",
    "Practical", "Sleek", "Awesome", "Generic", "Handcrafted", "Handmade", "Licensed", "Refined",
    "Unbranded", "Tasty", "Modern", "Elegant", "Luxurious", "Bespoke", "Oriental",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bronze", "Silk", "Marble", "Ceramic",
];

const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants", "Shirt",
    "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish", "Cheese", "Bacon",
    "Pizza", "Salad", "Sausages", "Chips", "Phone", "Lamp", "Watch",
];

const DEPARTMENTS: &[&str] = &[
    "Books", "Movies", "Music", "Games", "Electronics", "Computers", "Home", "Garden", "Tools",
    "Grocery", "Health", "Beauty", "Toys", "Kids", "Baby", "Clothing", "Shoes", "Jewelry",
    "Sports", "Outdoors", "Automotive", "Industrial",
];

const DESCRIPTIONS: &[&str] = &[
    "Designed for everyday use with a focus on comfort and durability.",
    "The perfect blend of style and function for the modern home.",
    "Crafted from carefully sourced materials and built to last.",
    "A reliable companion for work, travel and everything in between.",
    "Lightweight and compact without compromising on performance.",
    "Featuring a refined finish that complements any setting.",
];

/// Generate `count` fake products using the thread-local RNG
///
/// `count` is clamped to `0..=MAX_FAKE_PRODUCTS`.
pub fn generate_fake_products(count: i64) -> Vec<Product> {
    generate_fake_products_with_rng(count, &mut rand::rng())
}

/// Generate `count` fake products with a caller-supplied RNG
pub fn generate_fake_products_with_rng<R: Rng>(count: i64, rng: &mut R) -> Vec<Product> {
    let count = clamp_count(count);
    (0..count).map(|_| fake_product(rng)).collect()
}

/// Clamp a requested count to the accepted range
pub fn clamp_count(count: i64) -> usize {
    count.clamp(0, MAX_FAKE_PRODUCTS as i64) as usize
}

fn fake_product<R: Rng>(rng: &mut R) -> Product {
    let adjective = pick(ADJECTIVES, rng);
    let material = pick(MATERIALS, rng);
    let noun = pick(PRODUCTS, rng);
    let cents: u32 = rng.random_range(100..=100_000);

    Product {
        id: Uuid::new_v4().to_string(),
        title: format!("{adjective} {material} {noun}"),
        description: format!(
            "{} {} Made with {} components.",
            pick(DESCRIPTIONS, rng),
            pick(DESCRIPTIONS, rng),
            material.to_lowercase()
        ),
        price: format!("{}.{:02}", cents / 100, cents % 100),
        category: pick(DEPARTMENTS, rng).to_string(),
    }
}

fn pick<'a, R: Rng>(values: &'a [&'a str], rng: &mut R) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}
