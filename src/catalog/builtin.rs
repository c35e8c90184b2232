use super::{CatalogEntry, FoodCategory};

// key, display name, category, kcal, protein, fat, carbs (per 100 g)
const BUILTIN_FOODS: &[(&str, &str, FoodCategory, f32, f32, f32, f32)] = &[
    ("apple", "яблоко", FoodCategory::Fruits, 52.0, 0.3, 0.2, 14.0),
    ("banana", "банан", FoodCategory::Fruits, 89.0, 1.1, 0.3, 23.0),
    ("orange", "апельсин", FoodCategory::Fruits, 47.0, 0.9, 0.1, 12.0),
    ("pizza", "пицца", FoodCategory::ReadyMeals, 266.0, 11.0, 10.0, 33.0),
    ("hamburger", "гамбургер", FoodCategory::ReadyMeals, 295.0, 17.0, 14.0, 24.0),
    ("sandwich", "сэндвич", FoodCategory::ReadyMeals, 250.0, 10.0, 8.0, 30.0),
    ("salad", "салат", FoodCategory::Vegetables, 15.0, 1.0, 0.2, 3.0),
    ("chicken", "курица", FoodCategory::MeatAndFish, 239.0, 27.0, 14.0, 0.0),
    ("rice", "рис", FoodCategory::Staples, 130.0, 2.7, 0.3, 28.0),
    ("bread", "хлеб", FoodCategory::Staples, 265.0, 9.0, 3.2, 49.0),
    ("egg", "яйцо", FoodCategory::Dairy, 155.0, 13.0, 11.0, 1.0),
    ("milk", "молоко", FoodCategory::Dairy, 42.0, 3.4, 1.0, 5.0),
    ("cheese", "сыр", FoodCategory::Dairy, 402.0, 25.0, 33.0, 1.0),
    ("pasta", "паста", FoodCategory::Staples, 131.0, 5.0, 1.0, 25.0),
    ("fish", "рыба", FoodCategory::MeatAndFish, 206.0, 22.0, 12.0, 0.0),
    ("carrot", "морковь", FoodCategory::Vegetables, 41.0, 0.9, 0.2, 10.0),
    ("tomato", "помидор", FoodCategory::Vegetables, 18.0, 0.9, 0.2, 3.9),
    ("potato", "картофель", FoodCategory::Vegetables, 77.0, 2.0, 0.1, 17.0),
    ("cake", "торт", FoodCategory::Desserts, 350.0, 4.0, 15.0, 50.0),
    ("ice cream", "мороженое", FoodCategory::Desserts, 207.0, 3.5, 11.0, 24.0),
    ("chocolate", "шоколад", FoodCategory::Desserts, 546.0, 4.9, 31.0, 61.0),
    ("coffee", "кофе", FoodCategory::Drinks, 2.0, 0.1, 0.0, 0.0),
    ("tea", "чай", FoodCategory::Drinks, 1.0, 0.0, 0.0, 0.0),
    ("soup", "суп", FoodCategory::Drinks, 50.0, 3.0, 2.0, 6.0),
    ("fries", "картофель фри", FoodCategory::ReadyMeals, 312.0, 3.4, 15.0, 41.0),
    ("steak", "стейк", FoodCategory::MeatAndFish, 271.0, 26.0, 19.0, 0.0),
    ("pork", "свинина", FoodCategory::MeatAndFish, 242.0, 25.0, 14.0, 0.0),
    ("beef", "говядина", FoodCategory::MeatAndFish, 250.0, 26.0, 15.0, 0.0),
    ("shrimp", "креветки", FoodCategory::MeatAndFish, 85.0, 18.0, 0.9, 0.2),
    ("sushi", "суши", FoodCategory::ReadyMeals, 150.0, 5.0, 0.5, 30.0),
    ("donut", "пончик", FoodCategory::Desserts, 452.0, 5.0, 25.0, 51.0),
    ("cookie", "печенье", FoodCategory::Desserts, 502.0, 5.0, 24.0, 65.0),
    ("pancake", "блин", FoodCategory::Desserts, 227.0, 6.0, 10.0, 28.0),
    ("waffle", "вафля", FoodCategory::Desserts, 291.0, 8.0, 14.0, 35.0),
];

pub(super) fn builtin_entries() -> Vec<CatalogEntry> {
    BUILTIN_FOODS
        .iter()
        .map(|&(key, name, category, kcal, protein, fat, carbs)| CatalogEntry {
            key: key.to_string(),
            display_name: name.to_string(),
            category,
            kcal_per_100g: kcal,
            protein_g_per_100g: protein,
            fat_g_per_100g: fat,
            carbohydrate_g_per_100g: carbs,
        })
        .collect()
}
