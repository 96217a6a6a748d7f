use crate::domain::models::plant::NewPlant;

/// (name, description, price, stock, category)
const DEFAULT_PLANTS: &[(&str, &str, i64, i32, &str)] = &[
    ("Yellow Apricot Blossom", "Well-grown yellow apricot, blooms in time for Lunar New Year.", 500_000, 25, "Ornamental"),
    ("Red Peach Blossom", "Northern red peach tree with vivid flowers.", 450_000, 30, "Ornamental"),
    ("Dien Pomelo", "Original Dien pomelo variety, sweet fruit.", 350_000, 40, "Fruit trees"),
    ("King Orange", "Healthy king orange sapling, bears heavily.", 280_000, 35, "Fruit trees"),
    ("Moth Orchid", "Premium moth orchid with large blooms.", 650_000, 15, "Flowers"),
    ("ZZ Plant", "Feng shui ZZ plant, said to bring good luck.", 200_000, 50, "Feng shui"),
    ("Lucky Bamboo", "Lush lucky bamboo, a symbol of prosperity.", 180_000, 45, "Feng shui"),
    ("Hoa Loc Mango", "The famous Hoa Loc sweet mango variety.", 320_000, 28, "Fruit trees"),
];

pub fn default_plants() -> Vec<NewPlant> {
    DEFAULT_PLANTS
        .iter()
        .map(|(name, description, price, stock, category)| NewPlant {
            name: name.to_string(),
            description: Some(description.to_string()),
            price: *price,
            stock: *stock,
            image: None,
            category: Some(category.to_string()),
        })
        .collect()
}
