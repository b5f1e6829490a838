//! Static item and enemy tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Weapon { attack: i32 },
    Armor { defense: i32 },
    Consumable { heal: i32, stamina: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub name: &'static str,
    pub kind: ItemKind,
    /// Shop price in gold.
    pub value: u32,
}

pub const ITEMS: &[Item] = &[
    Item {
        name: "Rusty Sword",
        kind: ItemKind::Weapon { attack: 10 },
        value: 20,
    },
    Item {
        name: "Iron Sword",
        kind: ItemKind::Weapon { attack: 20 },
        value: 100,
    },
    Item {
        name: "Dragon Blade",
        kind: ItemKind::Weapon { attack: 40 },
        value: 500,
    },
    Item {
        name: "Leather Armor",
        kind: ItemKind::Armor { defense: 5 },
        value: 30,
    },
    Item {
        name: "Steel Armor",
        kind: ItemKind::Armor { defense: 15 },
        value: 150,
    },
    Item {
        name: "Dragon Scale Armor",
        kind: ItemKind::Armor { defense: 30 },
        value: 800,
    },
    Item {
        name: "Health Potion",
        kind: ItemKind::Consumable {
            heal: 40,
            stamina: 0,
        },
        value: 25,
    },
    Item {
        name: "Greater Health Potion",
        kind: ItemKind::Consumable {
            heal: 80,
            stamina: 0,
        },
        value: 60,
    },
    Item {
        name: "Stamina Elixir",
        kind: ItemKind::Consumable {
            heal: 0,
            stamina: 50,
        },
        value: 30,
    },
];

/// What the village shop sells, in menu order.
pub const SHOP_STOCK: &[&str] = &[
    "Iron Sword",
    "Steel Armor",
    "Health Potion",
    "Greater Health Potion",
    "Stamina Elixir",
];

pub fn item(name: &str) -> Option<&'static Item> {
    ITEMS.iter().find(|i| i.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    pub gold: u32,
    pub exp: u32,
}

pub const ENEMIES: &[EnemyTemplate] = &[
    EnemyTemplate {
        name: "Forest Wolf",
        health: 30,
        attack: 8,
        defense: 2,
        gold: 15,
        exp: 20,
    },
    EnemyTemplate {
        name: "Mountain Bandit",
        health: 45,
        attack: 12,
        defense: 5,
        gold: 30,
        exp: 35,
    },
    EnemyTemplate {
        name: "Cave Troll",
        health: 80,
        attack: 18,
        defense: 8,
        gold: 50,
        exp: 60,
    },
    EnemyTemplate {
        name: "Lesser Dragon",
        health: 150,
        attack: 25,
        defense: 12,
        gold: 200,
        exp: 150,
    },
    EnemyTemplate {
        name: "Ancient Dragon King",
        health: 500,
        attack: 60,
        defense: 30,
        gold: 1000,
        exp: 600,
    },
];

pub fn enemy(name: &str) -> Option<&'static EnemyTemplate> {
    ENEMIES.iter().find(|e| e.name == name)
}

pub const VILLAGER_LINES: &[&str] = &[
    "Elder: \"A dragon was spotted near the old cave. Please, be careful!\"",
    "Farmer: \"My crops are withering... I fear the dragon's curse.\"",
    "Child: \"Are you really going to slay the dragon? You're so brave!\"",
    "Merchant: \"I heard the Ancient Dragon King dwells in the Volcanic Peak...\"",
];
