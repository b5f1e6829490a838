//! Dragon Slayer: a menu-driven RPG played inside the terminal.
//!
//! The game is explicit state plus two entry points, [`Game::set_name`]
//! and [`Game::choose`]. Every call prints the resulting screen and
//! returns the kind of input the game waits for next. Screens that only
//! show a message fall straight through to the next menu.

pub mod data;
pub mod rng;

use webcli_types::output::{Line, OutputSink, Span, Style};

use data::{EnemyTemplate, ItemKind, SHOP_STOCK, VILLAGER_LINES};
pub use rng::{Lcg, Rng};

/// Name used when the player enters none.
pub const DEFAULT_NAME: &str = "Dragonslayer";

/// Input the game expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Free-text player name.
    Name,
    /// Menu number.
    Choice,
    /// The player left the game.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Intro,
    Village,
    Shop,
    WorldMap,
    Combat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub gold: u32,
    pub experience: u32,
    pub level: u32,
    pub attack: i32,
    pub defense: i32,
    pub inventory: Vec<String>,
    pub weapon: String,
    pub armor: String,
    pub dragon_kills: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            name: String::new(),
            health: 100,
            max_health: 100,
            stamina: 100,
            max_stamina: 100,
            gold: 50,
            experience: 0,
            level: 1,
            attack: 10,
            defense: 5,
            inventory: vec![
                "Rusty Sword".to_string(),
                "Leather Armor".to_string(),
                "Health Potion".to_string(),
            ],
            weapon: "Rusty Sword".to_string(),
            armor: "Leather Armor".to_string(),
            dragon_kills: 0,
        }
    }
}

impl Player {
    /// Derive attack, defense and maxima from level and equipment.
    fn recalculate(&mut self) {
        let level = self.level as i32;
        let weapon = match data::item(&self.weapon).map(|i| i.kind) {
            Some(ItemKind::Weapon { attack }) => attack,
            _ => 0,
        };
        let armor = match data::item(&self.armor).map(|i| i.kind) {
            Some(ItemKind::Armor { defense }) => defense,
            _ => 0,
        };
        self.attack = 10 + level * 2 + weapon;
        self.defense = 5 + level + armor;
        self.max_health = 100 + level * 10;
        self.max_stamina = 100 + level * 5;
    }

    fn restore(&mut self) {
        self.health = self.max_health;
        self.stamina = self.max_stamina;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub met_blacksmith: bool,
    pub met_wizard: bool,
}

/// An enemy in an ongoing fight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub template: &'static EnemyTemplate,
    pub health: i32,
}

impl Enemy {
    fn spawn(template: &'static EnemyTemplate) -> Self {
        Self {
            template,
            health: template.health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub player: Player,
    pub location: Location,
    pub flags: Flags,
    pub enemy: Option<Enemy>,
}

pub struct Game {
    pub state: GameState,
    rng: Box<dyn Rng>,
}

fn say(out: &mut dyn OutputSink, style: Style, text: impl Into<String>) {
    out.push(Line::new(style, text));
}

fn blank(out: &mut dyn OutputSink) {
    out.push(Line::blank());
}

fn banner(out: &mut dyn OutputSink, style: Style, title: &str) {
    let rule = "=".repeat(55);
    blank(out);
    say(out, style, rule.as_str());
    say(out, style, format!("|{title:^53}|"));
    say(out, style, rule);
    blank(out);
}

/// `[TAG] TITLE` heading used by the small village screens.
fn tagged_heading(out: &mut dyn OutputSink, tag: &str, title: &str) {
    blank(out);
    out.push(Line::from_spans(
        Style::Result,
        vec![
            Span::plain(format!("{tag} ")),
            Span::styled(title, Style::GameLocation),
        ],
    ));
    blank(out);
}

impl Game {
    pub fn new(rng: Box<dyn Rng>) -> Self {
        Self {
            state: GameState {
                player: Player::default(),
                location: Location::Intro,
                flags: Flags::default(),
                enemy: None,
            },
            rng,
        }
    }

    /// Print the intro and ask for the player's name.
    pub fn start(&mut self, out: &mut dyn OutputSink) -> Prompt {
        log::debug!("dragon-slayer: start");
        banner(out, Style::GameBanner, "[DRAGON SLAYER] [SWORD]");
        for line in [
            "In the Kingdom of Aethermoor, darkness spreads across the land...",
            "Dragons, once sleeping in ancient mountains, have awakened.",
            "Villages burn. People flee. Hope fades.",
        ] {
            say(out, Style::GameStory, line);
        }
        blank(out);
        say(out, Style::GameStory, "But legends speak of a hero...");
        blank(out);
        say(out, Style::GameQuestion, "What is your name, brave warrior?");
        say(out, Style::GameHint, "[Type your name and press Enter]");
        Prompt::Name
    }

    /// Accept the player's name (blank picks a default) and enter the village.
    pub fn set_name(&mut self, name: &str, out: &mut dyn OutputSink) -> Prompt {
        let name = name.trim();
        self.state.player.name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name.to_string()
        };
        blank(out);
        say(
            out,
            Style::GameStory,
            format!("Welcome, {}.", self.state.player.name),
        );
        say(
            out,
            Style::GameStory,
            "Your journey begins in the village of Thornhaven...",
        );
        say(
            out,
            Style::GameStory,
            "The villagers look to you with desperate hope.",
        );
        blank(out);
        self.village(out)
    }

    /// Handle a menu selection for the current location.
    pub fn choose(&mut self, choice: &str, out: &mut dyn OutputSink) -> Prompt {
        let choice = choice.trim();
        log::debug!(
            "dragon-slayer: {:?} choice {choice:?}",
            self.state.location
        );
        match self.state.location {
            Location::Intro | Location::Village => self.village_choice(choice, out),
            Location::Shop => self.shop_choice(choice, out),
            Location::WorldMap => self.world_map_choice(choice, out),
            Location::Combat => self.combat_choice(choice, out),
        }
    }

    fn options(&self, out: &mut dyn OutputSink, options: &[String]) -> Prompt {
        for opt in options {
            say(out, Style::GameOption, opt.as_str());
        }
        blank(out);
        say(out, Style::GameHint, "[Enter a number to choose]");
        Prompt::Choice
    }

    // -- village ------------------------------------------------------------

    fn village(&mut self, out: &mut dyn OutputSink) -> Prompt {
        self.state.location = Location::Village;
        banner(out, Style::GameLocation, "[VILLAGE OF THORNHAVEN]");
        say(
            out,
            Style::GameDescription,
            "You stand in the village square. Smoke rises from chimneys.",
        );
        say(
            out,
            Style::GameDescription,
            "An undercurrent of fear fills the air...",
        );
        blank(out);
        let options: Vec<String> = [
            "1. [TALK]  Talk to villagers",
            "2. [SHOP]  Visit the shop",
            "3. [FORGE] Visit the blacksmith",
            "4. [WIZARD] Visit the wizard",
            "5. [BAG]   Check inventory",
            "6. [STATS] View stats",
            "7. [MAP]   Explore the world",
            "0. [EXIT]  Exit game",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        self.options(out, &options)
    }

    fn village_choice(&mut self, choice: &str, out: &mut dyn OutputSink) -> Prompt {
        match choice {
            "1" => self.talk(out),
            "2" => self.shop(out),
            "3" => self.blacksmith(out),
            "4" => self.wizard(out),
            "5" => self.inventory(out),
            "6" => self.stats(out),
            "7" => self.world_map(out),
            "0" => self.exit(out),
            _ => {
                say(out, Style::Error, "Invalid choice. Please try again.");
                self.village(out)
            },
        }
    }

    fn talk(&mut self, out: &mut dyn OutputSink) -> Prompt {
        let idx = self.rng.below(VILLAGER_LINES.len() as u32) as usize;
        blank(out);
        say(out, Style::GameNpc, VILLAGER_LINES[idx % VILLAGER_LINES.len()]);
        blank(out);
        self.village(out)
    }

    fn blacksmith(&mut self, out: &mut dyn OutputSink) -> Prompt {
        tagged_heading(out, "[FORGE]", "BLACKSMITH");
        let player = &mut self.state.player;
        if !self.state.flags.met_blacksmith {
            say(
                out,
                Style::GameNpc,
                "Blacksmith: \"Ah, a dragon slayer! I can forge better equipment...\"",
            );
            say(
                out,
                Style::GameNpc,
                "Blacksmith: \"But I need rare materials. Bring me dragon scales!\"",
            );
            self.state.flags.met_blacksmith = true;
        } else if player.dragon_kills >= 2 {
            say(
                out,
                Style::GameNpc,
                "Blacksmith: \"Excellent! Let me craft something special...\"",
            );
            if !player.inventory.iter().any(|i| i == "Dragon Blade") {
                player.inventory.push("Dragon Blade".to_string());
                say(out, Style::GameReward, "[GIFT] Received: Dragon Blade!");
            }
        } else {
            say(
                out,
                Style::GameNpc,
                "Blacksmith: \"Come back when you've proven yourself.\"",
            );
        }
        blank(out);
        self.village(out)
    }

    fn wizard(&mut self, out: &mut dyn OutputSink) -> Prompt {
        tagged_heading(out, "[WIZARD]", "WIZARD'S TOWER");
        let player = &mut self.state.player;
        if !self.state.flags.met_wizard {
            say(
                out,
                Style::GameNpc,
                "Wizard: \"Welcome, young warrior. I sense great power within you...\"",
            );
            say(
                out,
                Style::GameNpc,
                "Wizard: \"The Ancient Dragon King is ancient evil incarnate.\"",
            );
            say(
                out,
                Style::GameNpc,
                "Wizard: \"You must grow stronger before you face it.\"",
            );
            self.state.flags.met_wizard = true;
        } else if player.level >= 5 && player.dragon_kills >= 3 {
            say(
                out,
                Style::GameNpc,
                "Wizard: \"You are ready! Take this blessing...\"",
            );
            player.max_health += 50;
            player.health = player.max_health;
            say(out, Style::GameReward, "[MAGIC] Max Health increased by 50!");
        } else {
            say(
                out,
                Style::GameNpc,
                "Wizard: \"Your power grows. Soon, you will be ready...\"",
            );
        }
        blank(out);
        self.village(out)
    }

    fn inventory(&mut self, out: &mut dyn OutputSink) -> Prompt {
        tagged_heading(out, "[BAG]", "INVENTORY");
        let player = &self.state.player;
        say(
            out,
            Style::GameStats,
            format!("Equipped Weapon: {}", player.weapon),
        );
        say(
            out,
            Style::GameStats,
            format!("Equipped Armor: {}", player.armor),
        );
        blank(out);
        say(out, Style::GameStats, "Items:");
        if player.inventory.is_empty() {
            say(out, Style::GameHint, "  Your inventory is empty.");
        } else {
            for item in &player.inventory {
                say(out, Style::Result, format!("  - {item}"));
            }
        }
        blank(out);
        self.village(out)
    }

    fn stats(&mut self, out: &mut dyn OutputSink) -> Prompt {
        let p = &mut self.state.player;
        p.recalculate();
        blank(out);
        say(
            out,
            Style::GameStats,
            "╔═══════════════ CHARACTER STATUS ═══════════════╗",
        );
        say(out, Style::GameStats, format!("║ Name: {:<41}║", p.name));
        say(out, Style::GameStats, format!("║ Level: {:<40}║", p.level));
        for row in [
            format!("║ Health: {}/{}", p.health, p.max_health),
            format!("║ Stamina: {}/{}", p.stamina, p.max_stamina),
            format!("║ Gold: {}", p.gold),
            format!("║ Experience: {}", p.experience),
            format!("║ Attack: {} | Defense: {}", p.attack, p.defense),
            format!("║ Dragons Slain: {}", p.dragon_kills),
        ] {
            say(out, Style::GameStats, format!("{row:<49}║"));
        }
        say(
            out,
            Style::GameStats,
            "╚════════════════════════════════════════════════╝",
        );
        blank(out);
        self.village(out)
    }

    fn exit(&mut self, out: &mut dyn OutputSink) -> Prompt {
        log::debug!("dragon-slayer: exit");
        blank(out);
        say(out, Style::GameStory, "Thank you for playing The Dragon Slayer!");
        blank(out);
        let rule = "-".repeat(50);
        say(out, Style::Result, rule.as_str());
        say(out, Style::Result, "Type dragon-slayer to play again!");
        say(out, Style::Result, rule);
        blank(out);
        Prompt::Finished
    }

    // -- shop ---------------------------------------------------------------

    fn shop(&mut self, out: &mut dyn OutputSink) -> Prompt {
        self.state.location = Location::Shop;
        banner(out, Style::GameLocation, "[VILLAGE SHOP]");
        say(
            out,
            Style::GameGold,
            format!("Your Gold: {} [GOLD]", self.state.player.gold),
        );
        blank(out);
        let mut options: Vec<String> = SHOP_STOCK
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = data::item(name).map_or(0, |it| it.value);
                format!("{}. {name} - {value} [GOLD]", i + 1)
            })
            .collect();
        options.push("0. Leave shop".to_string());
        self.options(out, &options)
    }

    fn shop_choice(&mut self, choice: &str, out: &mut dyn OutputSink) -> Prompt {
        if choice == "0" {
            return self.village(out);
        }
        let stock = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| SHOP_STOCK.get(i))
            .and_then(|name| data::item(name));
        let Some(item) = stock else {
            say(out, Style::Error, "Invalid choice.");
            return self.shop(out);
        };

        let player = &mut self.state.player;
        if player.gold >= item.value {
            player.gold -= item.value;
            player.inventory.push(item.name.to_string());
            say(out, Style::GameSuccess, format!("[OK] Purchased {}!", item.name));
        } else {
            say(out, Style::Error, "[X] Not enough gold!");
        }
        blank(out);
        self.shop(out)
    }

    // -- world map ----------------------------------------------------------

    fn lair_unlocked(&self) -> bool {
        self.state.player.level >= 3
    }

    fn volcano_unlocked(&self) -> bool {
        self.state.player.level >= 5 && self.state.player.dragon_kills >= 2
    }

    fn world_map(&mut self, out: &mut dyn OutputSink) -> Prompt {
        self.state.location = Location::WorldMap;
        banner(out, Style::GameLocation, "[WORLD MAP]");
        let mut options: Vec<String> = [
            "1. [VILLAGE] Return to village",
            "2. [FOREST] Dark Forest (Easy)",
            "3. [MOUNTAIN] Mountain Pass (Medium)",
            "4. [CAVE] Ancient Cave (Hard)",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if self.lair_unlocked() {
            options.push("5. [PEAK] Dragon's Lair (Very Hard)".to_string());
        }
        if self.volcano_unlocked() {
            options.push("6. [VOLCANO] Volcanic Peak (FINAL BATTLE!)".to_string());
        }
        options.push("0. Go back".to_string());
        self.options(out, &options)
    }

    fn world_map_choice(&mut self, choice: &str, out: &mut dyn OutputSink) -> Prompt {
        match choice {
            "1" | "0" => self.village(out),
            "2" => self.encounter("Forest Wolf", "[FOREST] Dark Forest", out),
            "3" => self.encounter("Mountain Bandit", "[MOUNTAIN] Mountain Pass", out),
            "4" => self.encounter("Cave Troll", "[CAVE] Ancient Cave", out),
            "5" if self.lair_unlocked() => {
                self.encounter("Lesser Dragon", "[PEAK] Dragon's Lair", out)
            },
            "6" if self.volcano_unlocked() => self.final_battle(out),
            _ => {
                say(out, Style::Error, "Invalid choice.");
                self.world_map(out)
            },
        }
    }

    fn encounter(&mut self, enemy: &str, place: &str, out: &mut dyn OutputSink) -> Prompt {
        blank(out);
        say(out, Style::GameLocation, place);
        blank(out);
        if self.rng.chance(0.7) {
            say(out, Style::GameCombat, format!("[!] A {enemy} appears!"));
            blank(out);
            self.start_combat(enemy, out)
        } else {
            say(
                out,
                Style::GameSuccess,
                "You find a peaceful spot and rest. Health restored!",
            );
            let p = &mut self.state.player;
            p.health = p.max_health.min(p.health + 30);
            blank(out);
            self.world_map(out)
        }
    }

    fn final_battle(&mut self, out: &mut dyn OutputSink) -> Prompt {
        banner(out, Style::GameBanner, "[VOLCANIC PEAK]");
        for line in [
            "You stand at the peak of the volcano...",
            "Lava flows around you. The heat is unbearable.",
            "Then, you see it...",
        ] {
            say(out, Style::GameStory, line);
        }
        blank(out);
        say(
            out,
            Style::GameDragon,
            "[DRAGON] THE ANCIENT DRAGON KING APPEARS! [DRAGON]",
        );
        blank(out);
        say(out, Style::GameDragon, "\"MORTAL... YOU DARE CHALLENGE ME?\"");
        blank(out);
        self.start_combat("Ancient Dragon King", out)
    }

    // -- combat -------------------------------------------------------------

    fn start_combat(&mut self, enemy: &str, out: &mut dyn OutputSink) -> Prompt {
        let Some(template) = data::enemy(enemy) else {
            log::warn!("dragon-slayer: unknown enemy {enemy}");
            return self.world_map(out);
        };
        log::debug!("dragon-slayer: combat with {enemy}");
        self.state.location = Location::Combat;
        self.state.enemy = Some(Enemy::spawn(template));
        self.state.player.recalculate();
        self.combat_screen(out)
    }

    fn combat_screen(&mut self, out: &mut dyn OutputSink) -> Prompt {
        let Some(enemy) = &self.state.enemy else {
            return self.world_map(out);
        };
        let p = &self.state.player;
        blank(out);
        say(
            out,
            Style::GameCombat,
            "------------------ COMBAT ------------------",
        );
        say(
            out,
            Style::GameEnemy,
            format!(
                "{}: [HP] {}/{}",
                enemy.template.name, enemy.health, enemy.template.health
            ),
        );
        say(
            out,
            Style::GamePlayer,
            format!(
                "{}: [HP] {}/{} | [STM] {}/{}",
                p.name, p.health, p.max_health, p.stamina, p.max_stamina
            ),
        );
        say(
            out,
            Style::GameCombat,
            "--------------------------------------------",
        );
        blank(out);
        let options: Vec<String> = [
            "1. [ATK] Attack",
            "2. [DEF] Defend (restore stamina)",
            "3. [ATK+] Power Strike (30 stamina)",
            "4. [POTION] Use Potion",
            "5. [RUN] Flee",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        self.options(out, &options)
    }

    fn combat_choice(&mut self, choice: &str, out: &mut dyn OutputSink) -> Prompt {
        let Some(mut enemy) = self.state.enemy.take() else {
            return self.world_map(out);
        };
        let acted = match choice {
            "1" => {
                let roll = self.rng.below(5) as i32;
                let damage = (self.state.player.attack - enemy.template.defense + roll).max(1);
                enemy.health -= damage;
                say(
                    out,
                    Style::GameCombat,
                    format!("[ATK] You strike for {damage} damage!"),
                );
                true
            },
            "2" => {
                let p = &mut self.state.player;
                p.stamina = p.max_stamina.min(p.stamina + 20);
                say(
                    out,
                    Style::GameCombat,
                    "[DEF] You brace yourself and recover stamina...",
                );
                true
            },
            "3" => {
                let p = &mut self.state.player;
                if p.stamina >= 30 {
                    let strike = (f64::from(p.attack) * 1.8).floor() as i32;
                    let damage = (strike - enemy.template.defense).max(1);
                    enemy.health -= damage;
                    p.stamina -= 30;
                    say(
                        out,
                        Style::GameCombat,
                        format!("[ATK+] POWER STRIKE! You deal {damage} damage!"),
                    );
                    true
                } else {
                    say(out, Style::Error, "[X] Not enough stamina!");
                    false
                }
            },
            "4" => self.drink_potion(out),
            "5" => {
                if self.rng.chance(0.5) {
                    say(
                        out,
                        Style::GameSuccess,
                        "[RUN] You successfully fled from battle!",
                    );
                    blank(out);
                    return self.world_map(out);
                }
                say(out, Style::Error, "[X] Failed to escape!");
                true
            },
            _ => {
                say(out, Style::Error, "Invalid choice.");
                false
            },
        };

        if enemy.health <= 0 {
            return self.victory(enemy.template, out);
        }

        if acted {
            let roll = self.rng.below(3) as i32;
            let damage = (enemy.template.attack - self.state.player.defense + roll).max(1);
            self.state.player.health -= damage;
            say(
                out,
                Style::GameEnemy,
                format!(
                    "[HIT] {} attacks! You take {damage} damage!",
                    enemy.template.name
                ),
            );
            if self.state.player.health <= 0 {
                return self.defeat(out);
            }
        }

        self.state.enemy = Some(enemy);
        self.combat_screen(out)
    }

    /// Use the first potion or elixir in the bag. Returns whether a turn
    /// was spent.
    fn drink_potion(&mut self, out: &mut dyn OutputSink) -> bool {
        let p = &mut self.state.player;
        let Some(pos) = p
            .inventory
            .iter()
            .position(|i| i.contains("Potion") || i.contains("Elixir"))
        else {
            say(out, Style::Error, "[X] No potions available!");
            return false;
        };
        let name = p.inventory.remove(pos);
        if let Some(ItemKind::Consumable { heal, stamina }) = data::item(&name).map(|i| i.kind) {
            if heal > 0 {
                p.health = p.max_health.min(p.health + heal);
                say(
                    out,
                    Style::GameCombat,
                    format!("[POTION] Used {name}! Restored {heal} health."),
                );
            }
            if stamina > 0 {
                p.stamina = p.max_stamina.min(p.stamina + stamina);
                say(
                    out,
                    Style::GameCombat,
                    format!("[POTION] Used {name}! Restored {stamina} stamina."),
                );
            }
        }
        true
    }

    fn victory(&mut self, template: &'static EnemyTemplate, out: &mut dyn OutputSink) -> Prompt {
        log::debug!("dragon-slayer: defeated {}", template.name);
        self.state.enemy = None;
        blank(out);
        say(
            out,
            Style::GameVictory,
            format!("[WIN] Victory! {} has been defeated!", template.name),
        );
        self.state.player.gold += template.gold;
        say(
            out,
            Style::GameGold,
            format!("[GOLD] Found {} gold!", template.gold),
        );
        self.gain_experience(template.exp, out);
        if template.name.contains("Dragon") {
            self.state.player.dragon_kills += 1;
            say(
                out,
                Style::GameDragon,
                format!(
                    "[DRAGON] Dragon kill count: {}",
                    self.state.player.dragon_kills
                ),
            );
        }
        blank(out);
        self.world_map(out)
    }

    fn gain_experience(&mut self, amount: u32, out: &mut dyn OutputSink) {
        let p = &mut self.state.player;
        p.experience += amount;
        say(
            out,
            Style::GameReward,
            format!("[EXP] Gained {amount} experience!"),
        );
        let needed = p.level * 100;
        if p.experience >= needed {
            p.level += 1;
            p.experience -= needed;
            say(
                out,
                Style::GameReward,
                format!("[LEVEL UP] You are now level {}!", p.level),
            );
            p.recalculate();
            p.restore();
        }
    }

    fn defeat(&mut self, out: &mut dyn OutputSink) -> Prompt {
        log::debug!("dragon-slayer: player defeated");
        self.state.enemy = None;
        blank(out);
        say(out, Style::GameDefeat, "[DEAD] You have been defeated...");
        say(out, Style::GameStory, "But your story is not over.");
        blank(out);
        self.state.player.restore();
        self.village(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same raw value: 0 makes every roll minimal and
    /// every chance succeed, `u32::MAX` the opposite.
    struct Fixed(u32);
    impl Rng for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    fn game(raw: u32) -> Game {
        let mut g = Game::new(Box::new(Fixed(raw)));
        let mut out = Vec::new();
        g.start(&mut out);
        g.set_name("Ayla", &mut out);
        g
    }

    fn play(g: &mut Game, choice: &str) -> (Prompt, Vec<String>) {
        let mut out: Vec<Line> = Vec::new();
        let prompt = g.choose(choice, &mut out);
        (prompt, out.iter().map(Line::text).collect())
    }

    #[test]
    fn start_asks_for_name() {
        let mut g = Game::new(Box::new(Fixed(0)));
        let mut out: Vec<Line> = Vec::new();
        assert_eq!(g.start(&mut out), Prompt::Name);
        let text: Vec<String> = out.iter().map(Line::text).collect();
        assert!(text.contains(&"|               [DRAGON SLAYER] [SWORD]               |".to_string()));
        assert_eq!(text.last().unwrap(), "[Type your name and press Enter]");
    }

    #[test]
    fn blank_name_defaults() {
        let mut g = Game::new(Box::new(Fixed(0)));
        let mut out: Vec<Line> = Vec::new();
        g.start(&mut out);
        assert_eq!(g.set_name("   ", &mut out), Prompt::Choice);
        assert_eq!(g.state.player.name, "Dragonslayer");
        assert_eq!(g.state.location, Location::Village);
    }

    #[test]
    fn stats_box_is_aligned() {
        let mut g = game(0);
        let (prompt, text) = play(&mut g, "6");
        assert_eq!(prompt, Prompt::Choice);
        let rows: Vec<&String> = text.iter().filter(|l| l.starts_with('║')).collect();
        assert_eq!(rows.len(), 8);
        for row in rows {
            assert_eq!(row.chars().count(), 50, "{row}");
        }
        assert!(text.iter().any(|l| l.starts_with("║ Attack: 22 | Defense: 11")));
    }

    #[test]
    fn invalid_village_choice_reprints_menu() {
        let mut g = game(0);
        let (_, text) = play(&mut g, "9");
        assert_eq!(text[0], "Invalid choice. Please try again.");
        assert!(text.iter().any(|l| l == "0. [EXIT]  Exit game"));
    }

    #[test]
    fn shop_buy_and_insufficient_gold() {
        let mut g = game(0);
        play(&mut g, "2");
        assert_eq!(g.state.location, Location::Shop);
        let (_, text) = play(&mut g, "3");
        assert_eq!(text[0], "[OK] Purchased Health Potion!");
        assert_eq!(g.state.player.gold, 25);
        let (_, text) = play(&mut g, "1");
        assert_eq!(text[0], "[X] Not enough gold!");
        play(&mut g, "0");
        assert_eq!(g.state.location, Location::Village);
    }

    #[test]
    fn blacksmith_first_meeting_sets_flag() {
        let mut g = game(0);
        play(&mut g, "3");
        assert!(g.state.flags.met_blacksmith);
        g.state.player.dragon_kills = 2;
        let (_, text) = play(&mut g, "3");
        assert!(text.contains(&"[GIFT] Received: Dragon Blade!".to_string()));
        let (_, text) = play(&mut g, "3");
        assert!(!text.contains(&"[GIFT] Received: Dragon Blade!".to_string()));
    }

    #[test]
    fn world_map_locks() {
        let mut g = game(0);
        let (_, text) = play(&mut g, "7");
        assert!(!text.iter().any(|l| l.starts_with("5.")));
        let (_, text) = play(&mut g, "5");
        assert_eq!(text[0], "Invalid choice.");
        g.state.player.level = 5;
        g.state.player.dragon_kills = 2;
        let (_, text) = play(&mut g, "0");
        assert!(text.iter().any(|l| l.starts_with("7.")));
        let (_, text) = play(&mut g, "7");
        assert!(text.iter().any(|l| l.starts_with("5. [PEAK]")));
        assert!(text.iter().any(|l| l.starts_with("6. [VOLCANO]")));
    }

    #[test]
    fn forest_encounter_fights_with_low_rolls() {
        let mut g = game(0);
        play(&mut g, "7");
        let (_, text) = play(&mut g, "2");
        assert!(text.contains(&"[!] A Forest Wolf appears!".to_string()));
        assert_eq!(g.state.location, Location::Combat);
        // attack 22 vs defense 2 with roll 0
        let (_, text) = play(&mut g, "1");
        assert_eq!(text[0], "[ATK] You strike for 20 damage!");
        // wolf attack 8 vs defense 11 floors at 1
        assert_eq!(text[1], "[HIT] Forest Wolf attacks! You take 1 damage!");
        let (_, text) = play(&mut g, "1");
        assert!(text.contains(&"[WIN] Victory! Forest Wolf has been defeated!".to_string()));
        assert_eq!(g.state.player.gold, 65);
        assert_eq!(g.state.player.experience, 20);
        assert_eq!(g.state.location, Location::WorldMap);
    }

    #[test]
    fn high_rolls_rest_instead_of_fighting() {
        let mut g = game(u32::MAX);
        play(&mut g, "7");
        g.state.player.health = 10;
        let (_, text) = play(&mut g, "2");
        assert!(text.contains(&"You find a peaceful spot and rest. Health restored!".to_string()));
        assert_eq!(g.state.player.health, 40);
        assert_eq!(g.state.location, Location::WorldMap);
    }

    #[test]
    fn power_strike_needs_stamina() {
        let mut g = game(0);
        play(&mut g, "7");
        play(&mut g, "4");
        g.state.player.stamina = 10;
        let (_, text) = play(&mut g, "3");
        assert_eq!(text[0], "[X] Not enough stamina!");
        // no enemy turn after a wasted action
        assert!(!text.iter().any(|l| l.starts_with("[HIT]")));
        g.state.player.stamina = 40;
        let (_, text) = play(&mut g, "3");
        // floor(22 * 1.8) = 39, troll defense 8
        assert_eq!(text[0], "[ATK+] POWER STRIKE! You deal 31 damage!");
        assert_eq!(g.state.player.stamina, 10);
    }

    #[test]
    fn potion_heals_and_is_consumed() {
        let mut g = game(0);
        play(&mut g, "7");
        play(&mut g, "3");
        g.state.player.health = 50;
        let (_, text) = play(&mut g, "4");
        assert_eq!(text[0], "[POTION] Used Health Potion! Restored 40 health.");
        assert!(!g.state.player.inventory.iter().any(|i| i == "Health Potion"));
        let (_, text) = play(&mut g, "4");
        assert_eq!(text[0], "[X] No potions available!");
    }

    #[test]
    fn flee_succeeds_on_low_roll() {
        let mut g = game(0);
        play(&mut g, "7");
        play(&mut g, "3");
        let (_, text) = play(&mut g, "5");
        assert_eq!(text[0], "[RUN] You successfully fled from battle!");
        assert_eq!(g.state.location, Location::WorldMap);
        assert!(g.state.enemy.is_none());
    }

    #[test]
    fn defeat_restores_and_returns_to_village() {
        let mut g = game(0);
        play(&mut g, "7");
        play(&mut g, "4");
        g.state.player.health = 1;
        let (_, text) = play(&mut g, "2");
        assert!(text.contains(&"[DEAD] You have been defeated...".to_string()));
        assert_eq!(g.state.location, Location::Village);
        assert_eq!(g.state.player.health, g.state.player.max_health);
    }

    #[test]
    fn level_up_after_enough_experience() {
        let mut g = game(0);
        g.state.player.experience = 90;
        play(&mut g, "7");
        play(&mut g, "2");
        play(&mut g, "1");
        let (_, text) = play(&mut g, "1");
        assert!(text.contains(&"[LEVEL UP] You are now level 2!".to_string()));
        assert_eq!(g.state.player.level, 2);
        assert_eq!(g.state.player.experience, 10);
        assert_eq!(g.state.player.health, 120);
    }

    #[test]
    fn exit_finishes() {
        let mut g = game(0);
        let (prompt, text) = play(&mut g, "0");
        assert_eq!(prompt, Prompt::Finished);
        assert!(text.contains(&"Thank you for playing The Dragon Slayer!".to_string()));
    }
}
