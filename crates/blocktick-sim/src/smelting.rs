//! Smelting recipes, fuel values, and furnace variants.
//!
//! The tables are process-wide and immutable: built once on first use, never
//! mutated at runtime.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Furnace variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnaceKind {
    Furnace,
    BlastFurnace,
    Smoker,
}

impl FurnaceKind {
    /// Unlit block identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            FurnaceKind::Furnace => "minecraft:furnace",
            FurnaceKind::BlastFurnace => "minecraft:blast_furnace",
            FurnaceKind::Smoker => "minecraft:smoker",
        }
    }

    /// Lit block identifier.
    pub fn lit_identifier(&self) -> &'static str {
        match self {
            FurnaceKind::Furnace => "minecraft:lit_furnace",
            FurnaceKind::BlastFurnace => "minecraft:lit_blast_furnace",
            FurnaceKind::Smoker => "minecraft:lit_smoker",
        }
    }

    /// Container type id for ContainerOpen.
    pub fn container_type(&self) -> u8 {
        match self {
            FurnaceKind::Furnace => 2,
            FurnaceKind::BlastFurnace => 27,
            FurnaceKind::Smoker => 28,
        }
    }

    /// Cook progress needed to complete one smelt (progress advances 2 per
    /// burning tick).
    pub fn cook_threshold(&self) -> i16 {
        match self {
            FurnaceKind::Furnace => 200,
            FurnaceKind::BlastFurnace | FurnaceKind::Smoker => 100,
        }
    }

    /// Recipe tag selecting which table entries this variant can use.
    pub fn recipe_tag(&self) -> &'static str {
        match self {
            FurnaceKind::Furnace => "furnace",
            FurnaceKind::BlastFurnace => "blast_furnace",
            FurnaceKind::Smoker => "smoker",
        }
    }
}

/// One smelting conversion: input item → output item.
#[derive(Debug, Clone)]
pub struct SmeltableEntry {
    pub input: &'static str,
    pub output: &'static str,
    pub xp: f32,
    /// Which furnace variants may use this entry.
    pub tags: &'static [&'static str],
}

/// One fuel item and how long a unit of it burns.
#[derive(Debug, Clone)]
pub struct FuelEntry {
    pub identifier: &'static str,
    pub burn_ticks: u16,
    /// For liquid fuels: the empty container left behind after the charge.
    pub byproduct: Option<&'static str>,
}

/// Registry of smeltable conversions and fuel burn times.
pub struct SmeltingRegistry {
    smeltables: Vec<SmeltableEntry>,
    fuels: HashMap<&'static str, FuelEntry>,
}

impl Default for SmeltingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide tables, built once on first use.
pub fn tables() -> &'static SmeltingRegistry {
    static TABLES: OnceLock<SmeltingRegistry> = OnceLock::new();
    TABLES.get_or_init(SmeltingRegistry::new)
}

impl SmeltingRegistry {
    /// Build the registry with the vanilla conversions and fuel values.
    pub fn new() -> Self {
        const FB: &[&str] = &["furnace", "blast_furnace"];
        const FS: &[&str] = &["furnace", "smoker"];
        const F: &[&str] = &["furnace"];

        macro_rules! entry {
            ($input:literal => $output:literal, $xp:literal, $tags:expr) => {
                SmeltableEntry {
                    input: $input,
                    output: $output,
                    xp: $xp,
                    tags: $tags,
                }
            };
        }

        // Ordering matters: lookups may be capped to a prefix of this table
        // (see `SimConfig::recipe_scan_limit`). Ores and raw metals first,
        // then food, then misc.
        let smeltables = vec![
            entry!("minecraft:iron_ore" => "minecraft:iron_ingot", 0.7, FB),
            entry!("minecraft:gold_ore" => "minecraft:gold_ingot", 1.0, FB),
            entry!("minecraft:copper_ore" => "minecraft:copper_ingot", 0.7, FB),
            entry!("minecraft:deepslate_iron_ore" => "minecraft:iron_ingot", 0.7, FB),
            entry!("minecraft:deepslate_gold_ore" => "minecraft:gold_ingot", 1.0, FB),
            entry!("minecraft:deepslate_copper_ore" => "minecraft:copper_ingot", 0.7, FB),
            entry!("minecraft:lapis_lazuli_ore" => "minecraft:lapis_lazuli", 0.2, FB),
            entry!("minecraft:deepslate_lapis_lazuli_ore" => "minecraft:lapis_lazuli", 0.2, FB),
            entry!("minecraft:redstone_ore" => "minecraft:redstone", 0.3, FB),
            entry!("minecraft:deepslate_redstone_ore" => "minecraft:redstone", 0.3, FB),
            entry!("minecraft:diamond_ore" => "minecraft:diamond", 1.0, FB),
            entry!("minecraft:deepslate_diamond_ore" => "minecraft:diamond", 1.0, FB),
            entry!("minecraft:emerald_ore" => "minecraft:emerald", 1.0, FB),
            entry!("minecraft:deepslate_emerald_ore" => "minecraft:emerald", 1.0, FB),
            entry!("minecraft:coal_ore" => "minecraft:coal", 0.1, FB),
            entry!("minecraft:deepslate_coal_ore" => "minecraft:coal", 0.1, FB),
            entry!("minecraft:nether_gold_ore" => "minecraft:gold_ingot", 1.0, FB),
            entry!("minecraft:ancient_debris" => "minecraft:netherite_scrap", 2.0, FB),
            entry!("minecraft:raw_iron" => "minecraft:iron_ingot", 0.7, FB),
            entry!("minecraft:raw_gold" => "minecraft:gold_ingot", 1.0, FB),
            entry!("minecraft:raw_copper" => "minecraft:copper_ingot", 0.7, FB),
            entry!("minecraft:beef" => "minecraft:cooked_beef", 0.35, FS),
            entry!("minecraft:porkchop" => "minecraft:cooked_porkchop", 0.35, FS),
            entry!("minecraft:chicken" => "minecraft:cooked_chicken", 0.35, FS),
            entry!("minecraft:mutton" => "minecraft:cooked_mutton", 0.35, FS),
            entry!("minecraft:rabbit" => "minecraft:cooked_rabbit", 0.35, FS),
            entry!("minecraft:cod" => "minecraft:cooked_cod", 0.35, FS),
            entry!("minecraft:salmon" => "minecraft:cooked_salmon", 0.35, FS),
            entry!("minecraft:potato" => "minecraft:baked_potato", 0.35, FS),
            entry!("minecraft:kelp" => "minecraft:dried_kelp", 0.1, FS),
            entry!("minecraft:sand" => "minecraft:glass", 0.1, F),
            entry!("minecraft:cobblestone" => "minecraft:stone", 0.1, F),
            entry!("minecraft:stone" => "minecraft:smooth_stone", 0.1, F),
            entry!("minecraft:clay_ball" => "minecraft:brick", 0.3, F),
            entry!("minecraft:netherrack" => "minecraft:netherbrick", 0.1, F),
            entry!("minecraft:cactus" => "minecraft:green_dye", 1.0, F),
            entry!("minecraft:wet_sponge" => "minecraft:sponge", 0.15, F),
            entry!("minecraft:oak_log" => "minecraft:charcoal", 0.15, F),
            entry!("minecraft:spruce_log" => "minecraft:charcoal", 0.15, F),
            entry!("minecraft:birch_log" => "minecraft:charcoal", 0.15, F),
            entry!("minecraft:jungle_log" => "minecraft:charcoal", 0.15, F),
            entry!("minecraft:acacia_log" => "minecraft:charcoal", 0.15, F),
            entry!("minecraft:dark_oak_log" => "minecraft:charcoal", 0.15, F),
        ];

        macro_rules! fuel {
            ($map:ident, $id:literal, $ticks:literal) => {
                $map.insert(
                    $id,
                    FuelEntry {
                        identifier: $id,
                        burn_ticks: $ticks,
                        byproduct: None,
                    },
                );
            };
        }

        let mut fuels = HashMap::new();
        fuel!(fuels, "minecraft:coal", 1600);
        fuel!(fuels, "minecraft:charcoal", 1600);
        fuel!(fuels, "minecraft:coal_block", 16000);
        fuel!(fuels, "minecraft:blaze_rod", 2400);
        fuel!(fuels, "minecraft:dried_kelp_block", 4000);
        fuel!(fuels, "minecraft:oak_planks", 300);
        fuel!(fuels, "minecraft:spruce_planks", 300);
        fuel!(fuels, "minecraft:birch_planks", 300);
        fuel!(fuels, "minecraft:jungle_planks", 300);
        fuel!(fuels, "minecraft:acacia_planks", 300);
        fuel!(fuels, "minecraft:dark_oak_planks", 300);
        fuel!(fuels, "minecraft:oak_log", 300);
        fuel!(fuels, "minecraft:spruce_log", 300);
        fuel!(fuels, "minecraft:birch_log", 300);
        fuel!(fuels, "minecraft:jungle_log", 300);
        fuel!(fuels, "minecraft:acacia_log", 300);
        fuel!(fuels, "minecraft:dark_oak_log", 300);
        fuel!(fuels, "minecraft:stick", 100);
        fuel!(fuels, "minecraft:bamboo", 50);
        fuel!(fuels, "minecraft:scaffolding", 50);
        fuel!(fuels, "minecraft:wool", 100);
        // The one liquid fuel: burning a lava bucket leaves the empty bucket.
        fuels.insert(
            "minecraft:lava_bucket",
            FuelEntry {
                identifier: "minecraft:lava_bucket",
                burn_ticks: 20000,
                byproduct: Some("minecraft:bucket"),
            },
        );

        SmeltingRegistry { smeltables, fuels }
    }

    /// Find the conversion for `input` usable by `kind`, considering only the
    /// first `scan_limit` table entries (`0` = the whole table).
    pub fn find_smeltable(
        &self,
        input: &str,
        kind: FurnaceKind,
        scan_limit: usize,
    ) -> Option<&SmeltableEntry> {
        let limit = if scan_limit == 0 {
            self.smeltables.len()
        } else {
            scan_limit
        };
        let tag = kind.recipe_tag();
        self.smeltables[..limit.min(self.smeltables.len())]
            .iter()
            .find(|e| e.input == input && e.tags.contains(&tag))
    }

    /// Look up the fuel entry for an item, if it burns.
    pub fn fuel(&self, identifier: &str) -> Option<&FuelEntry> {
        self.fuels.get(identifier)
    }

    /// All smeltable conversions, in table order.
    pub fn smeltables(&self) -> &[SmeltableEntry] {
        &self.smeltables
    }
}
