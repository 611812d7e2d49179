//! Daily bonus rules
//!
//! A small fixed catalog grouped into categories. Each day one rule is drawn
//! from each of up to three shuffled categories. A rule is a pure function
//! of the scan; only its id is ever persisted.

use super::rng::DailyRng;
use super::scanner::{FoundWord, ScanContext};
use super::TileId;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Rules active on any one day.
pub const RULES_PER_DAY: usize = 3;

const RARE_LETTERS: [char; 4] = ['J', 'Q', 'X', 'Z'];

/// Lowest value any tile can have.
const MIN_TILE_VALUE: u32 = 1;

/// Outcome of one rule against one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleResult {
    pub bonus: u32,
    /// Tiles to highlight for this rule
    pub contributing_tile_ids: BTreeSet<TileId>,
    /// Times the condition was met independently this scan
    pub achievement_count: u32,
}

/// A scoring bonus. Compared and persisted by `id` alone.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub description: &'static str,
    apply: fn(&ScanContext) -> RuleResult,
}

impl Rule {
    /// Evaluate against a scan. Never mutates the scan.
    pub fn apply(&self, ctx: &ScanContext) -> RuleResult {
        (self.apply)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Rule {}

/// Named group of related rules.
#[derive(Debug)]
pub struct RuleCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub rules: &'static [Rule],
}

/// Every rule the game knows.
pub static CATALOG: &[RuleCategory] = &[
    RuleCategory {
        id: "cat_length",
        name: "Word Length Bonuses",
        rules: &[
            Rule {
                id: "len_3",
                description: "Double points for each 3-letter word formed.",
                apply: three_letter_words,
            },
            Rule {
                id: "len_5_plus",
                description: "+50 bonus points for each word with 5 or more letters.",
                apply: five_plus_letter_words,
            },
            Rule {
                id: "len_7_plus",
                description: "+100 bonus points for each word with 7 or more letters.",
                apply: seven_plus_letter_words,
            },
        ],
    },
    RuleCategory {
        id: "cat_letters",
        name: "Specific Letter Bonuses",
        rules: &[
            Rule {
                id: "let_rare",
                description: "+75 bonus points for using a 'J', 'Q', 'X', or 'Z'.",
                apply: rare_letter,
            },
            Rule {
                id: "let_no_vowels",
                description: "Spell a word with no vowels (A,E,I,O,U) for a 100 point bonus.",
                apply: no_vowels,
            },
            Rule {
                id: "let_ends_s",
                description: "Words ending with \"S\" score an extra 50 points.",
                apply: ends_with_s,
            },
        ],
    },
    RuleCategory {
        id: "cat_word_score",
        name: "Word Score Bonuses",
        rules: &[
            Rule {
                id: "sb_over_20",
                description: "If the total score for a word is over 20, add a bonus of 40 points.",
                apply: word_value_over_20,
            },
            Rule {
                id: "sb_all_ones",
                description: "If all tiles in a word are worth 1 point, add a bonus of 20 points.",
                apply: all_one_point_tiles,
            },
        ],
    },
];

/// Pick the day's rules: shuffle the categories, take the first
/// [`RULES_PER_DAY`], draw one rule uniformly from each.
///
/// Must run after the bag shuffle on the same generator.
pub fn select_daily_rules(rng: &mut DailyRng, catalog: &[RuleCategory]) -> Vec<Rule> {
    let mut categories: Vec<&RuleCategory> = catalog.iter().collect();
    rng.shuffle(&mut categories);

    categories
        .into_iter()
        .take(RULES_PER_DAY)
        .filter(|category| !category.rules.is_empty())
        .map(|category| {
            let rule = category.rules[rng.index(category.rules.len())];
            debug!(category = category.id, rule = rule.id, "drew daily rule");
            rule
        })
        .collect()
}

/// The catalog category a rule belongs to.
pub fn category_of(rule_id: &str) -> Option<&'static RuleCategory> {
    CATALOG
        .iter()
        .find(|category| category.rules.iter().any(|rule| rule.id == rule_id))
}

/// Look a rule up by id in the catalog.
pub fn find_rule(id: &str) -> Option<Rule> {
    CATALOG
        .iter()
        .flat_map(|category| category.rules.iter())
        .find(|rule| rule.id == id)
        .copied()
}

/// Re-bind persisted rule ids to catalog rules. Fails on the first unknown id.
pub fn resolve_rules<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Rule>, String> {
    ids.iter()
        .map(|id| find_rule(id.as_ref()).ok_or_else(|| id.as_ref().to_string()))
        .collect()
}

/// Shared shape of the per-word rules: every matching word adds `flat`,
/// optionally its own tile value, and optionally marks its tiles.
fn each_word(
    ctx: &ScanContext,
    matches: impl Fn(&FoundWord) -> bool,
    flat: u32,
    add_word_value: bool,
    mark_tiles: bool,
) -> RuleResult {
    let mut result = RuleResult::default();
    for word in ctx.words().iter().filter(|&w| matches(w)) {
        result.achievement_count += 1;
        result.bonus += flat;
        if add_word_value {
            result.bonus += word.value();
        }
        if mark_tiles {
            result
                .contributing_tile_ids
                .extend(word.tiles.iter().map(|t| t.id));
        }
    }
    result
}

fn three_letter_words(ctx: &ScanContext) -> RuleResult {
    each_word(ctx, |w| w.letter_count() == 3, 0, true, true)
}

fn five_plus_letter_words(ctx: &ScanContext) -> RuleResult {
    each_word(ctx, |w| w.letter_count() >= 5, 50, true, true)
}

fn seven_plus_letter_words(ctx: &ScanContext) -> RuleResult {
    each_word(ctx, |w| w.letter_count() >= 7, 100, true, true)
}

fn ends_with_s(ctx: &ScanContext) -> RuleResult {
    each_word(ctx, |w| w.text.ends_with('S'), 50, false, true)
}

fn word_value_over_20(ctx: &ScanContext) -> RuleResult {
    each_word(ctx, |w| w.value() > 20, 40, false, false)
}

fn all_one_point_tiles(ctx: &ScanContext) -> RuleResult {
    each_word(
        ctx,
        |w| w.tiles.iter().all(|t| t.value == MIN_TILE_VALUE),
        20,
        false,
        true,
    )
}

/// Awarded once, however many rare tiles are in play.
fn rare_letter(ctx: &ScanContext) -> RuleResult {
    ctx.valid_tiles()
        .values()
        .find(|t| RARE_LETTERS.contains(&t.letter.to_ascii_uppercase()))
        .map(|tile| RuleResult {
            bonus: 75,
            contributing_tile_ids: BTreeSet::from([tile.id]),
            achievement_count: 1,
        })
        .unwrap_or_default()
}

/// Awarded once, for the first vowel-free word found.
fn no_vowels(ctx: &ScanContext) -> RuleResult {
    ctx.words()
        .iter()
        .find(|w| !w.has_vowel())
        .map(|word| RuleResult {
            bonus: 100,
            contributing_tile_ids: word.tiles.iter().map(|t| t.id).collect(),
            achievement_count: 1,
        })
        .unwrap_or_default()
}
