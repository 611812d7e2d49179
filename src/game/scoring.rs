//! Rule evaluation and score aggregation
//!
//! The score is always recomputed from the whole grid:
//!
//! `final = base_points * total_lengths + bonus_points`
//!
//! where `base_points` counts each tile in any valid word once and
//! `total_lengths` sums the lengths of every valid word.

use super::board::Grid;
use super::dictionary::Dictionary;
use super::rules::Rule;
use super::scanner::{ScanContext, WordScanner};
use super::TileId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Combined result of running the day's rules over one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleEvaluation {
    /// Sum of all rule bonuses
    pub bonus: u32,
    /// `(rule id, achievement count)` for rules met at least once, in rule order
    pub achievements: Vec<(String, u32)>,
    /// Rules each tile contributed to
    pub tile_rules: BTreeMap<TileId, BTreeSet<String>>,
}

/// Run every rule against the same scan. Rules only read the scan, so the
/// order they run in does not change the bonus or the tile map.
pub fn evaluate_rules(rules: &[Rule], ctx: &ScanContext) -> RuleEvaluation {
    let mut evaluation = RuleEvaluation::default();
    for rule in rules {
        let result = rule.apply(ctx);
        evaluation.bonus += result.bonus;
        if result.achievement_count > 0 {
            evaluation
                .achievements
                .push((rule.id.to_string(), result.achievement_count));
        }
        for tile_id in result.contributing_tile_ids {
            evaluation
                .tile_rules
                .entry(tile_id)
                .or_default()
                .insert(rule.id.to_string());
        }
    }
    evaluation
}

/// Score fields shown to the player and persisted with the puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_points: u32,
    pub total_lengths: u32,
    pub bonus_points: u32,
    pub final_score: u32,
    /// `(rule id, achievement count)` pairs
    pub achievements: Vec<(String, u32)>,
    /// Valid words on the grid, in scan order
    #[serde(default)]
    pub words: Vec<String>,
}

impl ScoreBreakdown {
    fn new(ctx: &ScanContext, evaluation: &RuleEvaluation) -> Self {
        Self {
            base_points: ctx.base_points(),
            total_lengths: ctx.total_lengths(),
            bonus_points: evaluation.bonus,
            final_score: final_score(ctx.base_points(), ctx.total_lengths(), evaluation.bonus),
            achievements: evaluation.achievements.clone(),
            words: ctx.word_texts().into_iter().map(str::to_string).collect(),
        }
    }

    /// How many times a rule was achieved, 0 if never.
    pub fn achievement_count(&self, rule_id: &str) -> u32 {
        self.achievements
            .iter()
            .find(|(id, _)| id == rule_id)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Base points times total lengths, plus bonuses.
pub fn final_score(base_points: u32, total_lengths: u32, bonus_points: u32) -> u32 {
    base_points * total_lengths + bonus_points
}

/// Rewrite every tile's found flag and rule set from a scan and its evaluation.
pub fn annotate(grid: &mut Grid, ctx: &ScanContext, evaluation: &RuleEvaluation) {
    for placed in grid.tiles_mut() {
        let id = placed.id();
        placed.is_found = ctx.is_valid_tile(id);
        placed.applied_rule_ids = evaluation.tile_rules.get(&id).cloned().unwrap_or_default();
    }
}

/// Scan, evaluate and annotate in one pass.
pub fn score_grid(grid: &mut Grid, dictionary: &dyn Dictionary, rules: &[Rule]) -> ScoreBreakdown {
    let ctx = WordScanner::new(dictionary).scan(grid);
    let evaluation = evaluate_rules(rules, &ctx);
    annotate(grid, &ctx, &evaluation);
    ScoreBreakdown::new(&ctx, &evaluation)
}
