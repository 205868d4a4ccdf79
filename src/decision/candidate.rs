//! Candidate activity set construction, one branch per strategy

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::activities::{Activity, ActivityCatalog};
use crate::agent::matrix::FarmProductMatrix;
use crate::core::config::{Parameters, SelectionPolicy};
use crate::core::error::{EngineError, Result};
use crate::core::types::FarmId;
use crate::decision::strategy::Strategy;
use crate::network::SocialNetwork;

/// Previous-year state a farm exposes to its peers
///
/// IMITATION and SOCIAL_COMPARISON only ever read this snapshot, never a
/// peer's in-progress computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Published {
    pub activities: Vec<Activity>,
    pub satisfaction: Option<f64>,
}

/// Read-only inputs for one farm's candidate construction
pub struct DecisionContext<'a> {
    pub farm: FarmId,
    pub catalog: &'a ActivityCatalog,
    pub preferences: &'a FarmProductMatrix,
    pub experience: &'a FarmProductMatrix,
    pub network: &'a SocialNetwork,
    pub peers: &'a BTreeMap<FarmId, Published>,
    pub current: &'a [Activity],
    pub tolerance: f64,
    pub params: &'a Parameters,
    pub selection: SelectionPolicy,
}

/// Build the candidate activity set for the given strategy
///
/// Every branch either returns a non-empty ordered set or fails with
/// `NoViableActivity`; substituting the exit sentinel is the caller's call.
pub fn build(strategy: Strategy, ctx: &DecisionContext) -> Result<Vec<Activity>> {
    let candidates = match strategy {
        Strategy::Repetition => repetition(ctx),
        Strategy::Deliberation => deliberation(ctx)?,
        Strategy::Imitation => imitation(ctx)?,
        Strategy::SocialComparison => social_comparison(ctx)?,
    };

    if candidates.is_empty() {
        return Err(EngineError::NoViableActivity {
            farm: ctx.farm,
            strategy,
        });
    }
    Ok(candidates)
}

/// REPETITION: keep the current set exactly as it is
fn repetition(ctx: &DecisionContext) -> Vec<Activity> {
    ctx.current.to_vec()
}

/// DELIBERATION: autonomous re-ranking over the whole catalog using the
/// farm's own preference row
fn deliberation(ctx: &DecisionContext) -> Result<Vec<Activity>> {
    let row = ctx.preferences.row(ctx.farm)?;
    let prefs: Vec<f64> = row.iter().map(|&v| v as f64).collect();
    rank_and_select(ctx, &prefs)
}

/// IMITATION: copy the published activity set of the single most influential
/// neighbor
///
/// Influence is edge weight scaled by the neighbor's published satisfaction;
/// neighbors that have not published satisfaction yet only compete when no
/// neighbor has. Ties go to the lowest farm id.
fn imitation(ctx: &DecisionContext) -> Result<Vec<Activity>> {
    let scored: Vec<(FarmId, f64, Option<f64>)> = ctx
        .network
        .iter()
        .filter_map(|(peer, weight)| {
            ctx.peers
                .get(&peer)
                .map(|published| (peer, weight, published.satisfaction))
        })
        .collect();

    let any_satisfaction = scored.iter().any(|(_, _, s)| s.is_some());

    let mut best: Option<(f64, FarmId)> = None;
    for (peer, weight, sat) in &scored {
        let influence = match (any_satisfaction, sat) {
            (true, Some(s)) => weight * s,
            (true, None) => continue,
            (false, _) => *weight,
        };
        // strict > keeps the first (lowest-id) peer on ties
        match best {
            Some((top, _)) if influence <= top => {}
            _ => best = Some((influence, *peer)),
        }
    }

    let Some((_, chosen)) = best else {
        return Ok(Vec::new());
    };
    Ok(ctx.peers[&chosen].activities.clone())
}

/// SOCIAL_COMPARISON: re-rank with a preference vector blended across all
/// neighbors, weighted by edge weight
fn social_comparison(ctx: &DecisionContext) -> Result<Vec<Activity>> {
    let total = ctx.network.total_weight();
    if total == 0.0 {
        // an isolated farm has nothing to compare against
        return deliberation(ctx);
    }

    let columns = ctx.preferences.header().len();
    let mut blended = vec![0.0; columns];
    for (peer, weight) in ctx.network.iter() {
        let row = ctx.preferences.row(peer)?;
        for (col, &value) in row.iter().enumerate() {
            blended[col] += weight * value as f64;
        }
    }
    for value in &mut blended {
        *value /= total;
    }

    rank_and_select(ctx, &blended)
}

/// Rank productive activities by desirability and cut by the selection policy
///
/// `prefs` is one value per matrix column (the personal or blended
/// preference vector). Sorting is descending by score with ascending
/// activity id breaking ties.
fn rank_and_select(ctx: &DecisionContext, prefs: &[f64]) -> Result<Vec<Activity>> {
    let max_pref = prefs.iter().cloned().fold(0.0_f64, f64::max);

    let mut ranked: Vec<(OrderedFloat<f64>, Activity)> = Vec::with_capacity(prefs.len());
    for activity in ctx.catalog.productive() {
        let col = ctx.preferences.column_index(&activity.name)?;
        let pref_norm = if max_pref > 0.0 { prefs[col] / max_pref } else { 0.0 };
        let years = ctx.experience.value(ctx.farm, &activity.name)? as f64;
        let score = desirability(ctx.params, ctx.tolerance, pref_norm, years);
        ranked.push((OrderedFloat(score), activity.clone()));
    }

    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

    let selected: Vec<Activity> = match ctx.selection {
        SelectionPolicy::TopK(k) => ranked.into_iter().take(k).map(|(_, a)| a).collect(),
        SelectionPolicy::ScoreFloor(floor) => ranked
            .into_iter()
            .filter(|(score, _)| score.0 >= floor)
            .map(|(_, a)| a)
            .collect(),
    };
    Ok(selected)
}

/// Desirability of one activity for one farm
///
/// Entrepreneurship tolerance arbitrates between novelty (the preference
/// term, weighted `a`) and habit (the experience term, weighted `b`). The
/// experience curve saturates with rate `k`, so the first years of practice
/// matter most.
pub fn desirability(params: &Parameters, tolerance: f64, pref_norm: f64, years: f64) -> f64 {
    let learning = 1.0 - (-params.k * years).exp();
    params.a * tolerance * pref_norm + params.b * (1.0 - tolerance) * learning
}
