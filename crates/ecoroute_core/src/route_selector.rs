use ecoroute_providers::route::Route;
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Meters of distance worth one second of duration in the route score.
const METERS_PER_SCORE_UNIT: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("Cannot select a route from an empty list")]
    EmptyInput,
}

/// Lower is better. Duration dominates, distance acts as a secondary term.
pub fn score(route: &Route) -> f64 {
    route.duration_seconds as f64 + route.distance_meters as f64 / METERS_PER_SCORE_UNIT
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    pub route: Route,
    pub score: f64,
}

impl From<Route> for ScoredRoute {
    fn from(route: Route) -> Self {
        let score = score(&route);
        ScoredRoute { route, score }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AlternativeRoute {
    pub route: Route,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RouteComparison {
    pub best_route: Route,
    #[serde(skip)]
    pub best_score: f64,
    pub other_routes: Vec<AlternativeRoute>,
}

/// Picks the route with the lowest score. Ties go to the earliest route, the
/// others keep their input order.
pub fn select_best(routes: Vec<Route>) -> Result<RouteComparison, SelectionError> {
    let scored: Vec<ScoredRoute> = routes.into_iter().map(ScoredRoute::from).collect();

    let best_index = scored
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, candidate)| match best {
            Some((_, best_score)) if best_score <= candidate.score => best,
            _ => Some((index, candidate.score)),
        })
        .map(|(index, _)| index)
        .ok_or(SelectionError::EmptyInput)?;

    let mut best = None;
    let mut other_routes = Vec::with_capacity(scored.len() - 1);
    let best_score = scored[best_index].score;

    for (index, candidate) in scored.into_iter().enumerate() {
        if index == best_index {
            best = Some(candidate.route);
        } else {
            other_routes.push(AlternativeRoute {
                reason: format!("Score: {:.2} (Best: {:.2})", candidate.score, best_score),
                route: candidate.route,
            });
        }
    }

    Ok(RouteComparison {
        best_route: best.ok_or(SelectionError::EmptyInput)?,
        best_score,
        other_routes,
    })
}
