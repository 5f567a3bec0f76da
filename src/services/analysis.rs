use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use sqlx::PgPool;

use crate::analysis::{scan_opportunities, AnalysisReport, MarketRanker, MarketSnapshot};
use crate::db::{crop_repo, farmer_repo, market_repo};
use crate::errors::{AnalysisError, AppError};
use crate::models::{AnalyzeRequest, GeoPoint, Opportunity};

/// Response of an analysis call: a demand scan when no crops were given,
/// otherwise the ranked cross-product.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Opportunities {
        farmer_location: GeoPoint,
        opportunities: Vec<Opportunity>,
    },
    Ranked {
        farmer_location: GeoPoint,
        #[serde(flatten)]
        report: AnalysisReport,
    },
}

/// Validate the request before touching any collaborator: coordinates if
/// supplied inline, and every crop weight.
pub fn validate_request(req: &AnalyzeRequest) -> Result<Option<GeoPoint>, AnalysisError> {
    for crop in &req.crops {
        crop.validate()?;
    }

    match (req.farmer_lat, req.farmer_lon) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map(Some),
        _ if req.farmer_id.is_none() => Err(AnalysisError::MissingFarmerLocation),
        _ => Ok(None),
    }
}

/// Resolve the farmer's location: inline coordinates win, otherwise the
/// location on file.
pub async fn resolve_farmer_location(
    pool: &PgPool,
    req: &AnalyzeRequest,
) -> Result<GeoPoint, AppError> {
    if let Some(point) = validate_request(req)? {
        return Ok(point);
    }

    let Some(farmer_id) = req.farmer_id else {
        return Err(AnalysisError::MissingFarmerLocation.into());
    };

    let farmer = farmer_repo::get_farmer(pool, farmer_id).await?;
    farmer
        .and_then(|f| f.location())
        .ok_or_else(|| AnalysisError::MissingFarmerLocation.into())
}

/// Run a full market analysis for one request.
pub async fn run_analysis(
    pool: &PgPool,
    ranker: &MarketRanker,
    req: &AnalyzeRequest,
) -> Result<AnalysisOutcome, AppError> {
    let start = Instant::now();
    let farmer = resolve_farmer_location(pool, req).await?;

    if req.crops.is_empty() {
        let limit = ranker.config().opportunity_limit;
        let demands = market_repo::get_active_demands(pool, Some(limit)).await?;
        let opportunities = scan_opportunities(farmer, &demands);

        record_scan(start);
        tracing::info!(
            farmer = %farmer,
            opportunities = opportunities.len(),
            "Opportunity scan complete"
        );

        return Ok(AnalysisOutcome::Opportunities {
            farmer_location: farmer,
            opportunities,
        });
    }

    let mut crop_ids: Vec<i64> = req.crops.iter().map(|c| c.crop_id).collect();
    crop_ids.sort_unstable();
    crop_ids.dedup();

    // Independent lookups; the result depends only on what they return.
    let (markets, crops, quotes) = tokio::try_join!(
        market_repo::get_active_markets(pool),
        crop_repo::get_crops_by_ids(pool, &crop_ids),
        market_repo::get_latest_prices(pool, &crop_ids),
    )?;

    let snapshot = MarketSnapshot::new(crops, quotes);
    let report = ranker.analyze(farmer, &req.crops, &markets, &snapshot)?;

    record_ranked(start, &report);

    if !report.skipped_crops.is_empty() {
        tracing::warn!(skipped = ?report.skipped_crops, "Analysis skipped unknown crops");
    }
    if !report.defaulted_prices.is_empty() {
        tracing::warn!(
            pairs = report.defaulted_prices.len(),
            "Analysis used the default price for pairs without history"
        );
    }

    tracing::info!(
        farmer = %farmer,
        crops = req.crops.len(),
        markets = markets.len(),
        rows = report.results.len(),
        "Market analysis complete"
    );

    Ok(AnalysisOutcome::Ranked {
        farmer_location: farmer,
        report,
    })
}

fn record_scan(start: Instant) {
    counter!("opportunity_scans_total").increment(1);
    histogram!("analysis_latency_seconds").record(start.elapsed().as_secs_f64());
}

fn record_ranked(start: Instant, report: &AnalysisReport) {
    counter!("analysis_requests_total").increment(1);
    counter!("analysis_rows_total").increment(report.results.len() as u64);
    counter!("analysis_crops_skipped_total").increment(report.skipped_crops.len() as u64);
    counter!("analysis_default_prices_total").increment(report.defaulted_prices.len() as u64);
    histogram!("analysis_latency_seconds").record(start.elapsed().as_secs_f64());
}
