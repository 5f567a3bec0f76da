use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::{distance_km, round_half_up, round_tenths, AnalysisConfig};
use crate::errors::AnalysisError;
use crate::models::{CropInfo, CropRequest, GeoPoint, MarketAnalysisResult, MarketInfo, PriceQuote};

/// Reference lookups the ranker needs for each (crop, market) pair.
pub trait ReferenceData {
    fn crop(&self, crop_id: i64) -> Option<&CropInfo>;

    /// Most recent price per kg of `crop_id` at `market_id`, if any.
    fn latest_price(&self, market_id: i64, crop_id: i64) -> Option<f64>;
}

/// In-memory reference data fetched up front for one analysis call.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    crops: HashMap<i64, CropInfo>,
    prices: HashMap<(i64, i64), f64>,
}

impl MarketSnapshot {
    pub fn new(crops: Vec<CropInfo>, quotes: Vec<PriceQuote>) -> Self {
        let mut snapshot = Self::default();
        for crop in crops {
            snapshot = snapshot.with_crop(crop);
        }
        for quote in quotes {
            match quote.price_per_kg.to_f64() {
                Some(price) => {
                    snapshot = snapshot.with_price(quote.market_id, quote.crop_id, price);
                }
                None => {
                    tracing::warn!(
                        market_id = quote.market_id,
                        crop_id = quote.crop_id,
                        price = %quote.price_per_kg,
                        "Price quote not representable, ignoring"
                    );
                }
            }
        }
        snapshot
    }

    pub fn with_crop(mut self, crop: CropInfo) -> Self {
        self.crops.insert(crop.id, crop);
        self
    }

    pub fn with_price(mut self, market_id: i64, crop_id: i64, price_per_kg: f64) -> Self {
        self.prices.insert((market_id, crop_id), price_per_kg);
        self
    }
}

impl ReferenceData for MarketSnapshot {
    fn crop(&self, crop_id: i64) -> Option<&CropInfo> {
        self.crops.get(&crop_id)
    }

    fn latest_price(&self, market_id: i64, crop_id: i64) -> Option<f64> {
        self.prices.get(&(market_id, crop_id)).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultedPrice {
    pub market_id: i64,
    pub crop_id: i64,
}

/// Ranked analysis plus an audit of every silently-recovered lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Sorted by `expected_profit`, highest first.
    #[serde(rename = "analysis")]
    pub results: Vec<MarketAnalysisResult>,
    /// Requested crop ids with no reference data; they produce no rows.
    pub skipped_crops: Vec<i64>,
    /// Pairs priced with the default price for lack of history.
    pub defaulted_prices: Vec<DefaultedPrice>,
}

/// Ranks every (crop, market) pair by spoilage-adjusted profit.
#[derive(Debug, Clone, Default)]
pub struct MarketRanker {
    config: AnalysisConfig,
}

impl MarketRanker {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluate every requested crop against every market.
    ///
    /// Produces `|resolvable crops| x |markets|` rows. Unknown crops are
    /// skipped and missing prices fall back to the configured default; both
    /// are recorded in the report. The final sort is stable, so equal
    /// profits keep crop-major, market-minor order.
    pub fn analyze<D: ReferenceData>(
        &self,
        farmer: GeoPoint,
        crops: &[CropRequest],
        markets: &[MarketInfo],
        data: &D,
    ) -> Result<AnalysisReport, AnalysisError> {
        if !farmer.is_valid() {
            return Err(AnalysisError::InvalidCoordinates {
                latitude: farmer.latitude,
                longitude: farmer.longitude,
            });
        }
        for request in crops {
            request.validate()?;
        }

        let mut report = AnalysisReport {
            results: Vec::with_capacity(crops.len() * markets.len()),
            ..AnalysisReport::default()
        };

        for request in crops {
            let Some(crop) = data.crop(request.crop_id) else {
                tracing::warn!(crop_id = request.crop_id, "Unknown crop requested, skipping");
                report.skipped_crops.push(request.crop_id);
                continue;
            };
            if crop.shelf_life_days <= 0 {
                return Err(AnalysisError::InvalidShelfLife {
                    crop_id: crop.id,
                    shelf_life_days: crop.shelf_life_days,
                });
            }

            for market in markets {
                let row = self.evaluate_pair(farmer, request, crop, market, data, &mut report)?;
                report.results.push(row);
            }
        }

        report
            .results
            .sort_by(|a, b| b.expected_profit.cmp(&a.expected_profit));

        Ok(report)
    }

    fn evaluate_pair<D: ReferenceData>(
        &self,
        farmer: GeoPoint,
        request: &CropRequest,
        crop: &CropInfo,
        market: &MarketInfo,
        data: &D,
        report: &mut AnalysisReport,
    ) -> Result<MarketAnalysisResult, AnalysisError> {
        let distance = distance_km(farmer, market.location);

        let price = match data.latest_price(market.id, crop.id) {
            Some(price) => price,
            None => {
                tracing::debug!(
                    market_id = market.id,
                    crop_id = crop.id,
                    default_price = self.config.default_price_per_kg,
                    "No price history, using default price"
                );
                report.defaulted_prices.push(DefaultedPrice {
                    market_id: market.id,
                    crop_id: crop.id,
                });
                self.config.default_price_per_kg
            }
        };

        let transport_cost = self.config.transport.cost(distance, request.weight_kg);
        let spoilage_risk = self
            .config
            .spoilage
            .classify(crop.id, distance, crop.shelf_life_days)?;
        let revenue = price * request.weight_kg;

        // The haircut applies after transport cost is deducted.
        let expected_profit =
            (revenue - transport_cost) * self.config.spoilage.multiplier(spoilage_risk);

        Ok(MarketAnalysisResult {
            market_id: market.id,
            market_name: market.name.clone(),
            location_name: market.location_name.clone(),
            location: market.location,
            crop_id: crop.id,
            crop_name: crop.name.clone(),
            weight_kg: request.weight_kg,
            distance_km: round_tenths(distance),
            current_price_per_kg: price,
            transport_cost: round_half_up(transport_cost) as i64,
            spoilage_risk,
            revenue: round_half_up(revenue) as i64,
            expected_profit: round_half_up(expected_profit) as i64,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
