use rust_decimal::prelude::ToPrimitive;

use super::{distance_km, round_tenths};
use crate::models::{GeoPoint, MarketDemand, Opportunity};

/// Attach the farmer's distance to each active demand posting.
///
/// Ranking is by posted price only, highest first; distance is
/// informational. The sort is stable, so postings already ordered by the
/// data source keep their order. Eligibility (active, unexpired) is the data
/// source's concern. A posting whose price or quantity has no `f64`
/// representation is logged and left out.
pub fn scan_opportunities(farmer: GeoPoint, demands: &[MarketDemand]) -> Vec<Opportunity> {
    let mut opportunities: Vec<Opportunity> = demands
        .iter()
        .filter_map(|demand| to_opportunity(farmer, demand))
        .collect();

    opportunities.sort_by(|a, b| b.price_per_kg.total_cmp(&a.price_per_kg));
    opportunities
}

fn to_opportunity(farmer: GeoPoint, demand: &MarketDemand) -> Option<Opportunity> {
    let (Some(price_per_kg), Some(quantity_needed_kg)) = (
        demand.demand_price_per_kg.to_f64(),
        demand.quantity_needed_kg.to_f64(),
    ) else {
        tracing::warn!(
            demand_id = demand.id,
            price = %demand.demand_price_per_kg,
            quantity = %demand.quantity_needed_kg,
            "Demand posting not representable, ignoring"
        );
        return None;
    };

    Some(Opportunity {
        demand_id: demand.id,
        market_id: demand.market_id,
        market_name: demand.market_name.clone(),
        location_name: demand.location_name.clone(),
        location: demand.market_location,
        crop_id: demand.crop_id,
        crop_name: demand.crop_name.clone(),
        price_per_kg,
        quantity_needed_kg,
        valid_until: demand.valid_until,
        distance_km: round_tenths(distance_km(farmer, demand.market_location)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn demand(id: i64, price: Decimal, latitude: f64, longitude: f64) -> MarketDemand {
        MarketDemand {
            id,
            market_id: id * 10,
            market_name: format!("Market {id}"),
            location_name: "Somewhere".into(),
            market_location: GeoPoint {
                latitude,
                longitude,
            },
            crop_id: 1,
            crop_name: "Tomato".into(),
            demand_price_per_kg: price,
            quantity_needed_kg: Decimal::from(250),
            valid_from: None,
            valid_until: Utc::now() + Duration::days(3),
        }
    }

    #[test]
    fn test_ordered_by_price_not_distance() {
        let farmer = GeoPoint {
            latitude: 19.0760,
            longitude: 72.8777,
        };
        let demands = vec![
            demand(1, Decimal::new(4550, 2), 19.0760, 72.8777),
            demand(2, Decimal::from(60), 21.1458, 79.0882),
            demand(3, Decimal::from(52), 18.5204, 73.8567),
        ];

        let opportunities = scan_opportunities(farmer, &demands);

        let ids: Vec<i64> = opportunities.iter().map(|o| o.demand_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(opportunities[2].distance_km, 0.0);
        assert_eq!(opportunities[2].price_per_kg, 45.5);
        assert_eq!(opportunities[1].distance_km, 120.2);
        assert_eq!(opportunities[0].quantity_needed_kg, 250.0);
    }

    #[test]
    fn test_fractional_and_extreme_values_carried_exactly() {
        let farmer = GeoPoint {
            latitude: 0.0,
            longitude: 0.0,
        };
        let mut large = demand(1, Decimal::MAX, 0.0, 0.0);
        large.quantity_needed_kg = Decimal::new(12_345, 3);
        let small = demand(2, Decimal::new(1, 28), 0.0, 0.0);

        let opportunities = scan_opportunities(farmer, &[small, large]);

        assert_eq!(opportunities.len(), 2);
        assert_eq!(opportunities[0].demand_id, 1);
        assert!(opportunities[0].price_per_kg > 7.9e28);
        assert_eq!(opportunities[0].quantity_needed_kg, 12.345);
        assert!(opportunities[1].price_per_kg > 0.0);
    }

    #[test]
    fn test_empty() {
        let farmer = GeoPoint {
            latitude: 0.0,
            longitude: 0.0,
        };
        assert!(scan_opportunities(farmer, &[]).is_empty());
    }
}
