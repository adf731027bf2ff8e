//! Material requirements: raw-material quantities needed for an arbitrary
//! production quantity, scaled from a BOM's per-batch formula.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::entities::{bom, bom_detail};
use crate::errors::ServiceError;

/// Decimal places kept on every required quantity
pub const REQUIREMENT_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MaterialRequirement {
    pub raw_code: String,
    /// Raw material name, `null` when the code no longer resolves
    pub raw_material: Option<String>,
    pub required_quantity: Decimal,
    pub unit_of_measure: Option<String>,
    /// Quantity per batch from the BOM line
    pub batch_quantity: Decimal,
    /// Overage applied, in percent
    pub waste_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MaterialRequirements {
    pub bom_id: i32,
    pub product_code: String,
    pub production_quantity: Decimal,
    pub batch_size: Decimal,
    pub requirements: Vec<MaterialRequirement>,
}

/// `qty_per_batch * production_quantity / batch_size`, raised by the overage
/// percentage when one is present, rounded half away from zero to four places.
pub fn required_quantity(
    qty_per_batch: Decimal,
    production_quantity: Decimal,
    batch_size: Decimal,
    overage: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    if batch_size <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Batch size must be greater than zero".to_string(),
        ));
    }
    if production_quantity < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Production quantity must not be negative".to_string(),
        ));
    }

    let out_of_range =
        || ServiceError::ValidationError("Required quantity is out of range".to_string());

    let mut required = qty_per_batch
        .checked_mul(production_quantity)
        .and_then(|scaled| scaled.checked_div(batch_size))
        .ok_or_else(out_of_range)?;

    if let Some(overage) = overage.filter(|o| !o.is_zero()) {
        let factor = Decimal::ONE + overage / Decimal::ONE_HUNDRED;
        required = required.checked_mul(factor).ok_or_else(out_of_range)?;
    }

    Ok(required.round_dp_with_strategy(REQUIREMENT_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Builds the requirement sheet for `master` from its active lines.
/// `raw_names` maps raw codes to display names.
pub fn compute(
    master: &bom::Model,
    details: &[bom_detail::Model],
    raw_names: &HashMap<String, String>,
    production_quantity: Decimal,
) -> Result<MaterialRequirements, ServiceError> {
    let requirements = details
        .iter()
        .filter(|line| line.is_active)
        .map(|line| {
            Ok(MaterialRequirement {
                raw_code: line.raw_code.clone(),
                raw_material: raw_names.get(&line.raw_code).cloned(),
                required_quantity: required_quantity(
                    line.qty_per_batch,
                    production_quantity,
                    master.batch_size,
                    line.overage,
                )?,
                unit_of_measure: line.qty_per_batch_unit.clone(),
                batch_quantity: line.qty_per_batch,
                waste_percentage: line.overage,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    Ok(MaterialRequirements {
        bom_id: master.id,
        product_code: master.product_code.clone(),
        production_quantity,
        batch_size: master.batch_size,
        requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn overage_is_applied_after_scaling() {
        // 10 per batch of 100, producing 50, 5% overage
        let required = required_quantity(dec!(10), dec!(50), dec!(100), Some(dec!(5))).unwrap();
        assert_eq!(required, dec!(5.25));
    }

    #[rstest]
    #[case(dec!(10), dec!(50), dec!(100), None, dec!(5))]
    #[case(dec!(1), dec!(1), dec!(3), None, dec!(0.3333))]
    #[case(dec!(2), dec!(1), dec!(3), None, dec!(0.6667))]
    #[case(dec!(0.00005), dec!(1), dec!(1), None, dec!(0.0001))]
    #[case(dec!(10), dec!(0), dec!(100), Some(dec!(5)), dec!(0))]
    #[case(dec!(10), dec!(50), dec!(100), Some(dec!(0)), dec!(5))]
    fn required_quantity_cases(
        #[case] qty: Decimal,
        #[case] production: Decimal,
        #[case] batch: Decimal,
        #[case] overage: Option<Decimal>,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            required_quantity(qty, production, batch, overage).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    fn non_positive_batch_size_is_rejected(#[case] batch: Decimal) {
        assert_matches!(
            required_quantity(dec!(10), dec!(50), batch, None),
            Err(ServiceError::ValidationError(msg)) if msg.contains("Batch size")
        );
    }

    #[test]
    fn negative_production_quantity_is_rejected() {
        assert_matches!(
            required_quantity(dec!(10), dec!(-1), dec!(100), None),
            Err(ServiceError::ValidationError(_))
        );
    }

    proptest! {
        #[test]
        fn doubling_production_doubles_requirement(
            qty_cents in 0i64..1_000_000,
            production in 0i64..100_000,
            batch in 1i64..10_000,
        ) {
            let qty = Decimal::new(qty_cents, 2);
            let single = required_quantity(qty, Decimal::from(production), Decimal::from(batch), None).unwrap();
            let double = required_quantity(qty, Decimal::from(production * 2), Decimal::from(batch), None).unwrap();
            // Both sides are rounded independently at the fourth place
            let tolerance = Decimal::new(2, REQUIREMENT_SCALE);
            prop_assert!((double - single * Decimal::TWO).abs() <= tolerance);
        }
    }
}
