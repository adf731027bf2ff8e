//! Batch breakdown for production plans.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::EntityTrait;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{db::DbPool, entities::production_plan, errors::ServiceError};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatchCalculation {
    pub plan_id: i32,
    pub product_code: String,
    pub planned_quantity: Decimal,
    pub batch_size: Decimal,
    /// planned / batch size, two decimals
    pub batches_needed: Decimal,
    pub full_batches: i64,
    pub partial_batch_quantity: Decimal,
    pub total_production: Decimal,
}

/// Splits `planned` into whole batches of `batch_size` plus a remainder.
pub fn split_into_batches(
    planned: Decimal,
    batch_size: Decimal,
) -> Result<(Decimal, i64, Decimal), ServiceError> {
    if batch_size <= Decimal::ZERO || planned <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Batch size or planned quantity not defined".to_string(),
        ));
    }

    let ratio = planned
        .checked_div(batch_size)
        .ok_or_else(|| ServiceError::ValidationError("Batch count out of range".to_string()))?;
    let full = ratio
        .trunc()
        .to_i64()
        .ok_or_else(|| ServiceError::ValidationError("Batch count out of range".to_string()))?;
    let partial = planned % batch_size;

    Ok((
        ratio.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        full,
        partial,
    ))
}

#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DbPool>,
}

impl ProductionService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn batch_calculation(&self, plan_id: i32) -> Result<BatchCalculation, ServiceError> {
        let plan = production_plan::Entity::find_by_id(plan_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Production plan"))?;

        let batch_size = plan.batch_size.unwrap_or_default();
        let (batches_needed, full_batches, partial_batch_quantity) =
            split_into_batches(plan.planned_quantity, batch_size)?;

        Ok(BatchCalculation {
            plan_id,
            product_code: plan.product_code,
            planned_quantity: plan.planned_quantity,
            batch_size,
            batches_needed,
            full_batches,
            partial_batch_quantity,
            total_production: Decimal::from(full_batches) * batch_size + partial_batch_quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1050), dec!(200), dec!(5.25), 5, dec!(50))]
    #[case(dec!(1000), dec!(250), dec!(4), 4, dec!(0))]
    #[case(dec!(100), dec!(300), dec!(0.33), 0, dec!(100))]
    fn splits_plan_into_batches(
        #[case] planned: Decimal,
        #[case] batch_size: Decimal,
        #[case] needed: Decimal,
        #[case] full: i64,
        #[case] partial: Decimal,
    ) {
        let (n, f, p) = split_into_batches(planned, batch_size).unwrap();
        assert_eq!(n, needed);
        assert_eq!(f, full);
        assert_eq!(p, partial);
        assert_eq!(Decimal::from(f) * batch_size + p, planned);
    }

    #[test]
    fn missing_batch_size_is_rejected() {
        assert_matches!(
            split_into_batches(dec!(100), Decimal::ZERO),
            Err(ServiceError::ValidationError(msg)) if msg == "Batch size or planned quantity not defined"
        );
    }
}
