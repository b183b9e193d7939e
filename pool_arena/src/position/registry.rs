//! In-memory position registry.

use super::{
    errors::{PositionError, PositionResult},
    models::{NewPosition, Position, PositionId},
};
use crate::{config::MAX_AMOUNT, participant::ParticipantId};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Position registry
#[derive(Debug)]
pub struct PositionRegistry {
    positions: RwLock<HashMap<PositionId, Position>>,
    next_position_id: RwLock<PositionId>,
}

impl Default for PositionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self {
            positions: RwLock::new(HashMap::new()),
            next_position_id: RwLock::new(1),
        }
    }

    /// Register a new position. New positions start in range.
    pub async fn create(&self, request: NewPosition) -> PositionResult<Position> {
        if request.value <= 0 || request.value > MAX_AMOUNT {
            return Err(PositionError::InvalidValue(request.value));
        }

        let id = {
            let mut next_id = self.next_position_id.write().await;
            let id = *next_id;
            *next_id += 1;
            id
        };

        let now = Utc::now();
        let position = Position {
            id,
            owner: request.owner,
            pool: request.pool,
            value: request.value,
            apy_pct: request.apy_pct,
            risk: request.risk,
            strategy: request.strategy,
            in_range: true,
            created_at: now,
            updated_at: now,
        };

        log::info!(
            "Position {} created for {} on {} ({} units)",
            id,
            position.owner,
            position.pool,
            position.value
        );

        self.positions.write().await.insert(id, position.clone());
        Ok(position)
    }

    /// Get a position
    pub async fn get(&self, id: PositionId) -> PositionResult<Position> {
        self.positions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(PositionError::NotFound(id))
    }

    /// List positions owned by a participant, oldest first
    pub async fn list_for_owner(&self, owner: &ParticipantId) -> Vec<Position> {
        let mut owned: Vec<Position> = self
            .positions
            .read()
            .await
            .values()
            .filter(|p| &p.owner == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.id);
        owned
    }

    /// Record the result of an external range rebalance
    pub async fn set_in_range(&self, id: PositionId, in_range: bool) -> PositionResult<Position> {
        let mut positions = self.positions.write().await;
        let position = positions.get_mut(&id).ok_or(PositionError::NotFound(id))?;

        if position.in_range != in_range {
            log::info!(
                "Position {} is now {}",
                id,
                if in_range { "in range" } else { "out of range" }
            );
        }

        position.in_range = in_range;
        position.updated_at = Utc::now();
        Ok(position.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::models::{RangeStrategy, RiskTier};

    fn new_position(owner: &str, value: i64) -> NewPosition {
        NewPosition {
            owner: owner.into(),
            pool: "ETH/USDC".parse().unwrap(),
            value,
            apy_pct: 12.5,
            risk: RiskTier::Low,
            strategy: RangeStrategy::Balanced,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let registry = PositionRegistry::new();
        let first = registry.create(new_position("alice", 425_000)).await.unwrap();
        let second = registry.create(new_position("alice", 280_000)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.in_range);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_value() {
        let registry = PositionRegistry::new();
        let err = registry.create(new_position("alice", 0)).await.unwrap_err();
        assert_eq!(err, PositionError::InvalidValue(0));
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_value() {
        let registry = PositionRegistry::new();
        let err = registry
            .create(new_position("whale", i64::MAX))
            .await
            .unwrap_err();
        assert_eq!(err, PositionError::InvalidValue(i64::MAX));
        assert!(registry.create(new_position("whale", MAX_AMOUNT)).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_in_range() {
        let registry = PositionRegistry::new();
        let position = registry.create(new_position("bob", 145_000)).await.unwrap();

        let updated = registry.set_in_range(position.id, false).await.unwrap();
        assert!(!updated.in_range);
        assert!(!registry.get(position.id).await.unwrap().in_range);

        assert_eq!(
            registry.set_in_range(99, true).await.unwrap_err(),
            PositionError::NotFound(99)
        );
    }

    #[tokio::test]
    async fn test_list_for_owner() {
        let registry = PositionRegistry::new();
        registry.create(new_position("alice", 1_000)).await.unwrap();
        registry.create(new_position("bob", 2_000)).await.unwrap();
        registry.create(new_position("alice", 3_000)).await.unwrap();

        let owned = registry.list_for_owner(&"alice".into()).await;
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].value, 1_000);
        assert_eq!(owned[1].value, 3_000);
    }
}
